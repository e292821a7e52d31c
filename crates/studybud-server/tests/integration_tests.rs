//! Integration tests for the StudyBud HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use studybud_llm::{LlmError, MockProvider};
use studybud_server::{
    handlers::{create_router, AppState, ErrorResponse, HealthCheckResponse},
    service::StudyAssistant,
};
use tower::ServiceExt; // for oneshot

/// Helper to create an app over a mock provider
fn create_test_app(provider: &MockProvider) -> Router {
    let assistant = StudyAssistant::new(Arc::new(provider.clone()), 500);
    create_router(AppState {
        assistant: Arc::new(assistant),
    })
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_app(&MockProvider::default());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "Welcome to StudyBud API");
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app(&MockProvider::default());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.model, "mock-model");
}

#[tokio::test]
async fn test_extract_key_points_fenced_answer() {
    let mut provider = MockProvider::default();
    provider.add_content(
        "Please extract key points",
        "```json\n{\"key_points\": [\"Newton's first law\"]}\n```",
    );
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/extract-key-points",
        json!({"notes_corpus": "Objects stay at rest unless acted on by a force."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"key_points": ["Newton's first law"], "supporting_details": {}})
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_generate_flash_cards_returns_list() {
    let mut provider = MockProvider::default();
    provider.add_content(
        "Please generate flash cards",
        r#"{"quiz": [
            {"question": "What is H2O?", "answer": "Water", "difficulty": 1},
            "stray text",
            {"question": "What is NaCl?", "answer": "Salt"}
        ]}"#,
    );
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/generate-flash-cards",
        json!({"notes_corpus": "Common chemical formulas"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"question": "What is H2O?", "answer": "Water", "difficulty": 1},
            {"question": "What is NaCl?", "answer": "Salt", "difficulty": 3}
        ])
    );
}

#[tokio::test]
async fn test_generate_study_plan_accepts_json_schedule() {
    let mut provider = MockProvider::default();
    provider.add_content(
        "Please create a study plan",
        r#"{
            "schedule": {"Monday": ["9am-11am: Algebra"]},
            "priority_topics": ["Algebra"]
        }"#,
    );
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/generate-study-plan",
        json!({"schedule_data": {"availability": {"Monday": ["9am-11am"]}, "tasks": ["Algebra"]}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority_topics"], json!(["Algebra"]));
    assert_eq!(body["estimated_time"], json!({}));
    assert_eq!(body["resources"], json!({}));

    let user_content = provider.last_request().unwrap().user_content().unwrap().to_string();
    assert!(user_content.contains(r#""availability""#));
}

#[tokio::test]
async fn test_enhance_assignment_requires_overall() {
    let provider = MockProvider::with_content(r#"{"grammar": ["Use the active voice"]}"#);
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/enhance-assignment",
        json!({"assignment": "My essay draft"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.kind, "schema_violation");
    assert!(error.error.contains("overall"));
}

#[tokio::test]
async fn test_research_brief_invalid_json() {
    let provider = MockProvider::with_content(r#"{"title": "Attention Is All You Need", "#);
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/research-brief",
        json!({"paper_text": "We propose the Transformer..."}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "invalid_json");
}

#[tokio::test]
async fn test_analyze_transcript() {
    let mut provider = MockProvider::default();
    provider.add_content(
        "Please extract key points",
        r#"{"key_points": [{"title": "Mitosis", "description": "Cell division"}]}"#,
    );
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/analyze-transcript",
        json!({"transcription": "Today we discuss mitosis."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"key_points": ["Mitosis"], "summary": "Cell division."}));
}

#[tokio::test]
async fn test_blank_input_rejected() {
    let provider = MockProvider::default();
    let app = create_test_app(&provider);

    let (status, body) = post_json(app, "/organize-notes", json!({"notes_corpus": "  "})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_input");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_oversized_input_rejected() {
    let provider = MockProvider::default();
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/assignment-helper",
        json!({"assignment": "x".repeat(501)}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "input_too_long");
}

#[tokio::test]
async fn test_missing_body_field_rejected() {
    let app = create_test_app(&MockProvider::default());

    let (status, body) = post_json(app, "/research-brief", json!({"text": "wrong field"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.kind, "invalid_input");
    assert!(error.error.contains("paper_text"));
}

#[tokio::test]
async fn test_upstream_rate_limit() {
    let provider = MockProvider::failing(LlmError::RateLimitExceeded);
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/assignment-helper",
        json!({"assignment": "Essay on climate"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "rate_limited");
}

#[tokio::test]
async fn test_malformed_envelope() {
    let provider = MockProvider::new(r#"{"error": {"message": "overloaded"}}"#);
    let app = create_test_app(&provider);

    let (status, body) = post_json(
        app,
        "/organize-notes",
        json!({"notes_corpus": "Physics and chemistry notes"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "malformed_envelope");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = create_test_app(&MockProvider::default());

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/extract-key-points")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
