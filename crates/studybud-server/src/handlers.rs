//! HTTP request handlers for the study assistant.
//!
//! One POST route per study task plus welcome and health endpoints. Failures
//! are returned as `{error, kind}` JSON bodies.

use crate::service::{ServiceError, StudyAssistant};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use studybud_extractor::{
    AssignmentOutline, EnhancementTips, FlashCard, KeyPoints, NotesOrganization, ResearchBrief,
    StudyPlan, TranscriptDigest,
};
use studybud_llm::LlmError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Runs the study tasks
    pub assistant: Arc<StudyAssistant>,
}

/// Body for the notes-based routes
#[derive(Debug, Deserialize)]
pub struct NotesInput {
    /// Raw notes text
    pub notes_corpus: String,
}

/// Body for the study plan route
#[derive(Debug, Deserialize)]
pub struct ScheduleInput {
    /// Availability and tasks, as a JSON document or free text
    pub schedule_data: Value,
}

/// Body for the assignment routes
#[derive(Debug, Deserialize)]
pub struct AssignmentInput {
    /// Assignment prompt or draft
    pub assignment: String,
}

/// Body for the research brief route
#[derive(Debug, Deserialize)]
pub struct PaperInput {
    /// Full text of the paper
    pub paper_text: String,
}

/// Body for the transcript route
#[derive(Debug, Deserialize)]
pub struct TranscriptInput {
    /// Lecture transcription text
    pub transcription: String,
}

/// Welcome response
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Greeting
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Model requests are sent to
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error category
    pub kind: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// A study task failed
    Service(ServiceError),
    /// The request body is not JSON or lacks a required field
    InvalidBody(JsonRejection),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::Service(e) => match e {
                ServiceError::InvalidInput(_) | ServiceError::InputTooLong { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ServiceError::Extraction(_) => StatusCode::BAD_GATEWAY,
                ServiceError::Llm(e) => match e {
                    LlmError::RateLimitExceeded => StatusCode::SERVICE_UNAVAILABLE,
                    LlmError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    LlmError::Unauthorized | LlmError::Config(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    LlmError::ModelNotAvailable(_) | LlmError::Communication(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                },
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidBody(_) => "invalid_input",
            AppError::Service(e) => e.kind(),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidBody(rejection) => rejection.body_text(),
            AppError::Service(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, message);
        } else {
            warn!("Request rejected ({}): {}", status, message);
        }

        let body = Json(ErrorResponse {
            error: message,
            kind: self.kind().to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

/// GET / - Welcome message
async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to StudyBud API".to_string(),
    })
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        model: state.assistant.model().to_string(),
    })
}

/// POST /organize-notes
async fn organize_notes(
    State(state): State<AppState>,
    payload: Result<Json<NotesInput>, JsonRejection>,
) -> Result<Json<NotesOrganization>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.organize_notes(&input.notes_corpus).await?))
}

/// POST /extract-key-points
async fn extract_key_points(
    State(state): State<AppState>,
    payload: Result<Json<NotesInput>, JsonRejection>,
) -> Result<Json<KeyPoints>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.extract_key_points(&input.notes_corpus).await?))
}

/// POST /generate-flash-cards
async fn generate_flash_cards(
    State(state): State<AppState>,
    payload: Result<Json<NotesInput>, JsonRejection>,
) -> Result<Json<Vec<FlashCard>>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.generate_flash_cards(&input.notes_corpus).await?))
}

/// POST /generate-study-plan
///
/// A string `schedule_data` is passed through as-is; any other JSON value is
/// sent in its serialized form.
async fn generate_study_plan(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleInput>, JsonRejection>,
) -> Result<Json<StudyPlan>, AppError> {
    let Json(input) = payload?;
    let schedule = match input.schedule_data {
        Value::String(text) => text,
        other => other.to_string(),
    };
    Ok(Json(state.assistant.create_study_plan(&schedule).await?))
}

/// POST /assignment-helper
async fn assignment_helper(
    State(state): State<AppState>,
    payload: Result<Json<AssignmentInput>, JsonRejection>,
) -> Result<Json<AssignmentOutline>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.assignment_helper(&input.assignment).await?))
}

/// POST /enhance-assignment
async fn enhance_assignment(
    State(state): State<AppState>,
    payload: Result<Json<AssignmentInput>, JsonRejection>,
) -> Result<Json<EnhancementTips>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.enhance_assignment(&input.assignment).await?))
}

/// POST /research-brief
async fn research_brief(
    State(state): State<AppState>,
    payload: Result<Json<PaperInput>, JsonRejection>,
) -> Result<Json<ResearchBrief>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.research_brief(&input.paper_text).await?))
}

/// POST /analyze-transcript
async fn analyze_transcript(
    State(state): State<AppState>,
    payload: Result<Json<TranscriptInput>, JsonRejection>,
) -> Result<Json<TranscriptDigest>, AppError> {
    let Json(input) = payload?;
    Ok(Json(state.assistant.analyze_transcript(&input.transcription).await?))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/organize-notes", post(organize_notes))
        .route("/extract-key-points", post(extract_key_points))
        .route("/generate-flash-cards", post(generate_flash_cards))
        .route("/generate-study-plan", post(generate_study_plan))
        .route("/assignment-helper", post(assignment_helper))
        .route("/enhance-assignment", post(enhance_assignment))
        .route("/research-brief", post(research_brief))
        .route("/analyze-transcript", post(analyze_transcript))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
