//! End-to-end tests for the extraction pipeline

#[cfg(test)]
mod tests {
    use crate::{
        AssignmentOutline, EnhancementTips, EnvelopeCheck, ExtractionError, FlashCard,
        FlashCardDeck, KeyPoints, NotesOrganization, StructuredOutput,
        StructuredResponseExtractor, StudyPlan, StudyTask, DEFAULT_DIFFICULTY,
    };
    use serde_json::{json, Value};

    fn body(content: &str) -> String {
        json!({
            "id": "cmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    fn extract<T: StructuredOutput>(content: &str) -> Result<T, ExtractionError> {
        StructuredResponseExtractor::new().extract_as::<T>(&body(content))
    }

    #[test]
    fn test_identity_for_exact_match() {
        let content = json!({
            "key_points": ["Cell theory", {"title": "Photosynthesis", "description": "Light to energy"}],
            "supporting_details": {"Cell theory": ["All living things are made of cells"]}
        });

        let result = StructuredResponseExtractor::new()
            .extract(&body(&content.to_string()), &KeyPoints::SCHEMA, KeyPoints::SOFT_DEFAULTS)
            .unwrap();
        assert_eq!(result.into_value(), content);
    }

    #[test]
    fn test_fenced_empty_key_points() {
        let key_points: KeyPoints =
            extract("```json\n{\"key_points\":[],\"supporting_details\":{}}\n```").unwrap();
        assert!(key_points.key_points.is_empty());
        assert!(key_points.supporting_details.is_empty());
    }

    #[test]
    fn test_fenced_equals_unfenced() {
        let raw = r#"{"title": "WWI", "points": ["Causes"], "keywords": ["1914"]}"#;
        let plain: AssignmentOutline = extract(raw).unwrap();
        let fenced: AssignmentOutline = extract(&format!("```json\n{}\n```", raw)).unwrap();
        assert_eq!(plain, fenced);
    }

    #[test]
    fn test_missing_supporting_details_defaults_to_empty_map() {
        let key_points: KeyPoints = extract(r#"{"key_points": ["Mitosis"]}"#).unwrap();
        assert_eq!(key_points.key_points, vec![json!("Mitosis")]);
        assert!(key_points.supporting_details.is_empty());
    }

    #[test]
    fn test_truncated_output_is_invalid_json() {
        let content = r#"{"key_points": ["#;
        let parser_error = serde_json::from_str::<Value>(content).unwrap_err();

        match extract::<KeyPoints>(content) {
            Err(ExtractionError::InvalidJson { line, column, offset, text, .. }) => {
                assert_eq!((line, column), (parser_error.line(), parser_error.column()));
                assert_eq!(offset, content.len());
                assert_eq!(text, content);
            }
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_flash_cards_drop_non_object_elements() {
        let content = r#"{"quiz": [
            {"question": "When did WWI start?", "answer": "1914", "difficulty": 2},
            "not a card",
            {"question": "Who was assassinated?", "answer": "Archduke Franz Ferdinand"}
        ]}"#;

        let deck: FlashCardDeck = extract(content).unwrap();
        assert_eq!(
            deck.quiz,
            vec![
                FlashCard {
                    question: "When did WWI start?".to_string(),
                    answer: "1914".to_string(),
                    difficulty: 2,
                },
                FlashCard {
                    question: "Who was assassinated?".to_string(),
                    answer: "Archduke Franz Ferdinand".to_string(),
                    difficulty: DEFAULT_DIFFICULTY,
                },
            ]
        );
    }

    #[test]
    fn test_flash_card_missing_answer_fails_extraction() {
        let content = r#"{"quiz": [{"question": "Q1", "answer": "A1"}, {"question": "Q2"}]}"#;
        match extract::<FlashCardDeck>(content) {
            Err(ExtractionError::SchemaViolation { field, .. }) => {
                assert_eq!(field, "quiz[1].answer");
            }
            other => panic!("Expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_flash_cards_without_quiz_key() {
        let result = extract::<FlashCardDeck>(r#"[{"question": "Q", "answer": "A"}]"#);
        assert_eq!(result.unwrap_err(), ExtractionError::UnexpectedShape { found: "array" });

        let result = extract::<FlashCardDeck>(r#"{"cards": []}"#);
        assert!(matches!(
            result,
            Err(ExtractionError::SchemaViolation { ref field, .. }) if field == "quiz"
        ));
    }

    #[test]
    fn test_empty_choices_never_parses_content() {
        let result = StructuredResponseExtractor::new()
            .extract_as::<KeyPoints>(r#"{"choices": []}"#);
        assert_eq!(
            result.unwrap_err(),
            ExtractionError::MalformedEnvelope { check: EnvelopeCheck::EmptyChoices }
        );
    }

    #[test]
    fn test_enhancement_tips_soft_fields() {
        let tips: EnhancementTips =
            extract(r#"{"overall": ["Tighten the conclusion"], "grammar": ["Fix comma splices"]}"#)
                .unwrap();
        assert_eq!(tips.overall, vec!["Tighten the conclusion"]);
        assert_eq!(tips.grammar, vec!["Fix comma splices"]);
        assert_eq!(tips.writing_style, "");
        assert!(tips.clarity.is_empty());

        let result = extract::<EnhancementTips>(r#"{"grammar": []}"#);
        assert!(matches!(
            result,
            Err(ExtractionError::SchemaViolation { ref field, .. }) if field == "overall"
        ));
    }

    #[test]
    fn test_study_plan() {
        let plan: StudyPlan = extract(
            r#"{
                "schedule": {"Monday": ["9am-11am: Calculus Chapter 1"]},
                "priority_topics": ["Calculus Chapter 1"],
                "estimated_time": {"Calculus Chapter 1": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(plan.estimated_time["Calculus Chapter 1"], 3.0);
        assert!(plan.resources.is_empty());
    }

    #[test]
    fn test_notes_organization_rejects_string_categories() {
        let result = extract::<NotesOrganization>(r#"{"categories": ["Physics"]}"#);
        assert!(matches!(
            result,
            Err(ExtractionError::SchemaViolation { ref field, .. }) if field == "categories"
        ));
    }

    #[test]
    fn test_task_schema_matches_typed_schema() {
        assert_eq!(StudyTask::KeyPoints.target_schema(), KeyPoints::SCHEMA);
        assert_eq!(StudyTask::FlashCards.target_schema(), FlashCardDeck::SCHEMA);
        assert_eq!(StudyTask::StudyPlan.soft_defaults(), StudyPlan::SOFT_DEFAULTS);
    }

    #[test]
    fn test_concurrent_extraction() {
        let extractor = StructuredResponseExtractor::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let content = format!(r#"{{"title": "Topic {}"}}"#, i);
                    extractor.extract_as::<AssignmentOutline>(&body(&content))
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let outline = handle.join().unwrap().unwrap();
            assert_eq!(outline.title, format!("Topic {}", i));
        }
    }
}
