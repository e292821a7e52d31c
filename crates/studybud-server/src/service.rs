//! The study assistant: prompt, complete, extract
//!
//! Each task builds a request from the task's prompt and schema, sends it to
//! the injected provider, and runs the raw body through the extractor.

use std::sync::Arc;
use studybud_extractor::{
    AssignmentOutline, EnhancementTips, ExtractionError, ExtractionRequest, FlashCard,
    FlashCardDeck, KeyPoints, NotesOrganization, ResearchBrief, StructuredOutput,
    StructuredResponseExtractor, StudyPlan, StudyTask, TranscriptDigest,
};
use studybud_llm::{ChatRequest, CompletionProvider, LlmError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from a study task
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The input cannot be sent to the model
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The input exceeds the configured limit
    #[error("Input too long: {len} characters (limit {max})")]
    InputTooLong {
        /// Characters received
        len: usize,
        /// Configured limit
        max: usize,
    },

    /// The completion call failed
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model's answer could not be turned into the expected object
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl ServiceError {
    /// Short machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::InputTooLong { .. } => "input_too_long",
            ServiceError::Llm(e) => match e {
                LlmError::Timeout => "upstream_timeout",
                LlmError::RateLimitExceeded => "rate_limited",
                LlmError::Unauthorized => "unauthorized",
                LlmError::ModelNotAvailable(_) => "model_not_available",
                LlmError::Config(_) => "client_config",
                LlmError::Communication(_) => "upstream_error",
            },
            ServiceError::Extraction(e) => e.kind(),
        }
    }
}

/// Runs study tasks against a completion provider
pub struct StudyAssistant {
    provider: Arc<dyn CompletionProvider>,
    extractor: StructuredResponseExtractor,
    max_input_chars: usize,
}

impl StudyAssistant {
    /// Create an assistant over a shared provider
    pub fn new(provider: Arc<dyn CompletionProvider>, max_input_chars: usize) -> Self {
        Self {
            provider,
            extractor: StructuredResponseExtractor::new(),
            max_input_chars,
        }
    }

    /// Model the provider talks to
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Organize notes into categories and a concept map
    pub async fn organize_notes(&self, notes: &str) -> Result<NotesOrganization, ServiceError> {
        self.run(StudyTask::OrganizeNotes, notes).await
    }

    /// Extract key points and supporting details from notes
    pub async fn extract_key_points(&self, notes: &str) -> Result<KeyPoints, ServiceError> {
        self.run(StudyTask::KeyPoints, notes).await
    }

    /// Generate flash cards from notes
    pub async fn generate_flash_cards(&self, notes: &str) -> Result<Vec<FlashCard>, ServiceError> {
        let deck: FlashCardDeck = self.run(StudyTask::FlashCards, notes).await?;
        Ok(deck.quiz)
    }

    /// Build a study plan from schedule data
    pub async fn create_study_plan(&self, schedule_data: &str) -> Result<StudyPlan, ServiceError> {
        self.run(StudyTask::StudyPlan, schedule_data).await
    }

    /// Outline an assignment
    pub async fn assignment_helper(
        &self,
        assignment: &str,
    ) -> Result<AssignmentOutline, ServiceError> {
        self.run(StudyTask::AssignmentHelper, assignment).await
    }

    /// Suggest improvements to an assignment draft
    pub async fn enhance_assignment(
        &self,
        assignment: &str,
    ) -> Result<EnhancementTips, ServiceError> {
        self.run(StudyTask::EnhanceAssignment, assignment).await
    }

    /// Summarize a research paper
    pub async fn research_brief(&self, paper_text: &str) -> Result<ResearchBrief, ServiceError> {
        self.run(StudyTask::ResearchBrief, paper_text).await
    }

    /// Reduce a lecture transcript to key-point titles and a short summary
    pub async fn analyze_transcript(
        &self,
        transcription: &str,
    ) -> Result<TranscriptDigest, ServiceError> {
        let key_points = self.extract_key_points(transcription).await?;
        let digest = TranscriptDigest::from_key_points(&key_points);
        debug!("Transcript digest: {} key points", digest.key_points.len());
        Ok(digest)
    }

    async fn run<T: StructuredOutput>(
        &self,
        task: StudyTask,
        input: &str,
    ) -> Result<T, ServiceError> {
        debug_assert_eq!(task.target_schema(), T::SCHEMA);
        let input_chars = self.check_input(input)?;

        let request = ExtractionRequest::for_task(task, input);
        let chat = ChatRequest::new(
            self.provider.model(),
            request.system_prompt,
            request.user_content,
        )
        .with_json_schema(request.target_schema.to_json_schema());

        info!(task = %task, "Requesting completion ({} input chars)", input_chars);
        let body = self.provider.complete(&chat).await?;

        self.extractor.extract_as::<T>(&body).map_err(|e| {
            warn!(task = %task, kind = e.kind(), "Extraction failed: {}", e);
            ServiceError::from(e)
        })
    }

    /// Returns the input length in characters
    fn check_input(&self, input: &str) -> Result<usize, ServiceError> {
        if input.trim().is_empty() {
            return Err(ServiceError::InvalidInput("input must not be empty".to_string()));
        }

        let len = input.chars().count();
        if len > self.max_input_chars {
            return Err(ServiceError::InputTooLong {
                len,
                max: self.max_input_chars,
            });
        }
        Ok(len)
    }
}
