//! Prompt construction for each study task

use crate::schema::{SoftDefault, TargetSchema};
use crate::types::{
    AssignmentOutline, EnhancementTips, FlashCardDeck, KeyPoints, NotesOrganization,
    ResearchBrief, StructuredOutput, StudyPlan,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tasks the assistant can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyTask {
    /// Extract key points and supporting details from notes
    KeyPoints,
    /// Generate question/answer cards from notes
    FlashCards,
    /// Categorize notes and build a concept map
    OrganizeNotes,
    /// Build a study schedule from availability and tasks
    StudyPlan,
    /// Outline an assignment (title, points, keywords)
    AssignmentHelper,
    /// Suggest improvements to an assignment draft
    EnhanceAssignment,
    /// Summarize a research paper
    ResearchBrief,
}

impl StudyTask {
    /// All tasks, in route order
    pub const ALL: [StudyTask; 7] = [
        StudyTask::OrganizeNotes,
        StudyTask::KeyPoints,
        StudyTask::FlashCards,
        StudyTask::StudyPlan,
        StudyTask::AssignmentHelper,
        StudyTask::EnhanceAssignment,
        StudyTask::ResearchBrief,
    ];

    /// System prompt sent ahead of the user's content
    pub fn system_prompt(&self) -> &'static str {
        match self {
            StudyTask::KeyPoints => KEY_POINTS_INSTRUCTIONS,
            StudyTask::FlashCards => FLASH_CARD_INSTRUCTIONS,
            StudyTask::OrganizeNotes => ORGANIZE_INSTRUCTIONS,
            StudyTask::StudyPlan => STUDY_PLAN_INSTRUCTIONS,
            StudyTask::AssignmentHelper => ASSIGNMENT_INSTRUCTIONS,
            StudyTask::EnhanceAssignment => ENHANCE_INSTRUCTIONS,
            StudyTask::ResearchBrief => RESEARCH_INSTRUCTIONS,
        }
    }

    /// Wrap the user's input for this task
    pub fn user_content(&self, input: &str) -> String {
        match self {
            StudyTask::KeyPoints => format!("Please extract key points from these notes:\n{}", input),
            StudyTask::FlashCards => format!("Please generate flash cards from these notes:\n{}", input),
            StudyTask::OrganizeNotes => format!("Please organize these notes:\n{}", input),
            StudyTask::StudyPlan => {
                format!("Please create a study plan from this schedule data:\n{}", input)
            }
            StudyTask::AssignmentHelper
            | StudyTask::EnhanceAssignment
            | StudyTask::ResearchBrief => input.to_string(),
        }
    }

    /// Schema the model's answer must satisfy
    pub fn target_schema(&self) -> TargetSchema {
        self.bound().0
    }

    /// Soft-default allow-list for the target schema
    pub fn soft_defaults(&self) -> &'static [SoftDefault] {
        self.bound().1
    }

    fn bound(&self) -> (TargetSchema, &'static [SoftDefault]) {
        fn of<T: StructuredOutput>() -> (TargetSchema, &'static [SoftDefault]) {
            (T::SCHEMA, T::SOFT_DEFAULTS)
        }

        match self {
            StudyTask::KeyPoints => of::<KeyPoints>(),
            StudyTask::FlashCards => of::<FlashCardDeck>(),
            StudyTask::OrganizeNotes => of::<NotesOrganization>(),
            StudyTask::StudyPlan => of::<StudyPlan>(),
            StudyTask::AssignmentHelper => of::<AssignmentOutline>(),
            StudyTask::EnhanceAssignment => of::<EnhancementTips>(),
            StudyTask::ResearchBrief => of::<ResearchBrief>(),
        }
    }
}

impl fmt::Display for StudyTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_schema().name)
    }
}

/// Everything needed to ask the model for one structured answer
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    /// Instructions for the model
    pub system_prompt: String,
    /// The user's content, wrapped for the task
    pub user_content: String,
    /// Schema the answer must satisfy
    pub target_schema: TargetSchema,
}

impl ExtractionRequest {
    /// Build the request for a task
    pub fn for_task(task: StudyTask, input: &str) -> Self {
        let schema = task.target_schema();
        Self {
            system_prompt: PromptBuilder::new(task.system_prompt())
                .with_schema(schema)
                .build(),
            user_content: task.user_content(input),
            target_schema: schema,
        }
    }
}

/// Builds system prompts with an output-format reminder
pub struct PromptBuilder {
    instructions: String,
    schema: Option<TargetSchema>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            schema: None,
        }
    }

    /// Describe the expected JSON shape in the prompt
    pub fn with_schema(mut self, schema: TargetSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Build the complete system prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(&self.instructions);

        if let Some(schema) = &self.schema {
            prompt.push_str("\n\nRespond with a single JSON object with these fields:\n");
            for field in schema.fields {
                prompt.push_str(&format!(
                    "- \"{}\" ({}): {}\n",
                    field.name,
                    field.kind.expected(),
                    field.description
                ));
            }
            prompt.push('\n');
            prompt.push_str(OUTPUT_FORMAT_REMINDER);
        }

        prompt
    }
}

const KEY_POINTS_INSTRUCTIONS: &str = "You are a key point extraction assistant. Analyze the provided notes and extract the most important key points with supporting details. Only respond in JSON format.";

const FLASH_CARD_INSTRUCTIONS: &str = "You are a flash card generator. Create question-answer pairs from the provided notes. Rate each card's difficulty from 1 (easy) to 5 (hard). Only respond in JSON format.";

const ORGANIZE_INSTRUCTIONS: &str = "You are a study notes organizer. Group the provided notes into categories by topic, giving each a list of concepts, an importance score from 1-10, a brief summary and related topics. Then map each concept to the notes it relates to. Only respond in JSON format.";

const STUDY_PLAN_INSTRUCTIONS: &str = "You are a study planner. Build an optimized study schedule from the provided available time slots and tasks. Prioritize topics, estimate the hours each topic needs, and recommend resources. Only respond in JSON format.";

const ASSIGNMENT_INSTRUCTIONS: &str = "The following is an assignment to be completed by the user. Generate a title, a list of points to be included in the assignment, and a list of keywords. Only answer in JSON.";

const ENHANCE_INSTRUCTIONS: &str = "The following is an assignment draft written by the user. Generate a list of tips to improve the quality of the assignment, covering clarity, structure, writing style, vocabulary, grammar, coherence, logical flow, readability and overall quality. Only answer in JSON.";

const RESEARCH_INSTRUCTIONS: &str = "The following is a research paper. Extract the title, suggestions, keywords, and concepts from the paper. Only answer in JSON.";

const OUTPUT_FORMAT_REMINDER: &str = "Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.";
