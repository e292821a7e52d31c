//! StudyBud Extractor
//!
//! Turns chat-completion responses into validated study-assistant objects.
//!
//! # Overview
//!
//! Language models wrap JSON in markdown fences, drop keys, return the wrong
//! types, or stop mid-document. The [`StructuredResponseExtractor`] takes the
//! raw response body of an OpenAI-style chat-completion call and either
//! produces an object matching a [`TargetSchema`] or a classified
//! [`ExtractionError`].
//!
//! # Architecture
//!
//! ```text
//! body → envelope (choices[0].message.content) → strip fences → decode
//!      → object check → soft defaults + field checks → DomainObject
//! ```
//!
//! # Example Usage
//!
//! ```
//! use studybud_extractor::{KeyPoints, StructuredResponseExtractor};
//!
//! let body = r#"{"choices":[{"message":{"content":"```json\n{\"key_points\":[\"Cells\"]}\n```"}}]}"#;
//!
//! let key_points: KeyPoints = StructuredResponseExtractor::new().extract_as(body).unwrap();
//! assert_eq!(key_points.key_points.len(), 1);
//! assert!(key_points.supporting_details.is_empty());
//! ```

#![warn(missing_docs)]

mod envelope;
mod error;
mod extractor;
mod parser;
mod prompt;
mod schema;
mod types;

#[cfg(test)]
mod tests;

pub use envelope::{completion_content, decode_envelope};
pub use error::{EnvelopeCheck, ExtractionError};
pub use extractor::{DomainObject, StructuredResponseExtractor};
pub use parser::{decode_json, strip_code_fence};
pub use prompt::{ExtractionRequest, PromptBuilder, StudyTask};
pub use schema::{DefaultValue, FieldKind, FieldSpec, RecordSchema, SoftDefault, TargetSchema};
pub use types::{
    AssignmentOutline, EnhancementTips, FlashCard, FlashCardDeck, KeyPoints, NotesOrganization,
    ResearchBrief, StructuredOutput, StudyPlan, TranscriptDigest, DEFAULT_DIFFICULTY,
};
