//! Domain objects returned to clients, with their target schemas

use crate::schema::{DefaultValue, FieldKind, FieldSpec, RecordSchema, SoftDefault, TargetSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Difficulty assigned to a flash card the model did not rate (1-5 scale)
pub const DEFAULT_DIFFICULTY: i64 = 3;

/// A domain object with a fixed target schema and soft-default allow-list
pub trait StructuredOutput: DeserializeOwned {
    /// Fields the reconciled object must carry
    const SCHEMA: TargetSchema;

    /// Top-level fields filled in when the model omits them
    const SOFT_DEFAULTS: &'static [SoftDefault];
}

/// Key points and supporting details extracted from notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoints {
    /// Key points; models return either strings or `{title, description}` objects
    pub key_points: Vec<Value>,
    /// Supporting details keyed by key point
    pub supporting_details: BTreeMap<String, Vec<String>>,
}

impl StructuredOutput for KeyPoints {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "key_points",
        fields: &[
            FieldSpec::new(
                "key_points",
                FieldKind::List,
                "List of key points with point, details and supporting text",
            ),
            FieldSpec::new(
                "supporting_details",
                FieldKind::TextListMap,
                "Supporting details for each key point",
            ),
        ],
    };

    const SOFT_DEFAULTS: &'static [SoftDefault] = &[
        SoftDefault::new("key_points", DefaultValue::EmptyList),
        SoftDefault::new("supporting_details", DefaultValue::EmptyMap),
    ];
}

/// A single question/answer card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashCard {
    /// Question for the flashcard
    pub question: String,
    /// Answer for the flashcard
    pub answer: String,
    /// Difficulty level from 1-5
    pub difficulty: i64,
}

const FLASH_CARD_RECORD: RecordSchema = RecordSchema {
    fields: &[
        FieldSpec::new("question", FieldKind::Text, "Question for the flashcard"),
        FieldSpec::new("answer", FieldKind::Text, "Answer for the flashcard"),
        FieldSpec::new("difficulty", FieldKind::Integer, "Difficulty level from 1-5"),
    ],
    soft_defaults: &[SoftDefault::new(
        "difficulty",
        DefaultValue::Integer(DEFAULT_DIFFICULTY),
    )],
};

/// Model-facing wrapper around a list of flash cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashCardDeck {
    /// Cards in the order the model produced them
    pub quiz: Vec<FlashCard>,
}

impl StructuredOutput for FlashCardDeck {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "flash_cards",
        fields: &[FieldSpec::new(
            "quiz",
            FieldKind::Records(&FLASH_CARD_RECORD),
            "Question-answer pairs generated from the notes",
        )],
    };

    const SOFT_DEFAULTS: &'static [SoftDefault] = &[];
}

/// Title, points and keywords for an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOutline {
    /// A title for the generated content
    pub title: String,
    /// Points to be included in the content
    pub points: Vec<String>,
    /// Keywords to be included in the content
    pub keywords: Vec<String>,
}

impl StructuredOutput for AssignmentOutline {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "assignment_helper",
        fields: &[
            FieldSpec::new("title", FieldKind::Text, "A title for the generation of the content"),
            FieldSpec::new("points", FieldKind::TextList, "Points to be included in the content"),
            FieldSpec::new(
                "keywords",
                FieldKind::TextList,
                "A list of keywords to be included in the content",
            ),
        ],
    };

    const SOFT_DEFAULTS: &'static [SoftDefault] = &[
        SoftDefault::new("points", DefaultValue::EmptyList),
        SoftDefault::new("keywords", DefaultValue::EmptyList),
    ];
}

/// Improvement tips for an assignment draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementTips {
    /// Tips to improve clarity
    pub clarity: Vec<String>,
    /// Tips to improve structure
    pub structure: Vec<String>,
    /// Tips to improve the writing style
    pub writing_style: String,
    /// Tips to improve vocabulary
    pub vocabulary: Vec<String>,
    /// Tips to improve grammar
    pub grammar: Vec<String>,
    /// Tips to improve coherence
    pub coherence: Vec<String>,
    /// Tips to improve the logical flow
    pub logical_flow: Vec<String>,
    /// Tips to improve readability
    pub readability: Vec<String>,
    /// Tips to improve overall quality
    pub overall: Vec<String>,
}

impl StructuredOutput for EnhancementTips {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "enhancement_tips",
        fields: &[
            FieldSpec::new("clarity", FieldKind::TextList, "Tips to improve the clarity of the provided draft"),
            FieldSpec::new("structure", FieldKind::TextList, "Tips to improve the structure of the provided draft"),
            FieldSpec::new("writing_style", FieldKind::Text, "Tips to improve the writing style of the provided draft"),
            FieldSpec::new("vocabulary", FieldKind::TextList, "Tips to improve the vocabulary of the provided draft"),
            FieldSpec::new("grammar", FieldKind::TextList, "Tips to improve the grammar of the provided draft"),
            FieldSpec::new("coherence", FieldKind::TextList, "Tips to improve the coherence of the provided draft"),
            FieldSpec::new("logical_flow", FieldKind::TextList, "Tips to improve the logical flow of the provided draft"),
            FieldSpec::new("readability", FieldKind::TextList, "Tips to improve the readability of the provided draft"),
            FieldSpec::new("overall", FieldKind::TextList, "Tips to improve the overall quality of the provided draft"),
        ],
    };

    // every field except `overall`
    const SOFT_DEFAULTS: &'static [SoftDefault] = &[
        SoftDefault::new("clarity", DefaultValue::EmptyList),
        SoftDefault::new("structure", DefaultValue::EmptyList),
        SoftDefault::new("writing_style", DefaultValue::EmptyText),
        SoftDefault::new("vocabulary", DefaultValue::EmptyList),
        SoftDefault::new("grammar", DefaultValue::EmptyList),
        SoftDefault::new("coherence", DefaultValue::EmptyList),
        SoftDefault::new("logical_flow", DefaultValue::EmptyList),
        SoftDefault::new("readability", DefaultValue::EmptyList),
    ];
}

/// Notes grouped by topic, plus a concept map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesOrganization {
    /// Categorized notes (topic, concepts, importance_score, summary, related_topics)
    pub categories: Vec<Map<String, Value>>,
    /// Concept to related notes
    pub concept_map: BTreeMap<String, Vec<String>>,
}

impl StructuredOutput for NotesOrganization {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "notes_organization",
        fields: &[
            FieldSpec::new(
                "categories",
                FieldKind::ObjectList,
                "List of categorized notes, each with topic, concepts, importance_score (1-10), summary and related_topics",
            ),
            FieldSpec::new(
                "concept_map",
                FieldKind::TextListMap,
                "Mapping of concepts to related notes",
            ),
        ],
    };

    const SOFT_DEFAULTS: &'static [SoftDefault] =
        &[SoftDefault::new("concept_map", DefaultValue::EmptyMap)];
}

/// A study schedule built from availability and tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    /// Daily schedule with time slots and tasks
    pub schedule: BTreeMap<String, Vec<String>>,
    /// Topics to prioritize
    pub priority_topics: Vec<String>,
    /// Estimated hours per topic
    pub estimated_time: BTreeMap<String, f64>,
    /// Recommended resources per topic
    pub resources: BTreeMap<String, Vec<String>>,
}

impl StructuredOutput for StudyPlan {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "study_plan",
        fields: &[
            FieldSpec::new("schedule", FieldKind::TextListMap, "Daily schedule with time slots and tasks"),
            FieldSpec::new("priority_topics", FieldKind::TextList, "List of topics to prioritize"),
            FieldSpec::new("estimated_time", FieldKind::NumberMap, "Estimated time required for each topic"),
            FieldSpec::new("resources", FieldKind::TextListMap, "Recommended resources for each topic"),
        ],
    };

    const SOFT_DEFAULTS: &'static [SoftDefault] = &[
        SoftDefault::new("estimated_time", DefaultValue::EmptyMap),
        SoftDefault::new("resources", DefaultValue::EmptyMap),
    ];
}

/// Title, suggestions, keywords and concepts of a research paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchBrief {
    /// Title of the research paper
    pub title: String,
    /// Suggestions to make the paper more interesting
    pub suggestions: Vec<String>,
    /// Keywords extracted from the text
    pub keywords: Vec<String>,
    /// Key concepts covered
    pub concepts: Vec<String>,
}

impl StructuredOutput for ResearchBrief {
    const SCHEMA: TargetSchema = TargetSchema {
        name: "research_brief",
        fields: &[
            FieldSpec::new("title", FieldKind::Text, "Title of the research paper"),
            FieldSpec::new("suggestions", FieldKind::TextList, "Suggestions to make the research paper more interesting"),
            FieldSpec::new("keywords", FieldKind::TextList, "Keywords extracted from the text"),
            FieldSpec::new("concepts", FieldKind::TextList, "Key concepts covered in the text"),
        ],
    };

    const SOFT_DEFAULTS: &'static [SoftDefault] = &[
        SoftDefault::new("suggestions", DefaultValue::EmptyList),
        SoftDefault::new("keywords", DefaultValue::EmptyList),
        SoftDefault::new("concepts", DefaultValue::EmptyList),
    ];
}

/// Key point titles and a short summary of a transcript
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscriptDigest {
    /// Titles of the key points
    pub key_points: Vec<String>,
    /// The first three descriptions joined into sentences
    pub summary: String,
}

impl TranscriptDigest {
    /// Reduce extracted key points to titles and a summary
    ///
    /// Plain-string points serve as both title and description; object points
    /// need both `title` and `description`. Anything else is skipped.
    pub fn from_key_points(key_points: &KeyPoints) -> Self {
        let points: Vec<(String, String)> = key_points
            .key_points
            .iter()
            .filter_map(|point| match point {
                Value::String(text) => Some((text.clone(), text.clone())),
                Value::Object(map) => {
                    let title = map.get("title")?;
                    let description = map.get("description")?;
                    Some((display(title), display(description)))
                }
                _ => None,
            })
            .collect();

        if points.is_empty() {
            return Self::default();
        }

        let summary_points: Vec<&str> = points
            .iter()
            .take(3)
            .map(|(_, description)| description.as_str())
            .collect();

        Self {
            summary: format!("{}.", summary_points.join(". ")),
            key_points: points.into_iter().map(|(title, _)| title).collect(),
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
