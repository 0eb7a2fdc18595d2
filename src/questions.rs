//! Annotation questions and the application of answers to a projected table.
//!
//! A question defines one output column appended during labeling. The core
//! does not interpret question semantics beyond validating that an answer is
//! well-formed for its question before the cell is written.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::project::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Single label from a fixed option set.
    Label,
    /// Any subset of a fixed option set.
    MultiLabel,
    /// 1..=5 rating.
    Rating,
    /// Free text.
    Text,
    /// A labeled character span inside one display column.
    Span,
    /// A total order over the option set.
    Ranking,
}

impl QuestionKind {
    /// Whether this kind needs a non-empty option set.
    pub fn requires_options(self) -> bool {
        matches!(
            self,
            QuestionKind::Label | QuestionKind::MultiLabel | QuestionKind::Span | QuestionKind::Ranking
        )
    }
}

/// One annotation question. The title doubles as the answer column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    /// Display column a span question annotates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_field: Option<String>,
}

impl Question {
    pub fn new(title: impl Into<String>, kind: QuestionKind) -> Self {
        Question {
            title: title.into(),
            description: String::new(),
            kind,
            options: Vec::new(),
            span_field: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_span_field(mut self, field: impl Into<String>) -> Self {
        self.span_field = Some(field.into());
        self
    }

    /// Structural validation, done once when the question is defined.
    pub fn validate(&self) -> Result<(), AnswerError> {
        if self.title.trim().is_empty() {
            return Err(AnswerError::MissingTitle);
        }
        if self.kind.requires_options() && self.options.is_empty() {
            return Err(AnswerError::MissingOptions(self.title.clone()));
        }
        if self.kind == QuestionKind::Span && self.span_field.is_none() {
            return Err(AnswerError::MissingSpanField(self.title.clone()));
        }
        Ok(())
    }
}

/// A user response to one question for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Answer {
    Label(String),
    MultiLabel(Vec<String>),
    Rating(u8),
    Text(String),
    Ranking(Vec<String>),
    Span {
        text: String,
        label: String,
        start: usize,
        end: usize,
    },
}

impl Answer {
    /// The cell encoding: multi-labels join with `", "`, rankings stay a
    /// list, spans become an object carrying offsets.
    pub fn into_value(self) -> Value {
        match self {
            Answer::Label(label) => Value::String(label),
            Answer::MultiLabel(labels) => Value::String(labels.join(", ")),
            Answer::Rating(rating) => json!(rating),
            Answer::Text(text) => Value::String(text),
            Answer::Ranking(items) => json!(items),
            Answer::Span {
                text,
                label,
                start,
                end,
            } => json!({"span": text, "label": label, "start": start, "end": end}),
        }
    }
}

/// Why an answer (or a question definition) was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerError {
    #[error("question title must not be empty")]
    MissingTitle,
    #[error("question `{0}` needs at least one option")]
    MissingOptions(String),
    #[error("span question `{0}` needs a field to annotate")]
    MissingSpanField(String),
    #[error("question `{question}` has no option named `{option}`")]
    UnknownOption { question: String, option: String },
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),
    #[error("ranking for `{question}` must order every option exactly once")]
    IncompleteRanking { question: String },
    #[error("answer kind does not match question `{question}`")]
    KindMismatch { question: String },
    #[error("span field `{field}` is not a text column")]
    SpanFieldNotText { field: String },
    #[error("span does not match the text of field `{field}` at the given offsets")]
    SpanOutsideField { field: String },
}

/// Validate `answer` against `question` and write it into the table.
pub fn apply_answer(
    table: &mut Table,
    row: usize,
    question: &Question,
    answer: Answer,
) -> Result<()> {
    validate_answer(table, row, question, &answer)?;
    table.record_answer(row, &question.title, answer.into_value())
}

fn validate_answer(
    table: &Table,
    row: usize,
    question: &Question,
    answer: &Answer,
) -> Result<(), AnswerError> {
    let mismatch = || AnswerError::KindMismatch {
        question: question.title.clone(),
    };

    match (question.kind, answer) {
        (QuestionKind::Label, Answer::Label(label)) => {
            ensure_option(question, label)?;
        }
        (QuestionKind::MultiLabel, Answer::MultiLabel(labels)) => {
            for label in labels {
                ensure_option(question, label)?;
            }
        }
        (QuestionKind::Rating, Answer::Rating(rating)) => {
            if !(1..=5).contains(rating) {
                return Err(AnswerError::RatingOutOfRange(*rating));
            }
        }
        (QuestionKind::Text, Answer::Text(_)) => {}
        (QuestionKind::Ranking, Answer::Ranking(items)) => {
            let complete = items.len() == question.options.len()
                && question.options.iter().all(|option| items.contains(option));
            if !complete {
                return Err(AnswerError::IncompleteRanking {
                    question: question.title.clone(),
                });
            }
        }
        (
            QuestionKind::Span,
            Answer::Span {
                text,
                label,
                start,
                end,
            },
        ) => {
            ensure_option(question, label)?;
            let field = question.span_field.as_deref().ok_or_else(|| {
                AnswerError::MissingSpanField(question.title.clone())
            })?;
            let field_text = table
                .cell(row, field)
                .and_then(Value::as_str)
                .ok_or_else(|| AnswerError::SpanFieldNotText {
                    field: field.to_string(),
                })?;
            if field_text.get(*start..*end) != Some(text.as_str()) {
                return Err(AnswerError::SpanOutsideField {
                    field: field.to_string(),
                });
            }
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn ensure_option(question: &Question, label: &str) -> Result<(), AnswerError> {
    if question.options.iter().any(|option| option == label) {
        Ok(())
    } else {
        Err(AnswerError::UnknownOption {
            question: question.title.clone(),
            option: label.to_string(),
        })
    }
}
