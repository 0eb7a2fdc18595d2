//! Assembly of the annotation-service upload payload.
//!
//! Produces plain serializable structs: dataset settings (fields, questions,
//! metadata properties) plus one record per labeled row. Transport, auth,
//! and client wiring live outside this crate.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

use crate::collection::{record_segments, RecordSet};
use crate::format::{convert_to_string, sanitize_name};
use crate::project::{resolve_first, PathDescriptor, Table};
use crate::questions::{Question, QuestionKind};

/// A text field definition derived from one display column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub title: String,
    pub use_markdown: bool,
}

/// A terms metadata property with its observed value vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataProperty {
    pub name: String,
    pub title: String,
    pub options: Vec<String>,
}

/// A question definition in the service's shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDef {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSettings {
    pub guidelines: String,
    pub fields: Vec<FieldDef>,
    pub questions: Vec<QuestionDef>,
    pub metadata: Vec<MetadataProperty>,
}

/// One uploadable record: stringified display fields plus metadata terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub fields: Map<String, Value>,
    pub metadata: Map<String, Value>,
}

/// The complete payload for one dataset upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetExport {
    pub name: String,
    pub workspace: String,
    pub settings: DatasetSettings,
    pub records: Vec<ExportRecord>,
}

/// Everything the caller decides about an upload.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub name: &'a str,
    pub workspace: &'a str,
    pub guidelines: &'a str,
    /// Display columns, in table order.
    pub display: &'a [PathDescriptor],
    /// Metadata columns, resolved per record (first match only).
    pub metadata: &'a [PathDescriptor],
    pub questions: &'a [Question],
}

/// Build the upload payload from the source collection and the labeled table.
pub fn build_export(set: &RecordSet, table: &Table, request: &ExportRequest) -> DatasetExport {
    // Only display columns that actually survived projection become fields.
    let field_columns: Vec<&PathDescriptor> = request
        .display
        .iter()
        .filter(|descriptor| table.columns().contains(&descriptor.label))
        .collect();

    let fields = field_columns
        .iter()
        .map(|descriptor| FieldDef {
            name: sanitize_name(&descriptor.label),
            title: descriptor.label.clone(),
            use_markdown: false,
        })
        .collect();

    let metadata = request
        .metadata
        .iter()
        .map(|descriptor| MetadataProperty {
            name: sanitize_name(&descriptor.label),
            title: descriptor.label.clone(),
            options: metadata_vocabulary(set, descriptor),
        })
        .collect();

    let questions = request.questions.iter().map(question_def).collect();

    let records = (0..table.len())
        .map(|row| {
            let mut field_values = Map::new();
            for descriptor in &field_columns {
                let cell = table.cell(row, &descriptor.label).unwrap_or(&Value::Null);
                field_values.insert(
                    sanitize_name(&descriptor.label),
                    Value::String(convert_to_string(cell)),
                );
            }

            let mut metadata_values = Map::new();
            if let Some(record) = set.records().get(row) {
                for descriptor in request.metadata {
                    let segments = record_segments(&descriptor.path);
                    if let Some(value) = resolve_first(record, &segments) {
                        metadata_values.insert(
                            descriptor.label.clone(),
                            Value::String(convert_to_string(&value)),
                        );
                    }
                }
            }

            ExportRecord {
                fields: field_values,
                metadata: metadata_values,
            }
        })
        .collect();

    DatasetExport {
        name: request.name.to_string(),
        workspace: request.workspace.to_string(),
        settings: DatasetSettings {
            guidelines: request.guidelines.to_string(),
            fields,
            questions,
            metadata,
        },
        records,
    }
}

/// Sorted, de-duplicated string values observed for one metadata path.
fn metadata_vocabulary(set: &RecordSet, descriptor: &PathDescriptor) -> Vec<String> {
    let segments = record_segments(&descriptor.path);
    let values: BTreeSet<String> = set
        .records()
        .iter()
        .filter_map(|record| resolve_first(record, &segments))
        .map(|value| convert_to_string(&value))
        .collect();
    values.into_iter().collect()
}

fn question_def(question: &Question) -> QuestionDef {
    let name = sanitize_name(&question.title);
    let base = QuestionDef {
        name,
        title: question.title.clone(),
        description: question.description.clone(),
        kind: kind_name(question.kind),
        labels: None,
        values: None,
        field: None,
        required: question.kind != QuestionKind::Text,
    };

    match question.kind {
        QuestionKind::Label | QuestionKind::MultiLabel => QuestionDef {
            labels: Some(question.options.clone()),
            ..base
        },
        QuestionKind::Rating => QuestionDef {
            values: Some(json!([1, 2, 3, 4, 5])),
            ..base
        },
        QuestionKind::Text => base,
        QuestionKind::Ranking => {
            let mut values = Map::new();
            for option in &question.options {
                values.insert(option.clone(), Value::String(option.clone()));
            }
            QuestionDef {
                values: Some(Value::Object(values)),
                ..base
            }
        }
        QuestionKind::Span => QuestionDef {
            labels: Some(question.options.clone()),
            field: question.span_field.as_deref().map(sanitize_name),
            ..base
        },
    }
}

fn kind_name(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Label => "label_selection",
        QuestionKind::MultiLabel => "multi_label_selection",
        QuestionKind::Rating => "rating",
        QuestionKind::Text => "text",
        QuestionKind::Span => "span",
        QuestionKind::Ranking => "ranking",
    }
}
