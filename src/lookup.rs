//! Identity lookup and completeness check

use std::path::Path;

use serde::Serialize;

use crate::cache::DatasetCache;
use crate::dataset::{Dataset, FieldValue, Record};
use crate::error::LoadError;
use crate::loader::LoadOptions;
use crate::schema::{Field, FIELDS};

/// One displayed row of a matched record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEntry {
    pub field: Field,
    pub label: &'static str,
    /// Cell text, or empty when the cell is blank
    pub value: String,
}

/// Display-ready projection of one matched record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub identity: String,
    /// Fields present in the file, in display order
    pub entries: Vec<ViewEntry>,
    /// Labels of required fields that are absent or blank
    pub missing_fields: Vec<&'static str>,
}

impl RecordView {
    /// Build the view for `record`
    pub fn from_record(dataset: &Dataset, record: &Record<'_>) -> Self {
        let mut entries = Vec::new();
        let mut missing_fields = Vec::new();

        for field in FIELDS {
            let value = record.get(field.column());
            if field.is_required() && value.is_missing() {
                missing_fields.push(field.label());
            }
            if !dataset.has_column(field.column()) {
                continue;
            }
            let value = match value {
                FieldValue::Present(v) => v.to_string(),
                FieldValue::Blank | FieldValue::Absent => String::new(),
            };
            entries.push(ViewEntry {
                field,
                label: field.label(),
                value,
            });
        }

        Self {
            identity: record.identity().to_string(),
            entries,
            missing_fields,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.value.as_str())
    }
}

/// Result of looking up one identity in a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found(RecordView),
    NotFound { query: String },
}

/// Find the first record whose identity equals `query` exactly
pub fn lookup(dataset: &Dataset, query: &str) -> LookupOutcome {
    match dataset.find(query) {
        Some(record) => LookupOutcome::Found(RecordView::from_record(dataset, &record)),
        None => LookupOutcome::NotFound {
            query: query.to_string(),
        },
    }
}

/// Everything a presentation layer needs to render one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Found(RecordView),
    NotFound { query: String },
    LoadFailed { kind: String, reason: String },
}

impl From<LookupOutcome> for QueryOutcome {
    fn from(outcome: LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found(view) => QueryOutcome::Found(view),
            LookupOutcome::NotFound { query } => QueryOutcome::NotFound { query },
        }
    }
}

impl From<&LoadError> for QueryOutcome {
    fn from(err: &LoadError) -> Self {
        QueryOutcome::LoadFailed {
            kind: err.kind().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Run one user query against the registry at `path`.
///
/// The query is trimmed; an empty query yields `None` and does not touch the
/// registry.
pub fn query(
    cache: &DatasetCache,
    path: impl AsRef<Path>,
    options: &LoadOptions,
    query: &str,
) -> Option<QueryOutcome> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let outcome = match cache.get_or_load(path, options) {
        Ok(dataset) => lookup(&dataset, query).into(),
        Err(err) => QueryOutcome::from(&err),
    };
    Some(outcome)
}
