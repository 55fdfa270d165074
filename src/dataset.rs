//! In-memory registry table

use serde::Serialize;

use crate::encoding::SourceEncoding;
use crate::schema::IDENTITY_COLUMN;

/// Presence of a value in a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldValue<'a> {
    /// Column is not part of the file's schema
    Absent,
    /// Column exists but the cell is empty, whitespace or a NaN token
    Blank,
    Present(&'a str),
}

impl<'a> FieldValue<'a> {
    /// Classify a raw cell
    pub fn from_cell(cell: &'a str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            FieldValue::Blank
        } else {
            FieldValue::Present(cell)
        }
    }

    /// True for `Absent` and `Blank`
    pub fn is_missing(&self) -> bool {
        !matches!(self, FieldValue::Present(_))
    }
}

/// Load-time facts about where a dataset came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub encoding: SourceEncoding,
    /// Header of the identity column as it appeared in the file
    pub identity_header: String,
    pub skipped_rows: usize,
}

/// A loaded registry: one header row and the rows that parsed cleanly.
///
/// Every row has exactly `headers.len()` cells, and the identity column is
/// always named [`IDENTITY_COLUMN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    identity_index: usize,
    summary: LoadSummary,
}

impl Dataset {
    pub(crate) fn new(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        identity_index: usize,
        summary: LoadSummary,
    ) -> Self {
        debug_assert_eq!(headers[identity_index], IDENTITY_COLUMN);
        Self {
            headers,
            rows,
            identity_index,
            summary,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    /// Index of a column by its (normalized) header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Records in file order
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            dataset: self,
            cells,
        })
    }

    /// First record whose identity equals `identity` exactly
    pub fn find(&self, identity: &str) -> Option<Record<'_>> {
        self.records().find(|r| r.identity() == identity)
    }
}

/// A borrowed row of a [`Dataset`]
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    dataset: &'a Dataset,
    cells: &'a [String],
}

impl<'a> Record<'a> {
    pub fn identity(&self) -> &'a str {
        &self.cells[self.dataset.identity_index]
    }

    /// Value of the column named `column`
    pub fn get(&self, column: &str) -> FieldValue<'a> {
        match self.dataset.column_index(column) {
            Some(idx) => FieldValue::from_cell(&self.cells[idx]),
            None => FieldValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec![IDENTITY_COLUMN.to_string(), "الاسم".to_string()],
            vec![
                vec!["1".to_string(), "Ahmad".to_string()],
                vec!["2".to_string(), " NaN ".to_string()],
            ],
            0,
            LoadSummary {
                encoding: SourceEncoding::Utf8,
                identity_header: IDENTITY_COLUMN.to_string(),
                skipped_rows: 0,
            },
        )
    }

    #[test]
    fn test_field_value_states() {
        assert_eq!(FieldValue::from_cell("  "), FieldValue::Blank);
        assert_eq!(FieldValue::from_cell("nan"), FieldValue::Blank);
        assert_eq!(FieldValue::from_cell("NaN"), FieldValue::Blank);
        assert_eq!(FieldValue::from_cell("Nana"), FieldValue::Present("Nana"));
        assert!(FieldValue::Absent.is_missing());
    }

    #[test]
    fn test_record_access() {
        let ds = sample();
        let rec = ds.find("2").unwrap();
        assert_eq!(rec.get("الاسم"), FieldValue::Blank);
        assert_eq!(rec.get("الفرع"), FieldValue::Absent);
        assert!(ds.find("3").is_none());
        assert_eq!(ds.len(), 2);
    }
}
