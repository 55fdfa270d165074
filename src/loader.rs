//! Registry loading
//!
//! Reads a delimited table from disk, trying each configured encoding in
//! turn, then normalizes headers and the identity column so lookups can use
//! plain string equality.

use std::fs;
use std::path::Path;

use csv::ByteRecord;
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, LoadSummary};
use crate::encoding::{SourceEncoding, DEFAULT_ENCODINGS};
use crate::error::{LoadError, Result};
use crate::schema::{Field, FIELDS, IDENTITY_ALIASES, IDENTITY_COLUMN, IDENTITY_TERM};

/// Options controlling how a registry file is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Encodings to try, in order
    pub encodings: Vec<SourceEncoding>,
    /// Field delimiter
    pub delimiter: u8,
    /// Exact header spellings accepted as the identity column
    pub identity_aliases: Vec<String>,
    /// Substring that marks a header as the identity column
    pub identity_term: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encodings: DEFAULT_ENCODINGS.to_vec(),
            delimiter: b',',
            identity_aliases: IDENTITY_ALIASES.iter().map(|s| s.to_string()).collect(),
            identity_term: IDENTITY_TERM.to_string(),
        }
    }
}

/// Load a registry file with default options
pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    load_with(path, &LoadOptions::default())
}

/// Load a registry file
pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Dataset> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading registry");

    let bytes = fs::read(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "registry file not readable");
        LoadError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let (encoding, table) = parse_table(&bytes, options).map_err(|reason| {
        warn!(path = %path.display(), %reason, "no usable table");
        LoadError::Unreadable {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    let RawTable {
        headers,
        mut rows,
        skipped_rows,
    } = table;
    let mut headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let identity_index =
        resolve_identity_column(&headers, &options.identity_aliases, &options.identity_term)
            .ok_or_else(|| {
                warn!(path = %path.display(), "identity column not found");
                LoadError::MissingIdentityColumn {
                    path: path.to_path_buf(),
                    headers: headers.clone(),
                }
            })?;

    let identity_header =
        std::mem::replace(&mut headers[identity_index], IDENTITY_COLUMN.to_string());
    if identity_header != IDENTITY_COLUMN {
        debug!(from = %identity_header, to = IDENTITY_COLUMN, "renamed identity column");
    }

    for row in &mut rows {
        let cell = &mut row[identity_index];
        *cell = normalize_identity(cell);
    }

    info!(
        path = %path.display(),
        encoding = %encoding,
        rows = rows.len(),
        skipped = skipped_rows,
        "registry loaded"
    );

    Ok(Dataset::new(
        headers,
        rows,
        identity_index,
        LoadSummary {
            encoding,
            identity_header,
            skipped_rows,
        },
    ))
}

/// Header row plus every row that parsed cleanly, padded to header width
#[derive(Debug)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    skipped_rows: usize,
}

/// Split `bytes` into records, pick an encoding and decode row by row.
///
/// The encoding is the first candidate that decodes the header and at least
/// half of the data rows containing non-ASCII bytes. Rows that do not decode
/// under it, that have more fields than the header, or that the CSV reader
/// rejects are skipped and counted.
fn parse_table(
    bytes: &[u8],
    options: &LoadOptions,
) -> std::result::Result<(SourceEncoding, RawTable), String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header = reader.byte_headers().map_err(|e| e.to_string())?.clone();
    let records: Vec<csv::Result<ByteRecord>> = reader.byte_records().collect();

    let non_ascii: Vec<&ByteRecord> = records
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter(|r| !r.as_slice().is_ascii())
        .collect();

    let (encoding, headers) = options
        .encodings
        .iter()
        .find_map(|enc| {
            let headers = match decode_record(*enc, &header) {
                Some(headers) => headers,
                None => {
                    debug!(encoding = %enc, "header does not decode");
                    return None;
                }
            };
            let decoded = non_ascii
                .iter()
                .filter(|r| decode_record(*enc, r).is_some())
                .count();
            if decoded * 2 < non_ascii.len() {
                debug!(encoding = %enc, decoded, total = non_ascii.len(), "too few rows decode");
                return None;
            }
            Some((*enc, headers))
        })
        .ok_or_else(|| {
            let tried: Vec<&str> = options.encodings.iter().map(|e| e.name()).collect();
            format!("tried encodings: {}", tried.join(", "))
        })?;

    if headers.iter().all(|h| normalize_header(h).is_empty()) {
        return Err("no header row".to_string());
    }

    let width = headers.len();
    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for (line, record) in records.iter().enumerate() {
        let line = line + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(line, error = %e, "skipping unparseable row");
                skipped_rows += 1;
                continue;
            }
        };
        if record.len() > width {
            debug!(line, fields = record.len(), expected = width, "skipping malformed row");
            skipped_rows += 1;
            continue;
        }
        let Some(mut row) = decode_record(encoding, record) else {
            debug!(line, encoding = %encoding, "skipping undecodable row");
            skipped_rows += 1;
            continue;
        };
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok((
        encoding,
        RawTable {
            headers,
            rows,
            skipped_rows,
        },
    ))
}

fn decode_record(encoding: SourceEncoding, record: &ByteRecord) -> Option<Vec<String>> {
    record.iter().map(|field| encoding.decode(field)).collect()
}

/// Collapse embedded line breaks to spaces and trim the header
pub fn normalize_header(header: &str) -> String {
    header
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .trim_start_matches('\u{feff}')
        .trim()
        .to_string()
}

/// Identity values lose a numeric-storage ".0" suffix and surrounding spaces
pub fn normalize_identity(value: &str) -> String {
    let trimmed = value.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).trim().to_string()
}

/// Index of the identity column.
///
/// Exact alias matches win over substring matches; within each pass the first
/// header in column order is taken. Headers that belong to another mapped
/// field (such as the spouse identity) never match on the substring.
pub fn resolve_identity_column<S: AsRef<str>>(
    headers: &[String],
    aliases: &[S],
    term: &str,
) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| a.as_ref() == h.as_str()))
        .or_else(|| {
            if term.is_empty() {
                return None;
            }
            headers
                .iter()
                .position(|h| h.contains(term) && !is_other_field(h))
        })
}

fn is_other_field(header: &str) -> bool {
    FIELDS
        .iter()
        .any(|f| *f != Field::Identity && f.column() == header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("هوية\n"), "هوية");
        assert_eq!(normalize_header("  عدد افراد\nالاسرة "), "عدد افراد الاسرة");
        assert_eq!(normalize_header("رقم\r\nالهاتف"), "رقم الهاتف");
        assert_eq!(normalize_header("\u{feff}ID"), "ID");
    }

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity("800123456.0"), "800123456");
        assert_eq!(normalize_identity(" 800123456 "), "800123456");
        assert_eq!(normalize_identity("800123456.0 "), "800123456");
        assert_eq!(normalize_identity("80.05"), "80.05");
        assert_eq!(normalize_identity(""), "");
    }

    #[test]
    fn test_resolve_by_alias() {
        let h = headers(&["الاسم", "ID", "الفرع"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), Some(1));
    }

    #[test]
    fn test_resolve_by_term() {
        let h = headers(&["الاسم", "رقم بطاقة الهوية", "الفرع"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), Some(1));
    }

    #[test]
    fn test_resolve_first_in_column_order() {
        let h = headers(&["الاسم", "هوية", "رقم الهوية"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), Some(1));
    }

    #[test]
    fn test_resolve_none() {
        let h = headers(&["الاسم", "الفرع"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), None);
        let empty: [&str; 0] = [];
        assert_eq!(resolve_identity_column(&h, &empty[..], ""), None);
    }

    #[test]
    fn test_exact_alias_beats_earlier_substring() {
        let h = headers(&["الاسم", "هوية الزوجة 1", "رقم الهوية"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), Some(2));
    }

    #[test]
    fn test_spouse_column_never_matches_term() {
        let h = headers(&["هوية الزوجة 1", "رقم بطاقة الهوية"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), Some(1));
        let h = headers(&["الاسم", "هوية الزوجة 1"]);
        assert_eq!(resolve_identity_column(&h, IDENTITY_ALIASES, IDENTITY_TERM), None);
    }

    #[test]
    fn test_parse_table_pads_and_skips() {
        let bytes = b"a,b,c\n1,2,3\n4,5\n6,7,8,9\n";
        let (encoding, table) = parse_table(bytes, &LoadOptions::default()).unwrap();
        assert_eq!(encoding, SourceEncoding::Utf8);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["4", "5", ""]);
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_parse_table_skips_undecodable_row() {
        let mut bytes = "رقم الهوية,الاسم\n123,أحمد\n".as_bytes().to_vec();
        bytes.extend_from_slice(b"456,\xff\n");
        let (encoding, table) = parse_table(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(encoding, SourceEncoding::Utf8);
        assert_eq!(table.headers, vec!["رقم الهوية", "الاسم"]);
        assert_eq!(table.rows, vec![vec!["123".to_string(), "أحمد".to_string()]]);
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_ascii_header_picks_encoding_from_rows() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1256.encode("ID,name\n1,أحمد\n2,سارة\n");
        let (encoding, table) = parse_table(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(encoding, SourceEncoding::Windows1256);
        assert_eq!(table.rows[1][1], "سارة");
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn test_parse_table_empty_input() {
        let err = parse_table(b"", &LoadOptions::default()).unwrap_err();
        assert_eq!(err, "no header row");
    }
}
