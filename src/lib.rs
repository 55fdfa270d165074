//! Family Registry Lookup
//!
//! Looks up one person in a family-registry table by national ID and reports
//! which required fields of the record are still missing.
//!
//! ## Features
//!
//! - **Resilient Loading**: Tries several text encodings and skips malformed rows
//! - **Header Discovery**: Finds the identity column by alias or substring match
//! - **Completeness Check**: Flags required fields that are absent, blank or "nan"
//! - **Memoized Loads**: Each registry file is read at most once per cache
//!
//! ## Flow
//!
//! ```text
//! data.csv ──▶ loader ──▶ Dataset ──▶ DatasetCache
//!                                        │
//!              query ──▶ lookup ◀────────┘
//!                          │
//!                          ▼
//!       Found(RecordView) | NotFound | LoadFailed ──▶ report
//! ```

pub mod cache;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod report;
pub mod schema;

pub use cache::DatasetCache;
pub use config::LookupConfig;
pub use dataset::{Dataset, FieldValue, Record};
pub use encoding::SourceEncoding;
pub use error::{LoadError, Result};
pub use loader::{load, load_with, resolve_identity_column, LoadOptions};
pub use lookup::{lookup, query, LookupOutcome, QueryOutcome, RecordView};
pub use schema::{Field, FIELDS, IDENTITY_COLUMN, REQUIRED_FIELDS};
