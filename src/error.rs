//! Error types for loading the family registry

use std::path::PathBuf;
use thiserror::Error;

/// Result type for load operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that make a registry file unusable for lookups.
///
/// Both variants are terminal for the session: the cached failure is returned
/// to every later query until the cache is invalidated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Registry file {} could not be read: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error(
        "Registry file {} has no identity column (headers: {})",
        .path.display(),
        .headers.join(", ")
    )]
    MissingIdentityColumn { path: PathBuf, headers: Vec<String> },
}

impl LoadError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Unreadable { .. } => "unreadable",
            LoadError::MissingIdentityColumn { .. } => "missing_identity_column",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_lists_headers() {
        let err = LoadError::MissingIdentityColumn {
            path: PathBuf::from("data.csv"),
            headers: vec!["الاسم".to_string(), "الفرع".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("data.csv"));
        assert!(msg.contains("الاسم, الفرع"));
        assert_eq!(err.kind(), "missing_identity_column");
    }
}
