//! Candidate text encodings for registry files
//!
//! Registry exports arrive as UTF-8 (with or without a byte-order mark) or in
//! one of the legacy Arabic code pages. Decoding is strict: a candidate that
//! hits an unmappable byte is rejected so the next one can be tried.

use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, ISO_8859_6, UTF_8, WINDOWS_1256};
use serde::{Deserialize, Serialize};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A text encoding the loader can try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-8-sig")]
    Utf8Bom,
    #[serde(rename = "windows-1256")]
    Windows1256,
    #[serde(rename = "iso-8859-6")]
    Iso8859_6,
}

/// Default order in which encodings are tried
pub const DEFAULT_ENCODINGS: [SourceEncoding; 4] = [
    SourceEncoding::Utf8,
    SourceEncoding::Utf8Bom,
    SourceEncoding::Windows1256,
    SourceEncoding::Iso8859_6,
];

impl SourceEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Utf8Bom => "utf-8-sig",
            SourceEncoding::Windows1256 => "windows-1256",
            SourceEncoding::Iso8859_6 => "iso-8859-6",
        }
    }

    fn codec(&self) -> &'static Encoding {
        match self {
            SourceEncoding::Utf8 | SourceEncoding::Utf8Bom => UTF_8,
            SourceEncoding::Windows1256 => WINDOWS_1256,
            SourceEncoding::Iso8859_6 => ISO_8859_6,
        }
    }

    /// Decode `bytes`, or `None` if any byte sequence is invalid here
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let bytes = match self {
            SourceEncoding::Utf8Bom => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            _ => bytes,
        };
        self.codec()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for an encoding name that is not supported
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Unsupported encoding: '{0}' (expected one of utf-8, utf-8-sig, windows-1256, iso-8859-6)"
)]
pub struct UnknownEncoding(pub String);

impl FromStr for SourceEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(SourceEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" | "utf-8-bom" => Ok(SourceEncoding::Utf8Bom),
            "cp1256" | "windows-1256" => Ok(SourceEncoding::Windows1256),
            "iso-8859-6" | "iso8859-6" | "arabic" => Ok(SourceEncoding::Iso8859_6),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_rejects_legacy_bytes() {
        let (bytes, _, _) = WINDOWS_1256.encode("الاسم");
        assert!(SourceEncoding::Utf8.decode(&bytes).is_none());
        assert_eq!(
            SourceEncoding::Windows1256.decode(&bytes).as_deref(),
            Some("الاسم")
        );
    }

    #[test]
    fn test_utf8_sig_strips_bom() {
        let bytes = b"\xEF\xBB\xBFid,name";
        assert_eq!(
            SourceEncoding::Utf8Bom.decode(bytes).as_deref(),
            Some("id,name")
        );
        // Plain UTF-8 keeps the mark; header normalization removes it later
        assert_eq!(
            SourceEncoding::Utf8.decode(bytes).as_deref(),
            Some("\u{feff}id,name")
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "cp1256".parse::<SourceEncoding>().unwrap(),
            SourceEncoding::Windows1256
        );
        assert_eq!("UTF-8".parse::<SourceEncoding>().unwrap(), SourceEncoding::Utf8);
        assert!("latin1".parse::<SourceEncoding>().is_err());
        for enc in DEFAULT_ENCODINGS {
            assert_eq!(enc.name().parse::<SourceEncoding>().unwrap(), enc);
        }
    }
}
