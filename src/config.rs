//! Configuration management for the family lookup
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (family-lookup.toml)
//! - Environment variables (FAMILY_LOOKUP__*)
//!
//! ## Example config file (family-lookup.toml):
//! ```toml
//! [data]
//! path = "data.csv"
//! delimiter = ","
//! encodings = ["utf-8", "utf-8-sig", "windows-1256", "iso-8859-6"]
//!
//! [identity]
//! aliases = ["رقم الهوية", "هوية", "ID"]
//! term = "هوية"
//!
//! [display]
//! title = "مجلس عائلة الأسطل"
//! logo_path = "logo.jpg"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::encoding::{SourceEncoding, UnknownEncoding, DEFAULT_ENCODINGS};
use crate::loader::LoadOptions;
use crate::schema::{IDENTITY_ALIASES, IDENTITY_TERM};

/// Main configuration for the lookup tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Registry file settings
    #[serde(default)]
    pub data: DataConfig,

    /// Identity column discovery
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Text shown around results
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Registry file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the registry table
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Single-character field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Encodings to try, in order
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
}

/// Identity column configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Exact header spellings
    #[serde(default = "default_aliases")]
    pub aliases: Vec<String>,

    /// Substring match
    #[serde(default = "default_term")]
    pub term: String,
}

/// Presentation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Optional logo; a placeholder is shown when the file is missing
    #[serde(default = "default_logo_path")]
    pub logo_path: PathBuf,

    #[serde(default = "default_logo_placeholder")]
    pub logo_placeholder: String,

    /// Shown under the missing-data alert
    #[serde(default = "default_contact_message")]
    pub contact_message: String,

    #[serde(default = "default_footer")]
    pub footer: String,
}

// Default value functions
fn default_data_path() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_encodings() -> Vec<String> {
    DEFAULT_ENCODINGS.iter().map(|e| e.name().to_string()).collect()
}

fn default_aliases() -> Vec<String> {
    IDENTITY_ALIASES.iter().map(|s| s.to_string()).collect()
}

fn default_term() -> String {
    IDENTITY_TERM.to_string()
}

fn default_title() -> String {
    "مجلس عائلة الأسطل".to_string()
}

fn default_subtitle() -> String {
    "نظام الاستعلام عن بيانات أبناء العائلة".to_string()
}

fn default_logo_path() -> PathBuf {
    PathBuf::from("logo.jpg")
}

fn default_logo_placeholder() -> String {
    "شعار العائلة".to_string()
}

fn default_contact_message() -> String {
    "يرجى سرعة التواصل مع السيد/ م. أيمن ناجي الأسطل لتزويده بالبيانات الناقصة لإكمال السجل."
        .to_string()
}

fn default_footer() -> String {
    "جميع الحقوق محفوظة لمجلس عائلة الأسطل © 2025".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
            encodings: default_encodings(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
            term: default_term(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            logo_path: default_logo_path(),
            logo_placeholder: default_logo_placeholder(),
            contact_message: default_contact_message(),
            footer: default_footer(),
        }
    }
}

/// A setting that cannot be turned into load options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingError {
    #[error(transparent)]
    Encoding(#[from] UnknownEncoding),

    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    Delimiter(String),

    #[error("No encodings configured")]
    NoEncodings,

    #[error("Identity aliases and term are both empty")]
    NoIdentityMatcher,
}

impl LookupConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "family-lookup.toml",
            ".family-lookup.toml",
            "config/family-lookup.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "family", "family-lookup") {
            let xdg_config = config_dir.config_dir().join("family-lookup.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (FAMILY_LOOKUP__*)
        builder = builder.add_source(
            Environment::with_prefix("FAMILY_LOOKUP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the registry path (resolves relative paths)
    pub fn data_path(&self) -> PathBuf {
        resolve(&self.data.path)
    }

    /// Get the logo path if the file exists
    pub fn logo_path(&self) -> Option<PathBuf> {
        let path = resolve(&self.display.logo_path);
        path.is_file().then_some(path)
    }

    /// Build loader options from the configured settings
    pub fn load_options(&self) -> Result<LoadOptions, SettingError> {
        let encodings = self
            .data
            .encodings
            .iter()
            .map(|name| name.parse::<SourceEncoding>())
            .collect::<Result<Vec<_>, _>>()?;
        if encodings.is_empty() {
            return Err(SettingError::NoEncodings);
        }

        let delimiter = parse_delimiter(&self.data.delimiter)?;

        if self.identity.aliases.is_empty() && self.identity.term.is_empty() {
            return Err(SettingError::NoIdentityMatcher);
        }

        Ok(LoadOptions {
            encodings,
            delimiter,
            identity_aliases: self.identity.aliases.clone(),
            identity_term: self.identity.term.clone(),
        })
    }

    /// Every problem with the current settings
    pub fn validate(&self) -> Vec<SettingError> {
        let mut problems: Vec<SettingError> = self
            .data
            .encodings
            .iter()
            .filter_map(|name| name.parse::<SourceEncoding>().err())
            .map(SettingError::from)
            .collect();
        if self.data.encodings.is_empty() {
            problems.push(SettingError::NoEncodings);
        }
        if let Err(e) = parse_delimiter(&self.data.delimiter) {
            problems.push(e);
        }
        if self.identity.aliases.is_empty() && self.identity.term.is_empty() {
            problems.push(SettingError::NoIdentityMatcher);
        }
        problems
    }
}

fn parse_delimiter(value: &str) -> Result<u8, SettingError> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ if value == "\\t" => Ok(b'\t'),
        _ => Err(SettingError::Delimiter(value.to_string())),
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LookupConfig::default();
        assert_eq!(config.data.path, PathBuf::from("data.csv"));
        assert_eq!(config.data.encodings.len(), 4);
        assert_eq!(config.load_options().unwrap(), LoadOptions::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_serialize_config() {
        let config = LookupConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[identity]"));
        assert!(toml_str.contains("[display]"));
        let parsed: LookupConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: LookupConfig = toml::from_str("[data]\ndelimiter = \";\"\n").unwrap();
        assert_eq!(parsed.data.path, PathBuf::from("data.csv"));
        assert_eq!(parsed.load_options().unwrap().delimiter, b';');
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut config = LookupConfig::default();
        config.data.encodings = vec!["utf-8".to_string(), "latin1".to_string()];
        config.data.delimiter = ";;".to_string();
        let problems = config.validate();
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], SettingError::Encoding(_)));
        assert!(matches!(problems[1], SettingError::Delimiter(_)));
    }

    #[test]
    fn test_tab_delimiter() {
        let mut config = LookupConfig::default();
        config.data.delimiter = "\\t".to_string();
        assert_eq!(config.load_options().unwrap().delimiter, b'\t');
    }
}
