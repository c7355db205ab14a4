//! Configuration management for northwind-export
//!
//! Configuration is read from a TOML file. Every field has a default, so a
//! partial file (or no file at all) yields a usable configuration.
//!
//! ```toml
//! [loading]
//! strategy = "explicit"
//! resolve_all = true
//!
//! [export]
//! output_dir = "out"
//! formats = ["xml", "csv", "json"]
//! markup_encoding = "attributes"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::session::LoadingStrategy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Loading strategy configuration
    #[serde(default)]
    pub loading: LoadingConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Data store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the session fetches products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    /// Strategy selected before traversal begins
    #[serde(default)]
    pub strategy: LoadingStrategy,

    /// Under explicit loading, resolve every category before exporting
    #[serde(default = "default_resolve_all")]
    pub resolve_all: bool,
}

/// Export destinations and format options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving the exported files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Formats to produce, in order
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,

    /// Whether XML fields are child elements or attributes
    #[serde(default)]
    pub markup_encoding: MarkupEncoding,

    /// Spaces per XML nesting level
    #[serde(default = "default_xml_indent")]
    pub xml_indent: usize,

    /// Indent the JSON document
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// CSV line terminator
    #[serde(default)]
    pub line_ending: LineEnding,

    /// Draw a progress bar while exporting
    #[serde(default)]
    pub show_progress: bool,
}

/// Export file formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured markup with a `categories` root element
    Xml,

    /// Denormalized category/product join, one row per product
    Csv,

    /// Single object holding a `categories` array
    Json,
}

/// Field encoding for the XML exporter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkupEncoding {
    /// `<id>1</id>`
    #[default]
    Elements,

    /// `<category id="1">`
    Attributes,
}

/// Line terminator for tabular output
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` elsewhere
    #[default]
    Native,
    Lf,
    CrLf,
}

/// Data store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON dataset to load; the built-in sample is used when absent
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Lift the default filter hiding discontinued products
    #[serde(default)]
    pub include_discontinued: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_resolve_all() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Xml, ExportFormat::Csv, ExportFormat::Json]
}

fn default_xml_indent() -> usize {
    2
}

fn default_pretty_json() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_timestamps() -> bool {
    true
}

const MAX_XML_INDENT: usize = 8;

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            strategy: LoadingStrategy::default(),
            resolve_all: default_resolve_all(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            formats: default_formats(),
            markup_encoding: MarkupEncoding::default(),
            xml_indent: default_xml_indent(),
            pretty_json: default_pretty_json(),
            line_ending: LineEnding::default(),
            show_progress: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded and validated configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from the default path, or defaults when no
    /// file exists there
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".northwind-export")
            .join("config.toml")
    }

    /// Save configuration to a file, creating parent directories
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.export.formats.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.formats".to_string(),
                value: "[]".to_string(),
            }
            .into());
        }

        if self.export.xml_indent > MAX_XML_INDENT {
            return Err(ConfigError::InvalidValue {
                field: "export.xml_indent".to_string(),
                value: self.export.xml_indent.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl ExportFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "xml",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl MarkupEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            MarkupEncoding::Elements => "elements",
            MarkupEncoding::Attributes => "attributes",
        }
    }
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Native if cfg!(windows) => "\r\n",
            LineEnding::Native | LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NorthwindError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.loading.strategy, LoadingStrategy::Eager);
        assert_eq!(config.export.formats.len(), 3);
        assert_eq!(config.export.markup_encoding, MarkupEncoding::Elements);
        assert!(config.export.pretty_json);
        assert!(!config.store.include_discontinued);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [loading]
            strategy = "explicit"

            [export]
            formats = ["csv"]
            markup_encoding = "attributes"
            line_ending = "crlf"
            "#,
        )
        .unwrap();

        assert_eq!(config.loading.strategy, LoadingStrategy::Explicit);
        assert!(config.loading.resolve_all);
        assert_eq!(config.export.formats, vec![ExportFormat::Csv]);
        assert_eq!(config.export.markup_encoding, MarkupEncoding::Attributes);
        assert_eq!(config.export.line_ending.as_str(), "\r\n");
        assert_eq!(config.export.xml_indent, 2);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.export.formats.clear();
        assert!(matches!(
            config.validate(),
            Err(NorthwindError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/northwind.toml").unwrap_err();
        assert!(matches!(err, NorthwindError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_from_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[loading]\nstrategy = \"sometimes\"\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, NorthwindError::Config(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.loading.strategy = LoadingStrategy::Deferred;
        config.export.formats = vec![ExportFormat::Json, ExportFormat::Xml];
        config.save(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.loading.strategy, LoadingStrategy::Deferred);
        assert_eq!(reloaded.export.formats, config.export.formats);
    }

    #[test]
    fn test_markup_labels() {
        assert_eq!(MarkupEncoding::Elements.label(), "elements");
        assert_eq!(MarkupEncoding::Attributes.label(), "attributes");
        assert_eq!(LineEnding::Lf.as_str(), "\n");
    }
}
