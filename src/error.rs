//! Error types for IFC Thermal.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading a building model.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read the model file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The STEP format is invalid or malformed.
    #[error("invalid STEP format: {message}")]
    InvalidStep { message: String },

    /// The JSON element records could not be decoded.
    #[error("invalid element records: {source}")]
    InvalidRecords {
        #[from]
        source: serde_json::Error,
    },

    /// The file extension does not map to a known model reader.
    #[error("unsupported model format '{path}' (expected .ifc or .json)")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file or directory.
    #[error("failed to create '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}

/// Errors that can occur when loading the thermal configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::ThermalConfig`].
    #[error("invalid config: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },

    /// A configured value is outside its accepted range.
    #[error("invalid config value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Reasons a single element is excluded from the report.
///
/// These never abort a batch; the pipeline collects them next to the
/// retained elements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    /// The model collaborator could not materialize the element.
    #[error("element '{id}' is malformed: {message}")]
    Malformed { id: String, message: String },

    /// Neither an area nor a U-value could be resolved.
    #[error("element '{id}' has neither area nor U-value")]
    InsufficientData { id: String },
}

impl ElementError {
    /// Identifier of the element this error belongs to.
    #[must_use]
    pub fn element_id(&self) -> &str {
        match self {
            Self::Malformed { id, .. } | Self::InsufficientData { id } => id,
        }
    }
}
