//! Rally Scorer Library
//!
//! A Rust library for scoring timed multi-stage regularity rally events from
//! checkpoint timestamp CSV files.
//!
//! This library provides tools for:
//! - Loading roster, points and section tables from a settings folder
//! - Parsing checkpoint timestamp files with filename-driven START/GOAL inference
//! - Computing passage times, differentials, ranks and points per section
//! - Aggregating competitor scores with per-competitor coefficients
//! - Validating cross-section consistency of the raw timing data

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod calculation_engine;
        pub mod data_validator;
        pub mod settings_store;
        pub mod timing_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Competitor, ScoringKind, Section, SectionResult, Status};
pub use app::services::calculation_engine::CalculationEngine;
pub use app::services::data_validator::{Finding, FindingKind};
pub use app::services::settings_store::SettingsStore;
pub use app::services::timing_parser::TimingParser;
pub use config::AppConfig;

/// Result type alias for rally scoring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rally scoring operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Settings table loading error (missing/ambiguous file, missing column)
    #[error("Settings error: {message}")]
    SettingsLoad { message: String },

    /// Timing file parsing error, fatal to the whole parse batch
    #[error("Timing file '{file}': {message}")]
    TimingParse { file: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data integrity failure reported back to the caller
    #[error("Data integrity error: {message}")]
    DataIntegrity { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a settings loading error
    pub fn settings_load(message: impl Into<String>) -> Self {
        Self::SettingsLoad {
            message: message.into(),
        }
    }

    /// Create a timing parse error naming the offending file
    pub fn timing_parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TimingParse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data integrity error
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
