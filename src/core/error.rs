//! Error types for cosmic_circle
//!
//! This module provides structured error handling using thiserror.
//! Missing content and missing placements are never errors; only
//! unparsable inputs and configuration/content-pack I/O end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CosmicError>;

/// Errors that can occur while building charts, scores and forecasts
#[derive(Error, Debug)]
pub enum CosmicError {
    /// IO error while reading config or content packs
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Birthdate could not be parsed as a calendar date
    #[error("Invalid birthdate: {input}")]
    InvalidBirthdate { input: String },

    /// Any other date input could not be parsed
    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    /// Sign name not in the zodiac
    #[error("Unknown sign: {name}")]
    UnknownSign { name: String },

    /// Element name not recognized
    #[error("Unknown element: {name}")]
    UnknownElement { name: String },

    /// Relationship tag not recognized
    #[error("Unknown relationship tag: {name}")]
    UnknownRelationship { name: String },

    /// Depth setting not recognized (strict parsing only)
    #[error("Unknown depth: {name} (expected sun_only, sun_moon_rising or full_chart)")]
    UnknownDepth { name: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Content pack is structurally unusable
    #[error("Invalid content pack {}: {message}", .path.display())]
    ContentPack { path: PathBuf, message: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CosmicError>,
    },
}

impl CosmicError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CosmicError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CosmicError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid birthdate error
    pub fn invalid_birthdate(input: impl Into<String>) -> Self {
        CosmicError::InvalidBirthdate {
            input: input.into(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
