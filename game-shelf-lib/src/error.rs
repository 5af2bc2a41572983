use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the local collection stores and scanners.
#[derive(Debug, Error)]
pub enum LibError {
    /// I/O error while reading or writing a store file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON store could not be parsed or serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// settings.toml could not be parsed
    #[error("Invalid settings file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be serialized
    #[error("Could not serialize settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// A rating outside the accepted range
    #[error("Rating {value} is outside the range {min}-{max}")]
    InvalidRating { value: f64, min: f64, max: f64 },

    /// The directory to scan does not exist or is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Unknown or malformed settings key
    #[error("Settings error: {0}")]
    Settings(String),
}

impl LibError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
