//! Error types for the carousel crate.
//!
//! Runtime problems never surface as errors: a carousel that cannot rotate
//! simply shows a static window. The errors here cover what happens before a
//! carousel is mounted, i.e. building and loading its configuration.

use std::path::PathBuf;

/// Result type alias for carousel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a carousel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse carousel configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML generation error.
    #[error("Failed to serialize carousel configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File I/O error.
    #[error("Failed to read carousel configuration '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unknown preset name.
    #[error("Unknown carousel preset '{0}'")]
    UnknownPreset(String),
}

impl Error {
    /// Create an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a carousel is not rotating.
///
/// This is reported through [`CarouselEngine::degradation`](crate::CarouselEngine::degradation)
/// and logged, never returned as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Degradation {
    /// The sequence is empty.
    #[error("no items to display")]
    Empty,
    /// The sequence has exactly `k` items; every item is always visible.
    #[error("sequence length {len} equals window size, rotation disabled")]
    ExactFit {
        /// Sequence length.
        len: usize,
    },
    /// The window is larger than the sequence.
    #[error("window size {window_size} exceeds sequence length {len}, showing a static window")]
    WindowExceedsSequence {
        /// Configured window size.
        window_size: usize,
        /// Sequence length.
        len: usize,
    },
}
