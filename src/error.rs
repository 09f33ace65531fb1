//! Error types for the restyle engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error types
///
/// Malformed guest-language input is never an error. These variants cover
/// host contract violations and profile loading only.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Range {start}..{end} is outside buffer of length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("Unknown language profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid language profile: {0}")]
    InvalidProfile(String),

    #[error("Profile parse error: {0}")]
    ProfileParse(#[from] toml::de::Error),
}
