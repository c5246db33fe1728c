// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizerError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unsupported MIME type: {0}")]
    UnsupportedFormat(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResizerError {
    /// Hard failures abort a whole reduction; everything else only drops
    /// the affected output.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResizerError::UnsupportedFormat(_) | ResizerError::Config(_))
    }
}

impl From<std::io::Error> for ResizerError {
    fn from(e: std::io::Error) -> Self {
        ResizerError::Io(e.to_string())
    }
}
