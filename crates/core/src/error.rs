//! Error types for devwire-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    /// Frame is shorter than the envelope or its body exceeds the limit.
    /// The frame is dropped; the stream keeps going.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Frame body is not valid UTF-8
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("Duplicate command code {code}: assigned to both {first} and {second}")]
    DuplicateCommandCode {
        code: u8,
        first: &'static str,
        second: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl CoreError {
    /// Frame shorter than the fixed header
    pub fn truncated(actual: usize) -> Self {
        CoreError::MalformedFrame(format!(
            "expected at least {} bytes, got {}",
            crate::HEADER_SIZE,
            actual
        ))
    }

    /// True for errors that drop a single frame without affecting the stream
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedFrame(_) | CoreError::InvalidEncoding(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::truncated(2);
        assert_eq!(
            err.to_string(),
            "Malformed frame: expected at least 3 bytes, got 2"
        );
    }

    #[test]
    fn test_utf8_conversion() {
        let bytes = vec![0xff, 0xfe];
        let utf8_err = std::str::from_utf8(&bytes).unwrap_err();
        let core_err: CoreError = utf8_err.into();
        assert!(matches!(core_err, CoreError::InvalidEncoding(_)));
        assert!(core_err.is_frame_error());
    }

    #[test]
    fn test_duplicate_code_error() {
        let err = CoreError::DuplicateCommandCode {
            code: 20,
            first: "hardware",
            second: "app_sync",
        };
        assert_eq!(
            err.to_string(),
            "Duplicate command code 20: assigned to both hardware and app_sync"
        );
        assert!(!err.is_frame_error());
    }
}
