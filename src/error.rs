//! Error types for HCS code generation

use thiserror::Error;

/// Errors that can occur while generating or decoding HCS codes
#[derive(Debug, Error)]
pub enum HcsError {
    #[error("Invalid input profile: {0}")]
    Validation(String),

    #[error("Invalid birth info: {0}")]
    InvalidBirthInfo(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HcsError {
    /// True for errors caused by the caller's input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, HcsError::Validation(_) | HcsError::InvalidBirthInfo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(HcsError::Validation("x".into()).is_validation());
        assert!(HcsError::InvalidBirthInfo("x".into()).is_validation());
        assert!(!HcsError::Configuration("x".into()).is_validation());
        assert!(!HcsError::Encoding("x".into()).is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = HcsError::InvalidBirthInfo("month must be between 1 and 12, got 13".into());
        assert_eq!(
            err.to_string(),
            "Invalid birth info: month must be between 1 and 12, got 13"
        );
    }
}
