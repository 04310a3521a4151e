// ABOUTME: Typed error taxonomy — fatal startup errors and per-message chat failures.
// ABOUTME: Startup errors halt the process; chat errors are returned to the UI as notices.

use thiserror::Error;

/// Fatal conditions detected before the terminal is taken over.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error("{var} not found in environment variables. Please check your .env file.")]
    MissingSecret { var: String },

    #[error("{var} appears to be invalid (too short: {len} characters, need at least {min}).")]
    InvalidSecret { var: String, len: usize, min: usize },
}

/// A failed chat round-trip. The session is never modified when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The completion service could not be reached or did not answer in time.
    #[error("completion service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The completion service answered with an error status or a reply we cannot use.
    #[error("completion service error: {0}")]
    ServiceError(String),
}

impl ChatError {
    /// Short tag used in logs and notices.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "ServiceUnavailable",
            Self::ServiceError(_) => "ServiceError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_error_messages_name_the_variable() {
        let missing = StartupError::MissingSecret {
            var: "GROQ_API_KEY".to_string(),
        };
        assert!(missing.to_string().contains("GROQ_API_KEY not found"));

        let invalid = StartupError::InvalidSecret {
            var: "GROQ_API_KEY".to_string(),
            len: 3,
            min: 10,
        };
        let text = invalid.to_string();
        assert!(text.contains("too short"));
        assert!(text.contains("3 characters"));
    }

    #[test]
    fn chat_error_tags() {
        assert_eq!(
            ChatError::ServiceUnavailable("timeout".into()).tag(),
            "ServiceUnavailable"
        );
        assert_eq!(ChatError::ServiceError("500".into()).tag(), "ServiceError");
    }
}
