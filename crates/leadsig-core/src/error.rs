//! Error Types

use thiserror::Error;

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Portal error types
#[derive(Error, Debug)]
pub enum PortalError {
    /// Auth service rejected the email/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A required field failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource already exists (e.g., duplicate sign-up)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Resource not found (profile absence, admin gate)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence call rejected by the document store
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Malformed or missing payment session identifier
    #[error("Invalid payment session: {0}")]
    InvalidSession(String),

    /// Auth service failure other than a credential rejection
    #[error("Auth error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl PortalError {
    /// Convert to a user-friendly message
    ///
    /// Every failure path renders a dedicated message block, never a blank
    /// screen, so each variant has a displayable form.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => {
                "Incorrect email or password. Please try again.".into()
            }
            Self::Validation(msg) => msg.clone(),
            Self::AlreadyExists(_) => {
                "An account with this email already exists. Try signing in.".into()
            }
            Self::NotFound(_) => "We couldn't find that record.".into(),
            Self::WriteFailure(_) => {
                "Saving your changes failed. Please try the action again.".into()
            }
            Self::InvalidSession(_) => "We couldn't verify your payment session.".into(),
            Self::Auth(_) => "Sign-in failed. Please try again.".into(),
            Self::Config(_) => "Service configuration error.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for PortalError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_nonempty() {
        let errors = vec![
            PortalError::InvalidCredentials,
            PortalError::Validation("Display name is required.".into()),
            PortalError::AlreadyExists("user@example.com".into()),
            PortalError::NotFound("profile".into()),
            PortalError::WriteFailure("permission denied".into()),
            PortalError::InvalidSession("bogus".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = PortalError::Validation("Display name is required.".into());
        assert_eq!(err.user_message(), "Display name is required.");
    }
}
