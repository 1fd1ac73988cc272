//! Error types shared by the formula library, wizard and report validator

use thiserror::Error;

/// A profile field failed its required/type/range check
///
/// Recovered locally: the wizard blocks progression and the UI shows
/// `message` next to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// The AI response was received but is not a usable report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportFormatError {
    #[error("Report is not valid JSON: {0}")]
    Json(String),

    #[error("Report does not match the expected schema: {0}")]
    Schema(String),
}

/// Demo account directory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Enter your full name.")]
    MissingName,

    #[error("Account exists. Please sign in.")]
    AccountExists,

    #[error("Incorrect email or password.")]
    InvalidCredentials,

    /// Password hashing failed; the account store is unusable
    #[error("Sign-in is unavailable. Please try again.")]
    Unavailable,
}
