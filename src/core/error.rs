//! Crate error types

/// Errors raised while bootstrapping the page
#[derive(Debug, thiserror::Error)]
pub enum LandingError {
    #[error("Invalid landing configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Browser API error: {0}")]
    Browser(String),
}

/// A waitlist submission that did not go through
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Waitlist submission failed: {0}")]
pub struct SubmitError(pub String);
