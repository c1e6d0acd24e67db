//! Common error types for Latchkey components.

use thiserror::Error;

/// Common errors across Latchkey components
#[derive(Debug, Error)]
pub enum LatchkeyError {
    /// Credentials were missing, not a record, or had a non-string field
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LatchkeyError {
    /// Returns the process exit code the CLI uses for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidCredentials(_) => 2,
            Self::Config(_) => 3,
        }
    }
}
