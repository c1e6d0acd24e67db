//! Core types shared across Latchkey components.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{MAX_ATTEMPTS, MAX_FAILED_ATTEMPTS, fields, messages};
use crate::error::LatchkeyError;

/// Username/password pair a tracker checks attempts against.
///
/// The password is private and can only be compared against, never read.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validate an untyped credentials record.
    ///
    /// The record must be an object whose `username` and `password` fields
    /// are both present and both strings. Anything else is
    /// `InvalidCredentials`.
    pub fn from_value(value: &Value) -> Result<Self, LatchkeyError> {
        let record = match value {
            Value::Object(map) => map,
            Value::Null => {
                return Err(LatchkeyError::InvalidCredentials(
                    "credentials are missing".to_string(),
                ));
            }
            other => {
                return Err(LatchkeyError::InvalidCredentials(format!(
                    "credentials must be an object, got {}",
                    json_type_name(other)
                )));
            }
        };

        let field = |name: &str| -> Result<String, LatchkeyError> {
            match record.get(name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(LatchkeyError::InvalidCredentials(format!(
                    "field `{}` must be a string, got {}",
                    name,
                    json_type_name(other)
                ))),
                None => Err(LatchkeyError::InvalidCredentials(format!(
                    "missing field `{}`",
                    name
                ))),
            }
        };

        Ok(Self {
            username: field(fields::USERNAME)?,
            password: field(fields::PASSWORD)?,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exact, case-sensitive, byte-for-byte comparison against the stored password
    pub fn matches(&self, guess: &str) -> bool {
        self.password.as_bytes() == guess.as_bytes()
    }
}

impl TryFrom<&Value> for Credentials {
    type Error = LatchkeyError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Human-readable JSON type name, used in error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Thresholds a tracker enforces.
///
/// Defaults are three total attempts and three wrong passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerPolicy {
    /// Attempts allowed before the lock gate closes (post-increment count)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wrong-password attempts that lock the tracker
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,
}

fn default_max_attempts() -> u32 {
    MAX_ATTEMPTS
}

fn default_max_failures() -> u32 {
    MAX_FAILED_ATTEMPTS
}

impl TrackerPolicy {
    /// Reject thresholds that would lock a tracker before its first attempt
    pub fn validate(&self) -> Result<(), LatchkeyError> {
        if self.max_attempts == 0 {
            return Err(LatchkeyError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        if self.max_failures == 0 {
            return Err(LatchkeyError::Config(
                "max_failures must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            max_failures: MAX_FAILED_ATTEMPTS,
        }
    }
}

/// Tracker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    /// Accepting attempts
    #[default]
    Active,
    /// Terminal; every attempt is refused
    Locked,
}

/// Which branch produced an attempt outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Guess matched the stored password
    Success,
    /// Wrong password, tracker still active
    Failed,
    /// Guess was not a string
    InvalidInput,
    /// Tracker is (now) locked
    Locked,
}

/// Result of a single attempt. Never an error: soft failures are reported
/// through `ok = false` and the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub ok: bool,
    pub message: String,
    pub kind: OutcomeKind,
}

impl AttemptOutcome {
    pub fn success() -> Self {
        Self {
            ok: true,
            message: messages::SUCCESS.to_string(),
            kind: OutcomeKind::Success,
        }
    }

    pub fn failed(attempt: u64) -> Self {
        Self {
            ok: false,
            message: messages::login_failed(attempt),
            kind: OutcomeKind::Failed,
        }
    }

    pub fn invalid_input() -> Self {
        Self {
            ok: false,
            message: messages::INVALID_INPUT.to_string(),
            kind: OutcomeKind::InvalidInput,
        }
    }

    pub fn locked() -> Self {
        Self {
            ok: false,
            message: messages::LOCKED.to_string(),
            kind: OutcomeKind::Locked,
        }
    }
}

/// Read-only view of a tracker's counters. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub status: TrackerStatus,

    /// Total attempt calls, including invalid and post-lock calls
    pub attempt_count: u64,

    /// Wrong-password attempts with a string guess
    pub fail_count: u64,

    /// Construction timestamp (Unix epoch seconds)
    pub created_at: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<i64>,

    /// When the tracker first locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<i64>,
}
