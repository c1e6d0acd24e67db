//! Password guesses as they arrive from callers.

use serde_json::Value;

/// A single password guess.
///
/// Typed callers pass `&str`/`&String` and always produce [`Guess::Text`].
/// Guesses ingested from untyped JSON produce [`Guess::NotText`] for any
/// value that is not a JSON string, which the tracker reports as invalid
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess<'a> {
    Text(&'a str),
    NotText,
}

impl<'a> Guess<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(s) => Some(*s),
            Self::NotText => None,
        }
    }
}

impl<'a> From<&'a str> for Guess<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Guess<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<&'a Value> for Guess<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.as_str()),
            _ => Self::NotText,
        }
    }
}
