//! # Latchkey Common
//!
//! Shared types, errors, and constants used across Latchkey components.
//!
//! ## Modules
//! - `types` - Core data structures (Credentials, AttemptOutcome, TrackerStatus, etc.)
//! - `error` - Common error types
//! - `constants` - Fixed messages and default thresholds

pub mod constants;
pub mod error;
pub mod types;

pub use error::LatchkeyError;
pub use types::*;
