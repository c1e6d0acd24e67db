//! # Latchkey
//!
//! In-memory login attempt tracking. A [`LoginTracker`] is built once from a
//! username/password pair and then fed password guesses one at a time; it
//! counts attempts and failures and locks permanently once a threshold is
//! crossed.
//!
//! ```rust
//! use latchkey::{Credentials, LoginTracker};
//!
//! let mut tracker = LoginTracker::new(Credentials::new("a", "secret"));
//!
//! assert_eq!(tracker.attempt("x").message, "Attempt 1: Login failed");
//! assert!(tracker.attempt("secret").ok);
//! ```
//!
//! Guesses that arrive as untyped JSON are accepted as well; anything other
//! than a JSON string is reported as invalid input.
//!
//! ```rust
//! use latchkey::LoginTracker;
//! use serde_json::json;
//!
//! let mut tracker =
//!     LoginTracker::from_value(&json!({"username": "a", "password": "secret"})).unwrap();
//! let outcome = tracker.attempt(&json!(42));
//! assert_eq!(outcome.message, "Invalid input: passwordAttempt must be a string");
//! ```

pub mod tracker;

pub use latchkey_common::{
    AttemptOutcome, Credentials, LatchkeyError, OutcomeKind, TrackerPolicy, TrackerSnapshot,
    TrackerStatus,
};
pub use tracker::{Guess, LoginTracker};
