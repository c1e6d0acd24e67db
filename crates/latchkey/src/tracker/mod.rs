//! Login attempt tracking.
//!
//! Counts attempts and wrong passwords for a single credential pair and
//! locks once a threshold is crossed.

mod guess;
mod login;

pub use guess::Guess;
pub use login::LoginTracker;
