//! Shared constants for Latchkey components.

/// Total attempts allowed before the lock gate closes
pub const MAX_ATTEMPTS: u32 = 3;

/// Wrong-password attempts before the account locks
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// Default configuration file path for the CLI driver
pub const DEFAULT_CONFIG_PATH: &str = "config/latchkey.toml";

/// Outcome messages. These strings are part of the public contract and must
/// not change.
pub mod messages {
    /// Returned on every attempt once the tracker is locked
    pub const LOCKED: &str = "Account locked due to too many failed login attempts";

    /// Returned when the guess is not a string
    pub const INVALID_INPUT: &str = "Invalid input: passwordAttempt must be a string";

    /// Returned when the guess matches the stored password
    pub const SUCCESS: &str = "Login successful";

    /// Message for a wrong-password attempt below the failure threshold.
    /// `attempt` is the total number of attempts made so far.
    pub fn login_failed(attempt: u64) -> String {
        format!("Attempt {}: Login failed", attempt)
    }
}

/// Field names expected in an untyped credentials record
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
}
