//! Single-account login tracker.

use std::fmt;

use latchkey_common::{
    AttemptOutcome, Credentials, LatchkeyError, TrackerPolicy, TrackerSnapshot, TrackerStatus,
};
use serde_json::Value;

use super::Guess;

/// Tracks attempts against one credential pair.
///
/// `attempt` is the only way to mutate the tracker. Once locked it stays
/// locked for the rest of its lifetime.
pub struct LoginTracker {
    credentials: Credentials,
    policy: TrackerPolicy,
    attempt_count: u64,
    fail_count: u64,
    locked: bool,
    created_at: i64,
    last_attempt_at: Option<i64>,
    locked_at: Option<i64>,
}

impl LoginTracker {
    /// Create a tracker with the default thresholds
    pub fn new(credentials: Credentials) -> Self {
        Self::build(credentials, TrackerPolicy::default())
    }

    /// Create a tracker with custom thresholds
    pub fn with_policy(
        credentials: Credentials,
        policy: TrackerPolicy,
    ) -> Result<Self, LatchkeyError> {
        policy.validate()?;
        Ok(Self::build(credentials, policy))
    }

    /// Create a tracker from an untyped credentials record.
    ///
    /// Fails with `InvalidCredentials` unless `value` is an object with string
    /// `username` and `password` fields.
    pub fn from_value(value: &Value) -> Result<Self, LatchkeyError> {
        Ok(Self::new(Credentials::from_value(value)?))
    }

    fn build(credentials: Credentials, policy: TrackerPolicy) -> Self {
        tracing::debug!(
            username = %credentials.username(),
            max_attempts = policy.max_attempts,
            max_failures = policy.max_failures,
            "Login tracker created"
        );

        Self {
            credentials,
            policy,
            attempt_count: 0,
            fail_count: 0,
            locked: false,
            created_at: chrono::Utc::now().timestamp(),
            last_attempt_at: None,
            locked_at: None,
        }
    }

    /// Check one password guess.
    ///
    /// The attempt counter moves first, unconditionally. Then, in order: the
    /// lock gate (already locked, or attempt count past `max_attempts`), the
    /// string check, the password comparison, and failure accounting.
    pub fn attempt<'a>(&mut self, guess: impl Into<Guess<'a>>) -> AttemptOutcome {
        self.attempt_count += 1;
        self.last_attempt_at = Some(chrono::Utc::now().timestamp());

        tracing::debug!(
            username = %self.credentials.username(),
            attempt = self.attempt_count,
            failures = self.fail_count,
            locked = self.locked,
            "Login attempt"
        );

        // The gate runs before the password is looked at, so the attempt
        // after the last allowed one is refused even if it is correct.
        if self.locked || self.attempt_count > u64::from(self.policy.max_attempts) {
            self.lock();
            return AttemptOutcome::locked();
        }

        let guess: Guess<'a> = guess.into();
        let Some(guess) = guess.as_text() else {
            tracing::debug!(
                username = %self.credentials.username(),
                attempt = self.attempt_count,
                "Rejected non-string password guess"
            );
            return AttemptOutcome::invalid_input();
        };

        if self.credentials.matches(guess) {
            tracing::info!(
                username = %self.credentials.username(),
                attempt = self.attempt_count,
                "Login successful"
            );
            return AttemptOutcome::success();
        }

        self.fail_count += 1;
        if self.fail_count >= u64::from(self.policy.max_failures) {
            self.lock();
            return AttemptOutcome::locked();
        }

        AttemptOutcome::failed(self.attempt_count)
    }

    fn lock(&mut self) {
        if self.locked {
            return;
        }

        self.locked = true;
        self.locked_at = Some(chrono::Utc::now().timestamp());

        tracing::warn!(
            username = %self.credentials.username(),
            attempts = self.attempt_count,
            failures = self.fail_count,
            "Account locked due to too many failed login attempts"
        );
    }

    pub fn status(&self) -> TrackerStatus {
        if self.locked {
            TrackerStatus::Locked
        } else {
            TrackerStatus::Active
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn attempt_count(&self) -> u64 {
        self.attempt_count
    }

    pub fn fail_count(&self) -> u64 {
        self.fail_count
    }

    /// Current counters and timestamps, without credentials
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            status: self.status(),
            attempt_count: self.attempt_count,
            fail_count: self.fail_count,
            created_at: self.created_at,
            last_attempt_at: self.last_attempt_at,
            locked_at: self.locked_at,
        }
    }
}

impl TryFrom<&Value> for LoginTracker {
    type Error = LatchkeyError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl fmt::Debug for LoginTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginTracker")
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .field("attempt_count", &self.attempt_count)
            .field("fail_count", &self.fail_count)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_common::OutcomeKind;
    use latchkey_common::constants::messages;
    use serde_json::json;

    fn tracker() -> LoginTracker {
        LoginTracker::from_value(&json!({"username": "a", "password": "secret"})).unwrap()
    }

    fn failed(message: &str) -> AttemptOutcome {
        AttemptOutcome {
            ok: false,
            message: message.to_string(),
            kind: OutcomeKind::Failed,
        }
    }

    #[test]
    fn test_new_tracker_is_active() {
        let tracker = tracker();
        assert_eq!(tracker.status(), TrackerStatus::Active);
        assert_eq!(tracker.attempt_count(), 0);
        assert_eq!(tracker.fail_count(), 0);
        assert!(tracker.snapshot().locked_at.is_none());
    }

    #[test]
    fn test_success_after_two_failures() {
        let mut tracker = tracker();

        assert_eq!(tracker.attempt("x"), failed("Attempt 1: Login failed"));
        assert_eq!(tracker.attempt("y"), failed("Attempt 2: Login failed"));

        let outcome = tracker.attempt("secret");
        assert!(outcome.ok);
        assert_eq!(outcome.message, "Login successful");
        assert_eq!(outcome.kind, OutcomeKind::Success);
        assert!(!tracker.is_locked());
    }

    #[test]
    fn test_third_failure_locks() {
        let mut tracker = tracker();
        tracker.attempt("x");
        tracker.attempt("y");

        let third = tracker.attempt("z");
        assert!(!third.ok);
        assert_eq!(third.message, messages::LOCKED);
        assert_eq!(third.kind, OutcomeKind::Locked);
        assert_eq!(tracker.fail_count(), 3);
        assert!(tracker.is_locked());

        let fourth = tracker.attempt("secret");
        assert!(!fourth.ok);
        assert_eq!(fourth.message, messages::LOCKED);
    }

    #[test]
    fn test_non_string_guess_is_invalid_input() {
        let mut tracker = tracker();
        tracker.attempt("x");
        tracker.attempt("y");

        let outcome = tracker.attempt(&json!(42));
        assert!(!outcome.ok);
        assert_eq!(outcome.message, messages::INVALID_INPUT);
        assert_eq!(outcome.kind, OutcomeKind::InvalidInput);
        assert_eq!(tracker.status(), TrackerStatus::Active);
        assert_eq!(tracker.fail_count(), 2);
        assert_eq!(tracker.attempt_count(), 3);
    }

    #[test]
    fn test_lock_is_permanent_after_failures() {
        let mut tracker = tracker();
        for guess in ["x", "y", "z"] {
            tracker.attempt(guess);
        }

        let outcome = tracker.attempt("secret");
        assert_eq!(outcome, AttemptOutcome::locked());
        assert_eq!(tracker.attempt_count(), 4);
    }

    #[test]
    fn test_missing_password_is_invalid_credentials() {
        let result = LoginTracker::from_value(&json!({"username": "a"}));
        assert!(matches!(result, Err(LatchkeyError::InvalidCredentials(_))));
    }

    #[test]
    fn test_non_object_credentials_are_rejected() {
        for value in [json!(null), json!("a"), json!(7), json!(["a", "secret"])] {
            assert!(LoginTracker::try_from(&value).is_err(), "{}", value);
        }
    }

    #[test]
    fn test_fourth_call_locks_even_when_correct() {
        let mut tracker = tracker();
        tracker.attempt(&json!(1));
        tracker.attempt(&json!(2));
        tracker.attempt("x");

        assert!(!tracker.is_locked());
        assert_eq!(tracker.fail_count(), 1);

        let outcome = tracker.attempt("secret");
        assert_eq!(outcome, AttemptOutcome::locked());
        assert!(tracker.is_locked());
        assert_eq!(tracker.fail_count(), 1);
    }

    #[test]
    fn test_success_does_not_reset_counters() {
        let mut tracker = tracker();
        assert!(tracker.attempt("secret").ok);
        assert!(tracker.attempt("secret").ok);
        assert!(tracker.attempt("secret").ok);

        assert_eq!(tracker.fail_count(), 0);
        assert_eq!(tracker.attempt("secret"), AttemptOutcome::locked());
    }

    #[test]
    fn test_attempt_count_matches_calls() {
        let mut tracker = tracker();
        let guesses = [
            json!("x"),
            json!(null),
            json!("secret"),
            json!("y"),
            json!(false),
            json!("secret"),
            json!("z"),
        ];

        for (i, guess) in guesses.iter().enumerate() {
            tracker.attempt(guess);
            assert_eq!(tracker.attempt_count(), i as u64 + 1);
            assert!(tracker.fail_count() <= tracker.attempt_count());
        }
    }

    #[test]
    fn test_locked_tracker_stays_locked() {
        let mut tracker = tracker();
        for guess in ["x", "y", "z"] {
            tracker.attempt(guess);
        }
        let locked_at = tracker.snapshot().locked_at;
        assert!(locked_at.is_some());

        for n in 4..20 {
            let guess = if n % 2 == 0 { json!("secret") } else { json!(n) };
            assert_eq!(tracker.attempt(&guess), AttemptOutcome::locked());
            assert_eq!(tracker.attempt_count(), n);
            assert_eq!(tracker.fail_count(), 3);
        }

        assert_eq!(tracker.snapshot().locked_at, locked_at);
    }

    #[test]
    fn test_invalid_input_alone_locks_at_threshold() {
        let mut tracker = tracker();
        for _ in 0..3 {
            assert_eq!(tracker.attempt(&json!(0)), AttemptOutcome::invalid_input());
        }
        assert_eq!(tracker.fail_count(), 0);
        assert!(!tracker.is_locked());

        assert_eq!(tracker.attempt(&json!(0)), AttemptOutcome::locked());
        assert!(tracker.is_locked());
        assert_eq!(tracker.fail_count(), 0);
    }

    #[test]
    fn test_failure_message_uses_attempt_count() {
        let mut tracker = tracker();
        tracker.attempt(&json!([]));

        let outcome = tracker.attempt("x");
        assert_eq!(outcome.message, "Attempt 2: Login failed");
        assert_eq!(tracker.fail_count(), 1);
    }

    #[test]
    fn test_password_comparison_is_case_sensitive() {
        let mut tracker = tracker();
        assert!(!tracker.attempt("SECRET").ok);
        assert!(!tracker.attempt("secret ").ok);
        assert!(tracker.attempt(&"secret".to_string()).ok);
    }

    #[test]
    fn test_username_is_never_compared() {
        let mut tracker = tracker();
        assert!(!tracker.attempt("a").ok);
        assert_eq!(tracker.fail_count(), 1);
    }

    #[test]
    fn test_custom_policy() {
        let policy = TrackerPolicy {
            max_attempts: 5,
            max_failures: 2,
        };
        let mut tracker =
            LoginTracker::with_policy(Credentials::new("a", "secret"), policy).unwrap();

        assert_eq!(tracker.attempt("x").message, "Attempt 1: Login failed");
        assert_eq!(tracker.attempt("y"), AttemptOutcome::locked());
        assert!(tracker.is_locked());
        assert_eq!(tracker.fail_count(), 2);
    }

    #[test]
    fn test_with_policy_rejects_zero_thresholds() {
        let policy = TrackerPolicy {
            max_attempts: 0,
            max_failures: 3,
        };
        let result = LoginTracker::with_policy(Credentials::new("a", "secret"), policy);
        assert!(matches!(result, Err(LatchkeyError::Config(_))));
    }

    #[test]
    fn test_snapshot_tracks_counters() {
        let mut tracker = tracker();
        tracker.attempt("x");
        tracker.attempt(&json!(3));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.status, TrackerStatus::Active);
        assert_eq!(snapshot.attempt_count, 2);
        assert_eq!(snapshot.fail_count, 1);
        assert!(snapshot.last_attempt_at.is_some());
        assert!(snapshot.locked_at.is_none());

        let rendered = serde_json::to_string(&snapshot).unwrap();
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_attempt_count_moves_past_u32_range() {
        let mut tracker = tracker();
        tracker.attempt_count = u64::from(u32::MAX);
        tracker.locked = true;

        assert_eq!(tracker.attempt("secret"), AttemptOutcome::locked());
        assert_eq!(tracker.attempt_count(), u64::from(u32::MAX) + 1);
        tracker.attempt("secret");
        assert_eq!(tracker.attempt_count(), u64::from(u32::MAX) + 2);
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let tracker = tracker();
        let rendered = format!("{:?}", tracker);
        assert!(!rendered.contains("secret"));
    }
}
