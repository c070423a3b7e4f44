//! Failed-login lockout.
//!
//! Counts failed attempts per username inside a sliding window and
//! refuses further attempts once the count reaches the limit. Sits in
//! front of the login flow; the authenticator itself never consults it,
//! so the credential check stays a pure lookup-and-verify.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::debug;

/// Failed attempts per username before the lock engages.
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Lockout span once the limit is hit (5 minutes).
pub const LOCKOUT_DURATION_SECS: u64 = 5 * 60;

/// Outcome of a lockout check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitResult {
    /// The attempt may proceed.
    Allowed,
    /// The username is locked; retry after the given duration.
    Locked(Duration),
}

/// Per-username failed-login tracker.
///
/// Keys are exact usernames. Lookups elsewhere in the crate are
/// case-sensitive, so `"Admin"` and `"admin"` are separate accounts and
/// get separate failure counts.
#[derive(Debug)]
pub struct LoginLimiter {
    /// Failure timestamps per username, oldest first.
    failures: HashMap<String, VecDeque<Instant>>,
    max_failures: u32,
    window: Duration,
    lockout: Duration,
}

/// Drop timestamps that fell out of the window.
fn prune(queue: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = queue.front() {
        if now.duration_since(*oldest) >= window {
            queue.pop_front();
        } else {
            break;
        }
    }
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginLimiter {
    /// Limiter with the default policy: 3 failures, 5 minute window and
    /// lockout.
    pub fn new() -> Self {
        Self::with_config(
            MAX_LOGIN_ATTEMPTS,
            LOCKOUT_DURATION_SECS,
            LOCKOUT_DURATION_SECS,
        )
    }

    /// Limiter with an explicit policy.
    pub fn with_config(max_failures: u32, window_secs: u64, lockout_secs: u64) -> Self {
        Self {
            failures: HashMap::new(),
            max_failures,
            window: Duration::from_secs(window_secs),
            lockout: Duration::from_secs(lockout_secs),
        }
    }

    /// Decide whether a login attempt for this username may proceed.
    ///
    /// Probing an unknown or clean username allocates nothing; only
    /// recorded failures occupy memory.
    pub fn check(&mut self, username: &str) -> LimitResult {
        let now = Instant::now();

        let Some(queue) = self.failures.get_mut(username) else {
            return LimitResult::Allowed;
        };
        prune(queue, now, self.window);

        if queue.len() >= self.max_failures as usize {
            if let Some(oldest) = queue.front() {
                let since_oldest = now.duration_since(*oldest);
                if since_oldest < self.lockout {
                    return LimitResult::Locked(self.lockout - since_oldest);
                }
            }
            // Lockout served; start over
            queue.clear();
        }

        if queue.is_empty() {
            self.failures.remove(username);
        }
        LimitResult::Allowed
    }

    /// Record one failed attempt.
    pub fn record_failure(&mut self, username: &str) {
        let now = Instant::now();
        let queue = self.failures.entry(username.to_string()).or_default();
        prune(queue, now, self.window);
        queue.push_back(now);

        debug!(
            username = %username,
            failures = queue.len(),
            "Login failure recorded"
        );
    }

    /// Forget all failures for a username. Called on successful login.
    pub fn clear(&mut self, username: &str) {
        self.failures.remove(username);
    }

    /// Current in-window failure count for a username.
    pub fn attempt_count(&mut self, username: &str) -> usize {
        let now = Instant::now();
        match self.failures.get_mut(username) {
            Some(queue) => {
                prune(queue, now, self.window);
                queue.len()
            }
            None => 0,
        }
    }

    /// Drop expired entries so idle usernames do not accumulate.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.failures.retain(|_, queue| {
            prune(queue, now, window);
            !queue.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_clean_username_is_allowed() {
        let mut limiter = LoginLimiter::new();
        assert_eq!(limiter.check("usuario"), LimitResult::Allowed);
        // Probes must not build up state
        assert_eq!(limiter.attempt_count("usuario"), 0);
    }

    #[test]
    fn test_lock_engages_at_the_limit() {
        let mut limiter = LoginLimiter::with_config(3, 60, 300);

        for _ in 0..2 {
            limiter.record_failure("usuario");
            assert_eq!(limiter.check("usuario"), LimitResult::Allowed);
        }
        limiter.record_failure("usuario");

        match limiter.check("usuario") {
            LimitResult::Locked(remaining) => assert!(remaining <= Duration::from_secs(300)),
            LimitResult::Allowed => panic!("expected the username to be locked"),
        }
    }

    #[test]
    fn test_usernames_are_isolated() {
        let mut limiter = LoginLimiter::with_config(3, 120, 120);

        for _ in 0..3 {
            limiter.record_failure("alice");
        }

        assert!(matches!(limiter.check("alice"), LimitResult::Locked(_)));
        assert_eq!(limiter.check("bob"), LimitResult::Allowed);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut limiter = LoginLimiter::with_config(3, 60, 60);

        // Three failures spread over differently-cased spellings never
        // lock any single bucket
        limiter.record_failure("Usuario");
        limiter.record_failure("USUARIO");
        limiter.record_failure("usuario");

        assert_eq!(limiter.check("usuario"), LimitResult::Allowed);
        assert_eq!(limiter.attempt_count("usuario"), 1);
        assert_eq!(limiter.attempt_count("Usuario"), 1);
    }

    #[test]
    fn test_clear_forgets_failures() {
        let mut limiter = LoginLimiter::with_config(3, 60, 60);

        limiter.record_failure("usuario");
        limiter.record_failure("usuario");
        assert_eq!(limiter.attempt_count("usuario"), 2);

        limiter.clear("usuario");
        assert_eq!(limiter.attempt_count("usuario"), 0);
        assert_eq!(limiter.check("usuario"), LimitResult::Allowed);
    }

    #[test]
    fn test_lock_expires_with_the_window() {
        let mut limiter = LoginLimiter::with_config(2, 1, 1);

        limiter.record_failure("usuario");
        limiter.record_failure("usuario");
        assert!(matches!(limiter.check("usuario"), LimitResult::Locked(_)));

        sleep(Duration::from_millis(1100));
        assert_eq!(limiter.check("usuario"), LimitResult::Allowed);
    }

    #[test]
    fn test_cleanup_drops_idle_entries() {
        let mut limiter = LoginLimiter::with_config(3, 1, 1);

        limiter.record_failure("alice");
        limiter.record_failure("bob");

        sleep(Duration::from_millis(1100));
        limiter.cleanup();

        assert_eq!(limiter.attempt_count("alice"), 0);
        assert_eq!(limiter.attempt_count("bob"), 0);
    }
}
