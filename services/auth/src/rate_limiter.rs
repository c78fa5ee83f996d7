//! Rate limiter for failed login attempts
//!
//! Keys are login identifiers. Only failures count; a successful login
//! clears the key.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Failed attempts allowed inside one window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

#[derive(Debug)]
struct FailureEntry {
    failures: u32,
    window_start: Instant,
    ban_expires: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, FailureEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn normalize(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// False while the key is banned
    pub async fn is_allowed(&self, key: &str) -> bool {
        let key = Self::normalize(key);
        let mut entries = self.entries.lock().await;

        match entries.get(&key).and_then(|e| e.ban_expires) {
            Some(expires) if Instant::now() < expires => false,
            Some(_) => {
                entries.remove(&key);
                true
            }
            None => true,
        }
    }

    /// Count one failed attempt, banning the key once the limit is reached
    pub async fn record_failure(&self, key: &str) {
        let key = Self::normalize(key);
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        // Drop keys that are neither banned nor inside a live window
        entries.retain(|_, e| {
            e.ban_expires.is_some_and(|expires| expires > now)
                || now.duration_since(e.window_start) < window
        });

        let entry = entries.entry(key.clone()).or_insert(FailureEntry {
            failures: 0,
            window_start: now,
            ban_expires: None,
        });

        if now.duration_since(entry.window_start) >= window {
            entry.failures = 0;
            entry.window_start = now;
        }

        entry.failures += 1;

        if entry.failures >= self.config.max_attempts {
            entry.failures = 0;
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                "Banned login identifier {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
        }
    }

    /// Forget every failure recorded for the key
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(&Self::normalize(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bans_after_max_failures() {
        let limiter = RateLimiter::new(RateLimiterConfig::default());

        for _ in 0..4 {
            limiter.record_failure("alice").await;
            assert!(limiter.is_allowed("alice").await);
        }
        limiter.record_failure("alice").await;
        assert!(!limiter.is_allowed("alice").await);
        assert!(!limiter.is_allowed("  ALICE ").await);

        assert!(limiter.is_allowed("bob").await);
    }

    #[tokio::test]
    async fn reset_clears_failures() {
        let limiter = RateLimiter::new(RateLimiterConfig::default());

        for _ in 0..4 {
            limiter.record_failure("carol").await;
        }
        limiter.reset("carol").await;
        limiter.record_failure("carol").await;
        assert!(limiter.is_allowed("carol").await);
    }

    #[tokio::test]
    async fn stale_keys_are_evicted_on_next_failure() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 5,
            window_seconds: 0,
            ban_duration_seconds: 3600,
        });

        limiter.record_failure("erin").await;
        limiter.record_failure("frank").await;

        let entries = limiter.entries.lock().await;
        assert!(!entries.contains_key("erin"));
        assert!(entries.contains_key("frank"));
    }

    #[tokio::test]
    async fn banned_keys_survive_eviction() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 1,
            window_seconds: 0,
            ban_duration_seconds: 3600,
        });

        limiter.record_failure("grace").await;
        limiter.record_failure("heidi").await;

        assert!(!limiter.is_allowed("grace").await);
        assert!(limiter.entries.lock().await.contains_key("grace"));
    }

    #[tokio::test]
    async fn ban_lifts_after_duration() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 1,
            window_seconds: 300,
            ban_duration_seconds: 0,
        });

        limiter.record_failure("dave").await;
        assert!(limiter.is_allowed("dave").await);
    }
}
