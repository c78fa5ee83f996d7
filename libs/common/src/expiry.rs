//! Story time-to-live
//!
//! A story is visible for exactly `STORY_TTL_SECONDS` after creation. Reads
//! filter on [`story_cutoff`] and the media service sweep deletes anything
//! created at or before the same cutoff.

use chrono::{DateTime, Duration, Utc};

/// 24 hours
pub const STORY_TTL_SECONDS: i64 = 86_400;

/// Stories created at or before this instant are expired at `now`
pub fn story_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(STORY_TTL_SECONDS)
}

/// Instant a story created at `created_at` stops being readable
pub fn story_expires_at(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::seconds(STORY_TTL_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn story_is_visible_until_exactly_a_day_has_passed() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let expired_at = |now| created <= story_cutoff(now);

        assert!(!expired_at(created));
        assert!(!expired_at(created + Duration::seconds(STORY_TTL_SECONDS - 1)));
        assert!(expired_at(created + Duration::seconds(STORY_TTL_SECONDS)));
        assert!(expired_at(created + Duration::hours(25)));
    }

    #[test]
    fn expiry_instant_matches_cutoff() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let expires = story_expires_at(created);
        assert_eq!(story_cutoff(expires), created);
    }
}
