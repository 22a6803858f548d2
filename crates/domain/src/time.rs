//! Timestamps for action logs and completion markers.

use chrono::{DateTime, Utc};

/// UTC timestamp stamped on log entries and completed actions.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_monotonic_log_times() {
        let first = now();
        let second = now();
        assert!(second >= first);
    }
}
