//! Time-related utility functions.
//!
//! Transport payloads carry wall-clock epoch timestamps; the engine works in
//! monotonic `Instant`s. This module bridges the two.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Convert an epoch timestamp in milliseconds to an `Instant`.
///
/// The conversion computes the age of the timestamp against the wall clock,
/// then offsets the current `Instant` by that age, so staleness logic keyed
/// on `Instant`s sees the report's true age.
///
/// # Returns
///
/// `None` if the resulting instant would precede the process start
/// (underflow). A timestamp from the future maps to now.
pub fn epoch_millis_to_instant(epoch_ms: u64) -> Option<Instant> {
    let now_system = SystemTime::now();
    let now_instant = Instant::now();
    let timestamp = UNIX_EPOCH + Duration::from_millis(epoch_ms);

    match now_system.duration_since(timestamp) {
        Ok(age) => now_instant.checked_sub(age),
        Err(_) => Some(now_instant), // Future time, use now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_epoch_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    #[test]
    fn test_epoch_now() {
        let instant = epoch_millis_to_instant(now_epoch_ms());

        assert!(instant.is_some());
        assert!(instant.unwrap().elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_epoch_past() {
        let instant = epoch_millis_to_instant(now_epoch_ms() - 60_000);

        assert!(instant.is_some());
        let elapsed = instant.unwrap().elapsed();
        assert!(elapsed >= Duration::from_secs(59));
        assert!(elapsed <= Duration::from_secs(61));
    }

    #[test]
    fn test_epoch_future_maps_to_now() {
        let instant = epoch_millis_to_instant(now_epoch_ms() + 60_000);

        assert!(instant.is_some());
        assert!(instant.unwrap().elapsed() < Duration::from_millis(100));
    }
}
