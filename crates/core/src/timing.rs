//! Fixed timing constants of the tracker and the playback loop.

use std::time::Duration;

/// Wait after a navigation-finished signal before reading media identity.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// How long a displayed annotation stays visible absent a pause or seek.
pub const DWELL: Duration = Duration::from_secs(8);

/// The intro marker may fire on any tick with `t <= INTRO_WINDOW_SECS`.
pub const INTRO_WINDOW_SECS: u32 = 2;

/// Convert a raw playback position into the whole second used for matching.
///
/// Returns `None` for positions the host should never report (NaN,
/// infinities, negatives) so that callers can ignore the tick.
pub fn playback_second(position_secs: f64) -> Option<u32> {
    if !position_secs.is_finite() || position_secs < 0.0 {
        return None;
    }
    let floored = position_secs.floor();
    if floored > f64::from(u32::MAX) {
        return None;
    }
    Some(floored as u32)
}
