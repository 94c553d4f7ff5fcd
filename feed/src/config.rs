//! # Feed Configuration & Constants
//!
//! Every magic number in the feed lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong and you owe the team
//! coffee.
//!
//! Most of these values are dictated by the serving side of the protocol
//! (page sentinel, page size, endpoint paths) and changing them unilaterally
//! will desynchronize the client from every deployed server. The rest are
//! local tuning knobs with defaults that survived real usage.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Wire Protocol
// ---------------------------------------------------------------------------

/// Cursor sentinel that requests the newest page from `GET /blocks/{cursor}`.
/// The server interprets any negative cursor as "start from the chain tip",
/// so this is what the initial seed fetch sends.
pub const NEWEST_PAGE_SENTINEL: i64 = -1;

/// Height of the origin block. The origin has no predecessor, so a feed
/// whose tail sits at this height has reached the end of history and
/// pagination becomes a permanent no-op.
pub const ORIGIN_HEIGHT: u64 = 0;

/// How many blocks the reference server packs into one page. The client
/// never enforces this (a short page is perfectly legal, and the final
/// page usually is short), but it makes a good capacity hint.
pub const PAGE_SIZE_HINT: usize = 10;

/// Path of the paginated block endpoint, relative to the API base URL.
/// The cursor is appended as the final path segment.
pub const BLOCKS_PATH: &str = "/blocks";

// ---------------------------------------------------------------------------
// Scroll Trigger
// ---------------------------------------------------------------------------

/// Distance from the bottom of the scrollable content, in content units,
/// at which the scroll trigger starts asking for more history. 20 units is
/// close enough that the user never sees the bottom, far enough that we
/// don't fetch on every wheel tick.
pub const SCROLL_BOTTOM_THRESHOLD: u32 = 20;

// ---------------------------------------------------------------------------
// Timeouts & Reconnect
// ---------------------------------------------------------------------------

/// Per-request timeout for page fetches. If the server hasn't answered in
/// ten seconds it isn't going to, and the user can always scroll again.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum WebSocket reconnection attempts before the live stream gives up
/// for good. Only consulted when a reconnect policy is enabled at all; the
/// core contract mandates no reconnection.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Base delay between reconnection attempts. Doubles per attempt.
pub const RECONNECT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Ceiling on the reconnection backoff. A minute between attempts is as
/// patient as a live feed needs to be.
pub const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_sentinel_is_negative() {
        // The server switches on sign, not on the exact value, but the
        // sentinel must never collide with a real height.
        assert!(NEWEST_PAGE_SENTINEL < 0);
    }

    #[test]
    fn test_origin_is_height_zero() {
        assert_eq!(ORIGIN_HEIGHT, 0);
    }

    #[test]
    fn test_backoff_bounds_sanity() {
        // If the base delay exceeds the ceiling, backoff math degenerates.
        assert!(RECONNECT_BASE_DELAY < MAX_RECONNECT_DELAY);
        assert!(MAX_RECONNECT_ATTEMPTS > 0);
    }

    #[test]
    fn test_page_size_hint_positive() {
        assert!(PAGE_SIZE_HINT > 0);
    }
}
