//! # Protocol Constants
//!
//! Every magic number in Vernal lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Most of these values are dictated by the Spring '83 specification and are
//! not tunable: changing them makes the server non-conforming, and other
//! servers and clients will (rightly) refuse to deal with us.

use chrono::Duration;

// ---------------------------------------------------------------------------
// Content Limits
// ---------------------------------------------------------------------------

/// Maximum size in bytes that any board is allowed to be. This magic number
/// in particular was chosen because the internet's first ever web page was
/// 2217 bytes in size.
pub const MAX_CONTENT_SIZE: usize = 2217;

/// Number of days before a board's content expires and the board becomes
/// indistinguishable from one that never existed.
pub const MAX_CONTENT_AGE_DAYS: i64 = 22;

/// Maximum age of a board before it expires, as a time delta.
pub fn max_content_age() -> Duration {
    Duration::days(MAX_CONTENT_AGE_DAYS)
}

/// Tolerance added to timestamp freshness calculations to allow for clock
/// skew. Matters most as brand new posts propagate to servers whose clocks
/// run a little behind.
pub fn timestamp_tolerance() -> Duration {
    Duration::minutes(5)
}

// ---------------------------------------------------------------------------
// Key Lifetime
// ---------------------------------------------------------------------------

/// The maximum valid lifetime of a key. The `MMYY` suffix embedded in every
/// key caps its life at roughly 24 months, so clients are expected to rotate
/// yearly and keys carry their own built-in rotation anchor.
pub fn key_lifetime() -> Duration {
    Duration::hours(2 * 365 * 24)
}

// ---------------------------------------------------------------------------
// Well-Known Keys
// ---------------------------------------------------------------------------

/// Test private key defined by the Spring '83 specification. Attempts to
/// post content for it are always rejected, and requests for it always
/// return some randomized test content to help client integrations.
pub const TEST_PRIVATE_KEY: &str =
    "3371f8b011f51632fea33ed0a3688c26a45498205c6097c352bd4d079d224419";

/// Public half of [`TEST_PRIVATE_KEY`].
pub const TEST_PUBLIC_KEY: &str =
    "ab589f4dde9fce4180fcf42c7b05185b0a02a5d682e353fa39177995083e0583";

/// The "infernal" key the specification requires every server to reject.
/// Seeds every deny list.
pub const INFERNAL_PUBLIC_KEY: &str =
    "d17eef211f510479ee6696495a2589f7e9fb055c2576749747d93444883e0123";

// ---------------------------------------------------------------------------
// Wire Protocol
// ---------------------------------------------------------------------------

/// Value of the `Spring-Version` header attached to protocol responses.
pub const SPRING_VERSION: &str = "83";

/// Header carrying the hex-encoded Ed25519 signature of a board's content.
pub const HEADER_SPRING_SIGNATURE: &str = "Spring-Signature";

/// Header advertising the protocol version on responses.
pub const HEADER_SPRING_VERSION: &str = "Spring-Version";

/// Default port the server binds when `$PORT` is unset. 2217 * 2.
pub const DEFAULT_PORT: u16 = 4434;

// ---------------------------------------------------------------------------
// Background Maintenance
// ---------------------------------------------------------------------------

/// How often store reapers sweep for expired boards. The freshness contract
/// is enforced at read time regardless, so this only bounds how long dead
/// content occupies memory.
pub const REAP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
