//! Wall-clock access for Indian Standard Time.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// IST offset from UTC in seconds (+5:30). The zone has no daylight-saving
/// transitions, so a fixed offset represents it exactly.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Returns the current wall-clock time in IST.
///
/// Converts through a proper [`FixedOffset`] zone when one can be
/// constructed; otherwise degrades to plain offset arithmetic on the UTC
/// wall clock. Never fails.
#[must_use]
pub fn ist_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(IST_OFFSET_SECS).map_or_else(
        || (Utc::now() + Duration::seconds(i64::from(IST_OFFSET_SECS))).fixed_offset(),
        |ist| Utc::now().with_timezone(&ist),
    )
}
