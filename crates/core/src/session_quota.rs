//! Concurrent-session quota rules.
//!
//! A session is *active* while its `last_activity` lies inside a trailing
//! 24-hour window. Activity is always derived from the timestamp; nothing
//! stores an "active" flag.
//!
//! Two admission predicates exist and they intentionally use different
//! boundaries:
//!
//! - [`has_free_slot`] guards inserting a *new* session and compares the
//!   count taken before the insert with `<`.
//! - [`is_admissible`] answers the periodic client poll and compares the
//!   current count with `<=`.
//!
//! Both treat a quota of `0` as unlimited.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Width of the trailing activity window, in hours.
pub const ACTIVE_WINDOW_HOURS: i64 = 24;

/// Quota value meaning "no limit".
pub const UNLIMITED_SESSIONS: i32 = 0;

/// Largest quota an administrator may assign directly.
pub const MAX_ASSIGNABLE_SESSIONS: i32 = 1_000;

// ---------------------------------------------------------------------------
// Activity window
// ---------------------------------------------------------------------------

/// Oldest `last_activity` (exclusive) that still counts as active at `now`.
pub fn active_since(now: Timestamp) -> Timestamp {
    now - Duration::hours(ACTIVE_WINDOW_HOURS)
}

/// Whether a session last seen at `last_activity` is active at `now`.
pub fn is_active(last_activity: Timestamp, now: Timestamp) -> bool {
    last_activity > active_since(now)
}

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// Whether one more session may be opened, given the active count *before*
/// the new session is inserted.
pub fn has_free_slot(active_count: i64, max_sessions: i32) -> bool {
    max_sessions == UNLIMITED_SESSIONS || active_count < i64::from(max_sessions)
}

/// Whether the user's current set of sessions is within quota.
pub fn is_admissible(active_count: i64, max_sessions: i32) -> bool {
    max_sessions == UNLIMITED_SESSIONS || active_count <= i64::from(max_sessions)
}

// ---------------------------------------------------------------------------
// Quota arithmetic
// ---------------------------------------------------------------------------

/// Quota after purchasing `slots` additional sessions.
pub fn raised_limit(previous_limit: i32, slots: i32) -> Result<i32, CoreError> {
    if slots <= 0 {
        return Err(CoreError::Validation(format!(
            "Slots must be positive, got {slots}"
        )));
    }
    previous_limit
        .checked_add(slots)
        .ok_or_else(|| CoreError::Validation("Session quota overflow".into()))
}

/// Validate a quota value assigned by an administrator.
pub fn validate_max_sessions(max_sessions: i32) -> Result<(), CoreError> {
    if !(0..=MAX_ASSIGNABLE_SESSIONS).contains(&max_sessions) {
        return Err(CoreError::Validation(format!(
            "max_sessions must be between 0 and {MAX_ASSIGNABLE_SESSIONS}, got {max_sessions}"
        )));
    }
    Ok(())
}
