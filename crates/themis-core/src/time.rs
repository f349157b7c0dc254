//! # Ledger Time
//!
//! [`Timestamp`] wraps `chrono::DateTime<Utc>`. Engine operations never read
//! the wall clock themselves — the host supplies `now` as an argument, the
//! way a ledger supplies transaction time. `Timestamp::now()` exists for
//! hosts and tests that want real time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A point in ledger time (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wrap an existing `DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Access the underlying `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// This timestamp advanced by `secs` seconds.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0 + Duration::seconds(secs as i64))
    }

    /// Whole seconds elapsed since `earlier`. Negative if `earlier` is in
    /// this timestamp's future.
    pub fn secs_since(&self, earlier: &Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
