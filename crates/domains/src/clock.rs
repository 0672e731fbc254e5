//! Wall-clock time at the resolution the stores keep.

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to microseconds, the precision of a Postgres
/// `TIMESTAMPTZ`. Stored timestamps are minted here.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
