//! # Temporal Module
//!
//! Time primitives for milestoned records: instants, sentinel values, and the
//! half-open `Span` used for both the business and the processing axis.
//! All instants are UTC epoch milliseconds; calendar logic lives only in the
//! conversion helpers at the adapter boundary.

use serde::{Deserialize, Serialize};
use std::cmp::{max, min};
use std::fmt;
use time::OffsetDateTime;

/// A temporal instant as UTC epoch milliseconds.
/// Using i64 to support both past and future times, and to avoid floating point issues.
pub type Instant = i64;

/// Sentinel meaning "this axis is absent" (single-temporal records).
///
/// A span with both bounds set to `NO_DATE` is valid and overlaps everything.
pub const NO_DATE: Instant = -1;

/// Conventional open-ended terminal timestamp, 9999-12-01T23:59:00Z in
/// epoch milliseconds. The engine treats it as an ordinary integer; it is
/// exposed so fixtures and callers agree on one "still valid" bound.
pub const INFINITY: Instant = 253_399_708_740_000;

/// A half-open validity interval `[from, thru)` along one time axis.
///
/// Half-open bounds ensure that adjacent spans `[t0, t1)` and `[t1, t2)`
/// chain without gaps or double-counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start bound (inclusive)
    pub from: Instant,
    /// End bound (exclusive)
    pub thru: Instant,
}

impl Span {
    /// Create a new span with validation.
    ///
    /// # Errors
    /// Returns an error if `from >= thru` (zero-width spans are not allowed).
    pub fn new(from: Instant, thru: Instant) -> anyhow::Result<Self> {
        if from >= thru {
            anyhow::bail!(
                "Invalid span: from ({}) must be less than thru ({})",
                from,
                thru
            );
        }
        Ok(Self { from, thru })
    }

    /// Create a span without validation. The merge routine checks validity
    /// lazily, so malformed bounds are representable here on purpose.
    pub const fn raw(from: Instant, thru: Instant) -> Self {
        Self { from, thru }
    }

    /// The absent-axis sentinel span.
    pub const fn none() -> Self {
        Self {
            from: NO_DATE,
            thru: NO_DATE,
        }
    }

    /// Create a span from UTC datetimes.
    pub fn from_utc_datetimes(from: OffsetDateTime, thru: OffsetDateTime) -> anyhow::Result<Self> {
        Self::new(instant_from_datetime(from), instant_from_datetime(thru))
    }

    /// Check whether this span is the absent-axis sentinel.
    pub fn is_none(&self) -> bool {
        self.from == NO_DATE && self.thru == NO_DATE
    }

    /// A span is valid iff `from < thru`, or it is the sentinel.
    pub fn is_valid(&self) -> bool {
        self.from < self.thru || self.is_none()
    }

    /// Check whether two spans overlap. A sentinel span on either side
    /// overlaps everything (an always-true single-temporal axis).
    pub fn overlaps(&self, other: &Span) -> bool {
        if self.is_none() || other.is_none() {
            return true;
        }
        self.from < other.thru && other.from < self.thru
    }

    /// Bounds of the intersection with `other`, without validation.
    ///
    /// For two overlapping real spans this is the shared sub-span; for two
    /// sentinel spans it is the sentinel again. Callers are expected to have
    /// established overlap first.
    pub fn intersect_bounds(&self, other: &Span) -> Span {
        Span {
            from: max(self.from, other.from),
            thru: min(self.thru, other.thru),
        }
    }

    /// Check if this span contains a specific instant.
    pub fn contains(&self, instant: Instant) -> bool {
        self.from <= instant && instant < self.thru
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "(none)");
        }
        let thru = if self.thru == INFINITY {
            "+∞)".to_string()
        } else {
            format!("{})", self.thru)
        };
        write!(f, "[{}, {}", self.from, thru)
    }
}

/// Convert a UTC datetime to epoch milliseconds.
pub fn instant_from_datetime(dt: OffsetDateTime) -> Instant {
    (dt.unix_timestamp_nanos() / 1_000_000) as Instant
}

/// Convert epoch milliseconds back to a UTC datetime.
pub fn datetime_from_instant(instant: Instant) -> anyhow::Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(instant as i128 * 1_000_000)
        .map_err(anyhow::Error::from)
}
