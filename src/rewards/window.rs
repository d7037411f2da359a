//! Time ranges bounding which snapshots count.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

/// A time range with an inclusive lower bound and optional inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    /// Earliest instant included; unbounded when `None`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    /// Latest instant included; unbounded when `None`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

impl TimeRange {
    /// Every instant.
    pub fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Everything at or after `start`.
    pub fn since(start: OffsetDateTime) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Everything between `start` and `end`, both included.
    pub fn between(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// The `length` before `now`, e.g. the past 24 hours.
    ///
    /// Snapshots newer than `now` are kept; the upper bound stays open. A
    /// length reaching past the earliest representable date leaves the lower
    /// bound open too.
    pub fn trailing(now: OffsetDateTime, length: Duration) -> Self {
        Self::checked_trailing(now, length).unwrap_or_else(Self::all)
    }

    /// Like [`TimeRange::trailing`], but `None` when `now - length` is out of
    /// range.
    pub fn checked_trailing(now: OffsetDateTime, length: Duration) -> Option<Self> {
        now.checked_sub(length).map(Self::since)
    }

    /// Whether an instant falls inside the range.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start.is_none_or(|start| instant >= start)
            && self.end.is_none_or(|end| instant <= end)
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::all()
    }
}
