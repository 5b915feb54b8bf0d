//! Wall-clock time windows and the strict overlap predicate.
//!
//! Meeting times are timezone-free wall-clock-of-day values. A [`TimeSlot`]
//! is the half-open interval `[start, end)`: a meeting ending at 09:00 does
//! not conflict with one starting at 09:00.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::TimetableError;

/// A validated half-open time window within one day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    /// Create a time slot, enforcing `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, TimetableError> {
        if start >= end {
            return Err(TimetableError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a slot from `"HH:MM"` strings.
    pub fn from_hhmm(start: &str, end: &str) -> Result<Self, TimetableError> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| {
                TimetableError::InvalidTimeRange {
                    start: NaiveTime::MIN,
                    end: NaiveTime::MIN,
                }
            })
        };
        Self::new(parse(start)?, parse(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Strict half-open overlap: `s1 < e2 && e1 > s2`.
    ///
    /// Touching endpoints (one slot ends exactly when the other starts) do
    /// not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.end.num_seconds_from_midnight() - self.start.num_seconds_from_midnight()) / 60
    }

    /// Minutes between the starts of two slots, regardless of order.
    pub fn start_distance_minutes(&self, other: &TimeSlot) -> u32 {
        let a = self.start.num_seconds_from_midnight() / 60;
        let b = other.start.num_seconds_from_midnight() / 60;
        a.abs_diff(b)
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
