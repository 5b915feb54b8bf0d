//! Canonical weekday model and combined day-token parsing.
//!
//! Source timetable data encodes meeting days as compact strings: a single
//! day (`"Mon"`, `"Tuesday"`) or several days concatenated without a
//! delimiter (`"MonSat"`, `"TueThu"`). Internally a day-set is an explicit
//! [`DaySet`] bit-set; the string encoding is parsed only at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;

/// A canonical weekday. `Sun` is accepted everywhere but the engine's
/// default day pool is Mon–Sat.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Recognized day tokens, longest-first so that combined matching prefers
/// whole names (`"MonSat"` must parse as Mon + Sat, not fail on `"onSat"`).
const DAY_TOKENS: &[(&str, Weekday)] = &[
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("saturday", Weekday::Sat),
    ("tuesday", Weekday::Tue),
    ("monday", Weekday::Mon),
    ("friday", Weekday::Fri),
    ("sunday", Weekday::Sun),
    ("thurs", Weekday::Thu),
    ("tues", Weekday::Tue),
    ("mon", Weekday::Mon),
    ("tue", Weekday::Tue),
    ("wed", Weekday::Wed),
    ("thu", Weekday::Thu),
    ("fri", Weekday::Fri),
    ("sat", Weekday::Sat),
    ("sun", Weekday::Sun),
];

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Default scheduling day pool (Sunday is reserved for draft work).
    pub const CLASS_DAYS: [Weekday; 6] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Canonical short form used in combined tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Position in the canonical week, Mon = 0.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Absolute day distance within one week (used for ranking alternatives).
    pub fn distance(&self, other: Weekday) -> u32 {
        (self.index() as i32 - other.index() as i32).unsigned_abs()
    }

    /// Normalize one day token to a canonical day.
    ///
    /// Accepts full names, 3-letter abbreviations and the common longer
    /// variants (`"Tues"`, `"Thurs"`), case-insensitively. Fails with
    /// [`TimetableError::InvalidDayToken`] on anything else.
    pub fn parse(token: &str) -> Result<Weekday, TimetableError> {
        let needle = token.trim().to_ascii_lowercase();
        DAY_TOKENS
            .iter()
            .find(|(name, _)| *name == needle)
            .map(|(_, day)| *day)
            .ok_or_else(|| TimetableError::InvalidDayToken {
                token: token.to_string(),
            })
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
            Weekday::Sat => chrono::Weekday::Sat,
            Weekday::Sun => chrono::Weekday::Sun,
        }
    }
}

/// A compact set of canonical weekdays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySet(u8);

impl DaySet {
    pub fn empty() -> Self {
        DaySet(0)
    }

    pub fn singleton(day: Weekday) -> Self {
        let mut set = DaySet(0);
        set.insert(day);
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.index();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate days in canonical Mon..Sun order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(|d| self.contains(*d))
    }

    pub fn intersection(&self, other: DaySet) -> DaySet {
        DaySet(self.0 & other.0)
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl std::fmt::Display for DaySet {
    /// Renders the compact combined token form, e.g. `MonSat`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for day in self.iter() {
            write!(f, "{}", day.as_str())?;
        }
        Ok(())
    }
}

/// Expand a possibly-combined day token into the full set of canonical days.
///
/// Matching runs left-to-right over the known day names, preferring the
/// longest name at each position but retrying shorter ones when the
/// remainder cannot be consumed (`"TueSat"` must not stop at `"Tues"`). The
/// whole token must be consumed for the combined interpretation to hold.
/// Empty or unparseable input yields an empty set: the caller decides how to
/// degrade, this is a data-quality signal rather than an abort.
pub fn parse_combined_days(token: &str) -> DaySet {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return DaySet::empty();
    }

    let lower = trimmed.to_ascii_lowercase();
    let mut set = DaySet::empty();
    if consume_day_run(&lower, &mut set) {
        set
    } else {
        log::warn!("unrecognized day token {:?}, treating as no days", trimmed);
        DaySet::empty()
    }
}

/// Consume `rest` as a run of day names, inserting each matched day into
/// `set`. Recursion depth is bounded by the number of days in the token.
fn consume_day_run(rest: &str, set: &mut DaySet) -> bool {
    if rest.is_empty() {
        return true;
    }
    for (name, day) in DAY_TOKENS {
        if rest.starts_with(name) && consume_day_run(&rest[name.len()..], set) {
            set.insert(*day);
            return true;
        }
    }
    false
}
