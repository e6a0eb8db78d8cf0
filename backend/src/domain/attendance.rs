//! Attendance data model.
//!
//! An attendance record captures which meals one user took on one calendar
//! day. The store keeps at most one record per `(username, date)` pair; all
//! writes go through a [`MealUpdate`], which knows how to fold itself into
//! the flags already on file.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Username;

/// Validation errors raised while parsing attendance inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceValidationError {
    /// The date was not a real `YYYY-MM-DD` day.
    #[error("date must be a calendar date formatted as YYYY-MM-DD, got {value:?}")]
    InvalidDate { value: String },
    /// The month was not `YYYY-MM`.
    #[error("month must be formatted as YYYY-MM, got {value:?}")]
    InvalidMonth { value: String },
    /// The range selector was not recognised.
    #[error("range must be all, week, month, last-N-days or YYYY-MM, got {value:?}")]
    InvalidRange { value: String },
    /// A trailing window fell outside `1..=max` days.
    #[error("day count must be between 1 and {max}")]
    DayCountOutOfRange { max: u32 },
    /// A feed limit fell outside `1..=max`.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange { max: u32 },
    /// The start bound came after the end bound.
    #[error("start date {start} is after end date {end}")]
    InvertedBounds { start: String, end: String },
    /// The write mode was neither `merge` nor `overwrite`.
    #[error("write mode must be merge or overwrite")]
    UnknownWriteMode,
}

/// Returns `true` when `raw` has the `YYYY-MM-DD` digit layout.
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Calendar day an attendance record belongs to.
///
/// ## Invariants
/// - Always a real calendar date.
/// - Displays (and is stored) as zero-padded `YYYY-MM-DD`.
///
/// # Examples
/// ```
/// use messpro::domain::AttendanceDate;
///
/// let date: AttendanceDate = "2025-12-01".parse().unwrap();
/// assert_eq!(date.to_string(), "2025-12-01");
/// assert!("2025-02-30".parse::<AttendanceDate>().is_err());
/// assert!("2025-1-5".parse::<AttendanceDate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttendanceDate(NaiveDate);

impl AttendanceDate {
    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(raw: &str) -> Result<Self, AttendanceValidationError> {
        let trimmed = raw.trim();
        let invalid = || AttendanceValidationError::InvalidDate {
            value: raw.to_owned(),
        };
        if !has_date_shape(trimmed) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Wrap an already valid calendar date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Underlying calendar date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Month this date falls in.
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

impl fmt::Display for AttendanceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for AttendanceDate {
    type Err = AttendanceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AttendanceDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Billing and filtering month, formatted `YYYY-MM`.
///
/// Month filters match stored dates by string prefix (`"2025-12-"`), so this
/// type only accepts the zero-padded form.
///
/// # Examples
/// ```
/// use messpro::domain::YearMonth;
///
/// let month: YearMonth = "2025-12".parse().unwrap();
/// assert_eq!(month.date_prefix(), "2025-12-");
/// assert!(month.matches("2025-12-31"));
/// assert!(!month.matches("2025-11-30"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Parse a `YYYY-MM` string.
    pub fn parse(raw: &str) -> Result<Self, AttendanceValidationError> {
        let trimmed = raw.trim();
        let invalid = || AttendanceValidationError::InvalidMonth {
            value: raw.to_owned(),
        };
        let bytes = trimmed.as_bytes();
        let shaped = bytes.len() == 7
            && bytes.iter().enumerate().all(|(idx, byte)| match idx {
                4 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });
        if !shaped {
            return Err(invalid());
        }
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Prefix shared by every stored date in this month.
    pub fn date_prefix(&self) -> String {
        format!("{self}-")
    }

    /// String-prefix match against a stored date.
    pub fn matches(&self, stored_date: &str) -> bool {
        stored_date.starts_with(&self.date_prefix())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = AttendanceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The three meals served each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealKind {
    /// Morning meal.
    Breakfast,
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Dinner,
}

impl MealKind {
    /// All meals in serving order.
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    /// One-letter abbreviation used by activity feeds.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Breakfast => "B",
            Self::Lunch => "L",
            Self::Dinner => "D",
        }
    }

    /// Lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

/// Stored meal flags for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealFlags {
    /// Breakfast taken.
    pub breakfast: bool,
    /// Lunch taken.
    pub lunch: bool,
    /// Dinner taken.
    pub dinner: bool,
}

impl MealFlags {
    /// Flag value for a single meal.
    pub fn taken(&self, meal: MealKind) -> bool {
        match meal {
            MealKind::Breakfast => self.breakfast,
            MealKind::Lunch => self.lunch,
            MealKind::Dinner => self.dinner,
        }
    }

    /// Space-joined abbreviations of the meals taken, e.g. `"B D"`.
    pub fn abbreviations(&self) -> String {
        MealKind::ALL
            .into_iter()
            .filter(|meal| self.taken(*meal))
            .map(MealKind::abbreviation)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a [`MealUpdate`] combines with flags already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Requested `true` flags are set; nothing is ever cleared.
    #[default]
    Merge,
    /// The stored flags are replaced; omitted flags become `false`.
    Overwrite,
}

impl WriteMode {
    /// Stable lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Overwrite => "overwrite",
        }
    }
}

impl FromStr for WriteMode {
    type Err = AttendanceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "merge" => Ok(Self::Merge),
            "overwrite" => Ok(Self::Overwrite),
            _ => Err(AttendanceValidationError::UnknownWriteMode),
        }
    }
}

/// Requested change to one day's meal flags.
///
/// `None` means the caller did not mention the meal.
///
/// # Examples
/// ```
/// use messpro::domain::{MealFlags, MealUpdate, WriteMode};
///
/// let stored = MealFlags { breakfast: true, lunch: false, dinner: false };
/// let lunch = MealUpdate { lunch: Some(true), ..MealUpdate::default() };
/// assert_eq!(
///     lunch.apply(stored),
///     MealFlags { breakfast: true, lunch: true, dinner: false }
/// );
///
/// let replace = MealUpdate {
///     lunch: Some(true),
///     mode: WriteMode::Overwrite,
///     ..MealUpdate::default()
/// };
/// assert_eq!(
///     replace.apply(stored),
///     MealFlags { breakfast: false, lunch: true, dinner: false }
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MealUpdate {
    /// Requested breakfast flag.
    pub breakfast: Option<bool>,
    /// Requested lunch flag.
    pub lunch: Option<bool>,
    /// Requested dinner flag.
    pub dinner: Option<bool>,
    /// Merge into or replace the stored flags.
    pub mode: WriteMode,
}

impl MealUpdate {
    /// Flags requested for `meal`, with omissions read as `false`.
    pub fn requested(&self, meal: MealKind) -> bool {
        let value = match meal {
            MealKind::Breakfast => self.breakfast,
            MealKind::Lunch => self.lunch,
            MealKind::Dinner => self.dinner,
        };
        value.unwrap_or(false)
    }

    /// Flags written for a day with no record yet.
    pub fn initial(&self) -> MealFlags {
        self.apply(MealFlags::default())
    }

    /// Fold this update into the flags already stored.
    pub fn apply(&self, stored: MealFlags) -> MealFlags {
        let resolve = |meal: MealKind| match self.mode {
            WriteMode::Merge => stored.taken(meal) || self.requested(meal),
            WriteMode::Overwrite => self.requested(meal),
        };
        MealFlags {
            breakfast: resolve(MealKind::Breakfast),
            lunch: resolve(MealKind::Lunch),
            dinner: resolve(MealKind::Dinner),
        }
    }
}

/// One user's meals on one day.
///
/// ## Invariants
/// - Unique per `(username, date)` inside a store.
/// - `sequence` is assigned by the store on first insert and never changes;
///   later inserts receive larger values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    sequence: i64,
    username: Username,
    date: AttendanceDate,
    meals: MealFlags,
}

impl AttendanceRecord {
    /// Assemble a record read from a store.
    pub fn new(sequence: i64, username: Username, date: AttendanceDate, meals: MealFlags) -> Self {
        Self {
            sequence,
            username,
            date,
            meals,
        }
    }

    /// Store-assigned insertion sequence.
    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    /// Owner of the record.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Day the record covers.
    pub fn date(&self) -> AttendanceDate {
        self.date
    }

    /// Meal flags.
    pub fn meals(&self) -> MealFlags {
        self.meals
    }

    /// Activity feed summary such as `"B L"`.
    pub fn last_action(&self) -> String {
        self.meals.abbreviations()
    }
}

/// Inclusive date window; missing ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    start: Option<AttendanceDate>,
    end: Option<AttendanceDate>,
}

impl DateBounds {
    /// Build bounds, rejecting a start after the end.
    pub fn new(
        start: Option<AttendanceDate>,
        end: Option<AttendanceDate>,
    ) -> Result<Self, AttendanceValidationError> {
        match (start, end) {
            (Some(first), Some(last)) if first > last => {
                Err(AttendanceValidationError::InvertedBounds {
                    start: first.to_string(),
                    end: last.to_string(),
                })
            }
            _ => Ok(Self { start, end }),
        }
    }

    /// Bounds with no limit on either side.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> Option<AttendanceDate> {
        self.start
    }

    /// Inclusive upper bound.
    pub fn end(&self) -> Option<AttendanceDate> {
        self.end
    }

    /// Whether `date` lies inside the window.
    pub fn contains(&self, date: AttendanceDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Largest accepted trailing window.
pub const MAX_TRAILING_DAYS: u32 = 366;

/// Window an aggregation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRange {
    /// Every record on file.
    All,
    /// Today and the `n - 1` days before it.
    LastNDays(u32),
    /// Records whose date starts with the month prefix.
    Month(YearMonth),
}

impl AggregationRange {
    /// Parse a query-string range selector.
    ///
    /// Accepts `all`, `week` (seven days), `month` (the month containing
    /// `today`), `last-N-days` and a literal `YYYY-MM`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use messpro::domain::{AggregationRange, AttendanceDate};
    ///
    /// let today = AttendanceDate::from_naive(NaiveDate::from_ymd_opt(2025, 12, 10).unwrap());
    /// assert_eq!(AggregationRange::parse("week", today).unwrap(), AggregationRange::LastNDays(7));
    /// assert_eq!(
    ///     AggregationRange::parse("month", today).unwrap(),
    ///     AggregationRange::Month("2025-12".parse().unwrap())
    /// );
    /// ```
    pub fn parse(raw: &str, today: AttendanceDate) -> Result<Self, AttendanceValidationError> {
        let trimmed = raw.trim();
        match trimmed {
            "" | "all" => return Ok(Self::All),
            "week" => return Ok(Self::LastNDays(7)),
            "month" => return Ok(Self::Month(today.year_month())),
            _ => {}
        }
        if let Some(count) = trimmed
            .strip_prefix("last-")
            .and_then(|rest| rest.strip_suffix("-days"))
        {
            let days: u32 = count
                .parse()
                .map_err(|_| AttendanceValidationError::InvalidRange {
                    value: raw.to_owned(),
                })?;
            return Self::last_n_days(days);
        }
        YearMonth::parse(trimmed)
            .map(Self::Month)
            .map_err(|_| AttendanceValidationError::InvalidRange {
                value: raw.to_owned(),
            })
    }

    /// Trailing window of `days` days, `1..=MAX_TRAILING_DAYS`.
    pub fn last_n_days(days: u32) -> Result<Self, AttendanceValidationError> {
        if !(1..=MAX_TRAILING_DAYS).contains(&days) {
            return Err(AttendanceValidationError::DayCountOutOfRange {
                max: MAX_TRAILING_DAYS,
            });
        }
        Ok(Self::LastNDays(days))
    }

    /// Date bounds for non-month ranges, relative to `today`.
    ///
    /// Returns `None` for [`AggregationRange::Month`], which is matched by
    /// prefix instead.
    pub fn bounds(&self, today: AttendanceDate) -> Option<DateBounds> {
        match self {
            Self::All => Some(DateBounds::unbounded()),
            Self::LastNDays(days) => {
                let back = Days::new(u64::from(days.saturating_sub(1)));
                let start = today
                    .as_naive()
                    .checked_sub_days(back)
                    .map(AttendanceDate::from_naive);
                Some(DateBounds {
                    start,
                    end: Some(today),
                })
            }
            Self::Month(_) => None,
        }
    }
}

/// Per-meal counts over a set of records. Never persisted.
///
/// # Examples
/// ```
/// use messpro::domain::{AggregateResult, MealFlags};
///
/// let tally = AggregateResult::from_flags([
///     MealFlags { breakfast: true, lunch: true, dinner: false },
///     MealFlags { breakfast: false, lunch: true, dinner: true },
/// ]);
/// assert_eq!((tally.breakfasts, tally.lunches, tally.dinners), (1, 2, 1));
/// assert_eq!(tally.days, 2);
/// assert_eq!(tally.total_meals(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateResult {
    /// Breakfasts taken.
    pub breakfasts: u64,
    /// Lunches taken.
    pub lunches: u64,
    /// Dinners taken.
    pub dinners: u64,
    /// Number of records matched.
    pub days: u64,
}

impl AggregateResult {
    /// Count flags over any sequence of records.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = MealFlags>,
    {
        flags.into_iter().fold(Self::default(), |mut acc, meals| {
            acc.breakfasts += u64::from(meals.breakfast);
            acc.lunches += u64::from(meals.lunch);
            acc.dinners += u64::from(meals.dinner);
            acc.days += 1;
            acc
        })
    }

    /// Count for one meal.
    pub fn count(&self, meal: MealKind) -> u64 {
        match meal {
            MealKind::Breakfast => self.breakfasts,
            MealKind::Lunch => self.lunches,
            MealKind::Dinner => self.dinners,
        }
    }

    /// Meals taken across all three kinds.
    pub fn total_meals(&self) -> u64 {
        self.breakfasts + self.lunches + self.dinners
    }
}

/// Default size of the activity feed.
pub const DEFAULT_RECENT_LIMIT: u32 = 5;
/// Largest activity feed a caller may request.
pub const MAX_RECENT_LIMIT: u32 = 100;

/// Validated activity feed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentLimit(u32);

impl RecentLimit {
    /// Validate a requested limit, `1..=MAX_RECENT_LIMIT`.
    pub fn new(limit: u32) -> Result<Self, AttendanceValidationError> {
        if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
            return Err(AttendanceValidationError::LimitOutOfRange {
                max: MAX_RECENT_LIMIT,
            });
        }
        Ok(Self(limit))
    }

    /// Limit as a collection size.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for RecentLimit {
    fn default() -> Self {
        Self(DEFAULT_RECENT_LIMIT)
    }
}

/// Entry of the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentActivity {
    /// Owner of the record.
    pub username: Username,
    /// Day the record covers.
    pub date: AttendanceDate,
    /// Meals taken, as `B`/`L`/`D` joined by spaces.
    pub last_action: String,
}

impl From<&AttendanceRecord> for RecentActivity {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            username: record.username().clone(),
            date: record.date(),
            last_action: record.last_action(),
        }
    }
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
