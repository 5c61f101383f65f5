//! Shared traits, calendar utilities, and enums for finance primitives.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Exposes a stable identifier for stored records.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Records that fall on a single calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Sums the amounts of any slice of amounted records.
pub fn total_amount<T: Amounted>(items: &[T]) -> f64 {
    items.iter().map(Amounted::amount).sum()
}

/// Index of the record with the given id.
pub fn position_by_id<T: Identifiable>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Repetition cadence of a recurring template.
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the date `steps` periods after `anchor`.
    ///
    /// Months and years are always counted from the anchor itself, so a
    /// template starting on Jan 31 lands on Feb 28/29, then Mar 31, Apr 30.
    /// The day is clamped to the last day of the target month whenever the
    /// anchor's day does not exist there. Returns `None` on calendar overflow.
    pub fn advance(self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(steps))),
            Frequency::Monthly => shift_month(anchor, i32::try_from(steps).ok()?),
            Frequency::Yearly => shift_year(anchor, i32::try_from(steps).ok()?),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(DomainError::UnknownVariant {
                kind: "frequency",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// How a calendar month relates to a reference date.
pub enum MonthScope {
    Past,
    Current,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// An inclusive `[start, end]` calendar month.
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let last_day = days_in_month(date.year(), date.month());
        let end = date.with_day(last_day).unwrap_or(date);
        Self { start, end }
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::containing)
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn next(&self) -> Self {
        self.end.succ_opt().map(Self::containing).unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.start.pred_opt().map(Self::containing).unwrap_or(*self)
    }

    pub fn scope(&self, reference: NaiveDate) -> MonthScope {
        if self.contains(reference) {
            MonthScope::Current
        } else if self.end < reference {
            MonthScope::Past
        } else {
            MonthScope::Future
        }
    }

    /// Iterates every calendar day of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthWindow {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidMonth(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::from_ym(year, month).ok_or_else(invalid)
    }
}

/// Shifts `date` by a signed number of calendar months, clamping the day.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year().checked_mul(12)? + date.month0() as i32;
    let index = index.checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    shift_month(date, years.checked_mul(12)?)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
