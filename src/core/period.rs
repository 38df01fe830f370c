//! Period keys and cycle boundaries.
//!
//! Every benefit resets on a recurring cycle. This module maps a cycle and a
//! local calendar date to the concrete instance of that cycle: a stable
//! [`PeriodKey`] used to scope usage records, a human label, the last instant
//! of the instance and the number of days left before it resets.
//!
//! All functions here are pure calendar arithmetic. Nothing reads the clock
//! except [`today`] and [`days_remaining`], which exist so callers do not have
//! to thread "now" through themselves.

use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use tracing::warn;

/// Recurrence class of a benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cycle {
    /// Resets on the first of every month
    Monthly,
    /// Resets on January, April, July and October 1st
    Quarterly,
    /// Resets on January and July 1st
    SemiAnnual,
    /// Resets on January 1st
    Annual,
}

impl Cycle {
    /// All cycles, shortest first. This is also the filter order in the wallet.
    pub const ALL: [Self; 4] = [Self::Monthly, Self::Quarterly, Self::SemiAnnual, Self::Annual];

    /// Length of one instance of the cycle in calendar months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::SemiAnnual => 6,
            Self::Annual => 12,
        }
    }

    /// Catalog spelling of the cycle.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::SemiAnnual => "Semi-Annual",
            Self::Annual => "Annual",
        }
    }

    /// Label of the wallet filter that selects this cycle.
    #[must_use]
    pub const fn filter_label(self) -> &'static str {
        match self {
            Self::Monthly => "This Month",
            Self::Quarterly => "This Quarter",
            Self::SemiAnnual => "This Half",
            Self::Annual => "This Year",
        }
    }

    /// Parses a cycle coming from catalog data.
    ///
    /// Unknown values are a data-quality problem rather than a fatal one: a
    /// warning is logged and [`Cycle::Annual`] is substituted so the rest of
    /// the catalog stays usable.
    #[must_use]
    pub fn from_catalog(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(cycle = value, "Unknown cycle value, defaulting to Annual");
            Self::Annual
        })
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`Cycle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cycle '{0}', expected one of Monthly, Quarterly, Semi-Annual, Annual")]
pub struct ParseCycleError(String);

impl FromStr for Cycle {
    type Err = ParseCycleError;

    /// Accepts the catalog spelling case-insensitively, ignoring `-`, `_` and
    /// spaces, so `Semi-Annual`, `semi_annual` and `semiannual` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "semiannual" | "semiannually" | "half" => Ok(Self::SemiAnnual),
            "annual" | "annually" | "yearly" | "year" => Ok(Self::Annual),
            _ => Err(ParseCycleError(s.to_string())),
        }
    }
}

/// Canonical identifier of one concrete instance of a cycle.
///
/// Formats are `YYYY-MM` (monthly), `YYYY-Qn` (quarterly), `YYYY-Hn`
/// (semi-annual) and `YYYY` (annual). Years before 1 BCE keep their sign
/// (`-1-Q3`). A key never contains `_`, which is what
/// makes the `benefitId_periodKey` encoding of usage keys decodable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey(String);

impl PeriodKey {
    /// The key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The cycle this key belongs to, read back from its format.
    #[must_use]
    pub fn cycle(&self) -> Cycle {
        match split_year(&self.0).1 {
            None => Cycle::Annual,
            Some(rest) if rest.starts_with('Q') => Cycle::Quarterly,
            Some(rest) if rest.starts_with('H') => Cycle::SemiAnnual,
            Some(_) => Cycle::Monthly,
        }
    }
}

/// Splits a key into its year and the part after the year separator.
/// A leading `-` belongs to the year.
fn split_year(key: &str) -> (&str, Option<&str>) {
    let digits_from = usize::from(key.starts_with('-'));
    match key[digits_from..].find('-') {
        Some(i) => (&key[..digits_from + i], Some(&key[digits_from + i + 1..])),
        None => (key, None),
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for strings that are not a well-formed [`PeriodKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed period key '{0}'")]
pub struct ParsePeriodKeyError(String);

impl FromStr for PeriodKey {
    type Err = ParsePeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is_year = |y: &str| {
            let digits = y.strip_prefix('-').unwrap_or(y);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        };
        let valid = match split_year(s) {
            (year, None) => is_year(year),
            (year, Some(rest)) => {
                is_year(year)
                    && match rest.as_bytes() {
                        [b'Q', b'1'..=b'4'] | [b'H', b'1' | b'2'] => true,
                        [b'0', b'1'..=b'9'] | [b'1', b'0'..=b'2'] => true,
                        _ => false,
                    }
            }
        };

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ParsePeriodKeyError(s.to_string()))
        }
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = ParsePeriodKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.0
    }
}

/// Today's date on the local clock.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the cycle instance containing `date`.
#[must_use]
pub fn period_start(cycle: Cycle, date: NaiveDate) -> NaiveDate {
    let span = cycle.months();
    let first_month = (date.month0() / span) * span + 1;

    #[allow(clippy::expect_used)] // Day 1 of a month in the year of a valid date always exists
    NaiveDate::from_ymd_opt(date.year(), first_month, 1)
        .expect("First day of a month is always valid")
}

/// Derives the key of the cycle instance containing `date`.
#[must_use]
pub fn derive_key(cycle: Cycle, date: NaiveDate) -> PeriodKey {
    let year = date.year();
    let month0 = date.month0();

    let key = match cycle {
        Cycle::Monthly => format!("{year}-{:02}", month0 + 1),
        Cycle::Quarterly => format!("{year}-Q{}", month0 / 3 + 1),
        Cycle::SemiAnnual => format!("{year}-H{}", if month0 < 6 { 1 } else { 2 }),
        Cycle::Annual => format!("{year}"),
    };

    PeriodKey(key)
}

/// Human-readable name of the cycle instance containing `date`, such as
/// `January 2024`, `Q1 2024`, `First Half 2024` or `2024`.
#[must_use]
pub fn derive_label(cycle: Cycle, date: NaiveDate) -> String {
    let year = date.year();
    let month0 = date.month0();

    match cycle {
        Cycle::Monthly => date.format("%B %Y").to_string(),
        Cycle::Quarterly => format!("Q{} {year}", month0 / 3 + 1),
        Cycle::SemiAnnual if month0 < 6 => format!("First Half {year}"),
        Cycle::SemiAnnual => format!("Second Half {year}"),
        Cycle::Annual => year.to_string(),
    }
}

/// Last instant (23:59:59.999) of the cycle instance containing `date`.
///
/// Computed as one millisecond before the start of the next instance, so month
/// lengths and leap years come from the calendar rather than a table.
#[must_use]
pub fn cycle_end_date(cycle: Cycle, date: NaiveDate) -> NaiveDateTime {
    period_start(cycle, date)
        .checked_add_months(Months::new(cycle.months()))
        .map_or(NaiveDateTime::MAX, |next_start| {
            next_start.and_time(NaiveTime::MIN) - TimeDelta::milliseconds(1)
        })
}

/// Whole days from `today` until the end of the cycle instance containing
/// `reference`, floored at zero.
///
/// Both sides are compared as calendar dates, so the time of day never biases
/// the count: on the last day of the cycle this is 0, the day before it is 1.
#[must_use]
pub fn days_remaining_at(cycle: Cycle, reference: NaiveDate, today: NaiveDate) -> u32 {
    let end = cycle_end_date(cycle, reference).date();
    let days = end.signed_duration_since(today).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Days until the cycle instance containing `reference` resets, counted from
/// the real local date rather than from `reference`.
#[must_use]
pub fn days_remaining(cycle: Cycle, reference: NaiveDate) -> u32 {
    days_remaining_at(cycle, reference, today())
}
