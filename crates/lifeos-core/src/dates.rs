//! Calendar-date helpers.
//!
//! Everything here works at day granularity on [`NaiveDate`]; time-of-day and
//! time zones never enter the aggregation engine. Date strings coming from
//! storage or the command line are parsed once at the boundary by
//! [`parse_day`], which rejects anything it cannot read instead of letting a
//! sentinel value leak into the calculations.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Storage and display format for calendar dates.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps. Timestamps are reduced to the date they name in their own
/// offset.
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] for any other input.
pub fn parse_day(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(ValidationError::InvalidDate {
        input: input.to_string(),
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// First day of the given month (`month` is 1-based).
///
/// # Errors
/// Returns [`ValidationError::InvalidMonth`] when the pair is not a real month.
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ValidationError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::InvalidMonth { year, month })
}

/// Number of days in the given month, leap years included.
///
/// # Errors
/// Returns [`ValidationError::InvalidMonth`] when the pair is not a real month.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, ValidationError> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or(ValidationError::InvalidMonth { year, month })?;
    Ok((next - first).num_days() as u32)
}

/// Weekday index of the first day of the month, 0 = Sunday.
///
/// # Errors
/// Returns [`ValidationError::InvalidMonth`] when the pair is not a real month.
pub fn first_weekday_of_month(year: i32, month: u32) -> Result<u32, ValidationError> {
    Ok(first_of_month(year, month)?.weekday().num_days_from_sunday())
}

/// Last day of the given month.
///
/// # Errors
/// Returns [`ValidationError::InvalidMonth`] when the pair is not a real month.
pub fn last_of_month(year: i32, month: u32) -> Result<NaiveDate, ValidationError> {
    let first = first_of_month(year, month)?;
    let len = days_in_month(year, month)?;
    Ok(first + Days::new(u64::from(len - 1)))
}

/// Every date of the month in order.
///
/// # Errors
/// Returns [`ValidationError::InvalidMonth`] when the pair is not a real month.
pub fn dates_in_month(year: i32, month: u32) -> Result<Vec<NaiveDate>, ValidationError> {
    let first = first_of_month(year, month)?;
    let len = days_in_month(year, month)?;
    Ok((0..len).map(|offset| first + Days::new(u64::from(offset))).collect())
}

/// The `n` days ending at `reference`, oldest first.
pub fn last_n_days(reference: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .filter_map(|offset| reference.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}

/// Calendar page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    #[default]
    Month,
}

impl std::str::FromStr for CalendarView {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(ValidationError::InvalidValue {
                field: "view".to_string(),
                message: format!("unknown calendar view '{other}' (expected day, week or month)"),
            }),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "serde_day")]
    pub start: NaiveDate,
    #[serde(with = "serde_day")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Date range shown by a calendar view around `date`.
///
/// Weeks run Sunday through Saturday.
pub fn date_range_for_view(view: CalendarView, date: NaiveDate) -> DateRange {
    match view {
        CalendarView::Day => DateRange {
            start: date,
            end: date,
        },
        CalendarView::Week => {
            let back = u64::from(date.weekday().num_days_from_sunday());
            let start = date.checked_sub_days(Days::new(back)).unwrap_or(date);
            let end = start.checked_add_days(Days::new(6)).unwrap_or(date);
            DateRange { start, end }
        }
        CalendarView::Month => {
            let start = date.with_day(1).unwrap_or(date);
            let end = last_of_month(date.year(), date.month()).unwrap_or(date);
            DateRange { start, end }
        }
    }
}

/// Coarse part of the day used for dashboard greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            Self::Morning => "Good Morning",
            Self::Afternoon => "Good Afternoon",
            Self::Evening => "Good Evening",
        }
    }
}

/// `#[serde(with)]` adapter for required calendar dates.
pub mod serde_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(&date.format(super::DAY_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_day(&raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with)]` adapter for optional calendar dates; empty strings read as `None`.
pub mod serde_opt_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        s: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.serialize_some(&super::format_day(*date)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_day(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
