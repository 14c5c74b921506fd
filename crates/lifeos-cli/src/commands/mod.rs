pub mod auth;
pub mod calendar;
pub mod config;
pub mod export;
pub mod goal;
pub mod habit;
pub mod journal;
pub mod note;
pub mod project;
pub mod stats;
pub mod task;

use chrono::{Local, NaiveDate};
use lifeos_core::error::ValidationError;
use lifeos_core::{parse_day, RecordStore, Session};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store and require a logged-in user.
pub fn open_session() -> Result<(RecordStore, Session), Box<dyn std::error::Error>> {
    let store = RecordStore::open()?;
    let session = store.accounts().require_session()?;
    Ok((store, session))
}

/// `--date` if given, otherwise today's local date.
pub fn reference_date(date: Option<&str>) -> Result<NaiveDate, ValidationError> {
    match date {
        Some(raw) => parse_day(raw),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn parse_optional_day(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    raw.map(parse_day).transpose()
}

/// Comma-separated tag list; blanks dropped.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// An update value where an empty string clears the field.
pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn not_found(kind: &'static str, id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind,
        id: id.to_string(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_blank_free() {
        assert_eq!(parse_tags(Some(" a, b ,,c")), vec!["a", "b", "c"]);
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn blank_update_values_clear() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()).as_deref(), Some("x"));
    }

    #[test]
    fn explicit_reference_date_is_parsed() {
        assert_eq!(
            reference_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(reference_date(Some("2024-02-30")).is_err());
    }
}
