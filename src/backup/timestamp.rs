//! Snapshot timestamp labels
//!
//! Snapshot directories are named `Backup - YYYY-MM-DD HHhMMmSSs`, using the
//! local wall-clock time of the backup. The label is parsed back with a fixed
//! delimiter-based parser so ordering never depends on directory metadata.

use chrono::{Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Literal prefix of every snapshot directory name
pub const SNAPSHOT_PREFIX: &str = "Backup - ";

/// strftime pattern of the label part
pub const LABEL_FORMAT: &str = "%Y-%m-%d %Hh%Mm%Ss";

/// A snapshot label that does not match `YYYY-MM-DD HHhMMmSSs`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse snapshot label '{label}': {reason}")]
pub struct TimestampParseError {
    pub label: String,
    pub reason: String,
}

impl TimestampParseError {
    fn new(label: &str, reason: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

/// Render an instant as a snapshot label
pub fn format_label(instant: &NaiveDateTime) -> String {
    instant.format(LABEL_FORMAT).to_string()
}

/// Label for the current local time
pub fn now_label() -> String {
    format_label(&Local::now().naive_local())
}

/// Directory name for a snapshot with the given label
pub fn snapshot_dir_name(label: &str) -> String {
    format!("{}{}", SNAPSHOT_PREFIX, label)
}

/// Parse a label back into a wall-clock instant.
///
/// Accepts either the bare label or any longer string (a directory name or a
/// full path) ending in `Backup - <label>`.
pub fn parse_label(text: &str) -> Result<NaiveDateTime, TimestampParseError> {
    let label = match text.rfind(SNAPSHOT_PREFIX) {
        Some(idx) => &text[idx + SNAPSHOT_PREFIX.len()..],
        None => text,
    };

    let (date, time) = label
        .split_once(' ')
        .ok_or_else(|| TimestampParseError::new(label, "missing space between date and time"))?;

    let mut date_parts = date.splitn(3, '-');
    let year = numeric_field(date_parts.next(), label, "year")?;
    let month = numeric_field(date_parts.next(), label, "month")?;
    let day = numeric_field(date_parts.next(), label, "day")?;

    let (hour, rest) = time
        .split_once('h')
        .ok_or_else(|| TimestampParseError::new(label, "missing 'h' delimiter"))?;
    let (minute, rest) = rest
        .split_once('m')
        .ok_or_else(|| TimestampParseError::new(label, "missing 'm' delimiter"))?;
    let second = rest
        .strip_suffix('s')
        .ok_or_else(|| TimestampParseError::new(label, "missing 's' delimiter"))?;

    let hour = numeric_field(Some(hour), label, "hour")?;
    let minute = numeric_field(Some(minute), label, "minute")?;
    let second = numeric_field(Some(second), label, "second")?;

    let year = i32::try_from(year)
        .map_err(|_| TimestampParseError::new(label, "year out of range"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| TimestampParseError::new(label, "not a valid calendar date and time"))
}

fn numeric_field(
    part: Option<&str>,
    label: &str,
    name: &str,
) -> Result<u32, TimestampParseError> {
    let part = part.ok_or_else(|| TimestampParseError::new(label, format!("missing {}", name)))?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampParseError::new(
            label,
            format!("{} is not a number: '{}'", name, part),
        ));
    }
    part.parse()
        .map_err(|_| TimestampParseError::new(label, format!("{} out of range", name)))
}
