//! Tolerant date recognition for the free-form publication strings the
//! document library prints next to each version ("March 2021",
//! "Published 21st June 2022", "2018-05-31T10:00", ...).
//!
//! Words that are not date tokens are skipped. Missing day or month default
//! to 1, missing time to midnight; everything is read as UTC. A string with
//! no recognizable year yields `None`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::domain::SppDocument;

lazy_static! {
    static ref ISO_DATE: Regex =
        Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?").unwrap();
    static ref SLASH_DATE: Regex = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap();
    static ref TIME_OF_DAY: Regex = Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").unwrap();
    static ref TOKEN: Regex = Regex::new(r"[A-Za-z]+|\d+(?:st|nd|rd|th)?").unwrap();
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse the first date found in `text`, ignoring surrounding words
pub fn parse_fuzzy(text: &str) -> Option<DateTime<Utc>> {
    if let Some(c) = ISO_DATE.captures(text) {
        let date = ymd(&c[1], &c[2], &c[3])?;
        let time = match clock(&c, 4) {
            Some(time) => Some(time),
            None => time_of_day(text),
        };
        return with_time(date, time);
    }

    let time = time_of_day(text);
    let remainder = TIME_OF_DAY.replace_all(text, " ");
    let date = match SLASH_DATE.captures(&remainder) {
        // month first as printed on US sites, day first when that is the only valid reading
        Some(c) => ymd(&c[3], &c[1], &c[2]).or_else(|| ymd(&c[3], &c[2], &c[1])),
        None => scan_tokens(&remainder),
    };
    with_time(date?, time)
}

fn with_time(date: NaiveDate, time: Option<(u32, u32, u32)>) -> Option<DateTime<Utc>> {
    let (hour, minute, second) = time.unwrap_or((0, 0, 0));
    let naive = date.and_hms_opt(hour, minute, second)?;
    Some(Utc.from_utc_datetime(&naive))
}

fn time_of_day(text: &str) -> Option<(u32, u32, u32)> {
    TIME_OF_DAY.captures(text).and_then(|c| clock(&c, 1))
}

/// Hour, minute and optional second from three consecutive groups
fn clock(c: &Captures<'_>, first: usize) -> Option<(u32, u32, u32)> {
    let hour = c.get(first)?.as_str().parse().ok()?;
    let minute = c.get(first + 1)?.as_str().parse().ok()?;
    let second = c.get(first + 2).map_or(Some(0), |s| s.as_str().parse().ok())?;
    Some((hour, minute, second))
}

/// [`parse_fuzzy`], normalized to whole seconds, or the unknown-date sentinel
pub fn parse_fuzzy_or_unknown(text: &str) -> DateTime<Utc> {
    parse_fuzzy(text).map_or(SppDocument::UNKNOWN_PUB_DATE, normalize_to_seconds)
}

/// Round trip through seconds since the epoch; sub-second precision is dropped
pub fn normalize_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(dt.timestamp(), 0).unwrap_or(dt)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn scan_tokens(text: &str) -> Option<NaiveDate> {
    let mut year: Option<i32> = None;
    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;

    for token in TOKEN.find_iter(text).map(|m| m.as_str()) {
        if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
            if month.is_none() {
                month = month_from_name(token);
            }
            continue;
        }

        let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let ordinal = digits.len() != token.len();
        let Ok(number) = digits.parse::<u32>() else {
            continue;
        };

        if digits.len() == 4 && !ordinal {
            year = year.or(i32::try_from(number).ok());
        } else if digits.len() <= 2 && (1..=31).contains(&number) {
            day = day.or(Some(number));
        }
    }

    NaiveDate::from_ymd_opt(year?, month.unwrap_or(1), day.unwrap_or(1))
}

fn month_from_name(token: &str) -> Option<u32> {
    let token = token.to_ascii_lowercase();
    if token.len() < 3 {
        return None;
    }
    if token == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(token.as_str()))
        .and_then(|index| u32::try_from(index + 1).ok())
}
