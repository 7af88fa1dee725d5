//! Date and timezone helpers backing the time tools.
//!
//! Arithmetic and IANA zone data come from `chrono` / `chrono-tz`; this module
//! only adapts argument strings, day.js-style format patterns and phrasing.

use crate::error::ToolError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

/// Pattern used when the caller gives none.
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// day.js format tokens, longest first so `YYYY` wins over `YY`.
const FORMAT_TOKENS: [(&str, &str); 24] = [
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("SSS", "%3f"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("d", "%w"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
];

pub fn parse_timezone(name: &str) -> Result<Tz, ToolError> {
    name.parse::<Tz>()
        .map_err(|_| ToolError::InvalidTimezone(name.to_string()))
}

/// Parse a date/time argument.
///
/// RFC 3339 input keeps its own offset; naive `YYYY-MM-DD[ HH:mm[:ss]]`
/// input is read as wall-clock time in `tz`.
pub fn parse_datetime(input: &str, tz: Tz) -> Result<DateTime<Tz>, ToolError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return localize(naive, tz, trimmed);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return localize(date.and_time(NaiveTime::MIN), tz, trimmed);
    }

    Err(ToolError::InvalidDate(input.to_string()))
}

/// Attach `tz` to a wall-clock time; ambiguous times take the earlier instant.
fn localize(naive: NaiveDateTime, tz: Tz, original: &str) -> Result<DateTime<Tz>, ToolError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ToolError::NonexistentLocalTime {
            time: original.to_string(),
            timezone: tz.name().to_string(),
        })
}

/// Translate a day.js pattern (`YYYY-MM-DD h:mm A`) into strftime.
///
/// `[...]` escapes literal text; anything that is not a token is copied.
pub fn translate_format(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (token, strftime) in FORMAT_TOKENS {
            if rest.starts_with(token) {
                out.push_str(strftime);
                rest = &rest[token.len()..];
                continue 'outer;
            }
        }

        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Render `dt` with a day.js pattern.
pub fn format_datetime<T>(dt: &DateTime<T>, pattern: &str) -> Result<String, ToolError>
where
    T: TimeZone,
    T::Offset: std::fmt::Display,
{
    let strftime = translate_format(pattern);
    let items: Vec<Item<'_>> = StrftimeItems::new(&strftime).collect();
    if items.contains(&Item::Error) {
        return Err(ToolError::InvalidFormat(pattern.to_string()));
    }

    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(items.iter()))
        .map_err(|_| ToolError::InvalidFormat(pattern.to_string()))?;
    Ok(out)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
        // Only reachable at the edge of chrono's supported range.
        _ => 31,
    }
}

/// Locale week number with Sunday-start weeks where week 1 contains January 1.
///
/// Fails only for dates whose week runs past the edge of the calendar range.
pub fn locale_week(date: NaiveDate) -> Result<u32, ToolError> {
    let out_of_range = || ToolError::InvalidDate(date.to_string());

    if date.month() == 12 && date.day() > 25 {
        let days_to_saturday = 6 - i64::from(date.weekday().num_days_from_sunday());
        let end_of_week = date
            .checked_add_signed(Duration::days(days_to_saturday))
            .ok_or_else(out_of_range)?;
        let next_new_year =
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).ok_or_else(out_of_range)?;
        if next_new_year <= end_of_week {
            return Ok(1);
        }
    }

    let new_year = NaiveDate::from_ymd_opt(date.year(), 1, 1).ok_or_else(out_of_range)?;
    let first_week_start = new_year
        .checked_sub_signed(Duration::days(i64::from(
            new_year.weekday().num_days_from_sunday(),
        )))
        .ok_or_else(out_of_range)?;
    Ok(((date - first_week_start).num_days() / 7 + 1) as u32)
}

/// ISO-8601 week number (Monday-start, week 1 holds the first Thursday).
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

#[derive(Debug, Clone, Copy)]
enum Phrase {
    FewSeconds,
    Minute,
    Minutes,
    Hour,
    Hours,
    Day,
    Days,
    Month,
    Months,
    Year,
    Years,
}

impl Phrase {
    fn render(self, n: i64) -> String {
        match self {
            Phrase::FewSeconds => "a few seconds".to_string(),
            Phrase::Minute => "a minute".to_string(),
            Phrase::Minutes => format!("{} minutes", n),
            Phrase::Hour => "an hour".to_string(),
            Phrase::Hours => format!("{} hours", n),
            Phrase::Day => "a day".to_string(),
            Phrase::Days => format!("{} days", n),
            Phrase::Month => "a month".to_string(),
            Phrase::Months => format!("{} months", n),
            Phrase::Year => "a year".to_string(),
            Phrase::Years => format!("{} years", n),
        }
    }
}

const MINUTE_SECS: f64 = 60.0;
const HOUR_SECS: f64 = 3_600.0;
const DAY_SECS: f64 = 86_400.0;
const MONTH_SECS: f64 = 30.436875 * DAY_SECS;
const YEAR_SECS: f64 = 12.0 * MONTH_SECS;

/// (phrase, inclusive upper bound, unit the bound is measured in).
///
/// A row without a unit reuses the previous row's measurement.
const THRESHOLDS: [(Phrase, Option<f64>, Option<f64>); 11] = [
    (Phrase::FewSeconds, Some(44.0), Some(1.0)),
    (Phrase::Minute, Some(89.0), None),
    (Phrase::Minutes, Some(44.0), Some(MINUTE_SECS)),
    (Phrase::Hour, Some(89.0), None),
    (Phrase::Hours, Some(21.0), Some(HOUR_SECS)),
    (Phrase::Day, Some(35.0), None),
    (Phrase::Days, Some(25.0), Some(DAY_SECS)),
    (Phrase::Month, Some(45.0), None),
    (Phrase::Months, Some(10.0), Some(MONTH_SECS)),
    (Phrase::Year, Some(17.0), None),
    (Phrase::Years, None, Some(YEAR_SECS)),
];

/// Human phrasing of `then` relative to `now`: "in 3 days", "5 hours ago".
pub fn relative_phrase(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta_secs = (then - now).num_milliseconds() as f64 / 1000.0;
    let mut measured = 0.0;
    let mut phrase = String::new();

    for (i, (kind, bound, unit)) in THRESHOLDS.iter().enumerate() {
        if let Some(unit) = unit {
            measured = delta_secs / unit;
        }
        let amount = measured.abs().round();

        if bound.map_or(true, |max| amount <= max) {
            // "1 minutes" reads as "a minute"
            let kind = if amount <= 1.0 && i > 0 {
                THRESHOLDS[i - 1].0
            } else {
                *kind
            };
            phrase = kind.render(amount as i64);
            break;
        }
    }

    if measured > 0.0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(input: &str) -> DateTime<Utc> {
        parse_datetime(input, Tz::UTC).unwrap().with_timezone(&Utc)
    }

    fn date(input: &str) -> NaiveDate {
        NaiveDate::parse_from_str(input, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_accepted_shapes() {
        let expected = utc("2025-06-22 15:30:00");
        assert_eq!(utc("2025-06-22T15:30:00"), expected);
        assert_eq!(utc("2025-06-22 15:30"), expected);
        assert_eq!(utc("2025-06-22T15:30:00Z"), expected);
        assert_eq!(utc("2025-06-22T17:30:00+02:00"), expected);
        assert_eq!(utc("2025-06-22"), utc("2025-06-22 00:00:00"));
    }

    #[test]
    fn test_parse_naive_uses_given_zone() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let dt = parse_datetime("2025-01-01 09:00:00", tz).unwrap();
        assert_eq!(dt.with_timezone(&Utc), utc("2025-01-01 00:00:00"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_datetime("next tuesday", Tz::UTC),
            Err(ToolError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_datetime("2025-02-30", Tz::UTC),
            Err(ToolError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_parse_skipped_local_time() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let result = parse_datetime("2025-03-09 02:30:00", tz);
        assert!(matches!(result, Err(ToolError::NonexistentLocalTime { .. })));
    }

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("Europe/London").is_ok());
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ToolError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_translate_format() {
        assert_eq!(translate_format(DEFAULT_FORMAT), "%Y-%m-%d %H:%M:%S");
        assert_eq!(translate_format("h:mm A"), "%-I:%M %p");
        assert_eq!(translate_format("[Today is] dddd"), "Today is %A");
        assert_eq!(translate_format("100%"), "100%%");
    }

    #[test]
    fn test_format_datetime() {
        let dt = utc("2025-06-22 15:05:09");
        assert_eq!(format_datetime(&dt, DEFAULT_FORMAT).unwrap(), "2025-06-22 15:05:09");
        assert_eq!(format_datetime(&dt, "h:mm A").unwrap(), "3:05 PM");
        assert_eq!(format_datetime(&dt, "MMM D, YYYY").unwrap(), "Jun 22, 2025");
    }

    #[test]
    fn test_days_in_month_leap_aware() {
        assert_eq!(days_in_month(date("2024-02-10")), 29);
        assert_eq!(days_in_month(date("2023-02-01")), 28);
        assert_eq!(days_in_month(date("2000-02-01")), 29);
        assert_eq!(days_in_month(date("2100-02-01")), 28);
        assert_eq!(days_in_month(date("2025-12-31")), 31);
        assert_eq!(days_in_month(date("2025-04-15")), 30);
    }

    #[test]
    fn test_week_numbers() {
        assert_eq!(locale_week(date("2024-01-01")).unwrap(), 1);
        assert_eq!(iso_week(date("2024-01-01")), 1);

        assert_eq!(locale_week(date("2025-06-22")).unwrap(), 26);
        assert_eq!(iso_week(date("2025-06-22")), 25);

        // Last days of December roll into week 1 of the next year.
        assert_eq!(locale_week(date("2024-12-29")).unwrap(), 1);
        assert_eq!(iso_week(date("2024-12-29")), 52);
    }

    #[test]
    fn test_locale_week_at_calendar_edge() {
        let early = NaiveDate::from_ymd_opt(-262143, 1, 2).unwrap();
        assert!(matches!(locale_week(early), Err(ToolError::InvalidDate(_))));

        assert!(matches!(
            locale_week(NaiveDate::MAX),
            Err(ToolError::InvalidDate(_))
        ));

        // Every day of the first representable week resolves without panicking.
        for offset in 0..7 {
            let day = NaiveDate::MIN + Duration::days(offset);
            let _ = locale_week(day);
        }
    }

    #[test]
    fn test_relative_phrases() {
        let now = utc("2025-06-22 12:00:00");

        assert_eq!(relative_phrase(now, now), "a few seconds ago");
        assert_eq!(relative_phrase(utc("2025-06-22 12:00:30"), now), "in a few seconds");
        assert_eq!(relative_phrase(utc("2025-06-22 11:59:00"), now), "a minute ago");
        assert_eq!(relative_phrase(utc("2025-06-22 12:10:00"), now), "in 10 minutes");
        assert_eq!(relative_phrase(utc("2025-06-22 07:00:00"), now), "5 hours ago");
        assert_eq!(relative_phrase(utc("2025-06-23 12:00:00"), now), "in a day");
        assert_eq!(relative_phrase(utc("2025-06-25 12:00:00"), now), "in 3 days");
        assert_eq!(relative_phrase(utc("2025-04-22 12:00:00"), now), "2 months ago");
        assert_eq!(relative_phrase(utc("2024-06-22 12:00:00"), now), "a year ago");
        assert_eq!(relative_phrase(utc("2020-06-22 12:00:00"), now), "5 years ago");
    }
}
