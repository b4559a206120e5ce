//! ISO-8601 dates for `<date>` values.
//!
//! A plist date is either a calendar day, a naive date-time, or a date-time
//! with a UTC offset. Text is always the ISO-8601 form produced by
//! [`Date::to_iso_string`]; microsecond precision is kept, finer digits are
//! dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::common::{Error, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A date or date-time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Date {
    /// Calendar day, `2012-01-02`
    Day(NaiveDate),
    /// Date-time without offset, `2020-07-26T21:27:49.012728`
    DateTime(NaiveDateTime),
    /// Date-time with offset, `2012-01-02T03:04:05+00:00`
    Offset(DateTime<FixedOffset>),
}

impl Date {
    /// Parse an ISO-8601 string.
    ///
    /// The plain date form is tried first, then a naive date-time, then
    /// RFC 3339 (which covers the `Z` suffix Apple tools write).
    ///
    /// # Examples
    ///
    /// ```
    /// use plistkit::common::Date;
    ///
    /// assert!(matches!(Date::parse("2020-07-26").unwrap(), Date::Day(_)));
    /// assert!(matches!(Date::parse("2020-07-26T21:27:49.012728").unwrap(), Date::DateTime(_)));
    /// assert!(matches!(Date::parse("2020-07-26T21:27:49Z").unwrap(), Date::Offset(_)));
    /// assert!(Date::parse("yesterday").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        if let Ok(day) = NaiveDate::parse_from_str(text, DAY_FORMAT) {
            return Ok(Date::Day(day));
        }
        for format in NAIVE_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Date::DateTime(datetime));
            }
        }
        DateTime::parse_from_rfc3339(text)
            .map(Date::Offset)
            .map_err(|_| Error::Value(format!("`{}` is not an ISO-8601 date", text)))
    }

    /// Render the ISO-8601 form stored in `<date>` nodes.
    pub fn to_iso_string(&self) -> String {
        match self {
            Date::Day(day) => day.format(DAY_FORMAT).to_string(),
            Date::DateTime(datetime) => {
                let mut out = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
                push_micros(&mut out, datetime.nanosecond());
                out
            },
            Date::Offset(datetime) => {
                let mut out = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
                push_micros(&mut out, datetime.nanosecond());
                out.push_str(&datetime.format("%:z").to_string());
                out
            },
        }
    }
}

fn push_micros(out: &mut String, nanos: u32) {
    // leap seconds carry nanos past one second
    let micros = (nanos % 1_000_000_000) / 1_000;
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(day: NaiveDate) -> Self {
        Date::Day(day)
    }
}

impl From<NaiveDateTime> for Date {
    fn from(datetime: NaiveDateTime) -> Self {
        Date::DateTime(datetime)
    }
}

impl From<DateTime<FixedOffset>> for Date {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Date::Offset(datetime)
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(datetime: DateTime<Utc>) -> Self {
        Date::Offset(datetime.fixed_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_round_trip() {
        let date = Date::parse("2012-01-02").unwrap();
        assert_eq!(date, Date::Day(NaiveDate::from_ymd_opt(2012, 1, 2).unwrap()));
        assert_eq!(date.to_iso_string(), "2012-01-02");
    }

    #[test]
    fn test_datetime_micros() {
        let datetime = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_micro_opt(1, 1, 1, 1)
            .unwrap();
        assert_eq!(Date::from(datetime).to_iso_string(), "2020-01-01T01:01:01.000001");

        let whole = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(1, 1, 1)
            .unwrap();
        assert_eq!(Date::from(whole).to_iso_string(), "2020-01-01T01:01:01");
    }

    #[test]
    fn test_parse_datetime_forms() {
        let parsed = Date::parse("2020-07-26T21:27:49.012728").unwrap();
        assert_eq!(parsed.to_iso_string(), "2020-07-26T21:27:49.012728");

        let minutes = Date::parse("2020-07-26 21:27").unwrap();
        assert_eq!(minutes.to_iso_string(), "2020-07-26T21:27:00");
    }

    #[test]
    fn test_parse_offset() {
        let parsed = Date::parse("2012-01-02T03:04:05Z").unwrap();
        assert!(matches!(parsed, Date::Offset(_)));
        assert_eq!(parsed.to_iso_string(), "2012-01-02T03:04:05+00:00");
        assert_eq!(Date::parse(&parsed.to_iso_string()).unwrap(), parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Date::parse("not_a_date"), Err(Error::Value(_))));
        assert!(Date::parse("2020-13-01").is_err());
    }
}
