// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! DATE, DATE-TIME and UTC-OFFSET values as defined in RFC 5545 Sections
//! 3.3.4, 3.3.5 and 3.3.14.
//!
//! A [`DateTime`] carries its mode explicitly: a date-only value, a floating
//! local time, a UTC time, or a local time bound to a `TZID`.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::label::LabelError;
use chumsky::prelude::*;

use crate::error::{Error, InvalidArgument, ParseError};
use crate::value::miscellaneous::{
    ValueExpected, i8_0_1, i8_0_2, i8_0_9, i8_1_2, i8_1_9, i16_0_9, u8_0_1, u8_0_3, u8_0_5, u8_0_9,
};
use crate::value::{ValueKind, run_parser};

/// TZID values that name UTC itself; such date-times are stored as UTC.
const UTC_ALIASES: &[&str] = &["UTC", "GMT", "Z", "Etc/UTC", "Etc/GMT"];

/// Date value in the iCalendar format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueDate {
    /// Year component.
    pub year: i16,

    /// Month component, 1-12.
    pub month: i8,

    /// Day component, 1-31.
    pub day: i8,
}

impl ValueDate {
    /// Convert to `jiff::civil::Date`.
    #[must_use]
    pub fn civil_date(self) -> jiff::civil::Date {
        self.into()
    }
}

impl From<ValueDate> for jiff::civil::Date {
    fn from(value: ValueDate) -> Self {
        jiff::civil::date(value.year, value.month, value.day)
    }
}

impl From<jiff::civil::Date> for ValueDate {
    fn from(value: jiff::civil::Date) -> Self {
        Self {
            year: value.year(),
            month: value.month(),
            day: value.day(),
        }
    }
}

impl Display for ValueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Time of day, sub-second precision is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueTime {
    /// Hour component, 0-23.
    pub hour: u8,

    /// Minute component, 0-59.
    pub minute: u8,

    /// Second component, 0-60 (60 for leap second).
    pub second: u8,
}

impl ValueTime {
    /// Create a new `ValueTime` from components.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Midnight, used when a date-only value takes part in time arithmetic.
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    /// Convert to `jiff::civil::Time`.
    ///
    /// A leap second is contracted to 59 for simplicity.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn civil_time(self) -> jiff::civil::Time {
        jiff::civil::time(
            self.hour as i8,
            self.minute as i8,
            self.second.min(59) as i8,
            0,
        )
    }
}

impl From<jiff::civil::Time> for ValueTime {
    fn from(value: jiff::civil::Time) -> Self {
        Self {
            hour: value.hour().unsigned_abs(),
            minute: value.minute().unsigned_abs(),
            second: value.second().unsigned_abs(),
        }
    }
}

impl Display for ValueTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)
    }
}

/// A DATE or DATE-TIME value together with its time mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateTime {
    /// Date-only value, `YYYYMMDD`
    Date {
        /// Date part
        date: ValueDate,
    },

    /// Date and time without timezone (floating time)
    Floating {
        /// Date part
        date: ValueDate,
        /// Time part
        time: ValueTime,
    },

    /// Date and time in UTC, serialized with a trailing `Z`
    Utc {
        /// Date part
        date: ValueDate,
        /// Time part
        time: ValueTime,
    },

    /// Local date and time bound to a `TZID` parameter
    Zoned {
        /// Date part
        date: ValueDate,
        /// Time part
        time: ValueTime,
        /// Timezone identifier
        tz_id: String,
    },
}

impl DateTime {
    /// Parse the RFC 5545 text form `YYYYMMDD[THHMMSS[Z]]`.
    ///
    /// The mode is taken from a trailing `Z` first, then from the `TZID`
    /// parameter, and falls back to floating time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed digits, out-of-range fields,
    /// impossible calendar dates, inputs shorter than 8 characters and for a
    /// UTC time that also carries a non-UTC `TZID`.
    pub fn parse(raw: &str, tz_id: Option<&str>) -> Result<Self, Error> {
        if raw.chars().count() < 8 {
            return Err(ParseError::new(ValueKind::DateTime, raw, "shorter than 8 characters").into());
        }

        let (date, time) = run_parser(
            ValueKind::DateTime,
            raw,
            value_date_or_date_time::<'_, _, extra::Err<_>>(),
        )?;

        let tz_id = tz_id.filter(|tz| !tz.is_empty());
        let value = match (time, tz_id) {
            (None, tz) => {
                if let Some(tz) = tz {
                    tracing::trace!(tz_id = tz, raw, "dropping TZID of a date-only value");
                }
                DateTime::Date { date }
            }
            (Some((_, true)), Some(tz)) if !is_utc_alias(tz) => {
                return Err(ParseError::new(
                    ValueKind::DateTime,
                    raw,
                    format!("UTC time cannot carry TZID={tz}"),
                )
                .into());
            }
            (Some((time, true)), _) => DateTime::Utc { date, time },
            (Some((time, false)), Some(tz)) if is_utc_alias(tz) => DateTime::Utc { date, time },
            (Some((time, false)), Some(tz)) => DateTime::Zoned {
                date,
                time,
                tz_id: tz.to_string(),
            },
            (Some((time, false)), None) => DateTime::Floating { date, time },
        };
        Ok(value)
    }

    /// Parse either the RFC 5545 text form or an ISO 8601 / RFC 9557 form
    /// such as `2023-06-15`, `2023-06-15T10:00:00`, `2023-06-15T10:00:00Z`
    /// or `2023-06-15T10:00:00+02:00[Europe/Paris]`.
    ///
    /// # Errors
    ///
    /// Returns the RFC 5545 parse error when no accepted form matches.
    pub fn parse_loose(raw: &str, tz_id: Option<&str>) -> Result<Self, Error> {
        let err = match Self::parse(raw, tz_id) {
            Ok(v) => return Ok(v),
            Err(err) => err,
        };

        let raw = raw.trim();
        if let Ok(zoned) = raw.parse::<jiff::Zoned>() {
            return Ok(Self::from(&zoned));
        }
        if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
            return Ok(Self::from(ts));
        }
        if raw.contains(['T', 't', ' ']) {
            if let Ok(dt) = raw.parse::<jiff::civil::DateTime>() {
                return Ok(Self::from(dt).with_tz_id(tz_id));
            }
        } else if let Ok(date) = raw.parse::<jiff::civil::Date>() {
            return Ok(Self::from(date));
        }
        Err(err)
    }

    /// Parse a COMMA-separated list of values sharing one `TZID`.
    ///
    /// # Errors
    ///
    /// Returns the first element that fails to parse.
    pub fn parse_list(raw: &str, tz_id: Option<&str>) -> Result<Vec<Self>, Error> {
        raw.split(',').map(|a| Self::parse(a, tz_id)).collect()
    }

    /// Interpret a numeric timestamp (seconds since the Unix epoch) as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::OutOfRange`] outside jiff's supported range.
    pub fn from_unix_seconds(seconds: i64) -> Result<Self, Error> {
        let ts = jiff::Timestamp::from_second(seconds).map_err(|_| InvalidArgument::OutOfRange {
            property: "timestamp".to_string(),
            value: seconds,
            min: jiff::Timestamp::MIN.as_second(),
            max: jiff::Timestamp::MAX.as_second(),
        })?;
        Ok(Self::from(ts))
    }

    /// Get the date part.
    #[must_use]
    pub fn date(&self) -> ValueDate {
        match self {
            DateTime::Date { date }
            | DateTime::Floating { date, .. }
            | DateTime::Utc { date, .. }
            | DateTime::Zoned { date, .. } => *date,
        }
    }

    /// Get the time part if this is not a date-only value.
    #[must_use]
    pub fn time(&self) -> Option<ValueTime> {
        match self {
            DateTime::Floating { time, .. }
            | DateTime::Utc { time, .. }
            | DateTime::Zoned { time, .. } => Some(*time),
            DateTime::Date { .. } => None,
        }
    }

    /// Get the timezone ID if this is a zoned value.
    #[must_use]
    pub fn tz_id(&self) -> Option<&str> {
        match self {
            DateTime::Zoned { tz_id, .. } => Some(tz_id),
            _ => None,
        }
    }

    /// Check if this is a date-only value.
    #[must_use]
    pub fn is_date_only(&self) -> bool {
        matches!(self, DateTime::Date { .. })
    }

    /// Check if this is a UTC value.
    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self, DateTime::Utc { .. })
    }

    /// Check if this is a floating (no timezone) value.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, DateTime::Floating { .. })
    }

    /// The value type this value is serialized as.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            DateTime::Date { .. } => ValueKind::Date,
            _ => ValueKind::DateTime,
        }
    }

    /// Wall-clock date and time, midnight for date-only values.
    #[must_use]
    pub fn civil(&self) -> jiff::civil::DateTime {
        let time = self.time().unwrap_or(ValueTime::MIDNIGHT);
        jiff::civil::DateTime::from_parts(self.date().civil_date(), time.civil_time())
    }

    /// Bind a floating value to a timezone; other modes are returned as-is.
    #[must_use]
    pub fn with_tz_id(self, tz_id: Option<&str>) -> Self {
        match (self, tz_id) {
            (DateTime::Floating { date, time }, Some(tz)) if is_utc_alias(tz) => {
                DateTime::Utc { date, time }
            }
            (DateTime::Floating { date, time }, Some(tz)) if !tz.is_empty() => DateTime::Zoned {
                date,
                time,
                tz_id: tz.to_string(),
            },
            (value, _) => value,
        }
    }

    /// Convert to a UTC date-time.
    ///
    /// Zoned values go through the IANA time zone database, floating values
    /// are taken as already being UTC and dates become midnight UTC.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::UnknownTimeZone`] if the `TZID` cannot be
    /// resolved.
    pub fn to_utc(&self) -> Result<Self, Error> {
        match self {
            DateTime::Utc { .. } => Ok(self.clone()),
            DateTime::Floating { date, time } => Ok(DateTime::Utc {
                date: *date,
                time: *time,
            }),
            DateTime::Date { date } => Ok(DateTime::Utc {
                date: *date,
                time: ValueTime::MIDNIGHT,
            }),
            DateTime::Zoned { tz_id, .. } => {
                let unknown = || InvalidArgument::UnknownTimeZone {
                    tz_id: tz_id.clone(),
                };
                let tz = jiff::tz::TimeZone::get(tz_id).map_err(|_| unknown())?;
                let zoned = self.civil().to_zoned(tz).map_err(|_| unknown())?;
                let utc = zoned.with_time_zone(jiff::tz::TimeZone::UTC).datetime();
                tracing::trace!(tz_id = %tz_id, %utc, "converted zoned date-time to UTC");
                Ok(DateTime::Utc {
                    date: utc.date().into(),
                    time: utc.time().into(),
                })
            }
        }
    }

    /// Total ordering on the underlying instant, independent of mode.
    ///
    /// Zoned values are compared in UTC when their zone is known; floating
    /// and date-only values compare by wall clock (dates as midnight).
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.instant_key().cmp(&other.instant_key())
    }

    fn instant_key(&self) -> jiff::civil::DateTime {
        match self {
            DateTime::Zoned { .. } => self.to_utc().map_or_else(|_| self.civil(), |a| a.civil()),
            _ => self.civil(),
        }
    }

    /// Format as `YYYYMMDD` or `YYYYMMDDTHHMMSS[Z]`.
    ///
    /// `force_date_only` drops the time part; `force_utc` converts to UTC
    /// first (the `TZID` parameter is then no longer needed).
    #[must_use]
    pub fn format(&self, force_date_only: bool, force_utc: bool) -> String {
        if force_date_only {
            return self.date().to_string();
        }

        if force_utc && !self.is_utc() {
            return match self.to_utc() {
                Ok(utc) => utc.to_string(),
                Err(err) => {
                    tracing::warn!(%err, "cannot convert to UTC, keeping wall clock time");
                    let time = self.time().unwrap_or(ValueTime::MIDNIGHT);
                    format!("{}T{time}Z", self.date())
                }
            };
        }

        self.to_string()
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTime::Date { date } => write!(f, "{date}"),
            DateTime::Floating { date, time } | DateTime::Zoned { date, time, .. } => {
                write!(f, "{date}T{time}")
            }
            DateTime::Utc { date, time } => write!(f, "{date}T{time}Z"),
        }
    }
}

impl From<jiff::civil::Date> for DateTime {
    fn from(value: jiff::civil::Date) -> Self {
        DateTime::Date { date: value.into() }
    }
}

impl From<jiff::civil::DateTime> for DateTime {
    fn from(value: jiff::civil::DateTime) -> Self {
        DateTime::Floating {
            date: value.date().into(),
            time: value.time().into(),
        }
    }
}

impl From<jiff::Timestamp> for DateTime {
    fn from(value: jiff::Timestamp) -> Self {
        let utc = value.to_zoned(jiff::tz::TimeZone::UTC).datetime();
        DateTime::Utc {
            date: utc.date().into(),
            time: utc.time().into(),
        }
    }
}

impl From<&jiff::Zoned> for DateTime {
    fn from(value: &jiff::Zoned) -> Self {
        match value.time_zone().iana_name() {
            Some(name) if !is_utc_alias(name) => DateTime::Zoned {
                date: value.date().into(),
                time: value.time().into(),
                tz_id: name.to_string(),
            },
            _ => DateTime::from(value.timestamp()),
        }
    }
}

fn is_utc_alias(tz_id: &str) -> bool {
    UTC_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(tz_id))
}

/// UTC Offset Value defined in RFC 5545 Section 3.3.14
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    /// Whether the offset is positive
    pub positive: bool,

    /// Hour, 0-23
    pub hour: u8,

    /// Minute, 0-59
    pub minute: u8,

    /// Second, 0-59, optional
    pub second: Option<u8>,
}

impl UtcOffset {
    /// Parse `("+" / "-") HHMM[SS]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed input and for `-0000`, which
    /// RFC 5545 forbids.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let value = run_parser(
            ValueKind::UtcOffset,
            raw,
            value_utc_offset::<'_, _, extra::Err<_>>(),
        )?;
        if !value.positive && value.hour == 0 && value.minute == 0 && value.second.unwrap_or(0) == 0
        {
            return Err(ParseError::new(ValueKind::UtcOffset, raw, "negative zero offset").into());
        }
        Ok(value)
    }

    /// Total offset in seconds, negative west of UTC.
    #[must_use]
    pub fn seconds(&self) -> i32 {
        let secs = i32::from(self.hour) * 3600
            + i32::from(self.minute) * 60
            + i32::from(self.second.unwrap_or(0));
        if self.positive { secs } else { -secs }
    }
}

impl Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.positive { '+' } else { '-' };
        write!(f, "{sign}{:02}{:02}", self.hour, self.minute)?;
        match self.second {
            Some(second) if second > 0 => write!(f, "{second:02}"),
            _ => Ok(()),
        }
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// date               = date-value
///
/// date-value         = date-fullyear date-month date-mday
/// date-fullyear      = 4DIGIT
/// date-month         = 2DIGIT        ;01-12
/// date-mday          = 2DIGIT        ;01-28, 01-29, 01-30, 01-31
///                                    ;based on month/year
/// ```
pub(crate) fn value_date<'src, I, E>() -> impl Parser<'src, I, ValueDate, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    let year = i16_0_9()
        .then(i16_0_9())
        .then(i16_0_9())
        .then(i16_0_9())
        .map(|(((a, b), c), d)| 1000 * a + 100 * b + 10 * c + d);

    let month = choice((
        just('0').ignore_then(i8_1_9()),
        just('1').ignore_then(i8_0_2()).map(|b| 10 + b),
    ));

    let day = choice((
        just('0').ignore_then(i8_1_9()),
        i8_1_2().then(i8_0_9()).map(|(a, b)| 10 * a + b),
        just('3').ignore_then(i8_0_1()).map(|b| 30 + b),
    ));

    year.then(month)
        .then(day)
        .try_map(|((year, month), day), span| {
            if jiff::civil::Date::new(year, month, day).is_err() {
                Err(E::Error::expected_found([ValueExpected::Date], None, span))
            } else {
                Ok(ValueDate { year, month, day })
            }
        })
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// time         = time-hour time-minute time-second [time-utc]
///
/// time-hour    = 2DIGIT        ;00-23
/// time-minute  = 2DIGIT        ;00-59
/// time-second  = 2DIGIT        ;00-60
/// ;The "60" value is used to account for positive "leap" seconds.
///
/// time-utc     = "Z"
/// ```
///
/// The boolean is `true` when the time carries the UTC designator.
fn value_time<'src, I, E>() -> impl Parser<'src, I, (ValueTime, bool), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    time_hour()
        .then(time_minute())
        .then(time_second())
        .then(just('Z').or_not())
        .map(|(((hour, minute), second), utc)| (ValueTime::new(hour, minute, second), utc.is_some()))
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// date-time  = date "T" time ;As specified in the DATE and TIME
/// ```
///
/// The time part is optional so that DATE and DATE-TIME share one grammar.
pub(crate) fn value_date_or_date_time<'src, I, E>()
-> impl Parser<'src, I, (ValueDate, Option<(ValueTime, bool)>), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    value_date().then(just('T').ignore_then(value_time()).or_not())
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// utc-offset = time-numzone
///
/// time-numzone = ("+" / "-") time-hour time-minute [time-second]
/// ```
fn value_utc_offset<'src, I, E>() -> impl Parser<'src, I, UtcOffset, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ ('+' | '-') => c }
        .then(time_hour())
        .then(time_minute())
        .then(time_minute().or_not())
        .map(|(((sign, hour), minute), second)| UtcOffset {
            positive: !matches!(sign, '-'),
            hour,
            minute,
            second,
        })
}

fn time_hour<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_1().then(u8_0_9()).map(|(a, b)| 10 * a + b),
        just('2').ignore_then(u8_0_3()).map(|b| 20 + b),
    ))
}

fn time_minute<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    u8_0_5().then(u8_0_9()).map(|(a, b)| 10 * a + b)
}

fn time_second<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_5().then(u8_0_9()).map(|(a, b)| 10 * a + b),
        just('6').ignore_then(just('0').ignored().to(60)), // leap second
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i16, month: i8, day: i8) -> ValueDate {
        ValueDate { year, month, day }
    }

    #[test]
    fn parses_date() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.4
            ("19970714", date(1997, 7, 14)),
            // extra tests
            ("20240101", date(2024, 1, 1)),
            ("20000229", date(2000, 2, 29)), // leap year
            ("19000101", date(1900, 1, 1)),
        ];
        for (src, expected) in success_cases {
            let value = DateTime::parse(src, None).unwrap();
            assert_eq!(value, DateTime::Date { date: expected }, "Failed for {src}");
        }

        let fail_cases = [
            "20241301",  // invalid month
            "20240001",  // invalid month
            "abcd1234",  // invalid characters
            "2024011",   // invalid length
            "202401011", // invalid length
            "19970230",  // invalid date
            "20230229",  // not a leap year
        ];
        for src in fail_cases {
            assert!(DateTime::parse(src, None).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_date_time_modes() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.5
            ("19980118T230000",  None,                     DateTime::Floating { date: date(1998, 1, 18), time: ValueTime::new(23, 0, 0) }),
            ("19980119T070000Z", None,                     DateTime::Utc { date: date(1998, 1, 19), time: ValueTime::new(7, 0, 0) }),
            ("19980119T020000",  Some("America/New_York"), DateTime::Zoned { date: date(1998, 1, 19), time: ValueTime::new(2, 0, 0), tz_id: "America/New_York".to_string() }),
            ("19970630T235960Z", None,                     DateTime::Utc { date: date(1997, 6, 30), time: ValueTime::new(23, 59, 60) }),
            // extra tests
            ("20240101T120000",  Some("UTC"),              DateTime::Utc { date: date(2024, 1, 1), time: ValueTime::new(12, 0, 0) }),
            ("20240101T120000Z", Some("utc"),              DateTime::Utc { date: date(2024, 1, 1), time: ValueTime::new(12, 0, 0) }),
            ("20240101",         Some("Europe/Paris"),     DateTime::Date { date: date(2024, 1, 1) }),
        ];
        for (src, tz, expected) in success_cases {
            assert_eq!(DateTime::parse(src, tz).unwrap(), expected, "Failed for {src}");
        }

        let fail_cases = [
            ("19980119T230000-0800", None), // offset is not part of the grammar
            ("19970714 133000", None),      // missing 'T'
            ("19970714T250000", None),      // invalid hour
            ("19970714T126000", None),      // invalid minute
            ("19970714T123461", None),      // invalid second
            ("19970714T1330", None),        // truncated time
            ("1997", None),                 // too short
            ("", None),                     // empty
            ("19970714T133000Z", Some("Europe/Paris")),
        ];
        for (src, tz) in fail_cases {
            assert!(DateTime::parse(src, tz).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn short_input_is_a_parse_error() {
        let err = DateTime::parse("2024", None).unwrap_err();
        let Error::Parse(err) = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert_eq!(err.kind, Some(ValueKind::DateTime));
        assert_eq!(err.input, "2024");
    }

    #[test]
    fn parses_loose_forms() {
        let value = DateTime::parse_loose("2023-06-15T10:00:00", None).unwrap();
        assert_eq!(
            value,
            DateTime::Floating {
                date: date(2023, 6, 15),
                time: ValueTime::new(10, 0, 0)
            }
        );

        let value = DateTime::parse_loose("2023-06-15T10:00:00", Some("Europe/Oslo")).unwrap();
        assert_eq!(value.tz_id(), Some("Europe/Oslo"));

        let value = DateTime::parse_loose("2023-06-15T10:00:00+02:00", None).unwrap();
        assert_eq!(value.to_string(), "20230615T080000Z");

        let value = DateTime::parse_loose("2023-06-15T10:00:00Z", None).unwrap();
        assert_eq!(value.to_string(), "20230615T100000Z");

        let value = DateTime::parse_loose("2023-06-15", None).unwrap();
        assert_eq!(value, DateTime::Date { date: date(2023, 6, 15) });

        let value = DateTime::parse_loose("2023-06-15T10:00:00+02:00[Europe/Berlin]", None).unwrap();
        assert_eq!(value.tz_id(), Some("Europe/Berlin"));
        assert_eq!(value.to_string(), "20230615T100000");

        assert!(DateTime::parse_loose("next tuesday", None).is_err());
    }

    #[test]
    fn converts_native_values() {
        let value = DateTime::from_unix_seconds(0).unwrap();
        assert_eq!(value.to_string(), "19700101T000000Z");

        let value = DateTime::from(jiff::civil::date(2024, 2, 29));
        assert!(value.is_date_only());
        assert_eq!(value.to_string(), "20240229");

        let value = DateTime::from(jiff::civil::date(2024, 2, 29).at(8, 30, 15, 500));
        assert!(value.is_floating());
        assert_eq!(value.to_string(), "20240229T083015");

        assert!(DateTime::from_unix_seconds(i64::MAX).is_err());
    }

    #[test]
    fn formats_with_forced_modes() {
        let value = DateTime::parse("20230615T100000", Some("Europe/Berlin")).unwrap();
        assert_eq!(value.format(false, false), "20230615T100000");
        assert_eq!(value.format(false, true), "20230615T080000Z");
        assert_eq!(value.format(true, false), "20230615");

        // floating time is taken as UTC
        let value = DateTime::parse("20230615T100000", None).unwrap();
        assert_eq!(value.format(false, true), "20230615T100000Z");

        let value = DateTime::parse("20230615", None).unwrap();
        assert_eq!(value.format(false, true), "20230615T000000Z");

        // unknown zones keep the wall clock
        let value = DateTime::parse("20230615T100000", Some("Mars/Olympus")).unwrap();
        assert!(value.to_utc().is_err());
        assert_eq!(value.format(false, true), "20230615T100000Z");
    }

    #[test]
    fn compares_instants_across_modes() {
        let berlin = DateTime::parse("20230615T100000", Some("Europe/Berlin")).unwrap();
        let utc = DateTime::parse("20230615T090000Z", None).unwrap();
        assert_eq!(berlin.compare(&utc), Ordering::Less);

        let same = DateTime::parse("20230615T080000Z", None).unwrap();
        assert_eq!(berlin.compare(&same), Ordering::Equal);

        let day = DateTime::parse("20230615", None).unwrap();
        let morning = DateTime::parse("20230615T000001", None).unwrap();
        assert_eq!(day.compare(&morning), Ordering::Less);
    }

    #[test]
    fn utc_round_trip() {
        for src in ["19970714T173000Z", "20000101T000000Z", "20991231T235959Z"] {
            let value = DateTime::parse(src, None).unwrap();
            assert_eq!(DateTime::parse(&value.to_string(), None).unwrap(), value);
        }
    }

    #[test]
    fn parses_lists() {
        let values = DateTime::parse_list("19970714T133000,19970715T133000", Some("Europe/Paris"))
            .unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.tz_id() == Some("Europe/Paris")));

        assert!(DateTime::parse_list("19970714,bogus", None).is_err());
    }

    #[test]
    fn parses_utc_offset() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.14
            ("-0500",   UtcOffset { positive: false, hour: 5,  minute: 0,  second: None }),
            ("+0100",   UtcOffset { positive: true,  hour: 1,  minute: 0,  second: None }),
            // extra tests
            ("+0000",   UtcOffset { positive: true,  hour: 0,  minute: 0,  second: None }),
            ("-123456", UtcOffset { positive: false, hour: 12, minute: 34, second: Some(56) }),
        ];
        for (src, expected) in success_cases {
            let value = UtcOffset::parse(src).unwrap();
            assert_eq!(value, expected, "Failed for {src}");
            assert_eq!(value.to_string(), src);
        }
        assert_eq!(UtcOffset::parse("-0130").unwrap().seconds(), -5400);

        let fail_cases = [
            "0500",     // missing sign
            "+2400",    // invalid hour
            "-1260",    // invalid minute
            "+120",     // missing digit
            "+120000Z", // extra character
            "-0000",    // negative zero
            "",         // empty string
        ];
        for src in fail_cases {
            assert!(UtcOffset::parse(src).is_err(), "Parse {src} should fail");
        }
    }
}
