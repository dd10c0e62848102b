// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration value type as defined in RFC 5545 Section 3.3.6.

use std::fmt::{self, Display, Write};

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::error::{Error, InvalidArgument};
use crate::value::miscellaneous::{ValueExpected, is_positive, u32_digits};
use crate::value::{ValueKind, run_parser};

const SECONDS_PER_DAY: i64 = 86_400;

/// How the sign of a duration is written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SignPolicy {
    /// Leading `-` for negative durations.
    #[default]
    Signed,

    /// Never write a sign, for properties that only accept positive values.
    AlwaysPositive,
}

/// Signed interval of weeks, days, hours, minutes and seconds.
///
/// Durations never carry months or years, so their length in seconds is
/// well defined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    /// Whether the duration points backwards in time
    pub negative: bool,
    /// Week Duration
    pub weeks: u32,
    /// Day Duration
    pub days: u32,
    /// Hour Duration
    pub hours: u32,
    /// Minute Duration
    pub minutes: u32,
    /// Second Duration
    pub seconds: u32,
}

impl Duration {
    /// Parse the RFC 5545 text form, e.g. `P1W`, `-PT30M`, `P15DT5H0M20S`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the input does not match the grammar.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let value = run_parser(
            ValueKind::Duration,
            raw,
            value_duration::<'_, _, extra::Err<_>>(),
        )?;
        Ok(value)
    }

    /// Build a positive duration from numeric components.
    ///
    /// Weeks given together with any day or time component are folded into
    /// days, since RFC 5545 cannot express both at once.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::EmptyDuration`] if every component is zero,
    /// use [`Duration::zero`] for an explicit zero-length duration.
    pub fn from_components(
        weeks: u32,
        days: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<Self, Error> {
        if weeks == 0 && days == 0 && hours == 0 && minutes == 0 && seconds == 0 {
            return Err(InvalidArgument::EmptyDuration.into());
        }

        let value = Self {
            negative: false,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        };
        Ok(value.normalized())
    }

    /// The canonical zero-length duration, `PT0S`.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Whether every component is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.weeks == 0 && self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// The same duration pointing the other way.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self {
            negative: !self.negative && !self.is_zero(),
            ..self
        }
    }

    /// The same magnitude without a sign.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self {
            negative: false,
            ..self
        }
    }

    /// Signed length in seconds, a week being seven days.
    #[must_use]
    pub fn to_seconds(&self) -> i64 {
        let days = i64::from(self.weeks) * 7 + i64::from(self.days);
        let secs = days * SECONDS_PER_DAY
            + i64::from(self.hours) * 3600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);
        if self.negative { -secs } else { secs }
    }

    /// Convert to an absolute `jiff` duration.
    #[must_use]
    pub fn to_signed_duration(&self) -> jiff::SignedDuration {
        jiff::SignedDuration::from_secs(self.to_seconds())
    }

    /// Format the duration; `Display` uses [`SignPolicy::Signed`].
    ///
    /// The week form is used only when no other component is set, and a
    /// zero duration is written `PT0S`.
    #[must_use]
    pub fn format(&self, policy: SignPolicy) -> String {
        Formatted {
            value: self.normalized(),
            policy,
        }
        .to_string()
    }

    fn normalized(self) -> Self {
        if self.weeks > 0 && (self.days > 0 || self.hours > 0 || self.minutes > 0 || self.seconds > 0)
        {
            tracing::trace!(weeks = self.weeks, "folding weeks into days");
            Self {
                weeks: 0,
                days: self.days.saturating_add(self.weeks.saturating_mul(7)),
                ..self
            }
        } else {
            self
        }
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Formatted {
            value: self.normalized(),
            policy: SignPolicy::Signed,
        }
        .fmt(f)
    }
}

struct Formatted {
    value: Duration,
    policy: SignPolicy,
}

impl Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.value;
        if d.negative && self.policy == SignPolicy::Signed && !d.is_zero() {
            f.write_char('-')?;
        }
        f.write_char('P')?;

        if d.is_zero() {
            return f.write_str("T0S");
        }
        if d.weeks > 0 {
            return write!(f, "{}W", d.weeks);
        }

        if d.days > 0 {
            write!(f, "{}D", d.days)?;
        }
        if d.hours > 0 || d.minutes > 0 || d.seconds > 0 {
            f.write_char('T')?;
            if d.hours > 0 {
                write!(f, "{}H", d.hours)?;
            }
            // dur-hour may only continue with dur-minute
            if d.minutes > 0 || (d.hours > 0 && d.seconds > 0) {
                write!(f, "{}M", d.minutes)?;
            }
            if d.seconds > 0 {
                write!(f, "{}S", d.seconds)?;
            }
        }
        Ok(())
    }
}

impl TryFrom<jiff::Span> for Duration {
    type Error = Error;

    /// Sub-second units are dropped; years and months are rejected.
    fn try_from(span: jiff::Span) -> Result<Self, Self::Error> {
        if span.get_years() != 0 {
            return Err(InvalidArgument::CalendarUnit { unit: "years" }.into());
        }
        if span.get_months() != 0 {
            return Err(InvalidArgument::CalendarUnit { unit: "months" }.into());
        }

        let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
        let value = Self::from_components(
            span.get_weeks().unsigned_abs(),
            span.get_days().unsigned_abs(),
            span.get_hours().unsigned_abs(),
            clamp(span.get_minutes().unsigned_abs()),
            clamp(span.get_seconds().unsigned_abs()),
        )?;

        Ok(if span.is_negative() {
            value.negated()
        } else {
            value
        })
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// dur-value  = (["+"] / "-") "P" (dur-date / dur-time / dur-week)
///
/// dur-date   = dur-day [dur-time]
/// dur-time   = "T" (dur-hour / dur-minute / dur-second)
/// dur-week   = 1*DIGIT "W"
/// dur-hour   = 1*DIGIT "H" [dur-minute]
/// dur-minute = 1*DIGIT "M" [dur-second]
/// dur-second = 1*DIGIT "S"
/// dur-day    = 1*DIGIT "D"
/// ```
pub(crate) fn value_duration<'src, I, E>() -> impl Parser<'src, I, Duration, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    // case-sensitive
    let date = unit('D')
        .then(dur_time().or_not())
        .map(|(days, time)| (0, days, time.unwrap_or((0, 0, 0))));
    let time = dur_time().map(|time| (0, 0, time));
    let week = unit('W').map(|weeks| (weeks, 0, (0, 0, 0)));

    is_positive()
        .then_ignore(just('P'))
        .then(choice((date, time, week)))
        .map(
            |(positive, (weeks, days, (hours, minutes, seconds)))| {
                let value = Duration {
                    negative: false,
                    weeks,
                    days,
                    hours,
                    minutes,
                    seconds,
                };
                // zero has no sign
                if positive { value } else { value.negated() }
            },
        )
}

/// `"T" (dur-hour / dur-minute / dur-second)` as (hours, minutes, seconds).
fn dur_time<'src, I, E>() -> impl Parser<'src, I, (u32, u32, u32), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    // dur-second = 1*DIGIT "S"
    let second_only = unit('S').map(|s| (0, 0, s));

    // dur-minute = 1*DIGIT "M" [dur-second]
    let minute_with_second = unit('M')
        .then(unit('S').or_not())
        .map(|(m, s)| (0, m, s.unwrap_or(0)));

    // dur-hour = 1*DIGIT "H" [dur-minute]
    let hour_with_minute = unit('H')
        .then(unit('M').then(unit('S').or_not()).or_not())
        .map(|(h, ms)| match ms {
            Some((m, s)) => (h, m, s.unwrap_or(0)),
            None => (h, 0, 0),
        });

    just('T').ignore_then(choice((hour_with_minute, minute_with_second, second_only)))
}

fn unit<'src, I, E>(designator: char) -> impl Parser<'src, I, u32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    u32_digits().then_ignore(just(designator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dur(negative: bool, weeks: u32, days: u32, hours: u32, minutes: u32, seconds: u32) -> Duration {
        Duration {
            negative,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    #[test]
    fn parses_duration() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.6
            ("P15DT5H0M20S", dur(false, 0, 15, 5, 0, 20)),
            ("P7W",          dur(false, 7, 0, 0, 0, 0)),
            // extra tests
            ("P1W",          dur(false, 1, 0, 0, 0, 0)),
            ("+P3W",         dur(false, 3, 0, 0, 0, 0)),
            ("-P1W",         dur(true,  1, 0, 0, 0, 0)),
            ("+P3DT4H5M6S",  dur(false, 0, 3, 4, 5, 6)),
            ("-PT10H11M12S", dur(true,  0, 0, 10, 11, 12)),
            ("PT15M",        dur(false, 0, 0, 0, 15, 0)),
            ("PT30S",        dur(false, 0, 0, 0, 0, 30)),
            ("PT1H30M",      dur(false, 0, 0, 1, 30, 0)),
            ("-PT30M",       dur(true,  0, 0, 0, 30, 0)),
            ("P2D",          dur(false, 0, 2, 0, 0, 0)),
            ("PT0S",         dur(false, 0, 0, 0, 0, 0)),
            ("-PT0S",        dur(false, 0, 0, 0, 0, 0)),
            ("-P0D",         dur(false, 0, 0, 0, 0, 0)),
        ];
        for (src, expected) in success_cases {
            assert_eq!(Duration::parse(src).unwrap(), expected, "Failed to parse: {src}");
        }

        let fail_cases = [
            "P",           // missing duration value
            "PT",          // missing time value
            "P3X",         // invalid designator
            "P-3W",        // invalid negative sign position
            "P3DT4H5M6",   // missing 'S' designator
            "3W",          // missing 'P' designator
            "P10H11M12S3", // missing 'T' designator
            "PT5S1M",      // units out of order
            "p1w",         // case-sensitive
            "P1W2D",       // weeks cannot be combined
            "",            // empty
        ];
        for src in fail_cases {
            assert!(Duration::parse(src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn formats_canonical_forms() {
        #[rustfmt::skip]
        let cases = [
            (dur(false, 1, 0, 0, 0, 0),  "P1W"),
            (dur(true,  0, 0, 0, 30, 0), "-PT30M"),
            (dur(false, 0, 15, 5, 0, 20), "P15DT5H0M20S"),
            (dur(false, 0, 1, 0, 0, 0),  "P1D"),
            (dur(false, 0, 0, 2, 0, 0),  "PT2H"),
            (dur(false, 0, 0, 0, 0, 0),  "PT0S"),
            (dur(true,  0, 0, 0, 0, 0),  "PT0S"),
            (dur(false, 1, 1, 0, 0, 0),  "P8D"),
        ];
        for (value, expected) in cases {
            assert_eq!(value.to_string(), expected);
        }

        let value = dur(true, 0, 0, 0, 30, 0);
        assert_eq!(value.format(SignPolicy::AlwaysPositive), "PT30M");
    }

    #[test]
    fn round_trips() {
        for src in ["P1W", "-PT30M", "P15DT5H20S", "PT1H0M1S", "-P2DT3M", "PT0S", "-PT0S", "-P0W"] {
            let value = Duration::parse(src).unwrap();
            assert_eq!(Duration::parse(&value.to_string()).unwrap(), value, "{src}");
        }
    }

    #[test]
    fn builds_from_components() {
        assert_eq!(
            Duration::from_components(0, 0, 0, 0, 0),
            Err(Error::InvalidArgument(InvalidArgument::EmptyDuration))
        );

        let value = Duration::from_components(2, 0, 0, 0, 0).unwrap();
        assert_eq!(value.to_string(), "P2W");

        let value = Duration::from_components(1, 2, 3, 0, 0).unwrap();
        assert_eq!(value, dur(false, 0, 9, 3, 0, 0));
        assert_eq!(value.to_string(), "P9DT3H");

        assert_eq!(Duration::zero().to_string(), "PT0S");
    }

    #[test]
    fn converts_spans() {
        let value = Duration::try_from(jiff::Span::new().hours(-1).minutes(-30)).unwrap();
        assert_eq!(value.to_string(), "-PT1H30M");

        let value = Duration::try_from(jiff::Span::new().weeks(2)).unwrap();
        assert_eq!(value.to_string(), "P2W");

        assert_eq!(
            Duration::try_from(jiff::Span::new().months(1)),
            Err(Error::InvalidArgument(InvalidArgument::CalendarUnit {
                unit: "months"
            }))
        );
        assert!(Duration::try_from(jiff::Span::new().years(1)).is_err());
        assert!(Duration::try_from(jiff::Span::new()).is_err());
    }

    #[test]
    fn measures_seconds() {
        assert_eq!(Duration::parse("P1W").unwrap().to_seconds(), 604_800);
        assert_eq!(Duration::parse("-PT30M").unwrap().to_seconds(), -1800);
        assert_eq!(Duration::parse("P1DT1S").unwrap().to_seconds(), 86_401);
        assert_eq!(
            Duration::parse("-PT1M").unwrap().to_signed_duration(),
            jiff::SignedDuration::from_secs(-60)
        );
        assert_eq!(Duration::parse("-PT1M").unwrap().abs().to_seconds(), 60);
    }
}
