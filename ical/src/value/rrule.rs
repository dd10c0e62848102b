// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule value type as defined in RFC 5545 Section 3.3.10.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::ops::RangeInclusive;
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::error::{ConstraintViolation, Error, InvalidArgument};
use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY,
    KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT,
    KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::value::{DateTime, ValueKind, run_parser};

const RULE_PARTS: [&str; 14] = [
    KW_RRULE_FREQ,
    KW_RRULE_UNTIL,
    KW_RRULE_COUNT,
    KW_RRULE_INTERVAL,
    KW_RRULE_BYSECOND,
    KW_RRULE_BYMINUTE,
    KW_RRULE_BYHOUR,
    KW_RRULE_BYDAY,
    KW_RRULE_BYMONTHDAY,
    KW_RRULE_BYYEARDAY,
    KW_RRULE_BYWEEKNO,
    KW_RRULE_BYMONTH,
    KW_RRULE_BYSETPOS,
    KW_RRULE_WKST,
];

/// Recurrence rule of an RRULE or EXRULE property.
///
/// A rule is validated as a whole when it is built and never mutated part by
/// part afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    /// Frequency of recurrence
    pub freq: Frequency,
    /// Until date for recurrence
    pub until: Option<DateTime>,
    /// Number of occurrences
    pub count: Option<u32>,
    /// Interval between recurrences, at least 1
    pub interval: u32,
    /// Second specifier
    pub by_second: Vec<u8>,
    /// Minute specifier
    pub by_minute: Vec<u8>,
    /// Hour specifier
    pub by_hour: Vec<u8>,
    /// Day of week specifier
    pub by_day: Vec<WeekDayNum>,
    /// Day of month specifier
    pub by_month_day: Vec<i8>,
    /// Day of year specifier
    pub by_year_day: Vec<i16>,
    /// Week number specifier
    pub by_week_no: Vec<i8>,
    /// Month specifier
    pub by_month: Vec<u8>,
    /// Position in the set of occurrences
    pub by_set_pos: Vec<i16>,
    /// Start day of week, if given explicitly
    pub wkst: Option<WeekDay>,
}

/// Recurrence frequency
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Day of the week
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum WeekDay {
    #[strum(serialize = "SU")]
    Sunday,
    #[strum(serialize = "MO")]
    Monday,
    #[strum(serialize = "TU")]
    Tuesday,
    #[strum(serialize = "WE")]
    Wednesday,
    #[strum(serialize = "TH")]
    Thursday,
    #[strum(serialize = "FR")]
    Friday,
    #[strum(serialize = "SA")]
    Saturday,
}

/// Day of week with optional occurrence, e.g. `-1SU` or `MO`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDayNum {
    /// Day of the week
    pub day: WeekDay,
    /// Occurrence within the month or year, ±1..=53
    pub ordinal: Option<i8>,
}

impl Display for WeekDayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{n}{}", self.day),
            None => write!(f, "{}", self.day),
        }
    }
}

impl FromStr for WeekDayNum {
    type Err = &'static str;

    /// ```txt
    /// weekdaynum  = [[plus / minus] ordwk] weekday
    /// ordwk       = 1*2DIGIT       ;1 to 53
    /// ```
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let split = token.len().checked_sub(2).ok_or("missing weekday")?;
        if !token.is_char_boundary(split) {
            return Err("invalid weekday");
        }
        let (ordinal, day) = token.split_at(split);
        let day = WeekDay::from_str(day).map_err(|_| "invalid weekday")?;
        let ordinal = if ordinal.is_empty() {
            None
        } else {
            let n = signed_int(ordinal).ok_or("invalid ordinal")?;
            if !(1..=53).contains(&n.unsigned_abs()) || ordinal.trim_start_matches(['+', '-']).len() > 2 {
                return Err("ordinal must be within ±1..=53");
            }
            Some(i8::try_from(n).map_err(|_| "invalid ordinal")?)
        };
        Ok(Self { day, ordinal })
    }
}

impl RecurrenceRule {
    /// A rule with only a frequency set.
    #[must_use]
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            until: None,
            count: None,
            interval: 1,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            wkst: None,
        }
    }

    /// Parse the RECUR text form, rule parts may come in any order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not a `;` separated list of
    /// `NAME=VALUE` pairs, and the errors of [`RecurrenceRule::from_parts`].
    pub fn parse(raw: &str, dtstart: Option<&DateTime>) -> Result<Self, Error> {
        let parts = run_parser(
            ValueKind::Recur,
            raw,
            recur_parts::<'_, _, extra::Err<_>>(),
        )?;
        Self::from_parts(parts, dtstart)
    }

    /// Build a rule from `(name, value)` pairs, validating it against the
    /// owning component's DTSTART when one is known.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::UnknownRulePart`] / [`InvalidArgument::DuplicateRulePart`]
    /// - [`InvalidArgument::MissingFreq`] / [`InvalidArgument::InvalidRulePart`]
    /// - [`InvalidArgument::ConflictingTermination`] if UNTIL and COUNT are both set
    /// - [`ConstraintViolation::UntilTypeMismatch`] if UNTIL does not match DTSTART
    /// - [`InvalidArgument::InvalidByPart`] for out-of-range BYxxx values, or ones
    ///   FREQ does not allow
    /// - [`InvalidArgument::InvalidInterval`] if INTERVAL is not positive
    pub fn from_parts<K, V>(
        parts: impl IntoIterator<Item = (K, V)>,
        dtstart: Option<&DateTime>,
    ) -> Result<Self, Error>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut values: [Option<String>; RULE_PARTS.len()] = Default::default();
        for (key, value) in parts {
            let key = key.as_ref().trim().to_ascii_uppercase();
            let Some(i) = RULE_PARTS.iter().position(|a| *a == key) else {
                return Err(InvalidArgument::UnknownRulePart { part: key }.into());
            };
            if !seen.insert(i) {
                return Err(InvalidArgument::DuplicateRulePart { part: key }.into());
            }
            values[i] = Some(value.as_ref().trim().to_string());
        }
        let [
            freq,
            until,
            count,
            interval,
            by_second,
            by_minute,
            by_hour,
            by_day,
            by_month_day,
            by_year_day,
            by_week_no,
            by_month,
            by_set_pos,
            wkst,
        ] = values;

        let freq = freq.ok_or(InvalidArgument::MissingFreq)?;
        let freq = Frequency::from_str(&freq).map_err(|_| InvalidArgument::InvalidRulePart {
            part: KW_RRULE_FREQ,
            value: freq.clone(),
        })?;

        if until.is_some() && count.is_some() {
            return Err(InvalidArgument::ConflictingTermination.into());
        }

        let mut rule = Self::new(freq);

        if let Some(until) = until {
            let value = DateTime::parse(&until, None).map_err(|_| InvalidArgument::InvalidRulePart {
                part: KW_RRULE_UNTIL,
                value: until.clone(),
            })?;
            rule.until = Some(value);
            rule.check_until(dtstart)?;
        }

        if let Some(count) = count {
            rule.count = Some(
                positive_int(&count).ok_or_else(|| InvalidArgument::InvalidRulePart {
                    part: KW_RRULE_COUNT,
                    value: count.clone(),
                })?,
            );
        }

        rule.by_second = int_list(KW_RRULE_BYSECOND, by_second.as_deref(), 0..=60, false)?;
        rule.by_minute = int_list(KW_RRULE_BYMINUTE, by_minute.as_deref(), 0..=59, false)?;
        rule.by_hour = int_list(KW_RRULE_BYHOUR, by_hour.as_deref(), 0..=23, false)?;
        if let Some(raw) = by_day.as_deref() {
            rule.by_day = raw
                .split(',')
                .map(|token| {
                    token
                        .trim()
                        .parse::<WeekDayNum>()
                        .map_err(|reason| InvalidArgument::InvalidByPart {
                            part: KW_RRULE_BYDAY,
                            value: token.to_string(),
                            reason,
                        })
                })
                .collect::<Result<_, _>>()?;
        }
        rule.by_month_day = int_list(KW_RRULE_BYMONTHDAY, by_month_day.as_deref(), 1..=31, true)?;
        rule.by_year_day = int_list(KW_RRULE_BYYEARDAY, by_year_day.as_deref(), 1..=366, true)?;
        rule.by_week_no = int_list(KW_RRULE_BYWEEKNO, by_week_no.as_deref(), 1..=53, true)?;
        rule.by_month = int_list(KW_RRULE_BYMONTH, by_month.as_deref(), 1..=12, false)?;
        rule.by_set_pos = int_list(KW_RRULE_BYSETPOS, by_set_pos.as_deref(), 1..=366, true)?;
        if !rule.by_set_pos.is_empty() && !rule.has_by_parts_besides_set_pos() {
            return Err(InvalidArgument::InvalidByPart {
                part: KW_RRULE_BYSETPOS,
                value: by_set_pos.unwrap_or_default(),
                reason: "requires another BYxxx rule part",
            }
            .into());
        }
        rule.check_freq_by_parts(
            by_week_no.as_deref(),
            by_year_day.as_deref(),
            by_month_day.as_deref(),
            by_day.as_deref(),
        )?;

        if let Some(interval) = interval {
            rule.interval = positive_int(&interval)
                .ok_or_else(|| InvalidArgument::InvalidInterval { value: interval })?;
        }

        if let Some(wkst) = wkst {
            rule.wkst = Some(WeekDay::from_str(&wkst).map_err(|_| {
                InvalidArgument::InvalidRulePart {
                    part: KW_RRULE_WKST,
                    value: wkst.clone(),
                }
            })?);
        }

        Ok(rule)
    }

    /// Check that UNTIL has the same value type as DTSTART.
    ///
    /// A date DTSTART needs a date UNTIL, a UTC or zoned DTSTART needs a UTC
    /// UNTIL and a floating DTSTART needs a floating UNTIL.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintViolation::UntilTypeMismatch`] on mismatch.
    pub fn check_until(&self, dtstart: Option<&DateTime>) -> Result<(), Error> {
        let (Some(until), Some(dtstart)) = (&self.until, dtstart) else {
            return Ok(());
        };

        let reason = match dtstart {
            DateTime::Date { .. } if !until.is_date_only() => Some("DTSTART is a date"),
            DateTime::Date { .. } => None,
            _ if until.is_date_only() => Some("DTSTART is a date-time"),
            DateTime::Utc { .. } | DateTime::Zoned { .. } if !until.is_utc() => {
                Some("UNTIL must be in UTC when DTSTART is in UTC or has a TZID")
            }
            DateTime::Floating { .. } if !until.is_floating() => {
                Some("UNTIL must be floating when DTSTART is floating")
            }
            _ => None,
        };

        match reason {
            Some(reason) => Err(ConstraintViolation::UntilTypeMismatch {
                until: until.to_string(),
                reason,
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Week start, Monday unless given.
    #[must_use]
    pub fn week_start(&self) -> WeekDay {
        self.wkst.unwrap_or(WeekDay::Monday)
    }

    fn has_by_parts_besides_set_pos(&self) -> bool {
        !(self.by_second.is_empty()
            && self.by_minute.is_empty()
            && self.by_hour.is_empty()
            && self.by_day.is_empty()
            && self.by_month_day.is_empty()
            && self.by_year_day.is_empty()
            && self.by_week_no.is_empty()
            && self.by_month.is_empty())
    }

    /// Reject BYxxx rule parts that have no meaning under the rule's FREQ.
    fn check_freq_by_parts(
        &self,
        by_week_no: Option<&str>,
        by_year_day: Option<&str>,
        by_month_day: Option<&str>,
        by_day: Option<&str>,
    ) -> Result<(), Error> {
        if !self.by_week_no.is_empty() && self.freq != Frequency::Yearly {
            return Err(misplaced(KW_RRULE_BYWEEKNO, by_week_no, "only allowed with FREQ=YEARLY"));
        }
        if !self.by_year_day.is_empty()
            && matches!(self.freq, Frequency::Daily | Frequency::Weekly | Frequency::Monthly)
        {
            return Err(misplaced(
                KW_RRULE_BYYEARDAY,
                by_year_day,
                "not allowed with FREQ=DAILY, WEEKLY or MONTHLY",
            ));
        }
        if !self.by_month_day.is_empty() && self.freq == Frequency::Weekly {
            return Err(misplaced(KW_RRULE_BYMONTHDAY, by_month_day, "not allowed with FREQ=WEEKLY"));
        }
        let ordinal_allowed = match self.freq {
            Frequency::Monthly => true,
            Frequency::Yearly => self.by_week_no.is_empty(),
            _ => false,
        };
        if !ordinal_allowed && self.by_day.iter().any(|d| d.ordinal.is_some()) {
            return Err(misplaced(
                KW_RRULE_BYDAY,
                by_day,
                "ordinal weekdays need FREQ=MONTHLY, or FREQ=YEARLY without BYWEEKNO",
            ));
        }
        Ok(())
    }

    /// Format the rule with its parts in canonical order.
    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: Display>(f: &mut fmt::Formatter<'_>, name: &str, values: &[T]) -> fmt::Result {
            if values.is_empty() {
                return Ok(());
            }
            write!(f, ";{name}=")?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{v}")?;
            }
            Ok(())
        }

        write!(f, "{KW_RRULE_FREQ}={}", self.freq)?;
        if let Some(until) = &self.until {
            write!(f, ";{KW_RRULE_UNTIL}={until}")?;
        } else if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }
        if self.interval != 1 {
            write!(f, ";{KW_RRULE_INTERVAL}={}", self.interval)?;
        }
        list(f, KW_RRULE_BYSECOND, &self.by_second)?;
        list(f, KW_RRULE_BYMINUTE, &self.by_minute)?;
        list(f, KW_RRULE_BYHOUR, &self.by_hour)?;
        list(f, KW_RRULE_BYDAY, &self.by_day)?;
        list(f, KW_RRULE_BYMONTHDAY, &self.by_month_day)?;
        list(f, KW_RRULE_BYYEARDAY, &self.by_year_day)?;
        list(f, KW_RRULE_BYWEEKNO, &self.by_week_no)?;
        list(f, KW_RRULE_BYMONTH, &self.by_month)?;
        list(f, KW_RRULE_BYSETPOS, &self.by_set_pos)?;
        if let Some(wkst) = self.wkst {
            write!(f, ";{KW_RRULE_WKST}={wkst}")?;
        }
        Ok(())
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// recur           = recur-rule-part *( ";" recur-rule-part )
///                 ;
///                 ; The rule parts are not ordered in any
///                 ; particular sequence.
/// recur-rule-part = name "=" value
/// ```
///
/// Names and values are split here; their meaning is checked by
/// [`RecurrenceRule::from_parts`].
fn recur_parts<'src, I, E>() -> impl Parser<'src, I, Vec<(String, String)>, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan> + chumsky::input::ValueInput<'src>,
    E: ParserExtra<'src, I>,
{
    let name = none_of("=;").repeated().at_least(1).collect::<String>();
    let value = none_of(";").repeated().collect::<String>();
    name.then_ignore(just('='))
        .then(value)
        .separated_by(just(';'))
        .at_least(1)
        .allow_trailing()
        .collect()
}

/// Parse `[+/-]1*DIGIT`.
fn signed_int(token: &str) -> Option<i32> {
    let (negative, digits) = match (token.strip_prefix('-'), token.strip_prefix('+')) {
        (Some(digits), _) => (true, digits),
        (None, Some(digits)) => (false, digits),
        (None, None) => (false, token),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = lexical::parse::<i32, _>(digits).ok()?;
    Some(if negative { -value } else { value })
}

fn positive_int(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical::parse::<u32, _>(token).ok().filter(|v| *v >= 1)
}

/// Parse a COMMA-separated BYxxx list. Signed lists accept `±range`,
/// unsigned lists accept `range` only.
fn int_list<T: TryFrom<i32>>(
    part: &'static str,
    raw: Option<&str>,
    range: RangeInclusive<u32>,
    signed: bool,
) -> Result<Vec<T>, InvalidArgument> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(|token| {
            let token = token.trim();
            let invalid = |reason| InvalidArgument::InvalidByPart {
                part,
                value: token.to_string(),
                reason,
            };
            let value = signed_int(token).ok_or_else(|| invalid("not an integer"))?;
            if !signed && value < 0 {
                return Err(invalid("must not be negative"));
            }
            if !range.contains(&value.unsigned_abs()) {
                return Err(invalid("out of range"));
            }
            T::try_from(value).map_err(|_| invalid("out of range"))
        })
        .collect()
}

fn misplaced(part: &'static str, raw: Option<&str>, reason: &'static str) -> Error {
    InvalidArgument::InvalidByPart {
        part,
        value: raw.unwrap_or_default().to_string(),
        reason,
    }
    .into()
}
