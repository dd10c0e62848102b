// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Period value type as defined in RFC 5545 Section 3.3.9.
//!
//! ```txt
//! period     = period-explicit / period-start
//!
//! period-explicit = date-time "/" date-time
//! period-start    = date-time "/" dur-value
//! ```

use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::error::{Error, InvalidArgument, ParseError};
use crate::value::{DateTime, Duration, SignPolicy, ValueKind};

/// Period of time, a start date-time with either an end or a duration.
///
/// Both date-times are stored in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    start: DateTime,
    end: PeriodEnd,
}

/// Second half of a [`Period`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeriodEnd {
    /// `date-time "/" date-time`
    Explicit(DateTime),

    /// `date-time "/" dur-value`
    Duration(Duration),
}

impl Period {
    /// Build a period, normalizing both date-times to UTC.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::PeriodStartIsDate`] if either date-time is
    ///   date-only
    /// - [`InvalidArgument::PeriodEndBeforeStart`] if an explicit end lies
    ///   before the start
    /// - [`InvalidArgument::NegativeDuration`] for a negative duration
    /// - [`InvalidArgument::UnknownTimeZone`] if a `TZID` cannot be resolved
    pub fn new(start: DateTime, end: PeriodEnd) -> Result<Self, Error> {
        if start.is_date_only() {
            return Err(InvalidArgument::PeriodStartIsDate {
                value: start.to_string(),
            }
            .into());
        }
        let start = start.to_utc()?;

        let end = match end {
            PeriodEnd::Explicit(end) => {
                if end.is_date_only() {
                    return Err(InvalidArgument::PeriodStartIsDate {
                        value: end.to_string(),
                    }
                    .into());
                }
                let end = end.to_utc()?;
                if end.compare(&start) == Ordering::Less {
                    return Err(InvalidArgument::PeriodEndBeforeStart {
                        start: start.to_string(),
                        end: end.to_string(),
                    }
                    .into());
                }
                PeriodEnd::Explicit(end)
            }
            PeriodEnd::Duration(duration) if duration.negative && !duration.is_zero() => {
                return Err(InvalidArgument::NegativeDuration {
                    property: ValueKind::Period.to_string(),
                }
                .into());
            }
            PeriodEnd::Duration(duration) => PeriodEnd::Duration(duration),
        };

        Ok(Self { start, end })
    }

    /// Start date-time, in UTC and never date-only.
    #[must_use]
    pub fn start(&self) -> &DateTime {
        &self.start
    }

    /// End of the period in the form it was supplied.
    #[must_use]
    pub fn end(&self) -> &PeriodEnd {
        &self.end
    }

    /// Parse a period from its two halves.
    ///
    /// The second half is tried as a date-time first and then as a duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the start is not a date-time or the second
    /// half is neither form, and the errors of [`Period::new`].
    pub fn parse(start_raw: &str, end_raw: &str, tz_id: Option<&str>) -> Result<Self, Error> {
        let start = DateTime::parse(start_raw, tz_id)?;
        if start.is_date_only() {
            return Err(InvalidArgument::PeriodStartIsDate {
                value: start_raw.to_string(),
            }
            .into());
        }

        let end = match DateTime::parse(end_raw, tz_id) {
            Ok(end) if !end.is_date_only() => PeriodEnd::Explicit(end),
            Ok(_) | Err(_) => match Duration::parse(end_raw) {
                Ok(duration) => PeriodEnd::Duration(duration),
                Err(_) => {
                    return Err(ParseError::new(
                        ValueKind::Period,
                        format!("{start_raw}/{end_raw}"),
                        "end is neither a date-time nor a duration",
                    )
                    .into());
                }
            },
        };

        Self::new(start, end)
    }

    /// Parse `start "/" (end / duration)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the separator is missing, otherwise see
    /// [`Period::parse`].
    pub fn parse_str(raw: &str, tz_id: Option<&str>) -> Result<Self, Error> {
        let Some((start, end)) = raw.split_once('/') else {
            return Err(ParseError::new(ValueKind::Period, raw, "missing '/' separator").into());
        };
        Self::parse(start, end, tz_id)
    }

    /// Parse a COMMA-separated list of periods.
    ///
    /// # Errors
    ///
    /// Returns the first element that fails to parse.
    pub fn parse_list(raw: &str, tz_id: Option<&str>) -> Result<Vec<Self>, Error> {
        raw.split(',').map(|a| Self::parse_str(a, tz_id)).collect()
    }

    /// End instant, computed from the duration if needed.
    ///
    /// Returns `None` if the end falls outside the supported range.
    #[must_use]
    pub fn end_instant(&self) -> Option<DateTime> {
        match &self.end {
            PeriodEnd::Explicit(end) => Some(end.clone()),
            PeriodEnd::Duration(duration) => {
                let end = self
                    .start
                    .civil()
                    .checked_add(duration.to_signed_duration())
                    .ok()?;
                Some(DateTime::Utc {
                    date: end.date().into(),
                    time: end.time().into(),
                })
            }
        }
    }

    /// Order by start instant.
    #[must_use]
    pub fn compare_by_start(&self, other: &Self) -> Ordering {
        self.start.compare(&other.start)
    }

    /// Stable ascending sort by start instant.
    pub fn sort_by_start(periods: &mut [Self]) {
        periods.sort_by(Self::compare_by_start);
    }

    /// Format as `start/end` or `start/duration` in UTC.
    #[must_use]
    pub fn format(&self) -> String {
        let start = self.start.format(false, true);
        match &self.end {
            PeriodEnd::Explicit(end) => format!("{start}/{}", end.format(false, true)),
            PeriodEnd::Duration(duration) => {
                format!("{start}/{}", duration.format(SignPolicy::AlwaysPositive))
            }
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
