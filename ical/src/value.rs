// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value type parsing module for iCalendar property values.
//!
//! This module handles the parsing, validation and formatting of the
//! iCalendar value types as defined in RFC 5545 Section 3.3 that carry
//! structure: DATE / DATE-TIME, DURATION, PERIOD, RECUR and UTC-OFFSET.

mod datetime;
mod duration;
mod miscellaneous;
mod period;
mod rrule;

pub use datetime::{DateTime, UtcOffset, ValueDate, ValueTime};
pub use duration::{Duration, SignPolicy};
pub use period::{Period, PeriodEnd};
pub use rrule::{Frequency, RecurrenceRule, WeekDay, WeekDayNum};

use chumsky::prelude::*;

use crate::error::ParseError;

/// Value data types of RFC 5545 Section 3.3, named as in the `VALUE`
/// parameter.
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
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum ValueKind {
    #[strum(serialize = "BINARY")]
    Binary,
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[strum(serialize = "CAL-ADDRESS")]
    CalAddress,
    #[strum(serialize = "DATE")]
    Date,
    #[strum(serialize = "DATE-TIME")]
    DateTime,
    #[strum(serialize = "DURATION")]
    Duration,
    #[strum(serialize = "FLOAT")]
    Float,
    #[strum(serialize = "INTEGER")]
    Integer,
    #[strum(serialize = "PERIOD")]
    Period,
    #[strum(serialize = "RECUR")]
    Recur,
    #[strum(serialize = "TEXT")]
    Text,
    #[strum(serialize = "TIME")]
    Time,
    #[strum(serialize = "URI")]
    Uri,
    #[strum(serialize = "UTC-OFFSET")]
    UtcOffset,
}

/// Run a value grammar over the whole input, converting chumsky diagnostics
/// into a [`ParseError`] for the given value kind.
pub(crate) fn run_parser<'src, O>(
    kind: ValueKind,
    src: &'src str,
    parser: impl Parser<'src, &'src str, O, extra::Err<Rich<'src, char>>>,
) -> Result<O, ParseError> {
    parser.parse(src).into_result().map_err(|errs| ParseError {
        kind: Some(kind),
        input: src.to_string(),
        reasons: errs.into_iter().map(|e| e.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_names() {
        assert_eq!(ValueKind::DateTime.as_ref(), "DATE-TIME");
        assert_eq!(ValueKind::UtcOffset.to_string(), "UTC-OFFSET");
        assert_eq!("date-time".parse::<ValueKind>(), Ok(ValueKind::DateTime));
        assert_eq!("PERIOD".parse::<ValueKind>(), Ok(ValueKind::Period));
        assert!("DATETIME".parse::<ValueKind>().is_err());
    }
}
