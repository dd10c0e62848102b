// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Inputs accepted by the property setters.

use crate::property::{PropertyValue, Related};
use crate::value::{DateTime, Duration, Period, RecurrenceRule};

/// Loosely typed input for a property setter.
///
/// The codec of the target property decides how each input is interpreted,
/// e.g. a [`PropertyInput::Text`] given to DTSTART is parsed as a date or
/// date-time.
#[derive(Debug, Clone)]
pub enum PropertyInput {
    /// No value, only accepted when empty properties are allowed
    Empty,

    /// Plain, unescaped text
    Text(String),

    /// Several plain text values
    TextList(Vec<String>),

    /// Value already in wire form, escapes intact
    Encoded(String),

    /// Integer
    Integer(i64),

    /// Latitude and longitude
    Geo(f64, f64),

    /// Calendar date
    Date(jiff::civil::Date),

    /// Civil date-time, floating unless a `TZID` applies
    CivilDateTime(jiff::civil::DateTime),

    /// Instant, stored as UTC
    Timestamp(jiff::Timestamp),

    /// Date-time in a time zone
    Zoned(jiff::Zoned),

    /// Calendar span, converted to a duration
    Span(jiff::Span),

    /// Seconds since the Unix epoch
    UnixSeconds(i64),

    /// Date or date-time of this crate
    DateTime(DateTime),

    /// Several dates or date-times
    DateTimes(Vec<DateTime>),

    /// Duration of this crate
    Duration(Duration),

    /// Periods
    Periods(Vec<Period>),

    /// `NAME=VALUE` recurrence rule parts
    RecurParts(Vec<(String, String)>),

    /// Relative trigger with explicit direction and anchor
    Trigger {
        /// Offset; its sign only counts if `before` is not given
        duration: Duration,
        /// Whether the alarm fires before the anchor
        before: Option<bool>,
        /// Anchor, overriding the `RELATED` parameter
        related: Option<Related>,
    },

    /// Fully typed value
    Value(PropertyValue),
}

impl PropertyInput {
    /// Short name of the variant, used in diagnostics.
    pub(crate) const fn variant_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) | Self::Encoded(_) => "text",
            Self::TextList(_) => "text list",
            Self::Integer(_) => "integer",
            Self::Geo(..) => "geo",
            Self::Date(_) => "date",
            Self::CivilDateTime(_) | Self::DateTime(_) => "date-time",
            Self::Timestamp(_) => "timestamp",
            Self::Zoned(_) => "zoned date-time",
            Self::Span(_) => "span",
            Self::UnixSeconds(_) => "Unix timestamp",
            Self::DateTimes(_) => "date-time list",
            Self::Duration(_) => "duration",
            Self::Periods(_) => "period list",
            Self::RecurParts(_) => "recurrence rule parts",
            Self::Trigger { .. } => "trigger",
            Self::Value(v) => v.variant_name(),
        }
    }
}

impl From<&str> for PropertyInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for PropertyInput {
    fn from(values: Vec<String>) -> Self {
        Self::TextList(values)
    }
}

impl From<Vec<&str>> for PropertyInput {
    fn from(values: Vec<&str>) -> Self {
        Self::TextList(values.into_iter().map(str::to_string).collect())
    }
}

impl From<i64> for PropertyInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for PropertyInput {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for PropertyInput {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<(f64, f64)> for PropertyInput {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::Geo(latitude, longitude)
    }
}

impl From<jiff::civil::Date> for PropertyInput {
    fn from(value: jiff::civil::Date) -> Self {
        Self::Date(value)
    }
}

impl From<jiff::civil::DateTime> for PropertyInput {
    fn from(value: jiff::civil::DateTime) -> Self {
        Self::CivilDateTime(value)
    }
}

impl From<jiff::Timestamp> for PropertyInput {
    fn from(value: jiff::Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<jiff::Zoned> for PropertyInput {
    fn from(value: jiff::Zoned) -> Self {
        Self::Zoned(value)
    }
}

impl From<jiff::Span> for PropertyInput {
    fn from(value: jiff::Span) -> Self {
        Self::Span(value)
    }
}

impl From<DateTime> for PropertyInput {
    fn from(value: DateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<DateTime>> for PropertyInput {
    fn from(values: Vec<DateTime>) -> Self {
        Self::DateTimes(values)
    }
}

impl From<Duration> for PropertyInput {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl From<Period> for PropertyInput {
    fn from(value: Period) -> Self {
        Self::Periods(vec![value])
    }
}

impl From<Vec<Period>> for PropertyInput {
    fn from(values: Vec<Period>) -> Self {
        Self::Periods(values)
    }
}

impl From<RecurrenceRule> for PropertyInput {
    fn from(rule: RecurrenceRule) -> Self {
        Self::Value(PropertyValue::Recur(rule))
    }
}

impl From<PropertyValue> for PropertyInput {
    fn from(value: PropertyValue) -> Self {
        Self::Value(value)
    }
}
