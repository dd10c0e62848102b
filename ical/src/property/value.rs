// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Normalized property values.

use crate::value::{DateTime, Duration, Period, RecurrenceRule, UtcOffset, ValueKind};

/// A validated, normalized property value.
///
/// Values are produced by the codec for a specific [`PropertyKind`] and
/// encoded back to wire form by it.
///
/// [`PropertyKind`]: crate::property::PropertyKind
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Unescaped TEXT
    Text(String),

    /// Unescaped TEXT list, e.g. CATEGORIES
    TextList(Vec<String>),

    /// INTEGER
    Integer(i64),

    /// GEO position in degrees
    Geo {
        /// Latitude, within ±90
        latitude: f64,
        /// Longitude, within ±180
        longitude: f64,
    },

    /// URI
    Uri(String),

    /// CAL-ADDRESS
    CalAddress(String),

    /// DATE or DATE-TIME
    DateTime(DateTime),

    /// DATE or DATE-TIME list, e.g. EXDATE
    DateTimes(Vec<DateTime>),

    /// PERIOD list, e.g. FREEBUSY
    Periods(Vec<Period>),

    /// DURATION
    Duration(Duration),

    /// Alarm trigger
    Trigger(Trigger),

    /// RECUR
    Recur(RecurrenceRule),

    /// UTC-OFFSET
    UtcOffset(UtcOffset),

    /// REQUEST-STATUS
    RequestStatus(RequestStatus),

    /// BASE64 encoded inline BINARY
    Binary(String),

    /// Unparsed value of an unknown property, in wire form
    Raw(String),
}

impl PropertyValue {
    /// The value data type this value is written as.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) | Self::TextList(_) | Self::RequestStatus(_) | Self::Raw(_) => {
                ValueKind::Text
            }
            Self::Integer(_) => ValueKind::Integer,
            Self::Geo { .. } => ValueKind::Float,
            Self::Uri(_) => ValueKind::Uri,
            Self::CalAddress(_) => ValueKind::CalAddress,
            Self::DateTime(dt) => dt.kind(),
            Self::DateTimes(dts) => dts.first().map_or(ValueKind::DateTime, DateTime::kind),
            Self::Periods(_) => ValueKind::Period,
            Self::Duration(_) | Self::Trigger(Trigger::Relative { .. }) => ValueKind::Duration,
            Self::Trigger(Trigger::Absolute(_)) => ValueKind::DateTime,
            Self::Recur(_) => ValueKind::Recur,
            Self::UtcOffset(_) => ValueKind::UtcOffset,
            Self::Binary(_) => ValueKind::Binary,
        }
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub(crate) const fn variant_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::Integer(_) => "integer",
            Self::Geo { .. } => "geo",
            Self::Uri(_) => "URI",
            Self::CalAddress(_) => "calendar address",
            Self::DateTime(_) => "date-time",
            Self::DateTimes(_) => "date-time list",
            Self::Periods(_) => "period list",
            Self::Duration(_) => "duration",
            Self::Trigger(_) => "trigger",
            Self::Recur(_) => "recurrence rule",
            Self::UtcOffset(_) => "UTC offset",
            Self::RequestStatus(_) => "request status",
            Self::Binary(_) => "binary",
            Self::Raw(_) => "raw",
        }
    }

    /// The text of a TEXT, URI, CAL-ADDRESS, BINARY or raw value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Uri(s) | Self::CalAddress(s) | Self::Binary(s) | Self::Raw(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// The integer of an INTEGER value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The date-time of a single DATE or DATE-TIME value.
    #[must_use]
    pub const fn as_date_time(&self) -> Option<&DateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// The duration of a DURATION value.
    #[must_use]
    pub const fn as_duration(&self) -> Option<&Duration> {
        match self {
            Self::Duration(d) => Some(d),
            _ => None,
        }
    }

    /// The rule of a RECUR value.
    #[must_use]
    pub const fn as_recur(&self) -> Option<&RecurrenceRule> {
        match self {
            Self::Recur(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Which end of the enclosing component a relative trigger refers to.
#[derive(
    Debug,
    Default,
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
pub enum Related {
    #[default]
    Start,
    End,
}

/// Alarm trigger, RFC 5545 Section 3.8.6.3.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Offset from the start or end of the enclosing component
    Relative {
        /// Magnitude of the offset, never negative
        duration: Duration,
        /// Whether the alarm fires before the anchor
        before: bool,
        /// Anchor of the offset
        related: Related,
    },

    /// Fixed point in time, always UTC
    Absolute(DateTime),
}

impl Trigger {
    /// Build a relative trigger.
    ///
    /// Explicit `before` and `related` arguments win over the `RELATED`
    /// parameter, which in turn wins over the sign of the duration.
    #[must_use]
    pub fn relative(
        duration: Duration,
        before: Option<bool>,
        related: Option<Related>,
        param_related: Option<Related>,
    ) -> Self {
        Self::Relative {
            duration: duration.abs(),
            before: before.unwrap_or(duration.negative),
            related: related.or(param_related).unwrap_or_default(),
        }
    }

    /// The signed offset of a relative trigger.
    #[must_use]
    pub fn offset(&self) -> Option<Duration> {
        match self {
            Self::Relative {
                duration, before, ..
            } => Some(if *before {
                duration.negated()
            } else {
                *duration
            }),
            Self::Absolute(_) => None,
        }
    }
}

/// REQUEST-STATUS value: `statcode ";" statdesc [";" extdata]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestStatus {
    /// Hierarchical status code such as `2.0` or `3.1.1`
    pub code: String,
    /// Unescaped status description
    pub description: String,
    /// Unescaped exception data
    pub data: Option<String>,
}
