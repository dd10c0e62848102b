// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the value codecs and the property store.
//!
//! Every failure is recoverable: a setter that returns an error leaves the
//! previously stored value untouched.

use crate::value::ValueKind;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top level error returned by parsers, constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed wire-format input.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Syntactically valid but semantically invalid input.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// A rule spanning two properties of the same component was violated.
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),
}

/// Malformed wire-format input to one of the value parsers or to the
/// content-line parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid {} '{input}': {}",
    .kind.map_or_else(|| "content line".to_string(), |k| format!("{k} value")),
    .reasons.join("; ")
)]
pub struct ParseError {
    /// The value type that was expected, `None` for a content line
    pub kind: Option<ValueKind>,
    /// The offending input
    pub input: String,
    /// Human readable parser diagnostics
    pub reasons: Vec<String>,
}

impl ParseError {
    /// Create a value parse error with a single reason.
    pub fn new(kind: ValueKind, input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            input: input.into(),
            reasons: vec![reason.into()],
        }
    }

    /// Create a content-line parse error with a single reason.
    pub fn line(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: None,
            input: input.into(),
            reasons: vec![reason.into()],
        }
    }
}

/// Semantically invalid input, e.g. `BYMONTHDAY=40` or a PRIORITY of 12.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[expect(missing_docs)]
pub enum InvalidArgument {
    #[error("recurrence rule is missing the required FREQ part")]
    MissingFreq,

    #[error("recurrence rule cannot contain both UNTIL and COUNT")]
    ConflictingTermination,

    #[error("unknown recurrence rule part '{part}'")]
    UnknownRulePart { part: String },

    #[error("recurrence rule part '{part}' occurs more than once")]
    DuplicateRulePart { part: String },

    #[error("invalid value '{value}' for recurrence rule part {part}")]
    InvalidRulePart { part: &'static str, value: String },

    #[error("invalid value '{value}' in {part}: {reason}")]
    InvalidByPart {
        part: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("INTERVAL must be a positive integer, got '{value}'")]
    InvalidInterval { value: String },

    #[error("duration must have at least one non-zero component")]
    EmptyDuration,

    #[error("duration of {property} must not be negative")]
    NegativeDuration { property: String },

    #[error("duration contains calendar units ({unit}) that have no fixed length")]
    CalendarUnit { unit: &'static str },

    #[error("period end {end} is before its start {start}")]
    PeriodEndBeforeStart { start: String, end: String },

    #[error("period start must be a date-time, got date '{value}'")]
    PeriodStartIsDate { value: String },

    #[error("{property} value {value} is out of range {min}..={max}")]
    OutOfRange {
        property: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("invalid GEO position '{value}', latitude must be within ±90 and longitude within ±180")]
    InvalidGeo { value: String },

    #[error("{property} cannot be empty unless empty properties are allowed")]
    EmptyValue { property: String },

    #[error("'{value}' is not an allowed value for {property}")]
    UnexpectedToken { property: String, value: String },

    #[error("{property} does not accept a {found} value")]
    UnexpectedInput {
        property: String,
        found: &'static str,
    },

    #[error("{property} does not allow multiple values")]
    NotMultiple { property: String },

    #[error("unknown time zone '{tz_id}'")]
    UnknownTimeZone { tz_id: String },

    #[error("{property} has no value at index {index}")]
    NoSuchIndex { property: String, index: usize },
}

/// A cross-property rule on one component was violated at set-time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[expect(missing_docs)]
pub enum ConstraintViolation {
    #[error("{property} ({end}) is earlier than DTSTART ({start})")]
    EndBeforeStart {
        property: String,
        start: String,
        end: String,
    },

    #[error("{property} must be a {expected} value to match DTSTART, got {found}")]
    ValueTypeMismatch {
        property: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("UNTIL ({until}) does not match the value type of DTSTART: {reason}")]
    UntilTypeMismatch { until: String, reason: &'static str },

    #[error("{property} cannot be combined with {other} on the same component")]
    Exclusive { property: String, other: String },
}
