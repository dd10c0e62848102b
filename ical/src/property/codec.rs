// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Decoding, validation and encoding of property values.
//!
//! Every path into a [`PropertyValue`] goes through [`PropertyValue::normalize`],
//! which applies the per-property rules of the registration table: UTC-only
//! date-times, positive-only durations, token lists, integer ranges and
//! sorted FREEBUSY periods.

use crate::error::{Error, InvalidArgument, ParseError};
use crate::formatter::{Parameters, escape_text, split_text_list, unescape_text};
use crate::keyword::{
    KW_BASE64, KW_BINARY, KW_DATE, KW_DATETIME, KW_ENCODING, KW_PERIOD, KW_RELATED,
    KW_RELATED_END, KW_TZID, KW_VALUE,
};
use crate::property::{
    PropertyInput, PropertyKind, PropertyValue, Related, RequestStatus, Trigger, ValueShape,
};
use crate::value::{DateTime, Duration, Period, RecurrenceRule, SignPolicy, UtcOffset, ValueKind};

impl PropertyValue {
    /// Decode a value in wire form, as found after the `:` of a content line.
    ///
    /// The `VALUE`, `TZID` and `RELATED` parameters select the variant where
    /// a property accepts several; `dtstart` is used to check the UNTIL of a
    /// recurrence rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed input and
    /// [`Error::InvalidArgument`] for values the property does not accept.
    pub fn decode(
        kind: &PropertyKind,
        raw: &str,
        params: &Parameters,
        dtstart: Option<&DateTime>,
    ) -> Result<Self, Error> {
        decode_wire(kind, raw, params, dtstart, false)?.normalize(kind, dtstart)
    }

    /// Convert a setter input into a value of the given property.
    ///
    /// Text inputs for date-time properties also accept ISO 8601 forms such
    /// as `2023-06-15T10:00:00`. Floating inputs are bound to the `TZID`
    /// parameter when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::UnexpectedInput`] if the input cannot
    /// represent a value of this property, and the decoding or validation
    /// error otherwise.
    pub fn from_input(
        kind: &PropertyKind,
        input: PropertyInput,
        params: &Parameters,
        dtstart: Option<&DateTime>,
    ) -> Result<Self, Error> {
        let shape = kind.spec().shape;
        let tz_id = params.get_str(KW_TZID);
        let mismatch = |found: &'static str| InvalidArgument::UnexpectedInput {
            property: kind.name().to_string(),
            found,
        };

        let candidate = match (shape, input) {
            (_, PropertyInput::Empty) => {
                return Err(InvalidArgument::EmptyValue {
                    property: kind.name().to_string(),
                }
                .into());
            }
            (_, PropertyInput::Value(value)) => value,
            (_, PropertyInput::Encoded(raw)) => decode_wire(kind, &raw, params, dtstart, false)?,

            (ValueShape::Text | ValueShape::Token(_), PropertyInput::Text(s)) => Self::Text(s),
            (ValueShape::TextList, PropertyInput::Text(s)) => Self::TextList(vec![s]),
            (ValueShape::TextList, PropertyInput::TextList(values)) => Self::TextList(values),
            (ValueShape::Uri, PropertyInput::Text(s)) => Self::Uri(s),
            (ValueShape::CalAddress, PropertyInput::Text(s)) => Self::CalAddress(s),
            (ValueShape::Attachment, PropertyInput::Text(s)) if is_binary(params) => Self::Binary(s),
            (ValueShape::Attachment, PropertyInput::Text(s)) => Self::Uri(s),
            (ValueShape::RequestStatus, PropertyInput::Text(s)) => parse_request_status(&s)?,
            (ValueShape::Raw, PropertyInput::Text(s)) => Self::Raw(s),
            (_, PropertyInput::Text(s)) => decode_wire(kind, &s, params, dtstart, true)?,

            (ValueShape::Integer { .. }, PropertyInput::Integer(n)) => Self::Integer(n),
            (ValueShape::Geo, PropertyInput::Geo(latitude, longitude)) => Self::Geo {
                latitude,
                longitude,
            },

            (shape, PropertyInput::Date(date)) => {
                date_time_value(shape, DateTime::from(date)).ok_or(mismatch("date"))?
            }
            (shape, PropertyInput::CivilDateTime(dt)) => {
                date_time_value(shape, DateTime::from(dt).with_tz_id(tz_id))
                    .ok_or(mismatch("date-time"))?
            }
            (shape, PropertyInput::Timestamp(ts)) => {
                date_time_value(shape, DateTime::from(ts)).ok_or(mismatch("timestamp"))?
            }
            (shape, PropertyInput::Zoned(zoned)) => {
                date_time_value(shape, DateTime::from(&zoned)).ok_or(mismatch("zoned date-time"))?
            }
            (shape, PropertyInput::UnixSeconds(seconds)) => {
                date_time_value(shape, DateTime::from_unix_seconds(seconds)?)
                    .ok_or(mismatch("Unix timestamp"))?
            }
            (shape, PropertyInput::DateTime(dt)) => {
                date_time_value(shape, dt.with_tz_id(tz_id)).ok_or(mismatch("date-time"))?
            }
            (
                ValueShape::DateTimeList | ValueShape::RecurrenceDates,
                PropertyInput::DateTimes(values),
            ) => Self::DateTimes(values.into_iter().map(|a| a.with_tz_id(tz_id)).collect()),

            (ValueShape::Duration, PropertyInput::Span(span)) => {
                Self::Duration(Duration::try_from(span)?)
            }
            (ValueShape::Duration, PropertyInput::Duration(duration)) => Self::Duration(duration),
            (ValueShape::Trigger, PropertyInput::Span(span)) => Self::Trigger(Trigger::relative(
                Duration::try_from(span)?,
                None,
                None,
                related_param(params)?,
            )),
            (ValueShape::Trigger, PropertyInput::Duration(duration)) => Self::Trigger(
                Trigger::relative(duration, None, None, related_param(params)?),
            ),
            (
                ValueShape::Trigger,
                PropertyInput::Trigger {
                    duration,
                    before,
                    related,
                },
            ) => Self::Trigger(Trigger::relative(
                duration,
                before,
                related,
                related_param(params)?,
            )),

            (
                ValueShape::Periods | ValueShape::RecurrenceDates,
                PropertyInput::Periods(periods),
            ) => Self::Periods(periods),
            (ValueShape::Recur, PropertyInput::RecurParts(parts)) => {
                Self::Recur(RecurrenceRule::from_parts(parts, dtstart)?)
            }

            (_, input) => return Err(mismatch(input.variant_name()).into()),
        };
        candidate.normalize(kind, dtstart)
    }

    /// Check a value against the rules of a property and bring it into its
    /// canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] if the value violates the property's
    /// rules, or a [`ConstraintViolation`] for an UNTIL that does not match
    /// DTSTART.
    ///
    /// [`ConstraintViolation`]: crate::error::ConstraintViolation
    pub fn normalize(self, kind: &PropertyKind, dtstart: Option<&DateTime>) -> Result<Self, Error> {
        let property = kind.name();
        let found = self.variant_name();
        let value = match (kind.spec().shape, self) {
            (ValueShape::Text, v @ Self::Text(_))
            | (ValueShape::TextList, v @ Self::TextList(_))
            | (ValueShape::Uri, v @ Self::Uri(_))
            | (ValueShape::CalAddress, v @ Self::CalAddress(_))
            | (ValueShape::DateTime, v @ Self::DateTime(_))
            | (ValueShape::RecurrenceDates, v @ Self::Periods(_))
            | (ValueShape::UtcOffset, v @ Self::UtcOffset(_))
            | (ValueShape::RequestStatus, v @ Self::RequestStatus(_))
            | (ValueShape::Attachment, v @ (Self::Uri(_) | Self::Binary(_)))
            | (ValueShape::Trigger, v @ Self::Trigger(Trigger::Relative { .. }))
            | (ValueShape::Raw, v @ Self::Raw(_)) => v,

            (ValueShape::Raw, Self::Text(s)) => Self::Raw(escape_text(&s)),

            (ValueShape::Token(allowed), Self::Text(s)) => {
                let token = s.trim().to_ascii_uppercase();
                if !allowed.contains(&token.as_str()) && !token.starts_with("X-") {
                    return Err(InvalidArgument::UnexpectedToken {
                        property: property.to_string(),
                        value: s,
                    }
                    .into());
                }
                Self::Text(token)
            }

            (ValueShape::Integer { min, max }, Self::Integer(n)) => {
                if !(min..=max).contains(&n) {
                    return Err(InvalidArgument::OutOfRange {
                        property: property.to_string(),
                        value: n,
                        min,
                        max,
                    }
                    .into());
                }
                Self::Integer(n)
            }

            (
                ValueShape::Geo,
                Self::Geo {
                    latitude,
                    longitude,
                },
            ) => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    return Err(InvalidArgument::InvalidGeo {
                        value: format!("{latitude};{longitude}"),
                    }
                    .into());
                }
                Self::Geo {
                    latitude,
                    longitude,
                }
            }

            (ValueShape::UtcDateTime, Self::DateTime(dt)) => {
                if !dt.is_utc() {
                    tracing::trace!(property, value = %dt, "converting to UTC");
                }
                Self::DateTime(dt.to_utc()?)
            }

            (ValueShape::DateTimeList | ValueShape::RecurrenceDates, Self::DateTimes(values)) => {
                Self::DateTimes(normalize_date_list(property, values)?)
            }

            (ValueShape::Periods, Self::Periods(mut periods)) => {
                Period::sort_by_start(&mut periods);
                Self::Periods(periods)
            }

            (ValueShape::Duration, Self::Duration(duration)) => {
                if duration.negative && !duration.is_zero() {
                    tracing::trace!(property, %duration, "dropping sign of negative duration");
                }
                Self::Duration(duration.abs())
            }

            (ValueShape::Trigger, Self::Trigger(Trigger::Absolute(dt))) => {
                Self::Trigger(Trigger::Absolute(dt.to_utc()?))
            }

            (ValueShape::Recur, Self::Recur(rule)) => {
                rule.check_until(dtstart)?;
                Self::Recur(rule)
            }

            _ => {
                return Err(InvalidArgument::UnexpectedInput {
                    property: property.to_string(),
                    found,
                }
                .into());
            }
        };
        Ok(value)
    }

    /// Encode to wire form, returning the value and the parameters adjusted
    /// to match it: `VALUE=DATE` for dates, `TZID` for zoned date-times,
    /// `VALUE=PERIOD` for RDATE periods, `VALUE=DATE-TIME` for absolute
    /// triggers and `VALUE=BINARY;ENCODING=BASE64` for inline attachments.
    #[must_use]
    pub fn encode(&self, kind: &PropertyKind, params: &Parameters) -> (String, Parameters) {
        let shape = kind.spec().shape;
        let mut params = params.clone();
        let value = match self {
            Self::Text(s) => escape_text(s),
            Self::TextList(values) => join(values.iter().map(|a| escape_text(a))),
            Self::Integer(n) => n.to_string(),
            Self::Geo {
                latitude,
                longitude,
            } => format!("{latitude};{longitude}"),
            Self::Uri(s) => {
                if is_binary(&params) {
                    params.remove(KW_VALUE);
                    params.remove(KW_ENCODING);
                }
                s.clone()
            }
            Self::CalAddress(s) | Self::Raw(s) => s.clone(),
            Self::DateTime(dt) => {
                let force_utc = shape == ValueShape::UtcDateTime;
                set_date_time_params(&mut params, dt, force_utc);
                dt.format(false, force_utc)
            }
            Self::DateTimes(values) => {
                if let Some(first) = values.first() {
                    set_date_time_params(&mut params, first, false);
                }
                join(values.iter().map(DateTime::to_string))
            }
            Self::Periods(periods) => {
                params.remove(KW_TZID);
                if shape == ValueShape::RecurrenceDates {
                    params.set(KW_VALUE, KW_PERIOD);
                }
                join(periods.iter().map(Period::format))
            }
            Self::Duration(duration) => {
                params.remove(KW_VALUE);
                let policy = match shape {
                    ValueShape::Duration => SignPolicy::AlwaysPositive,
                    _ => SignPolicy::Signed,
                };
                duration.format(policy)
            }
            Self::Trigger(trigger @ Trigger::Relative { related, .. }) => {
                params.remove(KW_VALUE);
                match related {
                    Related::End => params.set(KW_RELATED, KW_RELATED_END),
                    Related::Start => {
                        params.remove(KW_RELATED);
                    }
                }
                trigger
                    .offset()
                    .map(|a| a.format(SignPolicy::Signed))
                    .unwrap_or_default()
            }
            Self::Trigger(Trigger::Absolute(dt)) => {
                params.remove(KW_RELATED);
                params.remove(KW_TZID);
                params.set(KW_VALUE, KW_DATETIME);
                dt.format(false, true)
            }
            Self::Recur(rule) => rule.format(),
            Self::UtcOffset(offset) => offset.to_string(),
            Self::RequestStatus(status) => {
                let mut out = format!("{};{}", status.code, escape_text(&status.description));
                if let Some(data) = &status.data {
                    out.push(';');
                    out.push_str(&escape_text(data));
                }
                out
            }
            Self::Binary(data) => {
                params.set(KW_VALUE, KW_BINARY);
                params.set(KW_ENCODING, KW_BASE64);
                data.clone()
            }
        };
        (value, params)
    }
}

/// Decode wire text into a candidate value, before normalization. `loose`
/// additionally accepts ISO 8601 date-times.
fn decode_wire(
    kind: &PropertyKind,
    raw: &str,
    params: &Parameters,
    dtstart: Option<&DateTime>,
    loose: bool,
) -> Result<PropertyValue, Error> {
    let tz_id = params.get_str(KW_TZID);
    let value_type = params.get_str(KW_VALUE).map(str::to_ascii_uppercase);
    let parse_date_time = |raw: &str| {
        if loose {
            DateTime::parse_loose(raw, tz_id)
        } else {
            DateTime::parse(raw, tz_id)
        }
    };

    let value = match kind.spec().shape {
        ValueShape::Text | ValueShape::Token(_) => PropertyValue::Text(unescape_text(raw)),
        ValueShape::TextList => PropertyValue::TextList(split_text_list(raw)),
        ValueShape::Integer { .. } => PropertyValue::Integer(parse_integer(raw)?),
        ValueShape::Geo => parse_geo(raw)?,
        ValueShape::Uri => PropertyValue::Uri(raw.to_string()),
        ValueShape::CalAddress => PropertyValue::CalAddress(raw.to_string()),
        ValueShape::DateTime | ValueShape::UtcDateTime => {
            PropertyValue::DateTime(parse_date_time(raw)?)
        }
        ValueShape::RecurrenceDates if value_type.as_deref() == Some(KW_PERIOD) => {
            PropertyValue::Periods(Period::parse_list(raw, tz_id)?)
        }
        ValueShape::DateTimeList | ValueShape::RecurrenceDates => PropertyValue::DateTimes(
            raw.split(',')
                .map(parse_date_time)
                .collect::<Result<_, _>>()?,
        ),
        ValueShape::Periods => PropertyValue::Periods(Period::parse_list(raw, tz_id)?),
        ValueShape::Duration => PropertyValue::Duration(Duration::parse(raw)?),
        ValueShape::Trigger if value_type.as_deref() == Some(KW_DATETIME) => {
            PropertyValue::Trigger(Trigger::Absolute(parse_date_time(raw)?))
        }
        ValueShape::Trigger => match Duration::parse(raw) {
            Ok(duration) => PropertyValue::Trigger(Trigger::relative(
                duration,
                None,
                None,
                related_param(params)?,
            )),
            Err(err) if !loose => return Err(err),
            Err(err) => match DateTime::parse_loose(raw, tz_id) {
                Ok(dt) => PropertyValue::Trigger(Trigger::Absolute(dt)),
                Err(_) => return Err(err),
            },
        },
        ValueShape::Recur => PropertyValue::Recur(RecurrenceRule::parse(raw, dtstart)?),
        ValueShape::UtcOffset => PropertyValue::UtcOffset(UtcOffset::parse(raw)?),
        ValueShape::RequestStatus => parse_request_status(raw)?,
        ValueShape::Attachment if value_type.as_deref() == Some(KW_BINARY) => {
            PropertyValue::Binary(raw.to_string())
        }
        ValueShape::Attachment => PropertyValue::Uri(raw.to_string()),
        ValueShape::Raw => PropertyValue::Raw(raw.to_string()),
    };
    Ok(value)
}

/// Wrap a single date-time for a property that accepts one.
fn date_time_value(shape: ValueShape, dt: DateTime) -> Option<PropertyValue> {
    match shape {
        ValueShape::DateTime | ValueShape::UtcDateTime => Some(PropertyValue::DateTime(dt)),
        ValueShape::DateTimeList | ValueShape::RecurrenceDates => {
            Some(PropertyValue::DateTimes(vec![dt]))
        }
        ValueShape::Trigger => Some(PropertyValue::Trigger(Trigger::Absolute(dt))),
        _ => None,
    }
}

/// A date list shares one `VALUE` and one `TZID` parameter: mixing dates
/// and date-times is rejected, mixed zones are converted to UTC.
fn normalize_date_list(property: &str, values: Vec<DateTime>) -> Result<Vec<DateTime>, Error> {
    let Some(first) = values.first() else {
        return Err(InvalidArgument::EmptyValue {
            property: property.to_string(),
        }
        .into());
    };

    if values.iter().any(|a| a.is_date_only() != first.is_date_only()) {
        return Err(InvalidArgument::UnexpectedInput {
            property: property.to_string(),
            found: "mixed DATE and DATE-TIME",
        }
        .into());
    }

    let uniform = values
        .iter()
        .all(|a| a.tz_id() == first.tz_id() && a.is_utc() == first.is_utc());
    if uniform {
        return Ok(values);
    }

    tracing::trace!(property, "converting date-times with mixed zones to UTC");
    values.iter().map(DateTime::to_utc).collect()
}

fn set_date_time_params(params: &mut Parameters, dt: &DateTime, force_utc: bool) {
    if dt.is_date_only() && !force_utc {
        params.set(KW_VALUE, KW_DATE);
        params.remove(KW_TZID);
        return;
    }

    if params
        .get_str(KW_VALUE)
        .is_some_and(|v| v.eq_ignore_ascii_case(KW_DATE))
    {
        params.remove(KW_VALUE);
    }
    match dt.tz_id() {
        Some(tz_id) if !force_utc => params.set(KW_TZID, tz_id),
        _ => {
            params.remove(KW_TZID);
        }
    }
}

fn related_param(params: &Parameters) -> Result<Option<Related>, Error> {
    let Some(related) = params.get_str(KW_RELATED) else {
        return Ok(None);
    };
    match related.parse() {
        Ok(related) => Ok(Some(related)),
        Err(_) => Err(InvalidArgument::UnexpectedToken {
            property: KW_RELATED.to_string(),
            value: related.to_string(),
        }
        .into()),
    }
}

fn is_binary(params: &Parameters) -> bool {
    params
        .get_str(KW_VALUE)
        .is_some_and(|v| v.eq_ignore_ascii_case(KW_BINARY))
}

fn join(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join(",")
}

fn parse_integer(raw: &str) -> Result<i64, Error> {
    lexical::parse::<i64, _>(raw.trim())
        .map_err(|_| ParseError::new(ValueKind::Integer, raw, "not an integer").into())
}

/// ```txt
/// geovalue = float ";" float
/// ```
fn parse_geo(raw: &str) -> Result<PropertyValue, Error> {
    let invalid = |reason: &str| ParseError::new(ValueKind::Float, raw, reason);
    let (latitude, longitude) = raw
        .split_once(';')
        .ok_or_else(|| invalid("expected 'latitude;longitude'"))?;
    let parse = |s: &str| {
        lexical::parse::<f64, _>(s.trim()).map_err(|_| invalid("coordinate is not a number"))
    };
    Ok(PropertyValue::Geo {
        latitude: parse(latitude)?,
        longitude: parse(longitude)?,
    })
}

/// ```txt
/// rstatus  = statcode ";" statdesc [";" extdata]
/// statcode = 1*DIGIT 1*2("." 1*DIGIT)
/// ```
fn parse_request_status(raw: &str) -> Result<PropertyValue, Error> {
    let invalid = |reason: &str| ParseError::new(ValueKind::Text, raw, reason);
    let mut parts = split_unescaped(raw, ';', 3).into_iter();
    let code = parts.next().unwrap_or_default();
    let valid_code = {
        let levels: Vec<_> = code.split('.').collect();
        (2..=3).contains(&levels.len())
            && levels
                .iter()
                .all(|a| !a.is_empty() && a.bytes().all(|b| b.is_ascii_digit()))
    };
    if !valid_code {
        return Err(invalid("status code must look like '2.0' or '3.1.1'").into());
    }
    let description = parts
        .next()
        .ok_or_else(|| invalid("missing status description"))?;

    Ok(PropertyValue::RequestStatus(RequestStatus {
        code: code.to_string(),
        description: unescape_text(description),
        data: parts.next().map(unescape_text),
    }))
}

/// Split on a separator that is not preceded by a backslash, into at most
/// `limit` pieces.
fn split_unescaped(raw: &str, separator: char, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == separator && pieces.len() + 1 < limit => {
                pieces.push(&raw[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&raw[start..]);
    pieces
}
