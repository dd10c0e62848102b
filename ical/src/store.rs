// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property map of a single calendar component.
//!
//! The store owns the values of one component, e.g. a VEVENT, keyed by
//! [`PropertyKind`]. Every setter is all-or-nothing: the input is decoded,
//! normalized and checked against sibling properties before anything is
//! replaced.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::{ConstraintViolation, Error, InvalidArgument};
use crate::formatter::Parameters;
use crate::keyword::{KW_FBTYPE, KW_LANGUAGE};
use crate::parser::{parse_line, split_lines};
use crate::property::{PropertyInput, PropertyKind, PropertyValue, Related, Trigger};
use crate::value::{DateTime, Duration, Period, RecurrenceRule};

/// One stored occurrence of a property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The value, `None` for an empty property
    pub value: Option<PropertyValue>,

    /// Parameters as supplied by the caller
    pub params: Parameters,
}

/// Property map of one component.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    config: Config,
    entries: BTreeMap<PropertyKind, Vec<Property>>,
}

macro_rules! setters {
    ($($(#[$attr:meta])* $fn:ident => $kind:ident,)*) => {
        $(
            $(#[$attr])*
            ///
            /// # Errors
            ///
            /// See [`PropertyStore::set`].
            pub fn $fn(
                &mut self,
                value: impl Into<PropertyInput>,
                params: Parameters,
            ) -> Result<(), Error> {
                self.set(PropertyKind::$kind, value, params, None)
            }
        )*
    };
}

impl PropertyStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
        }
    }

    /// The configuration of this store.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set a property.
    ///
    /// For single-valued properties the value is replaced. For multi-valued
    /// properties `index` selects the occurrence to replace; `None`, or the
    /// current number of occurrences, appends.
    ///
    /// # Errors
    ///
    /// - [`Error::Parse`] / [`Error::InvalidArgument`] if the input is not a
    ///   valid value of the property
    /// - [`InvalidArgument::EmptyValue`] for an empty input unless empty
    ///   properties are allowed
    /// - [`InvalidArgument::NotMultiple`] / [`InvalidArgument::NoSuchIndex`]
    ///   for a bad `index`
    /// - [`Error::Constraint`] if the value conflicts with DTSTART or another
    ///   sibling
    ///
    /// The stored value is unchanged on error.
    pub fn set(
        &mut self,
        kind: PropertyKind,
        input: impl Into<PropertyInput>,
        params: Parameters,
        index: Option<usize>,
    ) -> Result<(), Error> {
        self.try_set(&kind, input.into(), params, index)
            .inspect_err(|err| tracing::debug!(property = kind.name(), %err, "rejected value"))
    }

    fn try_set(
        &mut self,
        kind: &PropertyKind,
        input: PropertyInput,
        params: Parameters,
        index: Option<usize>,
    ) -> Result<(), Error> {
        let slot = self.slot(kind, index)?;

        let value = match input {
            PropertyInput::Empty => None,
            PropertyInput::Text(s) | PropertyInput::Encoded(s) if s.trim().is_empty() => None,
            input => {
                let value = PropertyValue::from_input(kind, input, &params, self.dtstart())?;
                let value = self.bind_zone(kind, value);
                self.check_siblings(kind, &value)?;
                Some(value)
            }
        };

        if value.is_none() && !self.config.allow_empty {
            return Err(InvalidArgument::EmptyValue {
                property: kind.name().to_string(),
            }
            .into());
        }

        let property = Property { value, params };
        match slot {
            Slot::Only => {
                self.entries.insert(kind.clone(), vec![property]);
            }
            Slot::Push => self.entries.entry(kind.clone()).or_default().push(property),
            Slot::At(i) => {
                if let Some(entry) = self.entries.get_mut(kind).and_then(|a| a.get_mut(i)) {
                    *entry = property;
                }
            }
        }
        Ok(())
    }

    fn slot(&self, kind: &PropertyKind, index: Option<usize>) -> Result<Slot, Error> {
        if !kind.spec().multiple {
            return match index {
                None | Some(0) => Ok(Slot::Only),
                Some(_) => Err(InvalidArgument::NotMultiple {
                    property: kind.name().to_string(),
                }
                .into()),
            };
        }

        let len = self.entries.get(kind).map_or(0, Vec::len);
        match index {
            None => Ok(Slot::Push),
            Some(i) if i < len => Ok(Slot::At(i)),
            Some(i) if i == len => Ok(Slot::Push),
            Some(index) => Err(InvalidArgument::NoSuchIndex {
                property: kind.name().to_string(),
                index,
            }
            .into()),
        }
    }

    /// Bind floating date-times of DTSTART, DTEND, DUE and RECURRENCE-ID
    /// to the zone of DTSTART, or to the configured default zone.
    fn bind_zone(&self, kind: &PropertyKind, value: PropertyValue) -> PropertyValue {
        let PropertyValue::DateTime(dt) = value else {
            return value;
        };
        if !dt.is_floating() {
            return PropertyValue::DateTime(dt);
        }

        let inherited = match kind {
            PropertyKind::DtEnd | PropertyKind::Due | PropertyKind::RecurrenceId => {
                self.dtstart().and_then(DateTime::tz_id)
            }
            PropertyKind::DtStart => None,
            _ => return PropertyValue::DateTime(dt),
        };
        let tz_id = match inherited {
            Some(tz_id) => {
                tracing::trace!(property = kind.name(), tz_id, "inheriting TZID from DTSTART");
                Some(tz_id)
            }
            None => self.config.tzid.as_deref(),
        };
        PropertyValue::DateTime(dt.with_tz_id(tz_id))
    }

    fn check_siblings(&self, kind: &PropertyKind, value: &PropertyValue) -> Result<(), Error> {
        match kind {
            PropertyKind::DtEnd | PropertyKind::Due => {
                self.check_exclusive(kind, &PropertyKind::Duration)?;
                let (Some(start), Some(end)) = (self.dtstart(), value.as_date_time()) else {
                    return Ok(());
                };
                check_value_type(kind, start, end)?;
                check_order(kind, start, end)?;
            }
            PropertyKind::Duration => {
                self.check_exclusive(kind, &PropertyKind::DtEnd)?;
                self.check_exclusive(kind, &PropertyKind::Due)?;
            }
            PropertyKind::RecurrenceId => {
                if let (Some(start), Some(id)) = (self.dtstart(), value.as_date_time()) {
                    check_value_type(kind, start, id)?;
                }
            }
            PropertyKind::DtStart => {
                let Some(start) = value.as_date_time() else {
                    return Ok(());
                };
                for end_kind in [PropertyKind::DtEnd, PropertyKind::Due] {
                    if let Some(end) = self.get(&end_kind).and_then(PropertyValue::as_date_time) {
                        check_value_type(&end_kind, start, end)?;
                        check_order(&end_kind, start, end)?;
                    }
                }
                let id_kind = PropertyKind::RecurrenceId;
                if let Some(id) = self.get(&id_kind).and_then(PropertyValue::as_date_time) {
                    check_value_type(&id_kind, start, id)?;
                }
                for rule_kind in [PropertyKind::RRule, PropertyKind::ExRule] {
                    let rules = self
                        .values(&rule_kind)
                        .filter_map(|a| a.value.as_ref())
                        .filter_map(PropertyValue::as_recur);
                    for rule in rules {
                        rule.check_until(Some(start))?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn check_exclusive(&self, kind: &PropertyKind, other: &PropertyKind) -> Result<(), Error> {
        if self.contains(other) {
            return Err(ConstraintViolation::Exclusive {
                property: kind.name().to_string(),
                other: other.name().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Parse one content line and store it, appending to multi-valued
    /// properties.
    ///
    /// # Errors
    ///
    /// Returns the parse error of the line or the error of
    /// [`PropertyStore::set`].
    pub fn import_line(&mut self, line: &str) -> Result<PropertyKind, Error> {
        let line = parse_line(line)?;
        let kind = PropertyKind::from_name(&line.name);
        self.set(
            kind.clone(),
            PropertyInput::Encoded(line.value),
            line.params,
            None,
        )?;
        Ok(kind)
    }

    /// Import every content line of a block of text, in order, stopping at
    /// the first error.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::import_line`].
    pub fn import(&mut self, text: &str) -> Result<Vec<PropertyKind>, Error> {
        split_lines(text)
            .iter()
            .map(|line| self.import_line(line))
            .collect()
    }

    /// Whether the property has at least one occurrence.
    #[must_use]
    pub fn contains(&self, kind: &PropertyKind) -> bool {
        self.entries.get(kind).is_some_and(|a| !a.is_empty())
    }

    /// The value of the first occurrence of a property.
    #[must_use]
    pub fn get(&self, kind: &PropertyKind) -> Option<&PropertyValue> {
        self.get_with_params(kind).and_then(|a| a.value.as_ref())
    }

    /// The first occurrence of a property, with its parameters.
    #[must_use]
    pub fn get_with_params(&self, kind: &PropertyKind) -> Option<&Property> {
        self.get_at(kind, 0)
    }

    /// The occurrence of a property at `index`.
    #[must_use]
    pub fn get_at(&self, kind: &PropertyKind, index: usize) -> Option<&Property> {
        self.entries.get(kind).and_then(|a| a.get(index))
    }

    /// Iterate over every occurrence of a property.
    #[must_use]
    pub fn values(&self, kind: &PropertyKind) -> Cursor<'_> {
        Cursor {
            items: self.entries.get(kind).map_or(&[][..], Vec::as_slice),
            position: 0,
        }
    }

    /// Iterate over the stored property kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &PropertyKind> {
        self.entries
            .iter()
            .filter(|(_, a)| !a.is_empty())
            .map(|(k, _)| k)
    }

    /// Delete one occurrence of a property, or every occurrence when
    /// `index` is `None`. Returns the number of occurrences removed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NoSuchIndex`] if `index` is out of range.
    pub fn delete(&mut self, kind: &PropertyKind, index: Option<usize>) -> Result<usize, Error> {
        let Some(index) = index else {
            return Ok(self.entries.remove(kind).map_or(0, |a| a.len()));
        };

        let no_such_index = || InvalidArgument::NoSuchIndex {
            property: kind.name().to_string(),
            index,
        };
        let entries = self.entries.get_mut(kind).ok_or_else(no_such_index)?;
        if index >= entries.len() {
            return Err(no_such_index().into());
        }
        entries.remove(index);
        if entries.is_empty() {
            self.entries.remove(kind);
        }
        Ok(1)
    }

    /// Format every occurrence of a property as folded content lines.
    ///
    /// An absent property gives an empty string, or a bare `NAME:` line if
    /// empty properties are allowed.
    #[must_use]
    pub fn create(&self, kind: &PropertyKind) -> String {
        let items = self.entries.get(kind).map_or(&[][..], Vec::as_slice);
        if items.is_empty() {
            return self.empty_line(kind, &Parameters::new());
        }
        items.iter().map(|a| self.format_property(kind, a)).collect()
    }

    /// Format every stored property, in registration order.
    #[must_use]
    pub fn create_all(&self) -> String {
        self.entries
            .iter()
            .flat_map(|(kind, items)| items.iter().map(move |a| (kind, a)))
            .map(|(kind, property)| self.format_property(kind, property))
            .collect()
    }

    fn format_property(&self, kind: &PropertyKind, property: &Property) -> String {
        let mut params = property.params.clone();
        if let Some(language) = &self.config.language {
            if kind.spec().language && !params.contains(KW_LANGUAGE) {
                params.set(KW_LANGUAGE, language.as_str());
            }
        }

        match &property.value {
            Some(value) => {
                let (value, params) = value.encode(kind, &params);
                self.config
                    .format
                    .format_encoded_line(kind.name(), &params, &value)
            }
            None => self.empty_line(kind, &params),
        }
    }

    fn empty_line(&self, kind: &PropertyKind, params: &Parameters) -> String {
        if self.config.allow_empty {
            self.config.format.format_encoded_line(kind.name(), params, "")
        } else {
            String::new()
        }
    }

    /// Set UID to a new random value unless one is present, returning the
    /// UID.
    ///
    /// # Errors
    ///
    /// Does not fail for a generated UID; the signature follows
    /// [`PropertyStore::set`].
    pub fn ensure_uid(&mut self) -> Result<String, Error> {
        if let Some(uid) = self.get(&PropertyKind::Uid).and_then(PropertyValue::as_text) {
            return Ok(uid.to_string());
        }

        let uuid = uuid::Uuid::new_v4();
        let uid = if self.config.unique_id.is_empty() {
            uuid.to_string()
        } else {
            format!("{uuid}@{}", self.config.unique_id)
        };
        tracing::debug!(uid = %uid, "generated UID");
        self.set(PropertyKind::Uid, uid.as_str(), Parameters::new(), None)?;
        Ok(uid)
    }

    /// Set DTSTAMP to the current time unless one is present.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::set`].
    pub fn ensure_dtstamp(&mut self) -> Result<(), Error> {
        if self.contains(&PropertyKind::DtStamp) {
            return Ok(());
        }
        self.set(
            PropertyKind::DtStamp,
            jiff::Timestamp::now(),
            Parameters::new(),
            None,
        )
    }

    setters! {
        /// Set DTSTART.
        set_dtstart => DtStart,
        /// Set DTEND, which must not be earlier than DTSTART.
        set_dtend => DtEnd,
        /// Set DUE, which must not be earlier than DTSTART.
        set_due => Due,
        /// Set RECURRENCE-ID.
        set_recurrence_id => RecurrenceId,
        /// Set DURATION; the sign is dropped.
        set_duration => Duration,
        /// Set COMPLETED, stored in UTC.
        set_completed => Completed,
        /// Set CREATED, stored in UTC.
        set_created => Created,
        /// Set LAST-MODIFIED, stored in UTC.
        set_last_modified => LastModified,
        /// Set SUMMARY.
        set_summary => Summary,
        /// Set DESCRIPTION.
        set_description => Description,
        /// Set UID.
        set_uid => Uid,
    }

    /// Replace RRULE with a rule built from `NAME=VALUE` parts.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceRule::from_parts`] and [`PropertyStore::set`].
    pub fn set_rrule<K, V>(
        &mut self,
        parts: impl IntoIterator<Item = (K, V)>,
        params: Parameters,
    ) -> Result<(), Error>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let parts = parts.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.set(
            PropertyKind::RRule,
            PropertyInput::RecurParts(parts),
            params,
            None,
        )
    }

    /// Replace EXRULE with a rule built from `NAME=VALUE` parts.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceRule::from_parts`] and [`PropertyStore::set`].
    pub fn set_exrule<K, V>(
        &mut self,
        parts: impl IntoIterator<Item = (K, V)>,
        params: Parameters,
    ) -> Result<(), Error>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let parts = parts.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.set(
            PropertyKind::ExRule,
            PropertyInput::RecurParts(parts),
            params,
            None,
        )
    }

    /// Set a relative TRIGGER.
    ///
    /// `before` and `related` take precedence over the `RELATED` parameter,
    /// which takes precedence over the sign of `duration`.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::set`].
    pub fn set_trigger(
        &mut self,
        duration: Duration,
        before: Option<bool>,
        related: Option<Related>,
        params: Parameters,
    ) -> Result<(), Error> {
        let input = PropertyInput::Trigger {
            duration,
            before,
            related,
        };
        self.set(PropertyKind::Trigger, input, params, None)
    }

    /// Append or replace a FREEBUSY occurrence with an optional `FBTYPE`.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::set`].
    pub fn set_freebusy(
        &mut self,
        fbtype: Option<&str>,
        periods: Vec<Period>,
        index: Option<usize>,
    ) -> Result<(), Error> {
        let mut params = Parameters::new();
        if let Some(fbtype) = fbtype {
            params.set(KW_FBTYPE, fbtype.to_ascii_uppercase());
        }
        self.set(PropertyKind::FreeBusy, periods, params, index)
    }

    /// Append or replace an EXDATE occurrence.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::set`].
    pub fn set_exdate(
        &mut self,
        values: impl Into<PropertyInput>,
        params: Parameters,
        index: Option<usize>,
    ) -> Result<(), Error> {
        self.set(PropertyKind::ExDate, values, params, index)
    }

    /// Append or replace an RDATE occurrence.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::set`].
    pub fn set_rdate(
        &mut self,
        values: impl Into<PropertyInput>,
        params: Parameters,
        index: Option<usize>,
    ) -> Result<(), Error> {
        self.set(PropertyKind::RDate, values, params, index)
    }

    /// DTSTART, if set.
    #[must_use]
    pub fn dtstart(&self) -> Option<&DateTime> {
        self.get(&PropertyKind::DtStart)
            .and_then(PropertyValue::as_date_time)
    }

    /// RRULE, if set.
    #[must_use]
    pub fn rrule(&self) -> Option<&RecurrenceRule> {
        self.get(&PropertyKind::RRule)
            .and_then(PropertyValue::as_recur)
    }

    /// TRIGGER, if set.
    #[must_use]
    pub fn trigger(&self) -> Option<&Trigger> {
        match self.get(&PropertyKind::Trigger) {
            Some(PropertyValue::Trigger(trigger)) => Some(trigger),
            _ => None,
        }
    }
}

enum Slot {
    Only,
    Push,
    At(usize),
}

fn check_value_type(kind: &PropertyKind, start: &DateTime, value: &DateTime) -> Result<(), Error> {
    if start.is_date_only() == value.is_date_only() {
        return Ok(());
    }
    Err(ConstraintViolation::ValueTypeMismatch {
        property: kind.name().to_string(),
        expected: start.kind(),
        found: value.kind(),
    }
    .into())
}

fn check_order(kind: &PropertyKind, start: &DateTime, end: &DateTime) -> Result<(), Error> {
    if end.compare(start) != Ordering::Less {
        return Ok(());
    }
    Err(ConstraintViolation::EndBeforeStart {
        property: kind.name().to_string(),
        start: start.to_string(),
        end: end.to_string(),
    }
    .into())
}

/// Restartable iterator over the occurrences of one property.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    items: &'a [Property],
    position: usize,
}

impl Cursor<'_> {
    /// Index of the next occurrence.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Start again from the first occurrence.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = &'a Property;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get(self.position)?;
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.items.len().saturating_sub(self.position);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Cursor<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_restarts() {
        let mut store = PropertyStore::default();
        for name in ["a", "b", "c"] {
            store
                .set(PropertyKind::Comment, name, Parameters::new(), None)
                .unwrap();
        }

        let mut cursor = store.values(&PropertyKind::Comment);
        assert_eq!(cursor.len(), 3);
        cursor.next();
        cursor.next();
        assert_eq!(cursor.position(), 2);
        cursor.reset();
        let texts: Vec<_> = cursor
            .filter_map(|a| a.value.as_ref().and_then(PropertyValue::as_text))
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);

        assert_eq!(store.values(&PropertyKind::Attendee).count(), 0);
    }

    #[test]
    fn index_handling() {
        let mut store = PropertyStore::default();
        store
            .set(PropertyKind::Comment, "first", Parameters::new(), Some(0))
            .unwrap();
        store
            .set(PropertyKind::Comment, "replaced", Parameters::new(), Some(0))
            .unwrap();
        store
            .set(PropertyKind::Comment, "second", Parameters::new(), Some(1))
            .unwrap();

        let err = store
            .set(PropertyKind::Comment, "gap", Parameters::new(), Some(5))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument(InvalidArgument::NoSuchIndex { index: 5, .. })
        ));

        let err = store
            .set(PropertyKind::Summary, "x", Parameters::new(), Some(1))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument(InvalidArgument::NotMultiple { .. })
        ));

        assert_eq!(store.create(&PropertyKind::Comment), "COMMENT:replaced\r\nCOMMENT:second\r\n");
        assert_eq!(store.delete(&PropertyKind::Comment, Some(0)).unwrap(), 1);
        assert_eq!(store.create(&PropertyKind::Comment), "COMMENT:second\r\n");
        assert!(store.delete(&PropertyKind::Comment, Some(3)).is_err());
        assert_eq!(store.delete(&PropertyKind::Comment, None).unwrap(), 1);
        assert!(!store.contains(&PropertyKind::Comment));
    }

    #[test]
    fn zone_binding() {
        let config = Config {
            tzid: Some("Asia/Tokyo".to_string()),
            ..Config::default()
        };
        let mut store = PropertyStore::new(config);
        store
            .set_dtstart("2024-03-01T09:00:00", Parameters::new())
            .unwrap();
        assert_eq!(store.dtstart().and_then(DateTime::tz_id), Some("Asia/Tokyo"));

        let params = Parameters::new().with("TZID", "Europe/Paris");
        store.set_dtstart("20240301T090000", params).unwrap();
        store.set_dtend("20240301T100000", Parameters::new()).unwrap();
        assert_eq!(
            store.create(&PropertyKind::DtEnd),
            "DTEND;TZID=Europe/Paris:20240301T100000\r\n"
        );
    }

    #[test]
    fn generated_uid() {
        let config = Config {
            unique_id: "example.com".to_string(),
            ..Config::default()
        };
        let mut store = PropertyStore::new(config);
        let uid = store.ensure_uid().unwrap();
        assert!(uid.ends_with("@example.com"));
        assert_eq!(store.ensure_uid().unwrap(), uid);

        store.ensure_dtstamp().unwrap();
        let stamp = store.get(&PropertyKind::DtStamp).and_then(PropertyValue::as_date_time);
        assert!(stamp.is_some_and(DateTime::is_utc));
    }
}
