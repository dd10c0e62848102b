// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Settings shared by every property of a component.

use crate::error::{Error, InvalidArgument};
use crate::formatter::FormatOptions;

/// Configuration of a [`PropertyStore`](crate::store::PropertyStore).
///
/// Deserializable so that applications can embed it in their own config
/// files, e.g. as a `[ical]` table in TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emit `NAME:` for properties without a value instead of nothing.
    pub allow_empty: bool,

    /// `LANGUAGE` parameter added to text properties that take one and do
    /// not carry their own.
    pub language: Option<String>,

    /// Time zone for floating date-times of DTSTART, DTEND, DUE and
    /// RECURRENCE-ID when neither a `TZID` parameter nor DTSTART supplies
    /// one.
    pub tzid: Option<String>,

    /// Domain part of generated UIDs, `<uuid>@<unique_id>`.
    pub unique_id: String,

    /// Content line formatting.
    pub format: FormatOptions,
}

impl Config {
    /// Check the configuration, trimming blank optional values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::UnknownTimeZone`] if `tzid` is not in the
    /// time zone database.
    pub fn normalize(&mut self) -> Result<(), Error> {
        self.language = self.language.take().filter(|a| !a.trim().is_empty());
        self.tzid = self.tzid.take().filter(|a| !a.trim().is_empty());
        self.unique_id = self.unique_id.trim().to_string();

        if let Some(tz_id) = &self.tzid {
            if jiff::tz::TimeZone::get(tz_id).is_err() {
                return Err(InvalidArgument::UnknownTimeZone {
                    tz_id: tz_id.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}
