// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Encode, decode and validate iCalendar (RFC 5545) property values.
//!
//! The crate is layered leaf-first:
//!
//! - [`value`]: DATE / DATE-TIME, DURATION, PERIOD, RECUR and UTC-OFFSET
//! - [`formatter`] and [`parser`]: the content line codec
//! - [`property`]: the property registry and per-property value rules
//! - [`store`]: the property map of one component with cross-property checks
//!
//! ```
//! use calvalue_ical::formatter::Parameters;
//! use calvalue_ical::property::PropertyKind;
//! use calvalue_ical::store::PropertyStore;
//!
//! let mut event = PropertyStore::default();
//! event.set_dtstart("20240105T090000Z", Parameters::new())?;
//! event.set_rrule([("FREQ", "WEEKLY"), ("BYDAY", "MO,WE"), ("COUNT", "5")], Parameters::new())?;
//! assert_eq!(
//!     event.create(&PropertyKind::RRule),
//!     "RRULE:FREQ=WEEKLY;COUNT=5;BYDAY=MO,WE\r\n"
//! );
//! # Ok::<(), calvalue_ical::error::Error>(())
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool,
    clippy::module_name_repetitions
)]

pub mod config;
pub mod error;
pub mod formatter;
pub mod keyword;
mod lexer;
pub mod parser;
pub mod property;
pub mod store;
pub mod value;

pub use crate::config::Config;
pub use crate::error::{ConstraintViolation, Error, InvalidArgument, ParseError};
pub use crate::formatter::{FormatOptions, Parameters};
pub use crate::parser::{ContentLine, parse_line};
pub use crate::property::{PropertyInput, PropertyKind, PropertyValue, Related, Trigger};
pub use crate::store::{Property, PropertyStore};
pub use crate::value::{DateTime, Duration, Period, PeriodEnd, RecurrenceRule, ValueKind};
