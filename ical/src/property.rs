// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property registry and value codecs.
//!
//! ## Organization
//!
//! - `kind.rs`: [`PropertyKind`] and the registration table mapping each
//!   property name to its [`ValueShape`], multiplicity and `LANGUAGE` support
//! - `value.rs`: the normalized [`PropertyValue`] and its parts
//! - `input.rs`: the loosely typed [`PropertyInput`] accepted by setters
//! - `codec.rs`: decoding, validation and encoding per property

mod codec;
mod input;
mod kind;
mod value;

pub use input::PropertyInput;
pub use kind::{PropertyKind, PropertySpec, ValueShape};
pub use value::{PropertyValue, Related, RequestStatus, Trigger};
