// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property kinds and their registration table.
//!
//! Each known property name maps to a [`PropertySpec`]: the value codec it
//! uses, whether it may occur more than once on a component and whether it
//! takes a `LANGUAGE` parameter.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::keyword::{
    KW_ACKNOWLEDGED, KW_ACTION, KW_ACTION_VALUES, KW_ATTACH, KW_ATTENDEE, KW_CALENDAR_ADDRESS,
    KW_CALSCALE, KW_CATEGORIES, KW_CLASS, KW_CLASS_VALUES, KW_COLOR, KW_COMMENT, KW_COMPLETED,
    KW_CONFERENCE, KW_CONTACT, KW_CREATED, KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP, KW_DTSTART,
    KW_DUE, KW_DURATION, KW_EXDATE, KW_EXRULE, KW_FREEBUSY, KW_GEO, KW_IMAGE, KW_LAST_MODIFIED,
    KW_LOCATION, KW_LOCATION_TYPE, KW_METHOD, KW_NAME, KW_ORGANIZER, KW_PARTICIPANT_TYPE,
    KW_PERCENT_COMPLETE, KW_PRIORITY, KW_PRODID, KW_PROXIMITY, KW_PROXIMITY_VALUES, KW_RDATE,
    KW_RECURRENCE_ID, KW_REFRESH_INTERVAL, KW_RELATED_TO, KW_REPEAT, KW_REQUEST_STATUS,
    KW_RESOURCE_TYPE, KW_RESOURCES, KW_RRULE, KW_SEQUENCE, KW_SOURCE, KW_STATUS,
    KW_STATUS_VALUES, KW_STRUCTURED_DATA, KW_STYLED_DESCRIPTION, KW_SUMMARY, KW_TRANSP,
    KW_TRANSP_VALUES, KW_TRIGGER, KW_TZID, KW_TZID_ALIAS_OF, KW_TZNAME, KW_TZOFFSETFROM,
    KW_TZOFFSETTO, KW_TZUNTIL, KW_TZURL, KW_UID, KW_URL, KW_VERSION,
};

/// How the value of a property is decoded, validated and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Escaped TEXT
    Text,
    /// COMMA-separated TEXT values
    TextList,
    /// TEXT restricted to the listed tokens or an `X-` name
    Token(&'static [&'static str]),
    /// INTEGER within an inclusive range
    Integer {
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },
    /// Latitude and longitude
    Geo,
    /// URI
    Uri,
    /// CAL-ADDRESS
    CalAddress,
    /// DATE or DATE-TIME in any time mode
    DateTime,
    /// DATE-TIME always written in UTC
    UtcDateTime,
    /// COMMA-separated DATE or DATE-TIME values
    DateTimeList,
    /// DATE, DATE-TIME or PERIOD list, selected by `VALUE`
    RecurrenceDates,
    /// PERIOD list, sorted by start
    Periods,
    /// DURATION that can only be positive
    Duration,
    /// Relative DURATION or absolute DATE-TIME alarm trigger
    Trigger,
    /// RECUR
    Recur,
    /// UTC-OFFSET
    UtcOffset,
    /// `statcode ";" statdesc [";" extdata]`
    RequestStatus,
    /// URI or inline BINARY, selected by `VALUE`
    Attachment,
    /// Unparsed value of an unknown or `X-` property
    Raw,
}

/// Registration entry of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    /// Value codec
    pub shape: ValueShape,
    /// Whether the property may occur more than once
    pub multiple: bool,
    /// Whether the property takes a `LANGUAGE` parameter
    pub language: bool,
}

impl PropertySpec {
    const fn one(shape: ValueShape) -> Self {
        Self {
            shape,
            multiple: false,
            language: false,
        }
    }

    const fn many(shape: ValueShape) -> Self {
        Self {
            shape,
            multiple: true,
            language: false,
        }
    }

    const fn lang(self) -> Self {
        Self {
            language: true,
            ..self
        }
    }
}

const fn int(min: i64, max: i64) -> ValueShape {
    ValueShape::Integer { min, max }
}

const NON_NEGATIVE: ValueShape = int(0, i32::MAX as i64);

/// Macro to define `PropertyKind` with its registration table.
///
/// Usage: `property_kind!(Variant => KW => spec, ...)`
macro_rules! property_kind {
    (
        $(
            $(#[$attr:meta])*
            $variant:ident => $kw:ident => $spec:expr $(,)?
        )*
    ) => {
        /// Kind of calendar property.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[expect(missing_docs)]
        pub enum PropertyKind {
            $(
                $(#[$attr])*
                $variant,
            )*
            /// Experimental `X-` property or a name not known here, upper-cased
            Other(String),
        }

        impl PropertyKind {
            /// Every known property, in RFC section order except that DTSTART
            /// leads the date and time properties.
            pub const ALL: &[PropertyKind] = &[
                $(PropertyKind::$variant,)*
            ];

            /// Resolve a property name; names are case-insensitive.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                let name = name.to_ascii_uppercase();
                match name.as_str() {
                    $($kw => PropertyKind::$variant,)*
                    _ => PropertyKind::Other(name),
                }
            }

            /// The property name as written on the wire.
            #[must_use]
            pub fn name(&self) -> &str {
                match self {
                    $(PropertyKind::$variant => $kw,)*
                    PropertyKind::Other(name) => name,
                }
            }

            /// Registration entry of this property.
            #[must_use]
            pub fn spec(&self) -> PropertySpec {
                match self {
                    $(PropertyKind::$variant => $spec,)*
                    PropertyKind::Other(_) => PropertySpec::many(ValueShape::Raw),
                }
            }
        }
    };
}

property_kind! {
    // RFC 5545 3.7.1.  Calendar Scale
    CalScale        => KW_CALSCALE          => PropertySpec::one(ValueShape::Text),
    // RFC 5545 3.7.2.  Method
    Method          => KW_METHOD            => PropertySpec::one(ValueShape::Text),
    // RFC 5545 3.7.3.  Product Identifier
    ProdId          => KW_PRODID            => PropertySpec::one(ValueShape::Text),
    // RFC 5545 3.7.4.  Version
    Version         => KW_VERSION           => PropertySpec::one(ValueShape::Text),
    // RFC 5545 3.8.1.1.  Attachment
    Attach          => KW_ATTACH            => PropertySpec::many(ValueShape::Attachment),
    // RFC 5545 3.8.1.2.  Categories
    Categories      => KW_CATEGORIES        => PropertySpec::many(ValueShape::TextList).lang(),
    // RFC 5545 3.8.1.3.  Classification
    Class           => KW_CLASS             => PropertySpec::one(ValueShape::Token(KW_CLASS_VALUES)),
    // RFC 5545 3.8.1.4.  Comment
    Comment         => KW_COMMENT           => PropertySpec::many(ValueShape::Text).lang(),
    // RFC 5545 3.8.1.5.  Description
    Description     => KW_DESCRIPTION       => PropertySpec::one(ValueShape::Text).lang(),
    // RFC 5545 3.8.1.6.  Geographic Position
    Geo             => KW_GEO               => PropertySpec::one(ValueShape::Geo),
    // RFC 5545 3.8.1.7.  Location
    Location        => KW_LOCATION          => PropertySpec::one(ValueShape::Text).lang(),
    // RFC 5545 3.8.1.8.  Percent Complete
    PercentComplete => KW_PERCENT_COMPLETE  => PropertySpec::one(int(0, 100)),
    // RFC 5545 3.8.1.9.  Priority
    Priority        => KW_PRIORITY          => PropertySpec::one(int(0, 9)),
    // RFC 5545 3.8.1.10.  Resources
    Resources       => KW_RESOURCES         => PropertySpec::many(ValueShape::TextList).lang(),
    // RFC 5545 3.8.1.11.  Status
    Status          => KW_STATUS            => PropertySpec::one(ValueShape::Token(KW_STATUS_VALUES)),
    // RFC 5545 3.8.1.12.  Summary
    Summary         => KW_SUMMARY           => PropertySpec::one(ValueShape::Text).lang(),
    // RFC 5545 3.8.2.4.  Date-Time Start
    DtStart         => KW_DTSTART           => PropertySpec::one(ValueShape::DateTime),
    // RFC 5545 3.8.2.1.  Date-Time Completed
    Completed       => KW_COMPLETED         => PropertySpec::one(ValueShape::UtcDateTime),
    // RFC 5545 3.8.2.2.  Date-Time End
    DtEnd           => KW_DTEND             => PropertySpec::one(ValueShape::DateTime),
    // RFC 5545 3.8.2.3.  Date-Time Due
    Due             => KW_DUE               => PropertySpec::one(ValueShape::DateTime),
    // RFC 5545 3.8.2.5.  Duration
    Duration        => KW_DURATION          => PropertySpec::one(ValueShape::Duration),
    // RFC 5545 3.8.2.6.  Free/Busy Time
    FreeBusy        => KW_FREEBUSY          => PropertySpec::many(ValueShape::Periods),
    // RFC 5545 3.8.2.7.  Time Transparency
    Transp          => KW_TRANSP            => PropertySpec::one(ValueShape::Token(KW_TRANSP_VALUES)),
    // RFC 5545 3.8.3.1.  Time Zone Identifier
    TzId            => KW_TZID              => PropertySpec::one(ValueShape::Text),
    // RFC 5545 3.8.3.2.  Time Zone Name
    TzName          => KW_TZNAME            => PropertySpec::many(ValueShape::Text).lang(),
    // RFC 5545 3.8.3.3.  Time Zone Offset From
    TzOffsetFrom    => KW_TZOFFSETFROM      => PropertySpec::one(ValueShape::UtcOffset),
    // RFC 5545 3.8.3.4.  Time Zone Offset To
    TzOffsetTo      => KW_TZOFFSETTO        => PropertySpec::one(ValueShape::UtcOffset),
    // RFC 5545 3.8.3.5.  Time Zone URL
    TzUrl           => KW_TZURL             => PropertySpec::one(ValueShape::Uri),
    // RFC 5545 3.8.4.1.  Attendee
    Attendee        => KW_ATTENDEE          => PropertySpec::many(ValueShape::CalAddress),
    // RFC 5545 3.8.4.2.  Contact
    Contact         => KW_CONTACT           => PropertySpec::many(ValueShape::Text).lang(),
    // RFC 5545 3.8.4.3.  Organizer
    Organizer       => KW_ORGANIZER         => PropertySpec::one(ValueShape::CalAddress),
    // RFC 5545 3.8.4.4.  Recurrence ID
    RecurrenceId    => KW_RECURRENCE_ID     => PropertySpec::one(ValueShape::DateTime),
    // RFC 5545 3.8.4.5.  Related To
    RelatedTo       => KW_RELATED_TO        => PropertySpec::many(ValueShape::Text),
    // RFC 5545 3.8.4.6.  Uniform Resource Locator
    Url             => KW_URL               => PropertySpec::one(ValueShape::Uri),
    // RFC 5545 3.8.4.7.  Unique Identifier
    Uid             => KW_UID               => PropertySpec::one(ValueShape::Text),
    // RFC 5545 3.8.5.1.  Exception Date-Times
    ExDate          => KW_EXDATE            => PropertySpec::many(ValueShape::DateTimeList),
    // RFC 2445 4.8.5.2.  Exception Rule
    ExRule          => KW_EXRULE            => PropertySpec::one(ValueShape::Recur),
    // RFC 5545 3.8.5.2.  Recurrence Date-Times
    RDate           => KW_RDATE             => PropertySpec::many(ValueShape::RecurrenceDates),
    // RFC 5545 3.8.5.3.  Recurrence Rule
    RRule           => KW_RRULE             => PropertySpec::one(ValueShape::Recur),
    // RFC 5545 3.8.6.1.  Action
    Action          => KW_ACTION            => PropertySpec::one(ValueShape::Token(KW_ACTION_VALUES)),
    // RFC 5545 3.8.6.2.  Repeat Count
    Repeat          => KW_REPEAT            => PropertySpec::one(NON_NEGATIVE),
    // RFC 5545 3.8.6.3.  Trigger
    Trigger         => KW_TRIGGER           => PropertySpec::one(ValueShape::Trigger),
    // RFC 5545 3.8.7.1.  Date-Time Created
    Created         => KW_CREATED           => PropertySpec::one(ValueShape::UtcDateTime),
    // RFC 5545 3.8.7.2.  Date-Time Stamp
    DtStamp         => KW_DTSTAMP           => PropertySpec::one(ValueShape::UtcDateTime),
    // RFC 5545 3.8.7.3.  Last Modified
    LastModified    => KW_LAST_MODIFIED     => PropertySpec::one(ValueShape::UtcDateTime),
    // RFC 5545 3.8.7.4.  Sequence Number
    Sequence        => KW_SEQUENCE          => PropertySpec::one(NON_NEGATIVE),
    // RFC 5545 3.8.8.3.  Request Status
    RequestStatus   => KW_REQUEST_STATUS    => PropertySpec::many(ValueShape::RequestStatus).lang(),
    // RFC 7986 5.1.  Name
    Name            => KW_NAME              => PropertySpec::many(ValueShape::Text).lang(),
    // RFC 7986 5.7.  Refresh Interval
    RefreshInterval => KW_REFRESH_INTERVAL  => PropertySpec::one(ValueShape::Duration),
    // RFC 7986 5.8.  Source
    Source          => KW_SOURCE            => PropertySpec::one(ValueShape::Uri),
    // RFC 7986 5.9.  Color
    Color           => KW_COLOR             => PropertySpec::one(ValueShape::Text),
    // RFC 7986 5.10.  Image
    Image           => KW_IMAGE             => PropertySpec::many(ValueShape::Attachment),
    // RFC 7986 5.11.  Conference
    Conference      => KW_CONFERENCE        => PropertySpec::many(ValueShape::Uri),
    // RFC 7808 7.1.  Time Zone Upper Bound
    TzUntil         => KW_TZUNTIL           => PropertySpec::one(ValueShape::UtcDateTime),
    // RFC 7808 7.2.  Time Zone Identifier Alias Of
    TzidAliasOf     => KW_TZID_ALIAS_OF     => PropertySpec::many(ValueShape::Text),
    // RFC 9074 6.  Acknowledged
    Acknowledged    => KW_ACKNOWLEDGED      => PropertySpec::one(ValueShape::UtcDateTime),
    // RFC 9074 8.1.  Proximity
    Proximity       => KW_PROXIMITY         => PropertySpec::one(ValueShape::Token(KW_PROXIMITY_VALUES)),
    // RFC 9073 6.1.  Location Type
    LocationType    => KW_LOCATION_TYPE     => PropertySpec::one(ValueShape::TextList),
    // RFC 9073 6.2.  Participant Type
    ParticipantType => KW_PARTICIPANT_TYPE  => PropertySpec::one(ValueShape::Text),
    // RFC 9073 6.3.  Resource Type
    ResourceType    => KW_RESOURCE_TYPE     => PropertySpec::one(ValueShape::Text),
    // RFC 9073 6.4.  Calendar Address
    CalendarAddress => KW_CALENDAR_ADDRESS  => PropertySpec::one(ValueShape::CalAddress),
    // RFC 9073 6.5.  Styled Description
    StyledDescription => KW_STYLED_DESCRIPTION => PropertySpec::many(ValueShape::Text).lang(),
    // RFC 9073 6.6.  Structured Data
    StructuredData  => KW_STRUCTURED_DATA   => PropertySpec::many(ValueShape::Attachment),
}

impl PropertyKind {
    /// Whether this is an `X-` property.
    #[must_use]
    pub fn is_experimental(&self) -> bool {
        matches!(self, PropertyKind::Other(name) if name.starts_with("X-"))
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<&str> for PropertyKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_case_insensitively() {
        assert_eq!(PropertyKind::from_name("dtstart"), PropertyKind::DtStart);
        assert_eq!(PropertyKind::from_name("Refresh-Interval"), PropertyKind::RefreshInterval);
        assert_eq!(
            PropertyKind::from_name("x-wr-calname"),
            PropertyKind::Other("X-WR-CALNAME".to_string())
        );
        assert!(PropertyKind::from_name("X-FOO").is_experimental());
        assert!(!PropertyKind::from_name("FOO").is_experimental());
    }

    #[test]
    fn names_round_trip() {
        assert!(PropertyKind::ALL.len() >= 60);
        for kind in PropertyKind::ALL {
            assert_eq!(&PropertyKind::from_name(kind.name()), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn registration_table() {
        let spec = PropertyKind::Attendee.spec();
        assert_eq!(spec.shape, ValueShape::CalAddress);
        assert!(spec.multiple);

        let spec = PropertyKind::Completed.spec();
        assert_eq!(spec.shape, ValueShape::UtcDateTime);
        assert!(!spec.multiple);

        assert_eq!(PropertyKind::Priority.spec().shape, int(0, 9));
        assert!(PropertyKind::Summary.spec().language);
        assert!(!PropertyKind::Uid.spec().language);
        assert_eq!(
            PropertyKind::Other("X-FOO".to_string()).spec().shape,
            ValueShape::Raw
        );
    }
}
