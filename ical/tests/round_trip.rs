// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Round-trip tests for the value types and the property store.
//!
//! These tests verify that formatting and parsing again produces equal
//! values, and that content lines survive import followed by create.

use calvalue_ical::value::{DateTime, Duration, RecurrenceRule, SignPolicy};
use calvalue_ical::{Config, FormatOptions, PropertyStore};

#[test]
fn round_trip_durations() {
    let cases = [
        Duration::zero(),
        Duration::parse("P1W").unwrap(),
        Duration::parse("-P2W").unwrap(),
        Duration::parse("P15DT5H0M20S").unwrap(),
        Duration::parse("PT1H").unwrap(),
        Duration::parse("-PT45S").unwrap(),
        Duration::parse("-PT0S").unwrap(),
        Duration::parse("-P0D").unwrap(),
        Duration::from_components(1, 2, 0, 0, 0).unwrap(),
        Duration::from_components(0, 0, 26, 0, 0).unwrap(),
    ];
    for duration in cases {
        let text = duration.format(SignPolicy::Signed);
        assert_eq!(Duration::parse(&text).unwrap(), duration, "Failed for {text}");
    }
}

#[test]
fn round_trip_recurrence_rules() {
    let cases = [
        "FREQ=DAILY;COUNT=10",
        "FREQ=WEEKLY;UNTIL=19971224T000000Z;WKST=SU;BYDAY=TU,TH",
        "FREQ=MONTHLY;BYDAY=-1FR;INTERVAL=2",
        "FREQ=YEARLY;BYMONTH=1;BYDAY=SU,MO,TU,WE,TH,FR,SA",
        "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1",
        "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO",
        "FREQ=HOURLY;INTERVAL=3;UNTIL=19970902T170000Z",
        "FREQ=MINUTELY;BYHOUR=9,10,11;BYMINUTE=0,20,40",
    ];
    for raw in cases {
        let rule = RecurrenceRule::parse(raw, None).unwrap();
        let formatted = rule.format();
        assert_eq!(
            RecurrenceRule::parse(&formatted, None).unwrap(),
            rule,
            "Failed for {raw} -> {formatted}"
        );
    }
}

#[test]
fn round_trip_utc_date_times() {
    for raw in ["19970714T173000Z", "20000229T000000Z", "20381231T235959Z"] {
        let dt = DateTime::parse(raw, None).unwrap();
        assert!(dt.is_utc());
        let formatted = dt.format(false, false);
        assert_eq!(formatted, raw);
        assert_eq!(DateTime::parse(&formatted, None).unwrap(), dt);
    }
}

#[test]
fn round_trip_component() {
    let original = "\
DTSTAMP:19970610T172345Z\r\n\
DTSTART;TZID=America/New_York:19970714T133000\r\n\
DTEND;TZID=America/New_York:19970714T140000\r\n\
SUMMARY:Lunch\\, then the review\r\n\
CATEGORIES:BUSINESS,HUMAN RESOURCES\r\n\
GEO:37.386013;-122.082932\r\n\
PRIORITY:1\r\n\
STATUS:CONFIRMED\r\n\
ATTENDEE;CN=\"Doe, Jane\";ROLE=CHAIR:mailto:jane@example.com\r\n\
ATTENDEE;RSVP=TRUE:mailto:john@example.com\r\n\
UID:19970610T172345Z-AF23B2@example.com\r\n\
RDATE;VALUE=PERIOD:19970715T180000Z/PT2H\r\n\
RRULE:FREQ=WEEKLY;COUNT=4;BYDAY=MO\r\n\
TRIGGER;RELATED=END:-PT15M\r\n\
X-CUSTOM;X-PARAM=1:anything\\,goes\r\n";

    let mut store = PropertyStore::default();
    store.import(original).unwrap();
    let formatted = store.create_all();

    let mut again = PropertyStore::default();
    again.import(&formatted).unwrap();
    assert_eq!(again.create_all(), formatted);

    for line in original.split_inclusive("\r\n") {
        assert!(formatted.contains(line), "missing {line:?} in\n{formatted}");
    }
}

#[test]
fn round_trip_folded_lines() {
    let config = Config {
        format: FormatOptions::default().folding(Some(40)),
        ..Config::default()
    };
    let mut store = PropertyStore::new(config);
    let description = "Zeile für Zeile, 日本語; with escapes\nand a second line that is long";
    store
        .set_description(description, calvalue_ical::Parameters::new())
        .unwrap();

    let formatted = store.create_all();
    assert!(formatted.lines().count() > 1);

    let mut again = PropertyStore::default();
    again.import(&formatted).unwrap();
    assert_eq!(
        again
            .get(&calvalue_ical::PropertyKind::Description)
            .and_then(calvalue_ical::PropertyValue::as_text),
        Some(description)
    );
}
