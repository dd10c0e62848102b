// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the content line codec and the value types.

use calvalue_ical::error::{Error, InvalidArgument};
use calvalue_ical::formatter::{FormatOptions, Parameters, format_line};
use calvalue_ical::parser::parse_line;
use calvalue_ical::value::{DateTime, Duration, Period, PeriodEnd, RecurrenceRule, SignPolicy};
use calvalue_ical::{PropertyKind, PropertyValue, ValueKind};

#[test]
fn test_format_line_escapes_text() {
    let line = format_line("DESCRIPTION", &Parameters::new(), "a,b;c", ValueKind::Text);
    assert_eq!(line, "DESCRIPTION:a\\,b\\;c\r\n");
}

#[test]
fn test_format_line_folds_long_text() {
    let value = "The quick brown fox, jumps over the lazy dog; ".repeat(4);
    let line = format_line("DESCRIPTION", &Parameters::new(), &value, ValueKind::Text);

    let physical: Vec<_> = line.trim_end_matches("\r\n").split("\r\n").collect();
    assert!(physical.len() > 1);
    assert!(physical.iter().all(|a| a.len() <= 75));
    assert!(physical.iter().skip(1).all(|a| a.starts_with(' ')));

    let parsed = parse_line(&line).unwrap();
    assert_eq!(parsed.name, "DESCRIPTION");
    let decoded =
        PropertyValue::decode(&PropertyKind::Description, &parsed.value, &parsed.params, None)
            .unwrap();
    assert_eq!(decoded, PropertyValue::Text(value));
}

#[test]
fn test_parse_line_inverts_format_line() {
    let params = Parameters::new()
        .with("CN", "Doe, Jane")
        .with("ROLE", "REQ-PARTICIPANT");
    let line = FormatOptions::default().format_encoded_line(
        "ATTENDEE",
        &params,
        "mailto:jane@example.com",
    );
    assert_eq!(
        line,
        "ATTENDEE;CN=\"Doe, Jane\";ROLE=REQ-PARTICIPANT:mailto:jane@example.com\r\n"
    );

    let parsed = parse_line(&line).unwrap();
    assert_eq!(parsed.name, "ATTENDEE");
    assert_eq!(parsed.params, params);
    assert_eq!(parsed.value, "mailto:jane@example.com");
}

#[test]
fn test_duration_week_form() {
    let duration = Duration::parse("P1W").unwrap();
    assert_eq!(
        duration,
        Duration {
            weeks: 1,
            ..Duration::zero()
        }
    );
    assert!(!duration.negative);
    assert_eq!(duration.format(SignPolicy::Signed), "P1W");
}

#[test]
fn test_negative_duration_as_trigger() {
    let duration = Duration::parse("-PT30M").unwrap();
    assert!(duration.negative);
    assert_eq!(duration.minutes, 30);
    assert_eq!(duration.format(SignPolicy::AlwaysPositive), "PT30M");
    assert_eq!(duration.to_seconds(), -1800);

    let value =
        PropertyValue::decode(&PropertyKind::Trigger, "-PT30M", &Parameters::new(), None).unwrap();
    let PropertyValue::Trigger(trigger) = &value else {
        panic!("expected a trigger, got {value:?}");
    };
    assert_eq!(trigger.offset(), Some(duration));
    assert!(matches!(
        trigger,
        calvalue_ical::Trigger::Relative { before: true, duration, .. } if !duration.negative
    ));
}

#[test]
fn test_recurrence_rule_scenarios() {
    let rule = RecurrenceRule::parse("FREQ=WEEKLY;BYDAY=MO,WE;COUNT=5", None).unwrap();
    assert_eq!(rule.count, Some(5));
    assert_eq!(rule.by_day.len(), 2);
    assert_eq!(rule.format(), "FREQ=WEEKLY;COUNT=5;BYDAY=MO,WE");

    let err = RecurrenceRule::parse("FREQ=WEEKLY;UNTIL=20300101;COUNT=5", None).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidArgument(InvalidArgument::ConflictingTermination)
    );
}

#[test]
fn test_period_is_built_through_validation() {
    let start = DateTime::parse("20230615T100000", Some("Europe/Berlin")).unwrap();
    let end = DateTime::parse("20230615T120000", Some("Europe/Berlin")).unwrap();
    let period = Period::new(start, PeriodEnd::Explicit(end)).unwrap();
    assert_eq!(period.start().to_string(), "20230615T080000Z");
    assert_eq!(
        period.end(),
        &PeriodEnd::Explicit(DateTime::parse("20230615T100000Z", None).unwrap())
    );

    let start = DateTime::parse("20230615T100000Z", None).unwrap();
    let end = DateTime::parse("20230615T090000Z", None).unwrap();
    let err = Period::new(start, PeriodEnd::Explicit(end)).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgument(InvalidArgument::PeriodEndBeforeStart { .. })
    ));

    let start = DateTime::parse("20230615", None).unwrap();
    let hour = PeriodEnd::Duration(Duration::parse("PT1H").unwrap());
    let err = Period::new(start, hour).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgument(InvalidArgument::PeriodStartIsDate { .. })
    ));
}

#[test]
fn test_period_forms_are_preserved() {
    let explicit = Period::parse_str("19970101T180000Z/19970102T070000Z", None).unwrap();
    assert!(matches!(explicit.end(), PeriodEnd::Explicit(_)));
    assert_eq!(explicit.format(), "19970101T180000Z/19970102T070000Z");

    let relative = Period::parse_str("19970101T180000Z/PT5H30M", None).unwrap();
    assert!(matches!(relative.end(), PeriodEnd::Duration(_)));
    assert_eq!(relative.format(), "19970101T180000Z/PT5H30M");
    assert_eq!(
        relative.end_instant(),
        Some(DateTime::parse("19970101T233000Z", None).unwrap())
    );

    assert!(Period::parse_str("19970101T180000Z/nonsense", None).is_err());
    assert!(Period::parse_str("19970102T180000Z/19970101T070000Z", None).is_err());
}

#[test]
fn test_date_time_modes() {
    #[rustfmt::skip]
    let cases = [
        ("20240101",         None,                 "20240101",         "20240101"),
        ("20240101T120000",  None,                 "20240101T120000",  "20240101T120000Z"),
        ("20240101T120000Z", None,                 "20240101T120000Z", "20240101T120000Z"),
        ("20240101T120000",  Some("Europe/Paris"), "20240101T120000",  "20240101T110000Z"),
    ];
    for (raw, tz_id, plain, utc) in cases {
        let dt = DateTime::parse(raw, tz_id).unwrap();
        assert_eq!(dt.format(false, false), plain, "Failed for {raw}");
        assert_eq!(dt.format(false, true), utc, "Failed for {raw}");
    }

    for raw in ["2024010", "2024-01-01", "20241301", "20240230", "20240101T250000"] {
        assert!(DateTime::parse(raw, None).is_err(), "Parse {raw} should fail");
    }
}
