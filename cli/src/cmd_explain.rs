// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    io::{self, Write},
};

use calvalue_ical::property::{PropertySpec, ValueShape};
use calvalue_ical::{Config, Error as IcalError, PropertyKind, PropertyValue, parse_line};
use clap::{ArgMatches, Command, arg};
use colored::Colorize;

/// Describe properties, or decode a single content line.
#[derive(Debug, Clone)]
pub struct CmdExplain {
    pub target: Option<String>,
}

impl CmdExplain {
    pub const NAME: &str = "explain";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Describe a property, or decode a content line such as `DUE:20240101`")
            .long_about(
                "\
Without an argument, list every known property. With a property name, show how \
its value is checked. With a content line, decode it and print the canonical form.",
            )
            .arg(arg!(target: [TARGET] "Property name or content line"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            target: matches.get_one("target").cloned(),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "explaining...");
        let mut stdout = io::stdout().lock();
        match self.target.as_deref() {
            None => Self::list(&mut stdout)?,
            Some(line) if line.contains(':') => {
                Self::explain_line(config, line, &mut stdout)?;
            }
            Some(name) => Self::describe(&PropertyKind::from_name(name), &mut stdout)?,
        }
        Ok(())
    }

    pub fn list(out: &mut impl Write) -> io::Result<()> {
        for kind in PropertyKind::ALL {
            let spec = kind.spec();
            writeln!(
                out,
                "{:<20} {}{}",
                kind.name().bold(),
                shape_name(spec.shape),
                if spec.multiple { ", repeatable" } else { "" }
            )?;
        }
        Ok(())
    }

    pub fn describe(kind: &PropertyKind, out: &mut impl Write) -> io::Result<()> {
        let PropertySpec {
            shape,
            multiple,
            language,
        } = kind.spec();

        writeln!(out, "{}", kind.name().bold())?;
        if kind.is_experimental() {
            writeln!(out, "  experimental, kept verbatim")?;
        } else if matches!(kind, PropertyKind::Other(_)) {
            writeln!(out, "  unknown, kept verbatim")?;
        }
        writeln!(out, "  value:      {}", shape_name(shape))?;
        writeln!(out, "  repeatable: {}", yes_no(multiple))?;
        writeln!(out, "  LANGUAGE:   {}", yes_no(language))?;
        Ok(())
    }

    /// Decode one content line and print the value and its canonical line.
    pub fn explain_line(
        config: &Config,
        line: &str,
        out: &mut impl Write,
    ) -> Result<PropertyValue, Box<dyn Error>> {
        let line = parse_line(line).map_err(IcalError::from)?;
        let kind = PropertyKind::from_name(&line.name);
        let value = PropertyValue::decode(&kind, &line.value, &line.params, None)?;
        let (encoded, params) = value.encode(&kind, &line.params);
        let canonical = config
            .format
            .format_encoded_line(kind.name(), &params, &encoded);

        writeln!(out, "{}", kind.name().bold())?;
        writeln!(out, "  value type: {}", value.kind())?;
        writeln!(out, "  decoded:    {value:?}")?;
        write!(out, "{}", canonical.green())?;
        Ok(value)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn shape_name(shape: ValueShape) -> String {
    match shape {
        ValueShape::Text => "TEXT".to_string(),
        ValueShape::TextList => "TEXT list".to_string(),
        ValueShape::Token(tokens) => format!("one of {} or an X- name", tokens.join(", ")),
        ValueShape::Integer { min, max } => format!("INTEGER {min}..={max}"),
        ValueShape::Geo => "FLOAT;FLOAT latitude and longitude".to_string(),
        ValueShape::Uri => "URI".to_string(),
        ValueShape::CalAddress => "CAL-ADDRESS".to_string(),
        ValueShape::DateTime => "DATE or DATE-TIME".to_string(),
        ValueShape::UtcDateTime => "DATE-TIME in UTC".to_string(),
        ValueShape::DateTimeList => "DATE or DATE-TIME list".to_string(),
        ValueShape::RecurrenceDates => "DATE, DATE-TIME or PERIOD list".to_string(),
        ValueShape::Periods => "PERIOD list".to_string(),
        ValueShape::Duration => "positive DURATION".to_string(),
        ValueShape::Trigger => "DURATION or DATE-TIME".to_string(),
        ValueShape::Recur => "RECUR".to_string(),
        ValueShape::UtcOffset => "UTC-OFFSET".to_string(),
        ValueShape::RequestStatus => "statcode;statdesc[;extdata]".to_string(),
        ValueShape::Attachment => "URI or BINARY".to_string(),
        ValueShape::Raw => "any, unparsed".to_string(),
    }
}
