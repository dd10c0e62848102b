// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
};

use calvalue_ical::parser::split_lines;
use calvalue_ical::{Config, Error as IcalError, PropertyKind, PropertyStore};
use clap::{ArgMatches, Command, arg};
use colored::Colorize;

use crate::arg::{CommonArgs, read_input};

#[derive(Debug, Clone)]
pub struct CmdCheck {
    pub input: Option<PathBuf>,
    pub quiet: bool,
}

impl CmdCheck {
    pub const NAME: &str = "check";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Validate content lines as the properties of one component")
            .arg(CommonArgs::input())
            .arg(arg!(-q --quiet "Only print the rejected lines"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            input: CommonArgs::get_input(matches),
            quiet: matches.get_flag("quiet"),
        }
    }

    pub fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "checking content lines...");
        let text = read_input(self.input.as_deref())?;
        let report = Self::check(config, &text);

        let mut stdout = io::stdout().lock();
        report.write(&mut stdout, self.quiet)?;
        match report.rejected.len() {
            0 => Ok(()),
            n => Err(format!("{n} of {} lines rejected", report.total()).into()),
        }
    }

    /// Import every logical line into a fresh store, collecting the failures
    /// instead of stopping at the first one. Rejected lines leave the store
    /// untouched, so later lines are checked against the accepted ones only.
    pub fn check(config: Config, text: &str) -> CheckReport {
        let mut store = PropertyStore::new(config);
        let mut report = CheckReport::default();
        for (i, line) in split_lines(text).into_iter().enumerate() {
            match store.import_line(&line) {
                Ok(kind) => report.accepted.push(kind),
                Err(error) => {
                    tracing::info!(line = i + 1, %error, "line rejected");
                    report.rejected.push(Rejected {
                        line: i + 1,
                        text: line,
                        error,
                    });
                }
            }
        }
        report
    }
}

/// Outcome of [`CmdCheck::check`].
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Properties of the accepted lines, in input order
    pub accepted: Vec<PropertyKind>,
    /// Rejected lines, in input order
    pub rejected: Vec<Rejected>,
}

/// A line the store refused.
#[derive(Debug)]
pub struct Rejected {
    /// 1-based number of the logical (unfolded) line
    pub line: usize,
    pub text: String,
    pub error: IcalError,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn write(&self, out: &mut impl Write, quiet: bool) -> io::Result<()> {
        for rejected in &self.rejected {
            writeln!(
                out,
                "{} {} {}",
                "✗".red(),
                format!("line {}:", rejected.line).bold(),
                rejected.error
            )?;
            writeln!(out, "    {}", rejected.text.dimmed())?;
        }

        if !quiet {
            let summary = format!(
                "{} lines, {} accepted, {} rejected",
                self.total(),
                self.accepted.len(),
                self.rejected.len()
            );
            if self.rejected.is_empty() {
                writeln!(out, "{} {}", "✓".green(), summary)?;
            } else {
                writeln!(out, "{}", summary.yellow())?;
            }
        }
        Ok(())
    }
}
