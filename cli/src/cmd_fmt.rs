// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io::Write, path::PathBuf};

use calvalue_ical::formatter::FoldingStyle;
use calvalue_ical::{Config, Error as IcalError, PropertyStore};
use clap::{ArgMatches, Command, arg, value_parser};

use crate::arg::{CommonArgs, read_input};

/// Re-emit content lines in canonical form.
#[derive(Debug, Clone, Default)]
pub struct CmdFmt {
    pub input: Option<PathBuf>,
    pub fold: Option<usize>,
    pub no_fold: bool,
    pub tab: bool,
    pub uid: bool,
    pub dtstamp: bool,
}

impl CmdFmt {
    pub const NAME: &str = "fmt";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Normalize content lines and print them in canonical order")
            .arg(CommonArgs::input())
            .arg(
                arg!(--fold <WIDTH> "Fold lines longer than WIDTH octets")
                    .value_parser(value_parser!(u16).range(8..)),
            )
            .arg(arg!(--"no-fold" "Do not fold long lines").conflicts_with("fold"))
            .arg(arg!(--tab "Fold with a TAB instead of a SPACE"))
            .arg(arg!(--uid "Generate a UID if there is none"))
            .arg(arg!(--dtstamp "Set DTSTAMP to the current time if there is none"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            input: CommonArgs::get_input(matches),
            fold: matches.get_one::<u16>("fold").map(|a| usize::from(*a)),
            no_fold: matches.get_flag("no-fold"),
            tab: matches.get_flag("tab"),
            uid: matches.get_flag("uid"),
            dtstamp: matches.get_flag("dtstamp"),
        }
    }

    pub fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "formatting content lines...");
        let text = read_input(self.input.as_deref())?;
        let formatted = self.format(config, &text)?;
        std::io::stdout().lock().write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Import the text into a store configured by `config` and the flags,
    /// then create every property again.
    pub fn format(&self, mut config: Config, text: &str) -> Result<String, IcalError> {
        if self.no_fold {
            config.format.folding = None;
        } else if let Some(width) = self.fold {
            config.format.folding = Some(width);
        }
        if self.tab {
            config.format.folding_style = FoldingStyle::Tab;
        }

        let mut store = PropertyStore::new(config);
        store.import(text)?;
        if self.uid {
            let uid = store.ensure_uid()?;
            tracing::info!(uid = %uid, "uid ensured");
        }
        if self.dtstamp {
            store.ensure_dtstamp()?;
        }
        Ok(store.create_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calvalue_ical::PropertyKind;

    #[test]
    fn test_parse_fmt() {
        let cmd = Command::new("test").subcommand(CmdFmt::command());
        let matches = cmd
            .try_get_matches_from(["test", "fmt", "--fold", "40", "--tab", "--uid", "a.txt"])
            .unwrap();
        let parsed = CmdFmt::from(matches.subcommand_matches("fmt").unwrap());
        assert_eq!(parsed.input, Some(PathBuf::from("a.txt")));
        assert_eq!(parsed.fold, Some(40));
        assert!(parsed.tab && parsed.uid && !parsed.no_fold && !parsed.dtstamp);

        let cmd = Command::new("test").subcommand(CmdFmt::command());
        assert!(
            cmd.try_get_matches_from(["test", "fmt", "--fold", "40", "--no-fold"])
                .is_err()
        );
    }

    #[test]
    fn test_format_canonical_order() {
        let text = "summary:Lunch\r\n\
                    dtend;tzid=Europe/Paris:20240110T130000\r\n\
                    DTSTART;TZID=Europe/Paris:20240110T120000\r\n\
                    status:confirmed\r\n";
        let formatted = CmdFmt::default().format(Config::default(), text).unwrap();
        assert_eq!(
            formatted,
            "STATUS:CONFIRMED\r\n\
             SUMMARY:Lunch\r\n\
             DTSTART;TZID=Europe/Paris:20240110T120000\r\n\
             DTEND;TZID=Europe/Paris:20240110T130000\r\n"
        );
    }

    #[test]
    fn test_format_folding_flags() {
        let text = format!("DESCRIPTION:{}\r\n", "word ".repeat(30));

        let cmd = CmdFmt {
            fold: Some(20),
            tab: true,
            ..CmdFmt::default()
        };
        let formatted = cmd.format(Config::default(), &text).unwrap();
        assert!(formatted.contains("\r\n\t"));
        assert!(formatted.split("\r\n").all(|a| a.len() <= 20));

        let cmd = CmdFmt {
            no_fold: true,
            ..CmdFmt::default()
        };
        let formatted = cmd.format(Config::default(), &text).unwrap();
        assert_eq!(formatted.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_format_generates_uid() {
        let config = Config {
            unique_id: "example.com".to_string(),
            ..Config::default()
        };
        let cmd = CmdFmt {
            uid: true,
            ..CmdFmt::default()
        };
        let formatted = cmd.format(config, "SUMMARY:x\r\n").unwrap();
        let uid = formatted
            .lines()
            .find_map(|a| a.strip_prefix("UID:"))
            .unwrap();
        assert!(uid.ends_with("@example.com"));

        let cmd = CmdFmt {
            uid: true,
            ..CmdFmt::default()
        };
        let mut store = PropertyStore::default();
        store.import(&cmd.format(Config::default(), "UID:keep-me\r\n").unwrap()).unwrap();
        assert_eq!(
            store.get(&PropertyKind::Uid).and_then(|a| a.as_text()),
            Some("keep-me")
        );
    }

    #[test]
    fn test_format_stops_at_first_error() {
        let err = CmdFmt::default()
            .format(Config::default(), "PRIORITY:1\r\nPRIORITY:x\r\n")
            .unwrap_err();
        assert!(matches!(err, IcalError::Parse(_) | IcalError::InvalidArgument(_)));
    }
}
