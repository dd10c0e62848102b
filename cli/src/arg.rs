// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use clap::{Arg, ArgAction, ArgMatches, ValueHint, arg, value_parser};

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn input() -> Arg {
        arg!(input: [FILE] "File with content lines, reads stdin when omitted or `-`")
            .value_parser(value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath)
    }

    pub fn get_input(matches: &ArgMatches) -> Option<PathBuf> {
        matches
            .get_one::<PathBuf>("input")
            .filter(|a| a.as_os_str() != "-")
            .cloned()
    }

    pub fn verbose() -> Arg {
        arg!(-v --verbose "Log more, repeat for debug and trace output")
            .action(ArgAction::Count)
            .global(true)
    }

    pub fn get_verbose(matches: &ArgMatches) -> u8 {
        matches.get_count("verbose")
    }
}

/// Read the whole input, from the file if given or from stdin.
pub fn read_input(path: Option<&Path>) -> Result<String, Box<dyn Error>> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading input file");
            fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
        }
        None => {
            tracing::debug!("reading stdin");
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn command() -> Command {
        Command::new("test")
            .arg(CommonArgs::input())
            .arg(CommonArgs::verbose())
    }

    #[test]
    fn test_parse_input() {
        let matches = command().try_get_matches_from(["test", "a.ics"]).unwrap();
        assert_eq!(CommonArgs::get_input(&matches), Some(PathBuf::from("a.ics")));

        let matches = command().try_get_matches_from(["test", "-"]).unwrap();
        assert_eq!(CommonArgs::get_input(&matches), None);

        let matches = command().try_get_matches_from(["test"]).unwrap();
        assert_eq!(CommonArgs::get_input(&matches), None);
    }

    #[test]
    fn test_parse_verbose() {
        let matches = command().try_get_matches_from(["test", "-vv"]).unwrap();
        assert_eq!(CommonArgs::get_verbose(&matches), 2);
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props.txt");
        fs::write(&path, "SUMMARY:x\r\n").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "SUMMARY:x\r\n");
        assert!(read_input(Some(&dir.path().join("missing.txt"))).is_err());
    }
}
