// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content line formatter (RFC 5545 Section 3.1).
//!
//! Turns a `(name, parameters, value)` triple into a folded content line
//! `NAME[;PARAM=VALUE...]:VALUE` terminated by CRLF, writing to any
//! `std::io::Write` implementer.
//!
//! # Example
//!
//! ```
//! use calvalue_ical::formatter::{Parameters, format_line};
//! use calvalue_ical::value::ValueKind;
//!
//! let line = format_line("DESCRIPTION", &Parameters::new(), "a,b;c", ValueKind::Text);
//! assert_eq!(line, "DESCRIPTION:a\\,b\\;c\r\n");
//! ```

mod parameter;
mod text;

pub use parameter::{ParamValue, Parameters};
pub(crate) use parameter::decode_caret;
pub use text::{escape_text, split_text_list, unescape_text};

use std::io::{self, Write};

use crate::value::ValueKind;

/// Format a content line with the default options.
///
/// TEXT values are escaped, every other kind is written verbatim.
#[must_use]
pub fn format_line(name: &str, params: &Parameters, value: &str, kind: ValueKind) -> String {
    FormatOptions::default().format_line(name, params, value, kind)
}

/// Formatting options for the content line formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)` for RFC 5545 compliance.
    pub folding: Option<usize>,

    /// Line folding style.
    ///
    /// Default: `FoldingStyle::Space` (CRLF + SPACE).
    pub folding_style: FoldingStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            folding: Some(75),
            folding_style: FoldingStyle::default(),
        }
    }
}

impl FormatOptions {
    /// Set the line folding option.
    #[must_use]
    pub fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }

    /// Set the line folding style.
    #[must_use]
    pub const fn folding_style(mut self, style: FoldingStyle) -> Self {
        self.folding_style = style;
        self
    }

    /// Format a content line, escaping TEXT values.
    #[must_use]
    pub fn format_line(&self, name: &str, params: &Parameters, value: &str, kind: ValueKind) -> String {
        if kind == ValueKind::Text {
            self.format_encoded_line(name, params, &escape_text(value))
        } else {
            self.format_encoded_line(name, params, value)
        }
    }

    /// Format a content line whose value is already in wire form.
    #[must_use]
    pub fn format_encoded_line(&self, name: &str, params: &Parameters, value: &str) -> String {
        let mut buffer = Vec::new();
        let mut formatter = Formatter::new(&mut buffer, *self);
        if let Err(err) = formatter.write_line(name, params, value) {
            tracing::warn!(%err, name, "failed to write content line");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Line folding style for RFC 5545 formatting.
///
/// RFC 5545 specifies that folded lines should start with CRLF followed by
/// a whitespace character (SPACE or TAB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldingStyle {
    /// CRLF + SPACE (RFC 5545 default)
    #[default]
    Space,
    /// CRLF + TAB
    Tab,
}

impl FoldingStyle {
    /// Get the folding sequence for this style.
    #[must_use]
    pub(crate) const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Space => b"\r\n ",
            Self::Tab => b"\r\n\t",
        }
    }

    /// Get the length of the continuation character after CRLF.
    #[must_use]
    pub(crate) const fn continuation_len() -> usize {
        1 // Both SPACE and TAB are 1 byte
    }
}

/// Content line formatter that writes to any `Write` implementer.
///
/// # Example
///
/// ```
/// use calvalue_ical::formatter::{FormatOptions, Formatter, Parameters};
///
/// let mut buffer = Vec::new();
/// let mut formatter = Formatter::new(&mut buffer, FormatOptions::default());
/// formatter.write_line("SUMMARY", &Parameters::new(), "Team sync")?;
/// assert_eq!(buffer, b"SUMMARY:Team sync\r\n");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Formatter<W: Write> {
    /// The underlying writer.
    writer: W,
    /// Formatting options.
    options: FormatOptions,
    /// Current line length in bytes (excluding the pending CRLF).
    line_length: usize,
}

impl<W: Write> Formatter<W> {
    /// Create a new formatter with options.
    #[must_use]
    pub fn new(writer: W, options: FormatOptions) -> Self {
        Self {
            writer,
            options,
            line_length: 0,
        }
    }

    /// Consumes this formatter, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write one content line; `value` must already be in wire form.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_line(&mut self, name: &str, params: &Parameters, value: &str) -> io::Result<()> {
        self.write_folded(&name.to_ascii_uppercase())?;
        self.write_folded(&params.to_string())?;
        self.write_folded(":")?;
        self.write_folded(value)?;
        self.writeln()
    }

    /// Write a CRLF line ending.
    fn writeln(&mut self) -> io::Result<()> {
        write!(self.writer, "\r\n")?;
        self.line_length = 0;
        Ok(())
    }

    /// Insert line folding: CRLF + whitespace.
    ///
    /// This inserts the RFC 5545 line folding sequence and updates the
    /// line length counter (the whitespace after CRLF counts as 1 byte).
    fn insert_fold(&mut self) -> io::Result<()> {
        self.writer
            .write_all(self.options.folding_style.as_bytes())?;
        self.line_length = FoldingStyle::continuation_len();
        Ok(())
    }

    /// Write text, folding before any unit that would exceed the limit.
    ///
    /// A unit is one UTF-8 character, or a backslash escape together with
    /// the character it escapes, so neither is split across lines.
    fn write_folded(&mut self, s: &str) -> io::Result<()> {
        let Some(max_len) = self.options.folding else {
            // Folding disabled, write directly
            self.writer.write_all(s.as_bytes())?;
            self.line_length += s.len();
            return Ok(());
        };

        let mut chars = s.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            let mut end = start + c.len_utf8();
            if c == '\\' {
                if let Some((i, next)) = chars.next() {
                    end = i + next.len_utf8();
                }
            }

            let unit = &s[start..end];
            if self.line_length + unit.len() > max_len
                && self.line_length > FoldingStyle::continuation_len()
            {
                self.insert_fold()?;
            }
            self.writer.write_all(unit.as_bytes())?;
            self.line_length += unit.len();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn octets_per_line(s: &str) -> Vec<usize> {
        s.trim_end_matches("\r\n").split("\r\n").map(str::len).collect()
    }

    #[test]
    fn formats_simple_lines() {
        let params = Parameters::new().with("TZID", "Europe/Paris");
        #[rustfmt::skip]
        let cases = [
            ("DTSTART",     &params,            "20240101T090000", ValueKind::DateTime, "DTSTART;TZID=Europe/Paris:20240101T090000\r\n"),
            ("description", &Parameters::new(), "a,b;c",           ValueKind::Text,     "DESCRIPTION:a\\,b\\;c\r\n"),
            ("RRULE",       &Parameters::new(), "FREQ=DAILY;COUNT=2", ValueKind::Recur, "RRULE:FREQ=DAILY;COUNT=2\r\n"),
        ];
        for (name, params, value, kind, expected) in cases {
            assert_eq!(format_line(name, params, value, kind), expected);
        }
    }

    #[test]
    fn folds_long_lines_at_75_octets() {
        let value = "x".repeat(200);
        let line = format_line("DESCRIPTION", &Parameters::new(), &value, ValueKind::Text);
        let lengths = octets_per_line(&line);
        assert_eq!(lengths[0], 75);
        assert!(lengths.iter().all(|&n| n <= 75), "{lengths:?}");
        assert!(line.contains("\r\n x"));

        let unfolded = line.replace("\r\n ", "");
        assert_eq!(unfolded, format!("DESCRIPTION:{value}\r\n"));
    }

    #[test]
    fn never_splits_utf8_or_escapes() {
        let value = "日本語のテキスト,".repeat(12);
        let line = format_line("SUMMARY", &Parameters::new(), &value, ValueKind::Text);
        assert!(octets_per_line(&line).iter().all(|&n| n <= 75));
        for segment in line.split("\r\n ") {
            assert!(!segment.ends_with('\\'), "escape split in {segment:?}");
        }
        let unfolded = line.replace("\r\n ", "");
        assert_eq!(unfolded, format!("SUMMARY:{}\r\n", escape_text(&value)));
    }

    #[test]
    fn folding_options() {
        let value = "y".repeat(100);

        let options = FormatOptions::default().folding(None);
        let line = options.format_line("COMMENT", &Parameters::new(), &value, ValueKind::Text);
        assert_eq!(octets_per_line(&line), [108]);

        let options = FormatOptions::default()
            .folding(Some(40))
            .folding_style(FoldingStyle::Tab);
        let line = options.format_line("COMMENT", &Parameters::new(), &value, ValueKind::Text);
        assert!(line.contains("\r\n\t"));
        assert!(octets_per_line(&line).iter().all(|&n| n <= 40));
    }
}
