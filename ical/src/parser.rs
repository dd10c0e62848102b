// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content line parser, the inverse of [`crate::formatter`].
//!
//! ```txt
//! contentline   = name *(";" param ) ":" value CRLF
//! param         = param-name "=" param-value *("," param-value)
//! param-value   = paramtext / quoted-string
//! ```

use std::fmt::{self, Display};
use std::iter::Peekable;

use crate::error::ParseError;
use crate::formatter::{ParamValue, Parameters, decode_caret};
use crate::lexer::{Token, lex};

/// One unfolded content line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name, upper-cased
    pub name: String,

    /// Property parameters in input order
    pub params: Parameters,

    /// Raw value, escape sequences untouched
    pub value: String,
}

impl Display for ContentLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", self.name, self.params, self.value)
    }
}

/// Remove line folding: a CRLF (or bare LF) immediately followed by a
/// single SPACE or TAB.
#[must_use]
pub fn unfold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find('\n') {
        let (line, tail) = rest.split_at(i);
        let tail = &tail[1..];
        if tail.starts_with([' ', '\t']) {
            out.push_str(line.strip_suffix('\r').unwrap_or(line));
            rest = &tail[1..];
        } else {
            out.push_str(line);
            out.push('\n');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Unfold a block of text and split it into logical lines, skipping blank
/// ones.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    unfold(text)
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one content line, possibly folded and possibly ending in CRLF.
///
/// # Errors
///
/// Returns a [`ParseError`] without a value kind if the name is missing or
/// invalid, a parameter is malformed, or there is no unquoted `:`.
pub fn parse_line(line: &str) -> Result<ContentLine, ParseError> {
    let unfolded = unfold(line);
    let src = unfolded.trim_end_matches(['\r', '\n']);
    if src.contains(['\r', '\n']) {
        return Err(ParseError::line(src, "more than one content line"));
    }

    let mut scanner = Scanner::new(src);
    let name = scanner.name()?;
    let mut params = Parameters::new();
    loop {
        match scanner.next_token()? {
            Some((Token::Semi, _)) => {
                let (param, value) = scanner.param()?;
                params.set(&param, value);
            }
            Some((Token::Colon, end)) => {
                let value = src[end..].to_string();
                tracing::trace!(name = %name, "parsed content line");
                return Ok(ContentLine {
                    name,
                    params,
                    value,
                });
            }
            Some((token, _)) => {
                return Err(ParseError::line(src, format!("unexpected {token} after name")));
            }
            None => return Err(ParseError::line(src, "missing ':' before value")),
        }
    }
}

/// Linear scanner over the lexed head of a content line.
struct Scanner<'a> {
    src: &'a str,
    tokens: Peekable<logos::SpannedIter<'a, Token<'a>>>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            tokens: lex(src).spanned().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::line(self.src, reason)
    }

    /// Next token with the byte offset just past it.
    fn next_token(&mut self) -> Result<Option<(Token<'a>, usize)>, ParseError> {
        match self.tokens.next() {
            Some((Ok(token), span)) => Ok(Some((token, span.end))),
            Some((Err(()), span)) => Err(self.error(format!(
                "invalid character at offset {}",
                span.start
            ))),
            None => Ok(None),
        }
    }

    /// ```txt
    /// name = iana-token / x-name
    /// iana-token = 1*(ALPHA / DIGIT / "-")
    /// ```
    fn name(&mut self) -> Result<String, ParseError> {
        match self.next_token()? {
            Some((Token::Word(name), _)) if is_token(name) => Ok(name.to_ascii_uppercase()),
            Some((Token::Word(name), _)) => Err(self.error(format!("invalid name '{name}'"))),
            _ => Err(self.error("missing property name")),
        }
    }

    /// ```txt
    /// param = param-name "=" param-value *("," param-value)
    /// ```
    fn param(&mut self) -> Result<(String, ParamValue), ParseError> {
        let name = match self.next_token()? {
            Some((Token::Word(name), _)) if is_token(name) => name.to_ascii_uppercase(),
            _ => return Err(self.error("missing parameter name")),
        };
        match self.next_token()? {
            Some((Token::Eq, _)) => {}
            _ => return Err(self.error(format!("missing '=' after parameter {name}"))),
        }

        let mut values = vec![self.param_value()?];
        while matches!(self.tokens.peek(), Some((Ok(Token::Comma), _))) {
            self.tokens.next();
            values.push(self.param_value()?);
        }
        Ok((name, values.into()))
    }

    /// ```txt
    /// param-value = paramtext / quoted-string
    /// paramtext   = *SAFE-CHAR
    /// ```
    fn param_value(&mut self) -> Result<String, ParseError> {
        if let Some((Ok(Token::Quoted(quoted)), _)) = self.tokens.peek() {
            let quoted = *quoted;
            let value = decode_caret(&quoted[1..quoted.len() - 1]);
            self.tokens.next();
            return Ok(value);
        }

        // paramtext may contain spaces and '=' which the lexer splits on
        let mut range: Option<(usize, usize)> = None;
        while let Some((Ok(Token::Word(_) | Token::Space | Token::Tab | Token::Eq), span)) =
            self.tokens.peek()
        {
            let start = range.map_or(span.start, |(s, _)| s);
            range = Some((start, span.end));
            self.tokens.next();
        }
        Ok(range.map_or_else(String::new, |(s, e)| decode_caret(&self.src[s..e])))
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_lines() {
        let line = parse_line("DTSTART;TZID=America/New_York:19980119T020000\r\n").unwrap();
        assert_eq!(line.name, "DTSTART");
        assert_eq!(line.params.get_str("TZID"), Some("America/New_York"));
        assert_eq!(line.value, "19980119T020000");

        let line = parse_line("description:a\\,b\\;c: with colon").unwrap();
        assert_eq!(line.name, "DESCRIPTION");
        assert!(line.params.is_empty());
        assert_eq!(line.value, "a\\,b\\;c: with colon");

        let line = parse_line("SUMMARY:").unwrap();
        assert_eq!(line.value, "");
    }

    #[test]
    fn parses_parameters() {
        let line = parse_line(
            "ATTENDEE;CN=John Smith;MEMBER=\"mailto:a@example.com\",\"mailto:b@example.com\";RSVP=TRUE:mailto:john@example.com",
        )
        .unwrap();
        assert_eq!(line.params.get_str("CN"), Some("John Smith"));
        assert_eq!(
            line.params.get("MEMBER"),
            Some(&ParamValue::List(vec![
                "mailto:a@example.com".to_string(),
                "mailto:b@example.com".to_string(),
            ]))
        );
        assert_eq!(line.params.get_str("rsvp"), Some("TRUE"));
        assert_eq!(line.value, "mailto:john@example.com");

        let line = parse_line("X-NOTE;X-LABEL=\"a;b:c\";X-EMPTY=:v").unwrap();
        assert_eq!(line.params.get_str("X-LABEL"), Some("a;b:c"));
        assert_eq!(line.params.get_str("X-EMPTY"), Some(""));

        let line = parse_line("X-NOTE;X-QUOTE=^'hi^':v").unwrap();
        assert_eq!(line.params.get_str("X-QUOTE"), Some("\"hi\""));
    }

    #[test]
    fn unfolds_continuations() {
        let text = "DESCRIPTION:This is a lo\r\n ng description\r\n\t that exists on a long line.\r\n";
        assert_eq!(
            unfold(text),
            "DESCRIPTION:This is a long description that exists on a long line.\r\n"
        );

        let line = parse_line(text).unwrap();
        assert_eq!(line.value, "This is a long description that exists on a long line.");

        let lines = split_lines("SUMMARY:a\r\n b\r\n\r\nDTSTART:20240101\r\n");
        assert_eq!(lines, ["SUMMARY:ab", "DTSTART:20240101"]);
    }

    #[test]
    fn rejects_malformed_lines() {
        let fail_cases = [
            "",                          // empty
            ":value",                    // missing name
            "SUMMARY",                   // missing colon
            "SUM MARY:x",                // space in name
            "DT_START:20240101",         // invalid name character
            "DTSTART;:20240101",         // missing parameter name
            "DTSTART;TZID:20240101",     // missing '='
            "DTSTART;TZID=\"open:1",     // unterminated quote
            "SUMMARY:a\r\nDTSTART:b",    // two lines
        ];
        for src in fail_cases {
            let err = parse_line(src).unwrap_err();
            assert_eq!(err.kind, None, "Parse {src} should fail as content line");
        }
    }

    #[test]
    fn round_trips_through_display() {
        let src = "ATTENDEE;CN=\"Doe, Jane\";ROLE=CHAIR:mailto:jane@example.com";
        let line = parse_line(src).unwrap();
        assert_eq!(line.to_string(), src);
    }
}
