// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property parameters as an ordered map with case-insensitive names.

use std::fmt::{self, Display};

/// Value of a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    /// `NAME=value`
    Single(String),

    /// `NAME=value1,value2`, e.g. MEMBER or DELEGATED-TO
    List(Vec<String>),
}

impl ParamValue {
    /// The first value, or the only one.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            ParamValue::Single(v) => Some(v),
            ParamValue::List(vs) => vs.first().map(String::as_str),
        }
    }

    /// All values in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            ParamValue::Single(v) => std::slice::from_ref(v),
            ParamValue::List(vs) => vs,
        };
        values.iter().map(String::as_str)
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", quote_if_needed(value))?;
        }
        Ok(())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            ParamValue::Single(values.remove(0))
        } else {
            ParamValue::List(values)
        }
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        values
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}

/// Ordered parameter map; names are stored upper-cased and compared
/// case-insensitively, insertion order is kept for output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Parameters {
    entries: Vec<(String, ParamValue)>,
}

impl Parameters {
    /// Create an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set a parameter, replacing an existing one in place.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((name.to_ascii_uppercase(), value)),
        }
    }

    /// Builder form of [`Parameters::set`].
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    /// Get the first value of a parameter.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::first)
    }

    /// Whether a parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Iterate over `(NAME, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: AsRef<str>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k.as_ref(), v);
        }
        params
    }
}

impl Display for Parameters {
    /// Each parameter prefixed with a semicolon, `;NAME=value`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

/// Quote a parameter value if it contains `:`, `;` or `,`.
///
/// Characters a parameter value cannot hold are written with the RFC 6868
/// caret encoding: `^^`, `^n` and `^'`.
pub(crate) fn quote_if_needed(s: &str) -> String {
    let needs_encoding = s.contains(['^', '\n', '"']);
    let s = if needs_encoding {
        let mut out = String::with_capacity(s.len() + 2);
        for c in s.chars() {
            match c {
                '^' => out.push_str("^^"),
                '\n' => out.push_str("^n"),
                '"' => out.push_str("^'"),
                '\r' => {}
                c => out.push(c),
            }
        }
        out
    } else {
        s.to_string()
    };

    if s.contains([':', ';', ',']) {
        format!("\"{s}\"")
    } else {
        s
    }
}

/// Reverse the RFC 6868 caret encoding; unknown sequences are kept as-is.
pub(crate) fn decode_caret(s: &str) -> String {
    if !s.contains('^') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => out.push('^'),
            Some('n' | 'N') => out.push('\n'),
            Some('\'') => out.push('"'),
            _ => {
                out.push('^');
                continue;
            }
        }
        chars.next();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_ignores_case() {
        let mut params = Parameters::new()
            .with("tzid", "Europe/Paris")
            .with("VALUE", "DATE-TIME");
        params.set("TzId", "America/New_York");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get_str("TZID"), Some("America/New_York"));
        assert_eq!(params.to_string(), ";TZID=America/New_York;VALUE=DATE-TIME");

        assert_eq!(
            params.remove("value"),
            Some(ParamValue::Single("DATE-TIME".to_string()))
        );
        assert!(!params.contains("VALUE"));
    }

    #[test]
    fn quotes_values() {
        #[rustfmt::skip]
        let cases = [
            ("Europe/Paris",         "Europe/Paris"),
            ("mailto:a@example.com", "\"mailto:a@example.com\""),
            ("Smith, John",          "\"Smith, John\""),
            ("a;b",                  "\"a;b\""),
            ("say \"hi\"",           "say ^'hi^'"),
            ("x^y",                  "x^^y"),
            ("line\nbreak",          "line^nbreak"),
        ];
        for (src, expected) in cases {
            assert_eq!(quote_if_needed(src), expected, "Failed for {src}");
        }
    }

    #[test]
    fn formats_lists() {
        let params = Parameters::new().with(
            "MEMBER",
            vec!["mailto:a@example.com", "mailto:b@example.com"],
        );
        assert_eq!(
            params.to_string(),
            ";MEMBER=\"mailto:a@example.com\",\"mailto:b@example.com\""
        );
    }

    #[test]
    fn decodes_caret_encoding() {
        assert_eq!(decode_caret("say ^'hi^'"), "say \"hi\"");
        assert_eq!(decode_caret("x^^y^nz"), "x^y\nz");
        assert_eq!(decode_caret("keep^x"), "keep^x");
        assert_eq!(decode_caret("trailing^"), "trailing^");
    }
}
