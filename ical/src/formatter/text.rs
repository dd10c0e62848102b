// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! TEXT value escaping as defined in RFC 5545 Section 3.3.11.
//!
//! ```txt
//! ESCAPED-CHAR = ("\\" / "\;" / "\," / "\N" / "\n")
//!    ; \\ encodes \, \N or \n encodes newline
//!    ; \; encodes ;, \, encodes ,
//! ```

/// Escape a TEXT value for output.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {} // Skip CR characters
            _ => result.push(c),
        }
    }
    result
}

/// Resolve the escape sequences of a TEXT value.
///
/// Unknown escapes such as `\:` keep the escaped character, a trailing
/// backslash is kept.
#[must_use]
pub fn unescape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => result.push('\n'),
            Some(c) => result.push(c),
            None => result.push('\\'),
        }
    }
    result
}

/// Split a multi-valued TEXT value on unescaped commas and unescape each
/// element, e.g. the CATEGORIES or RESOURCES lists.
#[must_use]
pub fn split_text_list(text: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => {
                values.push(unescape_text(&text[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    values.push(unescape_text(&text[start..]));
    values
}
