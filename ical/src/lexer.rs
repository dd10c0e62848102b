// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tokens of the head of an unfolded content line, `name *(";" param) ":"`.

use std::fmt::Display;

use logos::Logos;

#[derive(Debug, PartialEq, Eq, Clone, Copy, logos::Logos)]
pub enum Token<'a> {
    /// Regular "word" segments:
    ///   - names, parameter names and unquoted parameter values;
    ///   - excludes the syntax symbols semicolon, colon, equals, comma and
    ///     double quote as well as whitespace.
    #[regex(r#"[^;:,\r\n\t ="]+"#)]
    Word(&'a str),

    /// Semicolon (;)
    #[token(";")]
    Semi,

    /// Colon (:)
    #[token(":")]
    Colon,

    /// Equal sign (=)
    #[token("=")]
    Eq,

    /// Comma (,)
    #[token(",")]
    Comma,

    /// Space ( )
    #[token(" ")]
    Space,

    /// Tab (\t)
    #[token("\t")]
    Tab,

    /// Quoted parameter value, quotes included; DQUOTE cannot be escaped
    #[regex(r#""[^"\r\n]*""#)]
    Quoted(&'a str),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(s) => write!(f, "Word({s})"),
            Token::Semi => write!(f, "Semi"),
            Token::Colon => write!(f, "Colon"),
            Token::Eq => write!(f, "Eq"),
            Token::Comma => write!(f, "Comma"),
            Token::Space => write!(f, "Space"),
            Token::Tab => write!(f, "Tab"),
            Token::Quoted(s) => write!(f, "Quoted({s})"),
        }
    }
}

pub fn lex<'a>(src: &'a str) -> logos::Lexer<'a, Token<'a>> {
    Token::lexer(src)
}
