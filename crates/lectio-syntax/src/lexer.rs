//! # Lexer - Tokenizing Reference Text
//!
//! The first stage of reference resolution: breaking free-form text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! which is what lets the locator hand back spans that concatenate to the
//! original text:
//!
//! ```
//! use lectio_syntax::lexer::lex;
//!
//! let input = "See John 3:16–17; Gen. 1";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether `1` is an ordinal
//! ("1 John"), a chapter or a verse, or whether `V` is the verse keyword or
//! part of a book name - that's the parser's job.
//!
//! - ASCII letter runs → [`TokenKind::Word`] (book names, keywords, ordinals)
//! - ASCII digit runs → [`TokenKind::Number`]
//! - `:` `-` `,` `;` `.` → punctuation kinds (en and em dashes are `Dash` too)
//! - whitespace runs → [`TokenKind::Whitespace`]
//! - everything else → [`TokenKind::Text`]

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Any run of whitespace
    #[regex(r"\s+")]
    Whitespace,

    /// ASCII letters only; book names match case-insensitively on ASCII
    #[regex(r"[A-Za-z]+")]
    Word,

    #[regex(r"[0-9]+")]
    Number,

    /// `:` between chapter and verse
    #[token(":")]
    Colon,

    /// Range separator
    #[token("-")]
    #[token("\u{2013}")]
    #[token("\u{2014}")]
    Dash,

    /// `,` introducing a continuation
    #[token(",")]
    Comma,

    /// `;` introducing a continuation
    #[token(";")]
    Semicolon,

    /// Abbreviation dot ("Gen.", "v.")
    #[token(".")]
    Dot,

    /// Anything not matched by other rules
    #[regex(r"[^\sA-Za-z0-9:,;.\-\u{2013}\u{2014}]+")]
    Text,
}

impl TokenKind {
    /// Separators that introduce a continuation reference.
    pub fn is_separator(self) -> bool {
        matches!(self, TokenKind::Comma | TokenKind::Semicolon)
    }
}

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of `text` in the lexed input.
    pub offset: usize,
}

impl Token<'_> {
    /// Byte offset one past the end of this token.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        // Logos error means an unrecognized character - treat as TEXT
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        lex(input).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_full_reference() {
        assert_eq!(
            kinds("John 3:16-17"),
            vec![
                (TokenKind::Word, "John"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "3"),
                (TokenKind::Colon, ":"),
                (TokenKind::Number, "16"),
                (TokenKind::Dash, "-"),
                (TokenKind::Number, "17"),
            ]
        );
    }

    #[test]
    fn lex_ordinal_glued_to_name() {
        assert_eq!(
            kinds("1Cor.13"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Word, "Cor"),
                (TokenKind::Dot, "."),
                (TokenKind::Number, "13"),
            ]
        );
    }

    #[test]
    fn lex_unicode_dashes() {
        assert_eq!(
            kinds("1\u{2013}2\u{2014}3"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Dash, "\u{2013}"),
                (TokenKind::Number, "2"),
                (TokenKind::Dash, "\u{2014}"),
                (TokenKind::Number, "3"),
            ]
        );
    }

    #[test]
    fn lex_separators() {
        assert_eq!(
            kinds("1; 2,3"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, "3"),
            ]
        );
    }

    #[test]
    fn non_ascii_letters_are_text() {
        assert_eq!(
            kinds("Génesis"),
            vec![
                (TokenKind::Word, "G"),
                (TokenKind::Text, "é"),
                (TokenKind::Word, "nesis"),
            ]
        );
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "(cf. 2 Kings 3:4 — «and» Ps 23)\n\tv. 5";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn offsets_are_correct() {
        let input = "Rom 8:28 – 29, «x»";
        for token in lex(input) {
            assert_eq!(token.text, &input[token.offset..token.end()]);
        }
    }
}
