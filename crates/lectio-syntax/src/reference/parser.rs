use crate::lexer::{Token, TokenKind};

/// Cursor over a token slice.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`, `eat_whitespace()`, `number()`
/// - Backtrack: `pos()` → `reset()`
pub(crate) struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a parser positioned at `pos`.
    pub fn at_position(tokens: &'t [Token<'input>], pos: usize) -> Self {
        Self { tokens, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Rewind (or advance) to a position previously returned by `pos()`.
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Current token, or None if past end.
    pub fn current(&self) -> Option<&'t Token<'input>> {
        self.tokens.get(self.pos)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) -> Option<&'t Token<'input>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn eat_whitespace(&mut self) -> bool {
        self.eat(TokenKind::Whitespace)
    }

    /// Consume a number token that fits in `u32`.
    ///
    /// Leaves the cursor untouched when the current token is not a number or
    /// overflows.
    pub fn number(&mut self) -> Option<u32> {
        let token = self.current().filter(|t| t.kind == TokenKind::Number)?;
        let value = token.text.parse().ok()?;
        self.pos += 1;
        Some(value)
    }

    /// Text of the current word token.
    pub fn word(&mut self) -> Option<&'input str> {
        let token = self.current().filter(|t| t.kind == TokenKind::Word)?;
        self.pos += 1;
        Some(token.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn number_parses_and_advances() {
        let tokens = lex("12:3");
        let mut p = Parser::at_position(&tokens, 0);
        assert_eq!(p.number(), Some(12));
        assert!(p.eat(TokenKind::Colon));
        assert_eq!(p.number(), Some(3));
        assert!(p.at_end());
    }

    #[test]
    fn overflowing_number_is_not_consumed() {
        let tokens = lex("99999999999");
        let mut p = Parser::at_position(&tokens, 0);
        assert_eq!(p.number(), None);
        assert_eq!(p.pos(), 0);
    }

    #[test]
    fn word_only_matches_words() {
        let tokens = lex("3 John");
        let mut p = Parser::at_position(&tokens, 0);
        assert_eq!(p.word(), None);
        assert_eq!(p.number(), Some(3));
        assert!(p.eat_whitespace());
        assert_eq!(p.word(), Some("John"));
    }

    #[test]
    fn reset_backtracks() {
        let tokens = lex("a b");
        let mut p = Parser::at_position(&tokens, 0);
        let start = p.pos();
        p.bump();
        p.bump();
        p.reset(start);
        assert_eq!(p.current().map(|t| t.text), Some("a"));
    }

    #[test]
    fn bump_at_end_returns_none() {
        let tokens = lex("x");
        let mut p = Parser::at_position(&tokens, 1);
        assert!(p.at_end());
        assert!(p.bump().is_none());
    }
}
