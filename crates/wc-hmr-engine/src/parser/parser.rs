//! Parser for JavaScript modules
//!
//! This module implements a recursive descent parser that transforms
//! a token stream from the lexer into an Abstract Syntax Tree (AST).
//! Binary operators are parsed by precedence climbing.
//!
//! The parser keeps the source text so it can see line breaks between
//! tokens, which automatic semicolon insertion and the restricted
//! productions (`return`, `throw`, postfix `++`) depend on.

pub mod class;
pub mod error;
pub mod expr;
pub mod guards;
pub mod module;
pub mod pattern;
pub mod precedence;
pub mod recovery;
pub mod stmt;

use crate::parser::ast::*;
use crate::parser::interner::{Interner, Symbol};
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Parser state for JavaScript modules.
///
/// Lookahead is unbounded: arrow functions are recognised by scanning to the
/// matching `)` and checking for `=>`.
pub struct Parser<'a> {
    /// Module source, for line-break checks and error text
    source: &'a str,

    /// Pre-tokenized input
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,

    /// Current nesting depth
    pub(crate) depth: usize,

    /// Nesting depth past which parsing fails (`guards::MAX_PARSE_DEPTH`
    /// unless raised with [`Parser::with_max_depth`])
    max_depth: usize,

    /// Whether `in` is a binary operator here (false in a `for` head)
    pub(crate) allow_in: bool,

    /// Interner shared with the lexer; keywords used as names are added here
    interner: Interner,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source code.
    pub fn new(source: &'a str) -> Result<Self, Vec<LexError>> {
        let lexer = Lexer::new(source);
        let (tokens, interner) = lexer.tokenize()?;

        Ok(Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            depth: 0,
            max_depth: guards::MAX_PARSE_DEPTH,
            allow_in: true,
            interner,
        })
    }

    /// Set the nesting limit.
    ///
    /// Each level costs a few kilobytes of stack; raise it only when
    /// parsing on a thread with a matching stack size.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the entire source file into a Module AST.
    ///
    /// Returns the Module and the interner that resolves its symbols, or all
    /// accumulated errors on failure.
    pub fn parse(mut self) -> Result<(Module, Interner), Vec<ParseError>> {
        let mut statements = Vec::new();

        while !self.at_eof() {
            let before = self.pos;
            match self.parse_statement() {
                Ok(_) if self.pos == before => {
                    let span = self.current_span();
                    self.errors.push(ParseError::parser_stuck(
                        "Statement parser made no progress",
                        span,
                    ));
                    self.advance();
                }
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.sync_to_statement_boundary();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let span = Span::new(0, self.source.len(), 1, 1);
        Ok((Module { statements, span }, self.interner))
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(1)
    }

    /// Peek `n` tokens ahead of the current one.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            return self.current_span();
        }
        self.tokens[self.pos - 1].1
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Check if the current token matches any of the given kinds.
    pub fn check_any(&self, expected: &[Token]) -> bool {
        expected.iter().any(|tok| self.check(tok))
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    ///
    /// Returns Ok(token) on match, or Err(ParseError) on mismatch.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume the current token if it matches any of the expected kinds.
    pub fn expect_any(&mut self, expected: &[Token]) -> Result<Token, ParseError> {
        if self.check_any(expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(expected))
        }
    }

    /// Whether a line terminator separates the current token from the
    /// previous one.
    pub fn has_line_break_before(&self) -> bool {
        self.line_break_before_nth(0)
    }

    /// Whether a line terminator precedes the token `n` positions ahead.
    pub fn line_break_before_nth(&self, n: usize) -> bool {
        let index = self.pos + n;
        if index == 0 || index >= self.tokens.len() {
            return false;
        }
        let gap_start = self.tokens[index - 1].1.end;
        let gap_end = self.tokens[index].1.start;
        gap_start < gap_end
            && self.source[gap_start..gap_end]
                .chars()
                .any(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
    }

    /// Whether the bracket `n` tokens ahead closes into a `=>`: the
    /// parameter list of an arrow function.
    pub fn arrow_follows_group(&self, n: usize) -> bool {
        let mut depth = 0usize;
        for (i, (tok, _)) in self.tokens.iter().enumerate().skip(self.pos + n) {
            match tok {
                Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
                Token::RightParen | Token::RightBracket | Token::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(self.tokens.get(i + 1), Some((Token::Arrow, _)));
                    }
                }
                Token::Eof => return false,
                _ => {}
            }
        }
        false
    }

    /// Consume a statement terminator, applying automatic semicolon
    /// insertion: a missing `;` is fine before `}`, at end of input, or
    /// after a line break.
    pub fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat(&Token::Semicolon) {
            return Ok(());
        }
        if self.check_any(&[Token::RightBrace, Token::Eof]) || self.has_line_break_before() {
            return Ok(());
        }
        Err(self.unexpected_token(&[Token::Semicolon]))
    }

    // ========================================================================
    // Names
    // ========================================================================

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    /// Check if the current token is the identifier `word`.
    ///
    /// Used for contextual keywords (`async`, `of`, `get`, `static`, ...).
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.current(), Token::Identifier(name) if self.interner.resolve(*name) == word)
    }

    /// Same as [`Parser::is_word`], `n` tokens ahead.
    pub fn is_word_at(&self, n: usize, word: &str) -> bool {
        matches!(self.peek_nth(n), Some(Token::Identifier(name)) if self.interner.resolve(*name) == word)
    }

    /// Consume the contextual keyword `word` or fail.
    pub fn expect_word(&mut self, word: &str) -> Result<Span, ParseError> {
        if self.is_word(word) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            let span = self.current_span();
            let found = self.source.get(span.start..span.end).unwrap_or("");
            let message = if self.at_eof() {
                format!("Unexpected end of input, expected `{}`", word)
            } else {
                format!("Unexpected token `{}`, expected `{}`", found, word)
            };
            Err(ParseError::invalid_syntax(message, span))
        }
    }

    /// Parse a binding or reference name.
    pub fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        match self.current() {
            Token::Identifier(name) => {
                let id = Identifier::new(*name, self.current_span());
                self.advance();
                Ok(id)
            }
            _ => Err(self.unexpected_token(&[Token::Identifier(Symbol::dummy())])),
        }
    }

    /// Parse an identifier name, where reserved words are allowed
    /// (`obj.default`, `import { default as x }`).
    pub fn parse_identifier_name(&mut self) -> Result<Identifier, ParseError> {
        let span = self.current_span();
        let name = match self.current() {
            Token::Identifier(name) => *name,
            tok => match tok.keyword_str() {
                Some(word) => self.interner.intern(word),
                None => return Err(self.unexpected_token(&[Token::Identifier(Symbol::dummy())])),
            },
        };
        self.advance();
        Ok(Identifier::new(name, span))
    }

    /// Whether the current token can start an identifier name.
    pub fn at_identifier_name(&self) -> bool {
        matches!(self.current(), Token::Identifier(_)) || self.current().is_keyword()
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    /// Enter one nesting level, failing past the depth limit.
    ///
    /// Every successful `enter` must be paired with [`Parser::exit`].
    pub fn enter(&mut self, what: &str) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(ParseError::nesting_too_deep(self.max_depth, what, self.current_span()));
        }
        Ok(())
    }

    #[inline]
    pub fn exit(&mut self) {
        self.depth -= 1;
    }

    /// Run `f` with the `in` operator enabled or disabled.
    pub fn with_in<T>(
        &mut self,
        allow_in: bool,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = std::mem::replace(&mut self.allow_in, allow_in);
        let result = f(self);
        self.allow_in = saved;
        result
    }

    /// Parse a sub-stream of tokens (a template substitution) with `f`,
    /// which must consume all of it.
    pub fn with_tokens<T>(
        &mut self,
        mut tokens: Vec<(Token, Span)>,
        end: Span,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        tokens.push((Token::Eof, end));
        let saved_tokens = std::mem::replace(&mut self.tokens, tokens);
        let saved_pos = std::mem::replace(&mut self.pos, 0);

        let result = f(self).and_then(|value| {
            if self.at_eof() {
                Ok(value)
            } else {
                Err(self.unexpected_token(&[Token::RightBrace]))
            }
        });

        self.tokens = saved_tokens;
        self.pos = saved_pos;
        result
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Create an "unexpected token" error at the current token.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            let text = self.source.get(span.start..span.end).unwrap_or("");
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), text, span)
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    /// Combine two spans into a single span.
    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            line: start.line,
            column: start.column,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        self.combine_spans(start, &self.previous_span())
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        stmt::parse_statement(self)
    }

    /// Synchronize to the next statement boundary after an error.
    fn sync_to_statement_boundary(&mut self) {
        recovery::sync_to_statement_boundary(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let parser = Parser::new("let x = 42;").unwrap();
        assert!(matches!(parser.current(), Token::Let));
    }

    #[test]
    fn test_parser_advance() {
        let mut parser = Parser::new("let x").unwrap();

        let tok = parser.advance();
        assert!(matches!(tok, Token::Let));
        assert!(matches!(parser.current(), Token::Identifier(_)));
    }

    #[test]
    fn test_parser_at_eof() {
        let parser = Parser::new("").unwrap();
        assert!(parser.at_eof());
    }

    #[test]
    fn test_parser_peek() {
        let parser = Parser::new("let x").unwrap();

        assert!(parser.check(&Token::Let));
        assert!(!parser.check(&Token::Const));
        assert!(matches!(parser.peek(), Some(Token::Identifier(_))));
    }

    #[test]
    fn test_line_break_detection() {
        let mut parser = Parser::new("a\nb c").unwrap();

        assert!(!parser.has_line_break_before());
        parser.advance();
        assert!(parser.has_line_break_before());
        parser.advance();
        assert!(!parser.has_line_break_before());
    }

    #[test]
    fn test_contextual_words() {
        let mut parser = Parser::new("async of").unwrap();

        assert!(parser.is_word("async"));
        assert!(parser.is_word_at(1, "of"));
        assert!(parser.expect_word("of").is_err());
        assert!(parser.expect_word("async").is_ok());
    }

    #[test]
    fn test_keyword_as_identifier_name() {
        let mut parser = Parser::new("default").unwrap();

        let id = parser.parse_identifier_name().unwrap();
        assert_eq!(parser.resolve(id.name), "default");
    }

    #[test]
    fn test_raised_depth_limit() {
        let source = format!("x = {}1{};", "[".repeat(160), "]".repeat(160));

        let errors = Parser::new(&source).unwrap().parse().unwrap_err();
        assert!(errors[0].is_nesting_limit());

        let parser = Parser::new(&source).unwrap().with_max_depth(1_000);
        assert!(parser.parse().is_ok());
    }

    #[test]
    fn test_recovery_reports_every_error() {
        let errors = Parser::new("let = 1;\nconst = 2;\nlet ok = 3;")
            .unwrap()
            .parse()
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].span.line, 1);
        assert_eq!(errors[1].span.line, 2);
    }
}
