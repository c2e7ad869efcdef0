//! Parse error types and error reporting

use crate::parser::token::{Span, Token};
use std::fmt;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: Vec<Token>, found: Token },

    /// Unexpected end of file
    UnexpectedEof { expected: Vec<Token> },

    /// Invalid syntax
    InvalidSyntax { reason: String },

    /// Parser exceeded an iteration limit
    ParserLimitExceeded { message: String },

    /// Input nests deeper than the parser's depth limit
    NestingTooDeep { max_depth: usize },

    /// Parser got stuck (position didn't advance)
    ParserStuck { message: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at {}:{}: {}",
            self.span.line, self.span.column, self.message
        )?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

fn expected_list(expected: &[Token]) -> String {
    expected
        .iter()
        .map(|tok| format!("`{}`", tok))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ParseError {
    /// Create an "unexpected token" error.
    ///
    /// `text` is the offending token as written in the source.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, text: &str, span: Span) -> Self {
        let message = match expected.len() {
            0 => format!("Unexpected token `{}`", text),
            1 => format!("Unexpected token `{}`, expected `{}`", text, expected[0]),
            _ => format!(
                "Unexpected token `{}`, expected one of {}",
                text,
                expected_list(&expected)
            ),
        };

        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = match expected.len() {
            0 => "Unexpected end of input".to_string(),
            1 => format!("Unexpected end of input, expected `{}`", expected[0]),
            _ => format!(
                "Unexpected end of input, expected one of {}",
                expected_list(&expected)
            ),
        };

        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            kind: ParseErrorKind::InvalidSyntax {
                reason: reason.clone(),
            },
            span,
            message: reason,
            suggestion: None,
        }
    }

    /// Add a suggestion to this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create a "parser limit exceeded" error.
    pub fn parser_limit_exceeded(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self {
            kind: ParseErrorKind::ParserLimitExceeded {
                message: message.clone(),
            },
            span,
            message: format!("Parser limit exceeded: {}", message),
            suggestion: None,
        }
    }

    /// Create a "nesting too deep" error.
    pub fn nesting_too_deep(max_depth: usize, what: &str, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::NestingTooDeep { max_depth },
            span,
            message: format!(
                "Parser limit exceeded: Maximum nesting depth ({}) exceeded in {}",
                max_depth, what
            ),
            suggestion: None,
        }
    }

    /// Whether the input could parse under a higher depth limit.
    pub fn is_nesting_limit(&self) -> bool {
        matches!(self.kind, ParseErrorKind::NestingTooDeep { .. })
    }

    /// Create a "parser stuck" error.
    pub fn parser_stuck(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self {
            kind: ParseErrorKind::ParserStuck {
                message: message.clone(),
            },
            span,
            message: format!("Parser stuck: {}", message),
            suggestion: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let err = ParseError::unexpected_token(
            vec![Token::Semicolon],
            Token::RightBrace,
            "}",
            Span::new(4, 5, 1, 5),
        );
        assert_eq!(err.message, "Unexpected token `}`, expected `;`");
        assert_eq!(err.to_string(), "Parse error at 1:5: Unexpected token `}`, expected `;`");
    }

    #[test]
    fn test_unexpected_eof_lists_expected() {
        let err = ParseError::unexpected_eof(
            vec![Token::RightParen, Token::Comma],
            Span::new(9, 9, 1, 10),
        );
        assert_eq!(err.message, "Unexpected end of input, expected one of `)`, `,`");
    }

    #[test]
    fn test_suggestion_is_displayed() {
        let err = ParseError::invalid_syntax("Missing initializer in const declaration", Span::new(0, 5, 1, 1))
            .with_suggestion("Add an initializer: const x = value;");
        assert!(err.to_string().contains("Suggestion: Add an initializer"));
    }

    #[test]
    fn test_nesting_limit_kind() {
        let err = ParseError::nesting_too_deep(128, "expression", Span::new(0, 1, 1, 1));
        assert!(err.is_nesting_limit());
        assert_eq!(
            err.message,
            "Parser limit exceeded: Maximum nesting depth (128) exceeded in expression"
        );
        assert!(!ParseError::parser_limit_exceeded("loop", Span::new(0, 1, 1, 1)).is_nesting_limit());
    }
}
