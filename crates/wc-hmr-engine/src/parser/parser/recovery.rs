//! Error recovery strategies for the parser.
//!
//! When the parser encounters an error, it uses these strategies to
//! resynchronize and continue parsing to find more errors.

use super::guards::LoopGuard;
use super::Parser;
use crate::parser::token::Token;

/// Synchronize to the next statement boundary.
///
/// This is used after encountering a parse error to skip tokens until
/// we reach a point where statement parsing can resume.
pub fn sync_to_statement_boundary(parser: &mut Parser) {
    // Loop guard to prevent infinite loops in recovery itself
    let mut guard = LoopGuard::new("statement_recovery");

    while !parser.at_eof() {
        if guard.check().is_err() {
            return;
        }

        match parser.current() {
            // Statement-starting tokens
            Token::Function
            | Token::Class
            | Token::Var
            | Token::Let
            | Token::Const
            | Token::If
            | Token::While
            | Token::Do
            | Token::For
            | Token::Switch
            | Token::Try
            | Token::Return
            | Token::Break
            | Token::Continue
            | Token::Throw
            | Token::Import
            | Token::Export => {
                return;
            }

            // Semicolon marks end of previous statement
            Token::Semicolon => {
                parser.advance();
                return;
            }

            // Closing brace might end a block - advance past it to avoid infinite loop
            Token::RightBrace => {
                parser.advance();
                return;
            }

            _ => {
                parser.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_to_statement_boundary() {
        let source = "invalid tokens let x = 42;";
        let mut parser = Parser::new(source).unwrap();

        parser.advance();
        parser.advance();

        sync_to_statement_boundary(&mut parser);

        assert!(matches!(parser.current(), Token::Let));
    }

    #[test]
    fn test_sync_consumes_semicolon() {
        let source = "a b c; x";
        let mut parser = Parser::new(source).unwrap();

        sync_to_statement_boundary(&mut parser);

        assert!(matches!(parser.current(), Token::Identifier(_)));
        assert_eq!(parser.current_span().start, 7);
    }
}
