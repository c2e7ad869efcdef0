//! Operator precedence table for binary expression parsing.
//!
//! Assignment, the conditional operator and unary operators are parsed by
//! dedicated functions; this table only ranks the binary operators handled
//! by the precedence climber.

use crate::parser::ast::{BinaryOperator, LogicalOperator};
use crate::parser::token::Token;

/// Operator precedence level (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    NullCoalescing = 1, // ??
    LogicalOr = 2,      // ||
    LogicalAnd = 3,     // &&
    BitwiseOr = 4,      // |
    BitwiseXor = 5,     // ^
    BitwiseAnd = 6,     // &
    Equality = 7,       // ==, !=, ===, !==
    Relational = 8,     // <, >, <=, >=, instanceof, in
    Shift = 9,          // <<, >>, >>>
    Additive = 10,      // +, -
    Multiplicative = 11, // *, /, %
    Exponentiation = 12, // **
}

/// Get the precedence of a binary operator token.
///
/// `in` ranks as relational only when `allow_in` is set; inside a
/// `for (...;` head it would otherwise swallow the for-in keyword.
pub fn get_precedence(token: &Token, allow_in: bool) -> Precedence {
    match token {
        Token::QuestionQuestion => Precedence::NullCoalescing,
        Token::PipePipe => Precedence::LogicalOr,
        Token::AmpAmp => Precedence::LogicalAnd,
        Token::Pipe => Precedence::BitwiseOr,
        Token::Caret => Precedence::BitwiseXor,
        Token::Amp => Precedence::BitwiseAnd,

        Token::EqualEqual | Token::BangEqual | Token::EqualEqualEqual | Token::BangEqualEqual => {
            Precedence::Equality
        }

        Token::Less | Token::LessEqual | Token::Greater | Token::GreaterEqual | Token::Instanceof => {
            Precedence::Relational
        }
        Token::In if allow_in => Precedence::Relational,

        Token::LessLess | Token::GreaterGreater | Token::GreaterGreaterGreater => Precedence::Shift,
        Token::Plus | Token::Minus => Precedence::Additive,
        Token::Star | Token::Slash | Token::Percent => Precedence::Multiplicative,

        // Exponentiation (right-associative)
        Token::StarStar => Precedence::Exponentiation,

        _ => Precedence::None,
    }
}

/// Check if an operator is right-associative.
pub fn is_right_associative(token: &Token) -> bool {
    matches!(token, Token::StarStar)
}

/// Binary or logical operator for a token ranked by [`get_precedence`].
pub enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

pub fn infix_operator(token: &Token) -> Option<InfixOperator> {
    let op = match token {
        Token::QuestionQuestion => return Some(InfixOperator::Logical(LogicalOperator::NullishCoalescing)),
        Token::PipePipe => return Some(InfixOperator::Logical(LogicalOperator::Or)),
        Token::AmpAmp => return Some(InfixOperator::Logical(LogicalOperator::And)),
        Token::Pipe => BinaryOperator::BitwiseOr,
        Token::Caret => BinaryOperator::BitwiseXor,
        Token::Amp => BinaryOperator::BitwiseAnd,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::EqualEqualEqual => BinaryOperator::StrictEqual,
        Token::BangEqualEqual => BinaryOperator::StrictNotEqual,
        Token::Less => BinaryOperator::LessThan,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::Greater => BinaryOperator::GreaterThan,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::Instanceof => BinaryOperator::Instanceof,
        Token::In => BinaryOperator::In,
        Token::LessLess => BinaryOperator::LeftShift,
        Token::GreaterGreater => BinaryOperator::RightShift,
        Token::GreaterGreaterGreater => BinaryOperator::UnsignedRightShift,
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Subtract,
        Token::Star => BinaryOperator::Multiply,
        Token::Slash => BinaryOperator::Divide,
        Token::Percent => BinaryOperator::Modulo,
        Token::StarStar => BinaryOperator::Exponent,
        _ => return None,
    };
    Some(InfixOperator::Binary(op))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(get_precedence(&Token::Star, true) > get_precedence(&Token::Plus, true));
        assert!(get_precedence(&Token::AmpAmp, true) > get_precedence(&Token::PipePipe, true));
        assert!(get_precedence(&Token::PipePipe, true) > get_precedence(&Token::QuestionQuestion, true));
        assert_eq!(get_precedence(&Token::Comma, true), Precedence::None);
    }

    #[test]
    fn test_in_operator_suppressed_in_for_head() {
        assert_eq!(get_precedence(&Token::In, true), Precedence::Relational);
        assert_eq!(get_precedence(&Token::In, false), Precedence::None);
    }

    #[test]
    fn test_exponent_is_right_associative() {
        assert!(is_right_associative(&Token::StarStar));
        assert!(!is_right_associative(&Token::Minus));
    }
}
