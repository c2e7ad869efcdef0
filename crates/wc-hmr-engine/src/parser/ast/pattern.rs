//! Binding patterns
//!
//! Patterns appear in variable declarators, parameters and catch clauses.
//! Destructuring on the left of an assignment expression stays an
//! [`Expression`] (array or object literal).

use super::*;
use crate::parser::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Plain binding: x
    Identifier(Identifier),

    /// Array destructuring: [a, , b = 1, ...rest]
    Array(ArrayPattern),

    /// Object destructuring: { a, b: c, d = 1, ...rest }
    Object(ObjectPattern),
}

impl Pattern {
    pub fn span(&self) -> &Span {
        match self {
            Pattern::Identifier(id) => &id.span,
            Pattern::Array(p) => &p.span,
            Pattern::Object(p) => &p.span,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Pattern::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    /// `None` entries are elisions
    pub elements: Vec<Option<PatternElement>>,
    pub rest: Option<Box<Pattern>>,
    pub span: Span,
}

/// Array pattern element with an optional default
#[derive(Debug, Clone, PartialEq)]
pub struct PatternElement {
    pub pattern: Pattern,
    pub default: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub rest: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
    pub default: Option<Expression>,
    pub shorthand: bool,
    pub span: Span,
}
