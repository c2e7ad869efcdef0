//! Abstract Syntax Tree (AST) for JavaScript modules.
//!
//! This module defines the AST produced by the parser:
//! - Module structure
//! - Statements (declarations, control flow, imports and exports)
//! - Expressions (literals, operators, calls, functions, classes)
//! - Patterns (for destructuring bindings)
//!
//! Every node carries a `Span`. Nodes built by a transform carry
//! [`Span::synthetic`] and are printed by [`crate::codegen`] instead of
//! being copied from the source text.

use crate::parser::interner::Symbol;
use crate::parser::token::Span;

pub mod statement;
pub mod expression;
pub mod pattern;
pub mod visitor;

pub use statement::*;
pub use expression::*;
pub use pattern::*;
pub use visitor::*;

/// Root node: one JavaScript module
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Top-level statements (declarations, imports, exports)
    pub statements: Vec<Statement>,

    /// Span covering the entire module
    pub span: Span,
}

impl Module {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Top-level import declarations, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::ImportDecl(decl) => Some(decl),
            _ => None,
        })
    }
}

/// Identifier
///
/// A binding or reference name. Private names (`#x`) reuse this node with the
/// leading `#` stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: Symbol,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: Symbol, span: Span) -> Self {
        Self { name, span }
    }

    /// Identifier with no source location.
    pub fn synthetic(name: Symbol) -> Self {
        Self {
            name,
            span: Span::synthetic(),
        }
    }
}
