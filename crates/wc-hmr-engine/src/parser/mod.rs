//! JavaScript module front end: lexer, parser and AST.
//!
//! Covers the ES module grammar a browser accepts (classes, decorators,
//! private names, optional chaining, template literals, dynamic import),
//! which is what the transform needs to find class declarations and
//! base-class imports at any nesting level.
//!
//! # Example
//!
//! ```ignore
//! use wc_hmr_engine::parser::Parser;
//!
//! let parser = Parser::new("class A extends LitElement {}").unwrap();
//! let (module, interner) = parser.parse().unwrap();
//! assert_eq!(module.statements.len(), 1);
//! ```

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod interner;

// Re-exports for convenience
pub use token::{Token, Span, TemplatePart};
pub use lexer::{Lexer, LexError};
pub use parser::{Parser, ParseError, ParseErrorKind};
pub use interner::{Interner, Symbol};
