//! Parser guards to prevent infinite loops and stack overflow

use super::ParseError;
use crate::parser::token::Span;

/// Maximum iterations for any parser loop before giving up.
///
/// Bounds single lists (statements in one block, elements in one literal),
/// so it has to cover large bundled modules.
const MAX_LOOP_ITERATIONS: usize = 1_000_000;

/// Maximum nesting depth before rejecting parse
///
/// Counted once per statement, pattern and assignment-level expression
/// (see `Parser::enter`). Each level costs a handful of stack frames through
/// the precedence climber; 128 levels stay well inside a 2 MiB thread stack.
pub const MAX_PARSE_DEPTH: usize = 128;

/// Nesting limit for a parse running on a [`DEEP_STACK_SIZE`] stack
pub const MAX_DEEP_PARSE_DEPTH: usize = 4096;

/// Stack size of the thread that retries modules nesting past
/// [`MAX_PARSE_DEPTH`]
pub const DEEP_STACK_SIZE: usize = 512 * 1024 * 1024;

/// Default span for errors without location
#[inline]
fn default_span() -> Span {
    Span::new(0, 0, 0, 0)
}

/// Guard against infinite loops in parser
///
/// Tracks iteration count and returns error if exceeded.
///
/// # Example
///
/// ```ignore
/// let mut guard = LoopGuard::new("class_members");
/// while !parser.check(&Token::RightBrace) {
///     guard.check()?;
///     // ... parse a member ...
/// }
/// ```
pub struct LoopGuard {
    name: &'static str,
    count: usize,
    max: usize,
}

impl LoopGuard {
    /// Create a new loop guard with default limit
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            count: 0,
            max: MAX_LOOP_ITERATIONS,
        }
    }

    /// Create a loop guard with custom limit
    #[inline]
    pub fn with_limit(name: &'static str, max: usize) -> Self {
        Self { name, count: 0, max }
    }

    /// Check iteration count, return error if exceeded
    #[inline]
    pub fn check(&mut self) -> Result<(), ParseError> {
        self.count += 1;
        if self.count > self.max {
            return Err(ParseError::parser_limit_exceeded(
                format!("Loop '{}' exceeded {} iterations", self.name, self.max),
                default_span(),
            ));
        }
        Ok(())
    }

    /// Reset counter (for nested loops)
    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }
}
