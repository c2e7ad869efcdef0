//! Token definitions for JavaScript modules.
//!
//! This module defines every token the lexer can produce for ES module
//! source: reserved words, punctuators, literals and a few special tokens.
//! Contextual words (`async`, `of`, `get`, `set`, `static`, `from`, `as`,
//! `meta`, `target`) are plain identifiers; the parser recognises them by
//! spelling where the grammar allows them.

use std::fmt;
use crate::parser::interner::Symbol;

/// A token in a JavaScript module.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    Extends,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Return,
    Super,
    Switch,
    This,
    Throw,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,
    Await,

    // Literals
    /// Numeric literal (decimal, hex, octal or binary)
    Number(f64),
    /// BigInt literal, kept as written without the `n` suffix
    BigInt(Symbol),
    /// String literal (cooked value)
    String(Symbol),
    /// Template literal with cooked string parts and tokenized substitutions
    Template(Vec<TemplatePart>),
    /// Regular expression literal
    RegExp { pattern: Symbol, flags: Symbol },
    True,
    False,
    Null,

    // Names
    Identifier(Symbol),
    /// Private name: `#field`
    PrivateName(Symbol),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    PlusPlus,
    MinusMinus,
    Bang,
    Tilde,
    EqualEqual,
    BangEqual,
    EqualEqualEqual,
    BangEqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AmpAmp,
    PipePipe,
    QuestionQuestion,
    Amp,
    Pipe,
    Caret,
    LessLess,
    GreaterGreater,
    GreaterGreaterGreater,

    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    StarStarEqual,
    AmpEqual,
    PipeEqual,
    CaretEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    GreaterGreaterGreaterEqual,
    AmpAmpEqual,
    PipePipeEqual,
    QuestionQuestionEqual,

    // Punctuation
    Question,
    QuestionDot,
    Colon,
    Dot,
    DotDotDot,
    Arrow,
    At,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,

    Eof,
}

/// Part of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Cooked text between substitutions (may be empty)
    String(Symbol),
    /// Tokens of a `${...}` substitution, spans absolute in the module source
    Expression(Vec<(Token, Span)>),
}

/// Source location of a token or node.
///
/// `start`/`end` are byte offsets into the module source; `line` and `column`
/// are 1-based and point at `start`. Nodes created by a transform instead of
/// the parser carry [`Span::synthetic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span for nodes that have no source text.
    pub const fn synthetic() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 0,
            column: 0,
        }
    }

    /// Parser spans always start at line 1.
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn merge(&self, other: &Span) -> Span {
        let first = if self.start <= other.start { self } else { other };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(word) = self.keyword_str() {
            return write!(f, "{}", word);
        }
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::BigInt(_) => write!(f, "<bigint>"),
            Token::String(_) => write!(f, "<string>"),
            Token::Template(_) => write!(f, "`...`"),
            Token::RegExp { .. } => write!(f, "<regexp>"),
            Token::Identifier(_) => write!(f, "<identifier>"),
            Token::PrivateName(_) => write!(f, "<private name>"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::StarStar => write!(f, "**"),
            Token::PlusPlus => write!(f, "++"),
            Token::MinusMinus => write!(f, "--"),
            Token::Bang => write!(f, "!"),
            Token::Tilde => write!(f, "~"),
            Token::EqualEqual => write!(f, "=="),
            Token::BangEqual => write!(f, "!="),
            Token::EqualEqualEqual => write!(f, "==="),
            Token::BangEqualEqual => write!(f, "!=="),
            Token::Less => write!(f, "<"),
            Token::LessEqual => write!(f, "<="),
            Token::Greater => write!(f, ">"),
            Token::GreaterEqual => write!(f, ">="),
            Token::AmpAmp => write!(f, "&&"),
            Token::PipePipe => write!(f, "||"),
            Token::QuestionQuestion => write!(f, "??"),
            Token::Amp => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::LessLess => write!(f, "<<"),
            Token::GreaterGreater => write!(f, ">>"),
            Token::GreaterGreaterGreater => write!(f, ">>>"),
            Token::Equal => write!(f, "="),
            Token::PlusEqual => write!(f, "+="),
            Token::MinusEqual => write!(f, "-="),
            Token::StarEqual => write!(f, "*="),
            Token::SlashEqual => write!(f, "/="),
            Token::PercentEqual => write!(f, "%="),
            Token::StarStarEqual => write!(f, "**="),
            Token::AmpEqual => write!(f, "&="),
            Token::PipeEqual => write!(f, "|="),
            Token::CaretEqual => write!(f, "^="),
            Token::LessLessEqual => write!(f, "<<="),
            Token::GreaterGreaterEqual => write!(f, ">>="),
            Token::GreaterGreaterGreaterEqual => write!(f, ">>>="),
            Token::AmpAmpEqual => write!(f, "&&="),
            Token::PipePipeEqual => write!(f, "||="),
            Token::QuestionQuestionEqual => write!(f, "??="),
            Token::Question => write!(f, "?"),
            Token::QuestionDot => write!(f, "?."),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::DotDotDot => write!(f, "..."),
            Token::Arrow => write!(f, "=>"),
            Token::At => write!(f, "@"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "end of file"),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Token {
    /// Spelling of a reserved word or literal keyword.
    ///
    /// Reserved words are valid property names (`obj.default`, `{ class: 1 }`),
    /// so the parser uses this to turn them back into identifier names.
    pub fn keyword_str(&self) -> Option<&'static str> {
        let word = match self {
            Token::Break => "break",
            Token::Case => "case",
            Token::Catch => "catch",
            Token::Class => "class",
            Token::Const => "const",
            Token::Continue => "continue",
            Token::Debugger => "debugger",
            Token::Default => "default",
            Token::Delete => "delete",
            Token::Do => "do",
            Token::Else => "else",
            Token::Export => "export",
            Token::Extends => "extends",
            Token::Finally => "finally",
            Token::For => "for",
            Token::Function => "function",
            Token::If => "if",
            Token::Import => "import",
            Token::In => "in",
            Token::Instanceof => "instanceof",
            Token::Let => "let",
            Token::New => "new",
            Token::Return => "return",
            Token::Super => "super",
            Token::Switch => "switch",
            Token::This => "this",
            Token::Throw => "throw",
            Token::Try => "try",
            Token::Typeof => "typeof",
            Token::Var => "var",
            Token::Void => "void",
            Token::While => "while",
            Token::With => "with",
            Token::Yield => "yield",
            Token::Await => "await",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            _ => return None,
        };
        Some(word)
    }

    /// Check if this token is a reserved word.
    pub fn is_keyword(&self) -> bool {
        self.keyword_str().is_some()
    }

    /// Check if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::BigInt(_)
                | Token::String(_)
                | Token::Template(_)
                | Token::RegExp { .. }
                | Token::True
                | Token::False
                | Token::Null
        )
    }

    /// Check if this token is an assignment operator.
    pub fn is_assignment_operator(&self) -> bool {
        matches!(
            self,
            Token::Equal
                | Token::PlusEqual
                | Token::MinusEqual
                | Token::StarEqual
                | Token::SlashEqual
                | Token::PercentEqual
                | Token::StarStarEqual
                | Token::AmpEqual
                | Token::PipeEqual
                | Token::CaretEqual
                | Token::LessLessEqual
                | Token::GreaterGreaterEqual
                | Token::GreaterGreaterGreaterEqual
                | Token::AmpAmpEqual
                | Token::PipePipeEqual
                | Token::QuestionQuestionEqual
        )
    }

    /// Whether a `/` following this token starts a regular expression
    /// literal rather than a division operator.
    ///
    /// A value-ending token (name, literal, closing paren or bracket,
    /// postfix update) makes `/` a division. `}` is treated as ending a
    /// block. The lexer overrides both closers with what they actually
    /// closed: a control statement head or an object literal.
    pub fn allows_regex_after(&self) -> bool {
        !matches!(
            self,
            Token::Identifier(_)
                | Token::PrivateName(_)
                | Token::Number(_)
                | Token::BigInt(_)
                | Token::String(_)
                | Token::Template(_)
                | Token::RegExp { .. }
                | Token::True
                | Token::False
                | Token::Null
                | Token::This
                | Token::Super
                | Token::RightParen
                | Token::RightBracket
                | Token::PlusPlus
                | Token::MinusMinus
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_spelling() {
        assert_eq!(Token::Default.keyword_str(), Some("default"));
        assert_eq!(Token::Class.to_string(), "class");
        assert!(Token::Let.is_keyword());
        assert!(!Token::Comma.is_keyword());
    }

    #[test]
    fn test_regex_context() {
        assert!(Token::Return.allows_regex_after());
        assert!(Token::LeftParen.allows_regex_after());
        assert!(Token::RightBrace.allows_regex_after());
        assert!(!Token::RightParen.allows_regex_after());
        assert!(!Token::Identifier(Symbol::dummy()).allows_regex_after());
    }

    #[test]
    fn test_synthetic_span() {
        assert!(Span::synthetic().is_synthetic());
        assert!(!Span::new(0, 1, 1, 1).is_synthetic());
        assert_eq!(Span::new(3, 8, 1, 4).slice("let foo = 1"), "foo =");
    }
}
