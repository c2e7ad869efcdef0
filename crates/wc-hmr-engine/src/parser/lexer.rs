//! Lexer for JavaScript modules.
//!
//! Punctuators, reserved words, names, numbers and strings are recognised by a
//! logos-generated automaton. The context-sensitive pieces of the grammar are
//! scanned by hand around it:
//!
//! - whitespace, comments and a leading hashbang line
//! - template literals, whose `${...}` substitutions are lexed recursively
//! - regular expression literals, told apart from `/` by the previous token
//!   and, after `)` or `}`, by what that bracket closed
//! - identifiers containing non-ASCII characters or `\u` escapes

use crate::parser::interner::Interner;
use crate::parser::token::{Span, TemplatePart, Token};
use logos::Logos;
use unicode_xid::UnicodeXID;

/// Logos-based token enum for lexing.
///
/// Converted to [`Token`] after each match; names and literal payloads are
/// interned at conversion time.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Reserved words (must come before identifiers)
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("class")]
    Class,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("debugger")]
    Debugger,
    #[token("default")]
    Default,
    #[token("delete")]
    Delete,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("export")]
    Export,
    #[token("extends")]
    Extends,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("in")]
    In,
    #[token("instanceof")]
    Instanceof,
    #[token("let")]
    Let,
    #[token("new")]
    New,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("switch")]
    Switch,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("typeof")]
    Typeof,
    #[token("var")]
    Var,
    #[token("void")]
    Void,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("yield")]
    Yield,
    #[token("await")]
    Await,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Names
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    #[regex(r"#[a-zA-Z_$][a-zA-Z0-9_$]*")]
    PrivateName,

    // Numbers
    #[regex(r"0[xX][0-9a-fA-F]+(_[0-9a-fA-F]+)*", |lex| parse_radix(lex.slice(), 16))]
    #[regex(r"0[oO][0-7]+(_[0-7]+)*", |lex| parse_radix(lex.slice(), 8))]
    #[regex(r"0[bB][01]+(_[01]+)*", |lex| parse_radix(lex.slice(), 2))]
    #[regex(r"[0-9]+(_[0-9]+)*(\.([0-9]+(_[0-9]+)*)?)?([eE][+-]?[0-9]+(_[0-9]+)*)?", |lex| parse_decimal(lex.slice()))]
    #[regex(r"\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+(_[0-9]+)*)?", |lex| parse_decimal(lex.slice()))]
    Number(f64),

    #[regex(r"(0[xX][0-9a-fA-F]+(_[0-9a-fA-F]+)*|0[oO][0-7]+(_[0-7]+)*|0[bB][01]+(_[01]+)*|[0-9]+(_[0-9]+)*)n")]
    BigInt,

    // Strings (line continuations allowed, raw newlines are not)
    #[regex(r#""([^"\\\r\n]|\\[^\r\n]|\\\r?\n)*""#)]
    #[regex(r#"'([^'\\\r\n]|\\[^\r\n]|\\\r?\n)*'"#)]
    String,

    // Operators (longest first)
    #[token(">>>=")]
    GreaterGreaterGreaterEqual,
    #[token("===")]
    EqualEqualEqual,
    #[token("!==")]
    BangEqualEqual,
    #[token(">>>")]
    GreaterGreaterGreater,
    #[token("**=")]
    StarStarEqual,
    #[token("<<=")]
    LessLessEqual,
    #[token(">>=")]
    GreaterGreaterEqual,
    #[token("&&=")]
    AmpAmpEqual,
    #[token("||=")]
    PipePipeEqual,
    #[token("??=")]
    QuestionQuestionEqual,
    #[token("...")]
    DotDotDot,
    #[token("**")]
    StarStar,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,
    #[token("?.")]
    QuestionDot,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("<<")]
    LessLess,
    #[token(">>")]
    GreaterGreater,
    #[token("=>")]
    Arrow,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("=")]
    Equal,
    #[token("?")]
    Question,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("@")]
    At,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
}

// Helper parsing functions
fn parse_radix(slice: &str, radix: u32) -> Option<f64> {
    let mut value = 0f64;
    for c in slice[2..].chars().filter(|c| *c != '_') {
        value = value * radix as f64 + c.to_digit(radix)? as f64;
    }
    Some(value)
}

fn parse_decimal(slice: &str) -> Option<f64> {
    slice.replace('_', "").parse().ok()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_js_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && !is_line_terminator(c))
}

fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_xid_start()
}

fn is_identifier_continue(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || c.is_xid_continue()
}

/// Offset of the end of the line containing `pos` (before the terminator).
fn line_end(source: &str, pos: usize) -> usize {
    source[pos..]
        .find(is_line_terminator)
        .map_or(source.len(), |i| pos + i)
}

/// Length of a leading `#!` line, which is skipped like a comment.
pub(crate) fn hashbang_len(source: &str) -> usize {
    if source.starts_with("#!") {
        line_end(source, 0)
    } else {
        0
    }
}

fn take_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, count: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars.peek()?.to_digit(16)?;
        chars.next();
        value = value * 16 + digit;
    }
    Some(value)
}

fn take_braced_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    let mut value = 0u32;
    let mut digits = 0;
    while let Some(&c) = chars.peek() {
        chars.next();
        if c == '}' {
            return if digits > 0 { Some(value) } else { None };
        }
        value = value.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
        digits += 1;
    }
    None
}

fn push_code_point(out: &mut String, code: u32) {
    out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
}

/// Cook the body of a string or template chunk.
pub(crate) fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{C}'),
            Some('v') => result.push('\u{B}'),
            Some('0') => result.push('\0'),
            // Line continuation
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some('x') => match take_hex(&mut chars, 2) {
                Some(code) => push_code_point(&mut result, code),
                None => result.push('x'),
            },
            Some('u') => {
                let code = if chars.peek() == Some(&'{') {
                    chars.next();
                    take_braced_hex(&mut chars)
                } else {
                    take_hex(&mut chars, 4)
                };
                match code {
                    Some(high @ 0xD800..=0xDBFF) => {
                        // Pair a high surrogate with a following \uXXXX low surrogate
                        let mut lookahead = chars.clone();
                        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                            if let Some(low @ 0xDC00..=0xDFFF) = take_hex(&mut lookahead, 4) {
                                chars = lookahead;
                                push_code_point(
                                    &mut result,
                                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00),
                                );
                                continue;
                            }
                        }
                        result.push('\u{FFFD}');
                    }
                    Some(code) => push_code_point(&mut result, code),
                    None => result.push('u'),
                }
            }
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

/// Whether a `(` pushed after `tokens` opens the head of `if`, `while`,
/// `for` or `with`; the statement after its `)` may start with a regex.
fn opens_control_head(tokens: &[(Token, Span)]) -> bool {
    match tokens.last() {
        Some((Token::If | Token::While | Token::For | Token::With, _)) => true,
        Some((Token::Await, _)) => matches!(tokens.iter().rev().nth(1), Some((Token::For, _))),
        _ => false,
    }
}

/// Whether a `{` pushed after `tokens` opens an object literal rather than
/// a block, class body or function body. `enclosing` holds the kinds of the
/// braces still open.
fn opens_object_literal(tokens: &[(Token, Span)], enclosing: &[bool]) -> bool {
    match tokens.last() {
        None => false,
        Some((
            Token::RightParen
            | Token::RightBrace
            | Token::LeftBrace
            | Token::Semicolon
            | Token::Arrow
            | Token::Else
            | Token::Do
            | Token::Try
            | Token::Finally,
            _,
        )) => false,
        // Property value inside an object, label or `case` inside a block
        Some((Token::Colon, _)) => enclosing.last().copied().unwrap_or(false),
        Some((tok, _)) => tok.allows_regex_after(),
    }
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
    interner: Interner,
    /// Last located (offset, line, column); tokens are located in order.
    cursor: (usize, u32, u32),
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    UnterminatedTemplate { span: Span },
    UnterminatedRegex { span: Span },
    UnterminatedComment { span: Span },
    InvalidNumber { text: String, span: Span },
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            errors: Vec::new(),
            interner: Interner::with_capacity(256),
            cursor: (0, 1, 1),
        }
    }

    /// Format all errors with source context
    pub fn format_errors(errors: &[LexError], source: &str) -> String {
        errors
            .iter()
            .map(|e| e.format_with_source(source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tokenize(mut self) -> Result<(Vec<(Token, Span)>, Interner), Vec<LexError>> {
        let start = hashbang_len(self.source);
        let (mut tokens, _) = self.lex_until(start, false);

        let end = self.source.len();
        let eof_span = self.span(end, end);
        tokens.push((Token::Eof, eof_span));

        if self.errors.is_empty() {
            Ok((tokens, self.interner))
        } else {
            Err(self.errors)
        }
    }

    /// Line and column of a byte offset.
    fn locate(&mut self, offset: usize) -> (u32, u32) {
        let (mut pos, mut line, mut column) = self.cursor;
        if offset < pos {
            pos = 0;
            line = 1;
            column = 1;
        }

        let bytes = self.source.as_bytes();
        for (i, c) in self.source[pos..offset].char_indices() {
            match c {
                '\r' if bytes.get(pos + i + 1) == Some(&b'\n') => {}
                c if is_line_terminator(c) => {
                    line += 1;
                    column = 1;
                }
                _ => column += 1,
            }
        }

        self.cursor = (offset, line, column);
        (line, column)
    }

    fn span(&mut self, start: usize, end: usize) -> Span {
        let (line, column) = self.locate(start);
        Span::new(start, end, line, column)
    }

    /// Skip whitespace and comments, returning the next token offset.
    fn skip_trivia(&mut self, mut pos: usize) -> usize {
        let source = self.source;
        let bytes = source.as_bytes();

        while pos < bytes.len() {
            match bytes[pos] {
                b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C => pos += 1,
                b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                    pos = line_end(source, pos);
                }
                b'/' if bytes.get(pos + 1) == Some(&b'*') => match source[pos + 2..].find("*/") {
                    Some(i) => pos = pos + 2 + i + 2,
                    None => {
                        let span = self.span(pos, bytes.len());
                        self.errors.push(LexError::UnterminatedComment { span });
                        return bytes.len();
                    }
                },
                b if b >= 0x80 => match source[pos..].chars().next() {
                    Some(c) if is_js_whitespace(c) || is_line_terminator(c) => pos += c.len_utf8(),
                    _ => break,
                },
                _ => break,
            }
        }

        pos
    }

    /// Lex tokens starting at `start`.
    ///
    /// Inside a template substitution lexing stops at the `}` that closes it
    /// and returns that brace's offset; otherwise it runs to end of input.
    fn lex_until(&mut self, start: usize, in_substitution: bool) -> (Vec<(Token, Span)>, usize) {
        let source = self.source;
        let len = source.len();
        let mut tokens: Vec<(Token, Span)> = Vec::new();
        // Open parens (true: control statement head) and braces (true:
        // object literal)
        let mut parens: Vec<bool> = Vec::new();
        let mut braces: Vec<bool> = Vec::new();
        // Whether the last `)` or `}` may be followed by a regex
        let mut regex_after_close = true;
        let mut pos = start;

        loop {
            pos = self.skip_trivia(pos);
            if pos >= len {
                return (tokens, len);
            }

            let regex_allowed = match tokens.last() {
                None => true,
                Some((Token::RightParen | Token::RightBrace, _)) => regex_after_close,
                Some((tok, _)) => tok.allows_regex_after(),
            };
            match source.as_bytes()[pos] {
                b'`' => {
                    let (line, column) = self.locate(pos);
                    match self.lex_template(pos, line, column) {
                        Ok((parts, end)) => {
                            tokens.push((Token::Template(parts), Span::new(pos, end, line, column)));
                            pos = end;
                            continue;
                        }
                        Err(err) => {
                            self.errors.push(err);
                            return (tokens, len);
                        }
                    }
                }
                b'/' if regex_allowed => {
                    let (line, column) = self.locate(pos);
                    match self.lex_regex(pos) {
                        Ok((token, end)) => {
                            tokens.push((token, Span::new(pos, end, line, column)));
                            pos = end;
                        }
                        Err(end) => {
                            let span = Span::new(pos, end, line, column);
                            self.errors.push(LexError::UnterminatedRegex { span });
                            pos = end;
                        }
                    }
                    continue;
                }
                b'}' if in_substitution && braces.is_empty() => return (tokens, pos),
                _ => {}
            }

            let mut logos_lexer = LogosToken::lexer(&source[pos..]);
            let Some(token_result) = logos_lexer.next() else {
                return (tokens, len);
            };
            let range = logos_lexer.span();
            let abs_start = pos + range.start;
            let mut abs_end = pos + range.end;

            match token_result {
                Ok(LogosToken::QuestionDot)
                    if source.as_bytes().get(abs_end).is_some_and(u8::is_ascii_digit) =>
                {
                    // `a ?.5 : b` is a conditional, not optional chaining
                    abs_end = abs_start + 1;
                    let span = self.span(abs_start, abs_end);
                    tokens.push((Token::Question, span));
                }
                Ok(logos_token) => {
                    let is_word = source.as_bytes()[abs_start].is_ascii_alphabetic()
                        || matches!(source.as_bytes()[abs_start], b'_' | b'$' | b'#');
                    let token = if is_word && self.continues_identifier(abs_end) {
                        abs_end = self.scan_identifier_tail(abs_end);
                        self.word_token(abs_start, abs_end)
                    } else {
                        self.convert_token(logos_token, &source[abs_start..abs_end])
                    };
                    match token {
                        Token::LeftParen => parens.push(opens_control_head(&tokens)),
                        Token::RightParen => regex_after_close = parens.pop().unwrap_or(false),
                        Token::LeftBrace => braces.push(opens_object_literal(&tokens, &braces)),
                        Token::RightBrace => regex_after_close = !braces.pop().unwrap_or(false),
                        _ => {}
                    }
                    let span = self.span(abs_start, abs_end);
                    tokens.push((token, span));
                }
                Err(_) => {
                    let ch = source[abs_start..].chars().next().unwrap_or('\0');
                    let escaped_start = match self.identifier_escape(abs_start) {
                        Some((c, end)) if is_identifier_start(c) => Some(end),
                        _ => None,
                    };
                    if let Some(escape_end) = escaped_start {
                        abs_end = self.scan_identifier_tail(escape_end);
                        let token = self.word_token(abs_start, abs_end);
                        let span = self.span(abs_start, abs_end);
                        tokens.push((token, span));
                    } else if is_identifier_start(ch) || (ch == '#' && self.continues_identifier(abs_start + 1)) {
                        abs_end = self.scan_identifier_tail(abs_start + ch.len_utf8());
                        let token = self.word_token(abs_start, abs_end);
                        let span = self.span(abs_start, abs_end);
                        tokens.push((token, span));
                    } else if ch == '"' || ch == '\'' {
                        abs_end = line_end(source, abs_start);
                        let span = self.span(abs_start, abs_end);
                        self.errors.push(LexError::UnterminatedString { span });
                    } else if ch.is_ascii_digit() || ch == '.' {
                        let span = self.span(abs_start, pos + range.end);
                        let text = source[abs_start..pos + range.end].to_string();
                        self.errors.push(LexError::InvalidNumber { text, span });
                        abs_end = (pos + range.end).max(abs_start + 1);
                    } else {
                        abs_end = abs_start + ch.len_utf8().max(1);
                        let span = self.span(abs_start, abs_end);
                        self.errors.push(LexError::UnexpectedCharacter { char: ch, span });
                    }
                }
            }

            pos = abs_end;
        }
    }

    /// Whether the character at `pos` extends an identifier beyond what the
    /// ASCII automaton matched.
    fn continues_identifier(&self, pos: usize) -> bool {
        if let Some((c, _)) = self.identifier_escape(pos) {
            return is_identifier_continue(c);
        }
        self.source[pos..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_ascii() && is_identifier_continue(c))
    }

    fn scan_identifier_tail(&self, mut pos: usize) -> usize {
        loop {
            if let Some((c, end)) = self.identifier_escape(pos) {
                if !is_identifier_continue(c) {
                    break;
                }
                pos = end;
                continue;
            }
            match self.source[pos..].chars().next() {
                Some(c) if is_identifier_continue(c) => pos += c.len_utf8(),
                _ => break,
            }
        }
        pos
    }

    /// A `\uXXXX` or `\u{X...}` escape at `pos`: the character it denotes
    /// and the offset past it.
    fn identifier_escape(&self, pos: usize) -> Option<(char, usize)> {
        let rest = self.source.get(pos..)?.strip_prefix("\\u")?;
        let (digits, len) = match rest.strip_prefix('{') {
            Some(braced) => {
                let close = braced.find('}')?;
                (&braced[..close], close + 2)
            }
            None => (rest.get(..4)?, 4),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let c = char::from_u32(u32::from_str_radix(digits, 16).ok()?)?;
        Some((c, pos + 2 + len))
    }

    /// Identifier or private name spanning `start..end`, with escapes
    /// cooked.
    fn word_token(&mut self, start: usize, end: usize) -> Token {
        let text = &self.source[start..end];
        let cooked;
        let text = if text.contains('\\') {
            cooked = unescape_string(text);
            cooked.as_str()
        } else {
            text
        };
        match text.strip_prefix('#') {
            Some(name) => Token::PrivateName(self.interner.intern(name)),
            None => Token::Identifier(self.interner.intern(text)),
        }
    }

    fn convert_token(&mut self, logos_token: LogosToken, slice: &str) -> Token {
        match logos_token {
            LogosToken::Break => Token::Break,
            LogosToken::Case => Token::Case,
            LogosToken::Catch => Token::Catch,
            LogosToken::Class => Token::Class,
            LogosToken::Const => Token::Const,
            LogosToken::Continue => Token::Continue,
            LogosToken::Debugger => Token::Debugger,
            LogosToken::Default => Token::Default,
            LogosToken::Delete => Token::Delete,
            LogosToken::Do => Token::Do,
            LogosToken::Else => Token::Else,
            LogosToken::Export => Token::Export,
            LogosToken::Extends => Token::Extends,
            LogosToken::Finally => Token::Finally,
            LogosToken::For => Token::For,
            LogosToken::Function => Token::Function,
            LogosToken::If => Token::If,
            LogosToken::Import => Token::Import,
            LogosToken::In => Token::In,
            LogosToken::Instanceof => Token::Instanceof,
            LogosToken::Let => Token::Let,
            LogosToken::New => Token::New,
            LogosToken::Return => Token::Return,
            LogosToken::Super => Token::Super,
            LogosToken::Switch => Token::Switch,
            LogosToken::This => Token::This,
            LogosToken::Throw => Token::Throw,
            LogosToken::Try => Token::Try,
            LogosToken::Typeof => Token::Typeof,
            LogosToken::Var => Token::Var,
            LogosToken::Void => Token::Void,
            LogosToken::While => Token::While,
            LogosToken::With => Token::With,
            LogosToken::Yield => Token::Yield,
            LogosToken::Await => Token::Await,
            LogosToken::True => Token::True,
            LogosToken::False => Token::False,
            LogosToken::Null => Token::Null,
            LogosToken::Identifier => Token::Identifier(self.interner.intern(slice)),
            LogosToken::PrivateName => Token::PrivateName(self.interner.intern(&slice[1..])),
            LogosToken::Number(n) => Token::Number(n),
            LogosToken::BigInt => Token::BigInt(self.interner.intern(&slice[..slice.len() - 1])),
            LogosToken::String => {
                let cooked = unescape_string(&slice[1..slice.len() - 1]);
                Token::String(self.interner.intern(&cooked))
            }
            LogosToken::GreaterGreaterGreaterEqual => Token::GreaterGreaterGreaterEqual,
            LogosToken::EqualEqualEqual => Token::EqualEqualEqual,
            LogosToken::BangEqualEqual => Token::BangEqualEqual,
            LogosToken::GreaterGreaterGreater => Token::GreaterGreaterGreater,
            LogosToken::StarStarEqual => Token::StarStarEqual,
            LogosToken::LessLessEqual => Token::LessLessEqual,
            LogosToken::GreaterGreaterEqual => Token::GreaterGreaterEqual,
            LogosToken::AmpAmpEqual => Token::AmpAmpEqual,
            LogosToken::PipePipeEqual => Token::PipePipeEqual,
            LogosToken::QuestionQuestionEqual => Token::QuestionQuestionEqual,
            LogosToken::DotDotDot => Token::DotDotDot,
            LogosToken::StarStar => Token::StarStar,
            LogosToken::EqualEqual => Token::EqualEqual,
            LogosToken::BangEqual => Token::BangEqual,
            LogosToken::LessEqual => Token::LessEqual,
            LogosToken::GreaterEqual => Token::GreaterEqual,
            LogosToken::AmpAmp => Token::AmpAmp,
            LogosToken::PipePipe => Token::PipePipe,
            LogosToken::QuestionQuestion => Token::QuestionQuestion,
            LogosToken::QuestionDot => Token::QuestionDot,
            LogosToken::PlusPlus => Token::PlusPlus,
            LogosToken::MinusMinus => Token::MinusMinus,
            LogosToken::LessLess => Token::LessLess,
            LogosToken::GreaterGreater => Token::GreaterGreater,
            LogosToken::Arrow => Token::Arrow,
            LogosToken::PlusEqual => Token::PlusEqual,
            LogosToken::MinusEqual => Token::MinusEqual,
            LogosToken::StarEqual => Token::StarEqual,
            LogosToken::SlashEqual => Token::SlashEqual,
            LogosToken::PercentEqual => Token::PercentEqual,
            LogosToken::AmpEqual => Token::AmpEqual,
            LogosToken::PipeEqual => Token::PipeEqual,
            LogosToken::CaretEqual => Token::CaretEqual,
            LogosToken::Plus => Token::Plus,
            LogosToken::Minus => Token::Minus,
            LogosToken::Star => Token::Star,
            LogosToken::Slash => Token::Slash,
            LogosToken::Percent => Token::Percent,
            LogosToken::Bang => Token::Bang,
            LogosToken::Tilde => Token::Tilde,
            LogosToken::Less => Token::Less,
            LogosToken::Greater => Token::Greater,
            LogosToken::Amp => Token::Amp,
            LogosToken::Pipe => Token::Pipe,
            LogosToken::Caret => Token::Caret,
            LogosToken::Equal => Token::Equal,
            LogosToken::Question => Token::Question,
            LogosToken::Dot => Token::Dot,
            LogosToken::Colon => Token::Colon,
            LogosToken::At => Token::At,
            LogosToken::LeftParen => Token::LeftParen,
            LogosToken::RightParen => Token::RightParen,
            LogosToken::LeftBrace => Token::LeftBrace,
            LogosToken::RightBrace => Token::RightBrace,
            LogosToken::LeftBracket => Token::LeftBracket,
            LogosToken::RightBracket => Token::RightBracket,
            LogosToken::Semicolon => Token::Semicolon,
            LogosToken::Comma => Token::Comma,
        }
    }

    /// Scan a regular expression literal starting at the opening `/`.
    ///
    /// On failure returns the offset where scanning stopped.
    fn lex_regex(&mut self, start: usize) -> Result<(Token, usize), usize> {
        let source = self.source;
        let mut chars = source[start + 1..].char_indices();
        let mut in_class = false;

        let body_end = loop {
            match chars.next() {
                None => return Err(source.len()),
                Some((i, c)) if is_line_terminator(c) => return Err(start + 1 + i),
                Some((_, '\\')) => match chars.next() {
                    Some((i, c)) if is_line_terminator(c) => return Err(start + 1 + i),
                    None => return Err(source.len()),
                    Some(_) => {}
                },
                Some((_, '[')) => in_class = true,
                Some((_, ']')) => in_class = false,
                Some((i, '/')) if !in_class => break start + 1 + i,
                Some(_) => {}
            }
        };

        let end = self.scan_identifier_tail(body_end + 1);
        let pattern = self.interner.intern(&source[start + 1..body_end]);
        let flags = self.interner.intern(&source[body_end + 1..end]);
        Ok((Token::RegExp { pattern, flags }, end))
    }

    /// Scan a template literal starting at the opening backtick.
    ///
    /// Parts alternate text and substitution, always starting and ending with
    /// a (possibly empty) text part.
    fn lex_template(
        &mut self,
        start: usize,
        line: u32,
        column: u32,
    ) -> Result<(Vec<TemplatePart>, usize), LexError> {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut parts = Vec::new();
        let mut chunk_start = start + 1;
        let mut pos = chunk_start;

        while pos < bytes.len() {
            match bytes[pos] {
                b'`' => {
                    let cooked = unescape_string(&source[chunk_start..pos]);
                    parts.push(TemplatePart::String(self.interner.intern(&cooked)));
                    return Ok((parts, pos + 1));
                }
                b'\\' => pos += 2,
                b'$' if bytes.get(pos + 1) == Some(&b'{') => {
                    let cooked = unescape_string(&source[chunk_start..pos]);
                    parts.push(TemplatePart::String(self.interner.intern(&cooked)));

                    let (tokens, close) = self.lex_until(pos + 2, true);
                    if close >= bytes.len() {
                        break;
                    }
                    parts.push(TemplatePart::Expression(tokens));
                    pos = close + 1;
                    chunk_start = pos;
                }
                _ => pos += 1,
            }
        }

        let span = Span::new(start, bytes.len(), line, column);
        Err(LexError::UnterminatedTemplate { span })
    }
}

impl LexError {
    /// Get the span of this error
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedTemplate { span }
            | LexError::UnterminatedRegex { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidNumber { span, .. } => span,
        }
    }

    /// Get a description of this error
    pub fn description(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { char, .. } => {
                format!("Unexpected character '{}'", char)
            }
            LexError::UnterminatedString { .. } => "Unterminated string constant".to_string(),
            LexError::UnterminatedTemplate { .. } => "Unterminated template".to_string(),
            LexError::UnterminatedRegex { .. } => {
                "Unterminated regular expression".to_string()
            }
            LexError::UnterminatedComment { .. } => "Unterminated comment".to_string(),
            LexError::InvalidNumber { text, .. } => {
                format!("Invalid number '{}'", text)
            }
        }
    }

    /// Get a hint for fixing this error
    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("Add a closing quote, or escape the line break with a backslash".to_string())
            }
            LexError::UnterminatedTemplate { .. } => {
                Some("Add a closing backtick (`) to terminate the template literal".to_string())
            }
            LexError::UnterminatedRegex { .. } => {
                Some("Regular expressions cannot span lines; close it with /".to_string())
            }
            LexError::UnterminatedComment { .. } => Some("Close the comment with */".to_string()),
            _ => None,
        }
    }

    /// Format the error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        let span = self.span();
        let mut result = String::new();

        result.push_str(&format!(
            "Error at {}:{}: {}\n",
            span.line,
            span.column,
            self.description()
        ));

        if let Some(error_line) = source.lines().nth(span.line.saturating_sub(1) as usize) {
            result.push_str("  |\n");
            result.push_str(&format!("{:3} | {}\n", span.line, error_line));
            result.push_str(&format!(
                "  | {}^\n",
                " ".repeat(span.column.saturating_sub(1) as usize)
            ));
        }

        if let Some(hint) = self.hint() {
            result.push_str(&format!("\nHint: {}\n", hint));
        }

        result
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.description(),
            self.span().line,
            self.span().column
        )
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<(Token, Span)>, Interner) {
        Lexer::new(source).tokenize().expect("should lex")
    }

    fn kinds(source: &str) -> Vec<Token> {
        lex(source).0.into_iter().map(|(tok, _)| tok).collect()
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        let (tokens, interner) = lex("class Foo extends of");
        assert_eq!(tokens[0].0, Token::Class);
        assert!(matches!(tokens[1].0, Token::Identifier(sym) if interner.resolve(sym) == "Foo"));
        assert_eq!(tokens[2].0, Token::Extends);
        assert!(matches!(tokens[3].0, Token::Identifier(sym) if interner.resolve(sym) == "of"));
        assert_eq!(tokens[4].0, Token::Eof);
    }

    #[test]
    fn test_dollar_identifiers() {
        let (tokens, interner) = lex("__$wc_hmr$__.register");
        assert!(matches!(tokens[0].0, Token::Identifier(sym) if interner.resolve(sym) == "__$wc_hmr$__"));
        assert_eq!(tokens[1].0, Token::Dot);
    }

    #[test]
    fn test_unicode_identifiers() {
        let (tokens, interner) = lex("const café = ñandú;");
        assert!(matches!(tokens[1].0, Token::Identifier(sym) if interner.resolve(sym) == "café"));
        assert!(matches!(tokens[3].0, Token::Identifier(sym) if interner.resolve(sym) == "ñandú"));
        assert_eq!(tokens[4].0, Token::Semicolon);
    }

    #[test]
    fn test_escaped_identifiers() {
        let (tokens, interner) = lex("class \\u0041B extends A\\u{42}C {}");
        assert!(matches!(tokens[1].0, Token::Identifier(sym) if interner.resolve(sym) == "AB"));
        assert_eq!(tokens[1].1.end, 13);
        assert!(matches!(tokens[3].0, Token::Identifier(sym) if interner.resolve(sym) == "ABC"));
        assert_eq!(tokens[4].0, Token::LeftBrace);
    }

    #[test]
    fn test_escape_outside_identifier_is_an_error() {
        let errors = Lexer::new("a \\u0020 b").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { char: '\\', .. }));
    }

    #[test]
    fn test_private_names() {
        let (tokens, interner) = lex("this.#count");
        assert!(matches!(tokens[2].0, Token::PrivateName(sym) if interner.resolve(sym) == "count"));
    }

    #[test]
    fn test_numbers() {
        let toks = kinds("42 0xFF 0b1010 0o17 1_000 3.5 .5 1e3");
        assert_eq!(
            &toks[..8],
            &[
                Token::Number(42.0),
                Token::Number(255.0),
                Token::Number(10.0),
                Token::Number(15.0),
                Token::Number(1000.0),
                Token::Number(3.5),
                Token::Number(0.5),
                Token::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_bigint() {
        let (tokens, interner) = lex("123n");
        assert!(matches!(tokens[0].0, Token::BigInt(sym) if interner.resolve(sym) == "123"));
    }

    #[test]
    fn test_string_escapes() {
        let (tokens, interner) = lex(r#"'it\'s' "a\nb" '\u{1F600}' '😀' 'x\
y'"#);
        let strings: Vec<_> = tokens
            .iter()
            .filter_map(|(t, _)| match t {
                Token::String(sym) => Some(interner.resolve(*sym).to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec!["it's", "a\nb", "😀", "😀", "xy"]);
    }

    #[test]
    fn test_regex_versus_division() {
        let toks = kinds("a / b / c");
        assert_eq!(toks[1], Token::Slash);
        assert_eq!(toks[3], Token::Slash);

        let (tokens, interner) = lex("x = /[/]+\\//g.test(y)");
        match &tokens[2].0 {
            Token::RegExp { pattern, flags } => {
                assert_eq!(interner.resolve(*pattern), "[/]+\\/");
                assert_eq!(interner.resolve(*flags), "g");
            }
            other => panic!("Expected regex, got {:?}", other),
        }
        assert_eq!(tokens[3].0, Token::Dot);
    }

    #[test]
    fn test_regex_after_keyword() {
        let toks = kinds("return /a/.test(s)");
        assert!(matches!(toks[1], Token::RegExp { .. }));
    }

    #[test]
    fn test_regex_after_control_head() {
        let toks = kinds("if (a) /re/.test(s);");
        assert!(matches!(toks[4], Token::RegExp { .. }));
        let toks = kinds("while (x()) /a/g.exec(s)");
        assert!(matches!(toks[6], Token::RegExp { .. }));
        let toks = kinds("for await (const x of y) /a/.test(x)");
        assert!(matches!(toks[8], Token::RegExp { .. }));

        // A call's closing paren still ends a value
        let toks = kinds("f(a) / 2");
        assert_eq!(toks[4], Token::Slash);
    }

    #[test]
    fn test_division_after_object_literal() {
        let toks = kinds("const x = {} / 2;");
        assert_eq!(toks[5], Token::Slash);
        let toks = kinds("x = { a: { b: 1 } } / 2");
        assert_eq!(toks[11], Token::Slash);

        // Block and function bodies still end a statement
        let toks = kinds("{} /a/.test(s)");
        assert!(matches!(toks[2], Token::RegExp { .. }));
        let toks = kinds("function f() {}\n/a/g.exec(s)");
        assert!(matches!(toks[6], Token::RegExp { .. }));
    }

    #[test]
    fn test_template_with_substitutions() {
        let (tokens, interner) = lex("html`<p>${user.name}</p>${`inner ${x}`}`;");
        let Token::Template(parts) = &tokens[1].0 else {
            panic!("Expected template, got {:?}", tokens[1].0);
        };
        assert_eq!(parts.len(), 5);
        assert!(matches!(&parts[0], TemplatePart::String(s) if interner.resolve(*s) == "<p>"));
        assert!(matches!(&parts[1], TemplatePart::Expression(toks) if toks.len() == 3));
        assert!(matches!(&parts[2], TemplatePart::String(s) if interner.resolve(*s) == "</p>"));
        match &parts[3] {
            TemplatePart::Expression(toks) => assert!(matches!(toks[0].0, Token::Template(_))),
            other => panic!("Expected nested template, got {:?}", other),
        }
        assert_eq!(tokens[2].0, Token::Semicolon);
        // Template span covers the whole literal
        assert_eq!(tokens[1].1.start, 4);
    }

    #[test]
    fn test_template_substitution_with_braces() {
        let (tokens, _) = lex("`${ {a: '}'}.a }`");
        let Token::Template(parts) = &tokens[0].0 else {
            panic!("Expected template");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(tokens[1].0, Token::Eof);
    }

    #[test]
    fn test_comments_and_hashbang_skipped() {
        let toks = kinds("#!/usr/bin/env node\n// line\n/* block\n */ a");
        assert_eq!(toks.len(), 2);
        assert!(matches!(toks[0], Token::Identifier(_)));
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let (tokens, _) = lex("let a;\n  class B {}");
        let (_, class_span) = &tokens[3];
        assert_eq!(class_span.line, 2);
        assert_eq!(class_span.column, 3);
        assert_eq!(class_span.start, 9);
    }

    #[test]
    fn test_optional_chain_before_digit() {
        let toks = kinds("a?.5:1");
        assert_eq!(toks[1], Token::Question);
        assert_eq!(toks[2], Token::Number(0.5));
    }

    #[test]
    fn test_unterminated_string() {
        let errors = Lexer::new("const a = 'oops\n").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unterminated_template() {
        let errors = Lexer::new("const a = `oops ${b}").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedTemplate { .. }));
    }

    #[test]
    fn test_unterminated_comment() {
        let errors = Lexer::new("a /* never closed").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let errors = Lexer::new("a \u{0001} b").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { char: '\u{0001}', .. }));
        assert!(errors[0].format_with_source("a \u{0001} b").contains("Unexpected character"));
    }
}
