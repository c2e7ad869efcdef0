//! Class parsing: heads, bodies, members and decorators
//!
//! Shared by class declarations, class expressions and `export default
//! class`. Method modifiers are also used by object literal methods.

use super::guards::LoopGuard;
use super::{expr, pattern, stmt, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::{Span, Token};

/// Everything after the `class` keyword, before it is wrapped into a
/// declaration or an expression.
pub struct ClassParts {
    pub name: Option<Identifier>,
    pub extends: Option<Expression>,
    pub members: Vec<ClassMember>,
}

/// Parse `class [name] [extends Heritage] { members }`.
pub fn parse_class(parser: &mut Parser) -> Result<ClassParts, ParseError> {
    parser.expect(Token::Class)?;

    let name = if matches!(parser.current(), Token::Identifier(_)) {
        Some(parser.parse_identifier()?)
    } else {
        None
    };

    // Heritage is a left-hand-side expression: `Base`, `ns.Base`, `Mixin(Base)`
    let extends = if parser.eat(&Token::Extends) {
        Some(expr::parse_left_hand_side(parser)?)
    } else {
        None
    };

    let members = parse_class_body(parser)?;

    Ok(ClassParts {
        name,
        extends,
        members,
    })
}

fn parse_class_body(parser: &mut Parser) -> Result<Vec<ClassMember>, ParseError> {
    parser.expect(Token::LeftBrace)?;

    let mut members = Vec::new();
    let mut guard = LoopGuard::new("class_members");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;

        if parser.eat(&Token::Semicolon) {
            continue;
        }
        members.push(parse_class_member(parser)?);
    }

    parser.expect(Token::RightBrace)?;
    Ok(members)
}

fn parse_class_member(parser: &mut Parser) -> Result<ClassMember, ParseError> {
    let start_span = parser.current_span();
    let decorators = parse_decorators(parser)?;

    let mut is_static = false;
    if parser.is_word("static") && !ends_member_name(parser.peek()) {
        if matches!(parser.peek(), Some(Token::LeftBrace)) && decorators.is_empty() {
            parser.advance();
            let block = parser.with_in(true, stmt::parse_block_statement)?;
            return Ok(ClassMember::StaticBlock(block));
        }
        parser.advance();
        is_static = true;
    }

    let mut modifiers = parse_method_modifiers(parser);
    modifiers.is_static = is_static;
    let key = expr::parse_property_key(parser)?;

    if parser.check(&Token::LeftParen) {
        if !is_static && !modifiers.is_modified() && is_constructor_key(parser, &key) {
            modifiers.kind = MethodKind::Constructor;
        }
        let method = parse_method_rest(parser, start_span, decorators, key, modifiers)?;
        return Ok(ClassMember::Method(method));
    }

    if modifiers.is_modified() {
        return Err(parser.unexpected_token(&[Token::LeftParen]));
    }

    let initializer = if parser.eat(&Token::Equal) {
        Some(parser.with_in(true, expr::parse_assignment)?)
    } else {
        None
    };
    parser.consume_semicolon()?;

    Ok(ClassMember::Field(FieldDecl {
        decorators,
        key,
        initializer,
        is_static,
        span: parser.span_from(&start_span),
    }))
}

fn is_constructor_key(parser: &Parser, key: &PropertyKey) -> bool {
    match key {
        PropertyKey::Identifier(id) => parser.resolve(id.name) == "constructor",
        PropertyKey::StringLiteral(lit) => parser.resolve(lit.value) == "constructor",
        _ => false,
    }
}

// ============================================================================
// Methods
// ============================================================================

/// Modifiers written before a method name.
#[derive(Debug, Clone, Copy)]
pub struct MethodModifiers {
    pub is_static: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub kind: MethodKind,
}

impl MethodModifiers {
    /// Whether anything beyond `static` was written; such a member must be
    /// a method.
    pub fn is_modified(&self) -> bool {
        self.is_async || self.is_generator || self.kind != MethodKind::Method
    }
}

/// A contextual word followed by one of these is itself the member name:
/// `get() {}`, `static = 1`, `{ async, set }`.
fn ends_member_name(token: Option<&Token>) -> bool {
    matches!(
        token,
        None | Some(
            Token::LeftParen
                | Token::Equal
                | Token::Semicolon
                | Token::RightBrace
                | Token::Colon
                | Token::Comma
                | Token::Eof
        )
    )
}

/// Parse `async`, `*`, `get` and `set` in front of a member name.
pub fn parse_method_modifiers(parser: &mut Parser) -> MethodModifiers {
    let mut modifiers = MethodModifiers {
        is_static: false,
        is_async: false,
        is_generator: false,
        kind: MethodKind::Method,
    };

    if parser.is_word("async") && !ends_member_name(parser.peek()) && !parser.line_break_before_nth(1) {
        parser.advance();
        modifiers.is_async = true;
    }

    if parser.eat(&Token::Star) {
        modifiers.is_generator = true;
    }

    if !modifiers.is_async && !modifiers.is_generator && !ends_member_name(parser.peek()) {
        if parser.is_word("get") {
            parser.advance();
            modifiers.kind = MethodKind::Getter;
        } else if parser.is_word("set") {
            parser.advance();
            modifiers.kind = MethodKind::Setter;
        }
    }

    modifiers
}

/// Parse the parameter list and body of a method whose key has been read.
pub fn parse_method_rest(
    parser: &mut Parser,
    start_span: Span,
    decorators: Vec<Decorator>,
    key: PropertyKey,
    modifiers: MethodModifiers,
) -> Result<MethodDecl, ParseError> {
    let params = pattern::parse_formal_parameters(parser)?;
    let body = stmt::parse_function_body(parser)?;

    Ok(MethodDecl {
        decorators,
        key,
        kind: modifiers.kind,
        params,
        body,
        is_static: modifiers.is_static,
        is_async: modifiers.is_async,
        is_generator: modifiers.is_generator,
        span: parser.span_from(&start_span),
    })
}

// ============================================================================
// Decorators
// ============================================================================

/// Parse zero or more decorators: `@name`, `@ns.name`, `@name(args)`, `@(expr)`
pub fn parse_decorators(parser: &mut Parser) -> Result<Vec<Decorator>, ParseError> {
    let mut decorators = Vec::new();
    let mut guard = LoopGuard::new("decorators");

    while parser.check(&Token::At) {
        guard.check()?;
        let start_span = parser.current_span();
        parser.advance();

        let expression_start = parser.current_span();
        let expression = if parser.eat(&Token::LeftParen) {
            let inner = parser.with_in(true, expr::parse_expression)?;
            parser.expect(Token::RightParen)?;
            Expression::Parenthesized(ParenthesizedExpression {
                expression: Box::new(inner),
                span: parser.span_from(&expression_start),
            })
        } else {
            let mut expression = Expression::Identifier(parser.parse_identifier()?);
            while parser.eat(&Token::Dot) {
                let property = parser.parse_identifier_name()?;
                expression = Expression::Member(MemberExpression {
                    object: Box::new(expression),
                    property,
                    private: false,
                    optional: false,
                    span: parser.span_from(&expression_start),
                });
            }
            if parser.check(&Token::LeftParen) {
                let arguments = expr::parse_arguments(parser)?;
                expression = Expression::Call(CallExpression {
                    callee: Box::new(expression),
                    arguments,
                    optional: false,
                    span: parser.span_from(&expression_start),
                });
            }
            expression
        };

        decorators.push(Decorator {
            expression,
            span: parser.span_from(&start_span),
        });
    }

    Ok(decorators)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(source: &str) -> ClassParts {
        let mut parser = Parser::new(source).unwrap();
        let parts = parse_class(&mut parser).unwrap();
        assert!(parser.at_eof());
        parts
    }

    #[test]
    fn test_class_head() {
        let parts = class("class Foo extends Bar {}");
        assert!(parts.name.is_some());
        assert!(matches!(parts.extends, Some(Expression::Identifier(_))));

        let parts = class("class extends A(B(LitElement)) {}");
        assert!(parts.name.is_none());
        assert!(matches!(parts.extends, Some(Expression::Call(_))));
    }

    #[test]
    fn test_members() {
        let parts = class(
            "class A {
                static properties = { a: {} };
                #count = 0
                constructor() { super(); }
                get value() { return this.#count; }
                set value(v) {}
                static async *items() {}
                static { init(); }
                render() {}
            }",
        );

        assert_eq!(parts.members.len(), 8);
        assert!(matches!(&parts.members[0], ClassMember::Field(f) if f.is_static));
        assert!(matches!(&parts.members[1], ClassMember::Field(f) if matches!(f.key, PropertyKey::PrivateName(_))));
        assert!(matches!(&parts.members[2], ClassMember::Method(m) if m.kind == MethodKind::Constructor));
        assert!(matches!(&parts.members[3], ClassMember::Method(m) if m.kind == MethodKind::Getter));
        assert!(matches!(&parts.members[4], ClassMember::Method(m) if m.kind == MethodKind::Setter));
        assert!(matches!(&parts.members[5], ClassMember::Method(m) if m.is_static && m.is_async && m.is_generator));
        assert!(matches!(&parts.members[6], ClassMember::StaticBlock(_)));
    }

    #[test]
    fn test_contextual_words_as_member_names() {
        let parts = class("class A { static = 1; get() {} async() {} set; }");

        assert_eq!(parts.members.len(), 4);
        assert!(matches!(&parts.members[0], ClassMember::Field(f) if !f.is_static));
        assert!(matches!(&parts.members[1], ClassMember::Method(m) if m.kind == MethodKind::Method));
        assert!(matches!(&parts.members[2], ClassMember::Method(m) if !m.is_async));
        assert!(matches!(&parts.members[3], ClassMember::Field(_)));
    }

    #[test]
    fn test_member_decorators() {
        let parts = class("class A { @property({ type: String }) name; @ns.query('#x') el; }");

        let ClassMember::Field(field) = &parts.members[0] else {
            panic!("expected field");
        };
        assert_eq!(field.decorators.len(), 1);
        assert!(matches!(field.decorators[0].expression, Expression::Call(_)));
    }

    #[test]
    fn test_decorators() {
        let mut parser = Parser::new("@customElement('my-el') @(wrap()) class").unwrap();
        let decorators = parse_decorators(&mut parser).unwrap();

        assert_eq!(decorators.len(), 2);
        assert!(matches!(decorators[1].expression, Expression::Parenthesized(_)));
        assert!(parser.check(&Token::Class));
    }

    #[test]
    fn test_missing_method_parens() {
        let mut parser = Parser::new("class A { get x; }").unwrap();
        assert!(parse_class(&mut parser).is_err());
    }
}
