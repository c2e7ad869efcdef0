//! Expression parsing
//!
//! Assignment-level expressions go through [`parse_assignment`], which
//! detects arrow functions before falling through to the conditional
//! operator and the precedence climber for binary operators.

use super::guards::LoopGuard;
use super::precedence::{get_precedence, infix_operator, is_right_associative, InfixOperator};
use super::{class, pattern, stmt, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::interner::Symbol;
use crate::parser::token::{self, Span, Token};

/// Parse a full expression, including comma sequences.
pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let first = parse_assignment(parser)?;
    if !parser.check(&Token::Comma) {
        return Ok(first);
    }

    let mut expressions = vec![first];
    let mut guard = LoopGuard::new("sequence_expression");
    while parser.eat(&Token::Comma) {
        guard.check()?;
        expressions.push(parse_assignment(parser)?);
    }

    Ok(Expression::Sequence(SequenceExpression {
        expressions,
        span: parser.span_from(&start_span),
    }))
}

/// Parse an assignment-level expression (no top-level commas).
pub fn parse_assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.enter("expression")?;
    let result = parse_assignment_inner(parser);
    parser.exit();
    result
}

fn parse_assignment_inner(parser: &mut Parser) -> Result<Expression, ParseError> {
    if parser.check(&Token::Yield) {
        return parse_yield(parser);
    }
    if let Some(arrow) = arrow_start(parser) {
        return parse_arrow_function(parser, arrow);
    }

    let start_span = parser.current_span();
    let left = parse_conditional(parser)?;

    let Some(operator) = assignment_operator(parser.current()) else {
        return Ok(left);
    };

    let destructuring = matches!(left, Expression::Array(_) | Expression::Object(_));
    if !left.is_assignment_target() || (destructuring && operator != AssignmentOperator::Assign) {
        return Err(ParseError::invalid_syntax(
            "Invalid left-hand side in assignment",
            *left.span(),
        ));
    }

    parser.advance();
    let right = parse_assignment(parser)?;

    Ok(Expression::Assignment(AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: parser.span_from(&start_span),
    }))
}

fn assignment_operator(token: &Token) -> Option<AssignmentOperator> {
    let op = match token {
        Token::Equal => AssignmentOperator::Assign,
        Token::PlusEqual => AssignmentOperator::AddAssign,
        Token::MinusEqual => AssignmentOperator::SubtractAssign,
        Token::StarEqual => AssignmentOperator::MultiplyAssign,
        Token::SlashEqual => AssignmentOperator::DivideAssign,
        Token::PercentEqual => AssignmentOperator::ModuloAssign,
        Token::StarStarEqual => AssignmentOperator::ExponentAssign,
        Token::AmpEqual => AssignmentOperator::BitwiseAndAssign,
        Token::PipeEqual => AssignmentOperator::BitwiseOrAssign,
        Token::CaretEqual => AssignmentOperator::BitwiseXorAssign,
        Token::LessLessEqual => AssignmentOperator::LeftShiftAssign,
        Token::GreaterGreaterEqual => AssignmentOperator::RightShiftAssign,
        Token::GreaterGreaterGreaterEqual => AssignmentOperator::UnsignedRightShiftAssign,
        Token::AmpAmpEqual => AssignmentOperator::AndAssign,
        Token::PipePipeEqual => AssignmentOperator::OrAssign,
        Token::QuestionQuestionEqual => AssignmentOperator::NullishAssign,
        _ => return None,
    };
    Some(op)
}

// ============================================================================
// Arrow Functions and Yield
// ============================================================================

/// Shape of an arrow function head found by lookahead.
#[derive(Clone, Copy)]
struct ArrowStart {
    is_async: bool,
    /// `x => ...` rather than `(x) => ...`
    single_param: bool,
}

fn arrow_start(parser: &Parser) -> Option<ArrowStart> {
    match parser.current() {
        // `x => ...`, including a parameter named `async`
        Token::Identifier(_) if matches!(parser.peek(), Some(Token::Arrow)) => Some(ArrowStart {
            is_async: false,
            single_param: true,
        }),
        Token::LeftParen if parser.arrow_follows_group(0) => Some(ArrowStart {
            is_async: false,
            single_param: false,
        }),
        _ if parser.is_word("async") && !parser.line_break_before_nth(1) => match parser.peek() {
            Some(Token::Identifier(_)) if matches!(parser.peek_nth(2), Some(Token::Arrow)) => {
                Some(ArrowStart { is_async: true, single_param: true })
            }
            Some(Token::LeftParen) if parser.arrow_follows_group(1) => {
                Some(ArrowStart { is_async: true, single_param: false })
            }
            _ => None,
        },
        _ => None,
    }
}

fn parse_arrow_function(parser: &mut Parser, arrow: ArrowStart) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    if arrow.is_async {
        parser.advance();
    }

    let params = if arrow.single_param {
        let id = parser.parse_identifier()?;
        vec![Parameter {
            pattern: Pattern::Identifier(id),
            default_value: None,
            is_rest: false,
            span: id.span,
        }]
    } else {
        pattern::parse_formal_parameters(parser)?
    };

    if parser.has_line_break_before() {
        return Err(ParseError::invalid_syntax(
            "Line break before `=>` is not allowed",
            parser.current_span(),
        ));
    }
    parser.expect(Token::Arrow)?;

    let body = if parser.check(&Token::LeftBrace) {
        ArrowBody::Block(stmt::parse_function_body(parser)?)
    } else {
        ArrowBody::Expression(Box::new(parse_assignment(parser)?))
    };

    Ok(Expression::Arrow(ArrowFunction {
        params,
        body,
        is_async: arrow.is_async,
        span: parser.span_from(&start_span),
    }))
}

fn parse_yield(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Yield)?;

    let delegate = !parser.has_line_break_before() && parser.eat(&Token::Star);
    let argument = if delegate {
        Some(Box::new(parse_assignment(parser)?))
    } else if parser.has_line_break_before() || ends_expression(parser.current()) {
        None
    } else {
        Some(Box::new(parse_assignment(parser)?))
    };

    Ok(Expression::Yield(YieldExpression {
        argument,
        delegate,
        span: parser.span_from(&start_span),
    }))
}

fn ends_expression(token: &Token) -> bool {
    matches!(
        token,
        Token::RightParen
            | Token::RightBracket
            | Token::RightBrace
            | Token::Comma
            | Token::Semicolon
            | Token::Colon
            | Token::Eof
    )
}

// ============================================================================
// Conditional and Binary Operators
// ============================================================================

fn parse_conditional(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let test = parse_binary(parser, 0)?;

    if !parser.eat(&Token::Question) {
        return Ok(test);
    }

    let consequent = parser.with_in(true, parse_assignment)?;
    parser.expect(Token::Colon)?;
    let alternate = parse_assignment(parser)?;

    Ok(Expression::Conditional(ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        span: parser.span_from(&start_span),
    }))
}

/// Precedence climbing over binary and logical operators that bind
/// tighter than `min_precedence`.
fn parse_binary(parser: &mut Parser, min_precedence: u8) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();

    let mut left = match parser.current() {
        // `#field in obj`
        Token::PrivateName(name) if matches!(parser.peek(), Some(Token::In)) => {
            let id = Identifier::new(*name, start_span);
            parser.advance();
            Expression::PrivateName(id)
        }
        _ => parse_unary(parser)?,
    };

    let mut guard = LoopGuard::new("binary_expression");
    loop {
        guard.check()?;

        let precedence = get_precedence(parser.current(), parser.allow_in) as u8;
        if precedence <= min_precedence {
            break;
        }

        let op_token = parser.advance();
        let next_min = if is_right_associative(&op_token) {
            precedence - 1
        } else {
            precedence
        };
        let right = parse_binary(parser, next_min)?;
        let span = parser.span_from(&start_span);

        left = match infix_operator(&op_token) {
            Some(InfixOperator::Logical(operator)) => Expression::Logical(LogicalExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span,
            }),
            Some(InfixOperator::Binary(operator)) => Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span,
            }),
            None => {
                return Err(ParseError::invalid_syntax(
                    format!("`{}` is not a binary operator", op_token),
                    span,
                ))
            }
        };
    }

    Ok(left)
}

// ============================================================================
// Unary and Postfix
// ============================================================================

fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();

    let operator = match parser.current() {
        Token::Bang => Some(UnaryOperator::Not),
        Token::Tilde => Some(UnaryOperator::BitwiseNot),
        Token::Plus => Some(UnaryOperator::Plus),
        Token::Minus => Some(UnaryOperator::Minus),
        Token::Typeof => Some(UnaryOperator::Typeof),
        Token::Void => Some(UnaryOperator::Void),
        Token::Delete => Some(UnaryOperator::Delete),
        _ => None,
    };

    if let Some(operator) = operator {
        parser.advance();
        let operand = parse_nested_unary(parser)?;
        return Ok(Expression::Unary(UnaryExpression {
            operator,
            operand: Box::new(operand),
            span: parser.span_from(&start_span),
        }));
    }

    match parser.current() {
        Token::PlusPlus | Token::MinusMinus => {
            let operator = update_operator(&parser.advance());
            let argument = parse_nested_unary(parser)?;
            check_update_target(&argument)?;
            Ok(Expression::Update(UpdateExpression {
                operator,
                prefix: true,
                argument: Box::new(argument),
                span: parser.span_from(&start_span),
            }))
        }
        Token::Await => {
            parser.advance();
            let argument = parse_nested_unary(parser)?;
            Ok(Expression::Await(AwaitExpression {
                argument: Box::new(argument),
                span: parser.span_from(&start_span),
            }))
        }
        _ => parse_postfix(parser),
    }
}

fn parse_nested_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.enter("unary expression")?;
    let result = parse_unary(parser);
    parser.exit();
    result
}

fn update_operator(token: &Token) -> UpdateOperator {
    if matches!(token, Token::PlusPlus) {
        UpdateOperator::Increment
    } else {
        UpdateOperator::Decrement
    }
}

fn check_update_target(expr: &Expression) -> Result<(), ParseError> {
    match expr.unparenthesized() {
        Expression::Identifier(_) | Expression::Member(_) | Expression::Index(_) => Ok(()),
        _ => Err(ParseError::invalid_syntax(
            "Invalid operand for increment or decrement",
            *expr.span(),
        )),
    }
}

fn parse_postfix(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let expr = parse_left_hand_side(parser)?;

    // `a\n++b` is `a; ++b`
    if parser.check_any(&[Token::PlusPlus, Token::MinusMinus]) && !parser.has_line_break_before() {
        check_update_target(&expr)?;
        let operator = update_operator(&parser.advance());
        return Ok(Expression::Update(UpdateExpression {
            operator,
            prefix: false,
            argument: Box::new(expr),
            span: parser.span_from(&start_span),
        }));
    }

    Ok(expr)
}

// ============================================================================
// Calls and Member Access
// ============================================================================

/// Parse a left-hand-side expression: a primary expression followed by
/// any chain of member accesses, calls and tagged templates.
pub fn parse_left_hand_side(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let base = if parser.check(&Token::New) {
        parse_new(parser)?
    } else {
        parse_primary(parser)?
    };
    parse_call_member_tail(parser, base, start_span, true)
}

fn parse_call_member_tail(
    parser: &mut Parser,
    mut expr: Expression,
    start_span: Span,
    allow_call: bool,
) -> Result<Expression, ParseError> {
    let mut guard = LoopGuard::new("call_member_chain");

    loop {
        guard.check()?;

        match parser.current() {
            Token::Dot => {
                parser.advance();
                expr = parse_member_name(parser, expr, start_span, false)?;
            }
            Token::QuestionDot if allow_call => {
                parser.advance();
                expr = match parser.current() {
                    Token::LeftParen => {
                        let arguments = parse_arguments(parser)?;
                        Expression::Call(CallExpression {
                            callee: Box::new(expr),
                            arguments,
                            optional: true,
                            span: parser.span_from(&start_span),
                        })
                    }
                    Token::LeftBracket => parse_index(parser, expr, start_span, true)?,
                    _ => parse_member_name(parser, expr, start_span, true)?,
                };
            }
            Token::LeftBracket => {
                expr = parse_index(parser, expr, start_span, false)?;
            }
            Token::LeftParen if allow_call => {
                let arguments = parse_arguments(parser)?;
                expr = Expression::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments,
                    optional: false,
                    span: parser.span_from(&start_span),
                });
            }
            Token::Template(_) => {
                let quasi = parse_template_literal(parser)?;
                expr = Expression::TaggedTemplate(TaggedTemplateExpression {
                    tag: Box::new(expr),
                    quasi,
                    span: parser.span_from(&start_span),
                });
            }
            _ => break,
        }
    }

    Ok(expr)
}

fn parse_member_name(
    parser: &mut Parser,
    object: Expression,
    start_span: Span,
    optional: bool,
) -> Result<Expression, ParseError> {
    let (property, private) = match parser.current() {
        Token::PrivateName(name) => {
            let id = Identifier::new(*name, parser.current_span());
            parser.advance();
            (id, true)
        }
        _ => (parser.parse_identifier_name()?, false),
    };

    Ok(Expression::Member(MemberExpression {
        object: Box::new(object),
        property,
        private,
        optional,
        span: parser.span_from(&start_span),
    }))
}

fn parse_index(
    parser: &mut Parser,
    object: Expression,
    start_span: Span,
    optional: bool,
) -> Result<Expression, ParseError> {
    parser.expect(Token::LeftBracket)?;
    let index = parser.with_in(true, parse_expression)?;
    parser.expect(Token::RightBracket)?;

    Ok(Expression::Index(IndexExpression {
        object: Box::new(object),
        index: Box::new(index),
        optional,
        span: parser.span_from(&start_span),
    }))
}

/// Parse a parenthesized argument list: `(a, ...rest)`
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Argument>, ParseError> {
    parser.expect(Token::LeftParen)?;

    let mut arguments = Vec::new();
    let mut guard = LoopGuard::new("call_arguments");

    while !parser.check(&Token::RightParen) && !parser.at_eof() {
        guard.check()?;

        let argument = if parser.eat(&Token::DotDotDot) {
            Argument::Spread(parser.with_in(true, parse_assignment)?)
        } else {
            Argument::Expression(parser.with_in(true, parse_assignment)?)
        };
        arguments.push(argument);

        if !parser.check(&Token::RightParen) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightParen)?;
    Ok(arguments)
}

/// `new Foo(args)`, `new Foo`, `new new Foo()()`, `new.target`
fn parse_new(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::New)?;

    if parser.eat(&Token::Dot) {
        let meta = Identifier::new(parser.intern("new"), start_span);
        let property_span = parser.expect_word("target")?;
        let property = Identifier::new(parser.intern("target"), property_span);
        return Ok(Expression::MetaProperty(MetaProperty {
            meta,
            property,
            span: parser.span_from(&start_span),
        }));
    }

    parser.enter("new expression")?;
    let callee = parse_new_callee(parser);
    parser.exit();
    let callee = callee?;

    let arguments = if parser.check(&Token::LeftParen) {
        parse_arguments(parser)?
    } else {
        Vec::new()
    };

    Ok(Expression::New(NewExpression {
        callee: Box::new(callee),
        arguments,
        span: parser.span_from(&start_span),
    }))
}

/// Callee of `new`: member accesses bind, calls belong to the `new`.
fn parse_new_callee(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let base = if parser.check(&Token::New) {
        parse_new(parser)?
    } else {
        parse_primary(parser)?
    };
    parse_call_member_tail(parser, base, start_span, false)
}

// ============================================================================
// Primary Expressions
// ============================================================================

fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let span = parser.current_span();

    match parser.current() {
        Token::Number(value) => {
            let value = *value;
            parser.advance();
            Ok(Expression::NumberLiteral(NumberLiteral { value, span }))
        }
        Token::BigInt(digits) => {
            let digits = *digits;
            parser.advance();
            Ok(Expression::BigIntLiteral(BigIntLiteral { digits, span }))
        }
        Token::String(value) => {
            let value = *value;
            parser.advance();
            Ok(Expression::StringLiteral(StringLiteral { value, span }))
        }
        Token::Template(_) => parse_template_literal(parser).map(Expression::TemplateLiteral),
        Token::RegExp { pattern, flags } => {
            let (pattern, flags) = (*pattern, *flags);
            parser.advance();
            Ok(Expression::RegExpLiteral(RegExpLiteral { pattern, flags, span }))
        }
        Token::True | Token::False => {
            let value = matches!(parser.advance(), Token::True);
            Ok(Expression::BooleanLiteral(BooleanLiteral { value, span }))
        }
        Token::Null => {
            parser.advance();
            Ok(Expression::NullLiteral(span))
        }
        Token::This => {
            parser.advance();
            Ok(Expression::This(span))
        }
        Token::Super => {
            parser.advance();
            Ok(Expression::Super(span))
        }
        Token::Identifier(_) => {
            if parser.is_word("async")
                && matches!(parser.peek(), Some(Token::Function))
                && !parser.line_break_before_nth(1)
            {
                parser.advance();
                return parse_function(parser, span, true).map(Expression::Function);
            }
            parser.parse_identifier().map(Expression::Identifier)
        }
        Token::Function => parse_function(parser, span, false).map(Expression::Function),
        Token::Class | Token::At => {
            let decorators = class::parse_decorators(parser)?;
            parse_class_expression(parser, span, decorators).map(Expression::Class)
        }
        Token::LeftParen => {
            parser.advance();
            let expression = parser.with_in(true, parse_expression)?;
            parser.expect(Token::RightParen)?;
            Ok(Expression::Parenthesized(ParenthesizedExpression {
                expression: Box::new(expression),
                span: parser.span_from(&span),
            }))
        }
        Token::LeftBracket => parse_array_literal(parser),
        Token::LeftBrace => parse_object_literal(parser),
        Token::Import => parse_import_expression(parser),
        _ => Err(parser.unexpected_token(&[])),
    }
}

/// `import.meta` or `import(source, options)`
fn parse_import_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Import)?;

    if parser.eat(&Token::Dot) {
        let meta = Identifier::new(parser.intern("import"), start_span);
        let property_span = parser.expect_word("meta")?;
        let property = Identifier::new(parser.intern("meta"), property_span);
        return Ok(Expression::MetaProperty(MetaProperty {
            meta,
            property,
            span: parser.span_from(&start_span),
        }));
    }

    parser.expect(Token::LeftParen)?;
    let source = parser.with_in(true, parse_assignment)?;
    let options = if parser.eat(&Token::Comma) && !parser.check(&Token::RightParen) {
        Some(Box::new(parser.with_in(true, parse_assignment)?))
    } else {
        None
    };
    parser.eat(&Token::Comma);
    parser.expect(Token::RightParen)?;

    Ok(Expression::ImportCall(ImportCallExpression {
        source: Box::new(source),
        options,
        span: parser.span_from(&start_span),
    }))
}

/// Parse a template literal token, parsing each `${...}` substitution
/// from its own token stream.
pub fn parse_template_literal(parser: &mut Parser) -> Result<TemplateLiteral, ParseError> {
    let span = parser.current_span();
    let parts = match parser.advance() {
        Token::Template(parts) => parts,
        other => {
            return Err(ParseError::invalid_syntax(
                format!("Expected template literal, found `{}`", other),
                span,
            ))
        }
    };

    let mut result = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            token::TemplatePart::String(text) => result.push(TemplatePart::String(text)),
            token::TemplatePart::Expression(tokens) => {
                let end = tokens
                    .last()
                    .map(|(_, last)| Span::new(last.end, last.end, last.line, last.column))
                    .unwrap_or(span);
                let expression =
                    parser.with_tokens(tokens, end, |p| p.with_in(true, parse_expression))?;
                result.push(TemplatePart::Expression(Box::new(expression)));
            }
        }
    }

    Ok(TemplateLiteral { parts: result, span })
}

fn parse_array_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBracket)?;

    let mut elements = Vec::new();
    let mut guard = LoopGuard::new("array_elements");

    while !parser.check(&Token::RightBracket) && !parser.at_eof() {
        guard.check()?;

        if parser.eat(&Token::Comma) {
            elements.push(None);
            continue;
        }

        let element = if parser.eat(&Token::DotDotDot) {
            ArrayElement::Spread(parser.with_in(true, parse_assignment)?)
        } else {
            ArrayElement::Expression(parser.with_in(true, parse_assignment)?)
        };
        elements.push(Some(element));

        if !parser.check(&Token::RightBracket) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightBracket)?;

    Ok(Expression::Array(ArrayExpression {
        elements,
        span: parser.span_from(&start_span),
    }))
}

/// Parse an object literal: `{ a, b: 1, [c]: 2, m() {}, ...d }`
pub fn parse_object_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBrace)?;

    let mut properties = Vec::new();
    let mut guard = LoopGuard::new("object_properties");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;

        let property_start = parser.current_span();
        let property = if parser.eat(&Token::DotDotDot) {
            let argument = parser.with_in(true, parse_assignment)?;
            ObjectProperty::Spread(SpreadProperty {
                argument,
                span: parser.span_from(&property_start),
            })
        } else {
            parse_object_member(parser)?
        };
        properties.push(property);

        if !parser.check(&Token::RightBrace) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightBrace)?;

    Ok(Expression::Object(ObjectExpression {
        properties,
        span: parser.span_from(&start_span),
    }))
}

fn parse_object_member(parser: &mut Parser) -> Result<ObjectProperty, ParseError> {
    let start_span = parser.current_span();
    let head = class::parse_method_modifiers(parser);
    let key = parse_property_key(parser)?;

    if parser.check(&Token::LeftParen) || head.is_modified() {
        let method = class::parse_method_rest(parser, start_span, Vec::new(), key, head)?;
        return Ok(ObjectProperty::Method(method));
    }

    if parser.eat(&Token::Colon) {
        let value = parser.with_in(true, parse_assignment)?;
        return Ok(ObjectProperty::Property(Property {
            key,
            value,
            shorthand: false,
            span: parser.span_from(&start_span),
        }));
    }

    // Shorthand `{ a }`, or `{ a = 1 }` as a destructuring target
    let id = match &key {
        PropertyKey::Identifier(id) => *id,
        _ => return Err(parser.unexpected_token(&[Token::Colon])),
    };
    let value = if parser.eat(&Token::Equal) {
        let default = parser.with_in(true, parse_assignment)?;
        Expression::Assignment(AssignmentExpression {
            operator: AssignmentOperator::Assign,
            left: Box::new(Expression::Identifier(id)),
            right: Box::new(default),
            span: parser.span_from(&start_span),
        })
    } else {
        Expression::Identifier(id)
    };

    Ok(ObjectProperty::Property(Property {
        key,
        value,
        shorthand: true,
        span: parser.span_from(&start_span),
    }))
}

/// Parse a property name in an object literal, class body or pattern.
pub fn parse_property_key(parser: &mut Parser) -> Result<PropertyKey, ParseError> {
    let span = parser.current_span();

    match parser.current() {
        Token::String(value) => {
            let value = *value;
            parser.advance();
            Ok(PropertyKey::StringLiteral(StringLiteral { value, span }))
        }
        Token::Number(value) => {
            let value = *value;
            parser.advance();
            Ok(PropertyKey::NumberLiteral(NumberLiteral { value, span }))
        }
        Token::PrivateName(name) => {
            let id = Identifier::new(*name, span);
            parser.advance();
            Ok(PropertyKey::PrivateName(id))
        }
        Token::LeftBracket => {
            parser.advance();
            let expression = parser.with_in(true, parse_assignment)?;
            parser.expect(Token::RightBracket)?;
            Ok(PropertyKey::Computed(Box::new(expression)))
        }
        _ if parser.at_identifier_name() => parser.parse_identifier_name().map(PropertyKey::Identifier),
        _ => Err(parser.unexpected_token(&[
            Token::Identifier(Symbol::dummy()),
            Token::String(Symbol::dummy()),
            Token::LeftBracket,
        ])),
    }
}

// ============================================================================
// Functions and Classes
// ============================================================================

/// Parse `function [*] [name] (params) { body }`, starting at `function`.
///
/// `start_span` is where the expression began (at `async` if present).
pub fn parse_function(
    parser: &mut Parser,
    start_span: Span,
    is_async: bool,
) -> Result<FunctionExpression, ParseError> {
    parser.expect(Token::Function)?;
    let is_generator = parser.eat(&Token::Star);

    let name = if matches!(parser.current(), Token::Identifier(_)) {
        Some(parser.parse_identifier()?)
    } else {
        None
    };

    let params = pattern::parse_formal_parameters(parser)?;
    let body = stmt::parse_function_body(parser)?;

    Ok(FunctionExpression {
        name,
        params,
        body,
        is_async,
        is_generator,
        span: parser.span_from(&start_span),
    })
}

/// Parse `class [name] [extends Heritage] { body }` as an expression.
pub fn parse_class_expression(
    parser: &mut Parser,
    start_span: Span,
    decorators: Vec<Decorator>,
) -> Result<ClassExpression, ParseError> {
    let parts = class::parse_class(parser)?;

    Ok(ClassExpression {
        decorators,
        name: parts.name,
        extends: parts.extends.map(Box::new),
        members: parts.members,
        span: parser.span_from(&start_span),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        let mut parser = Parser::new(source).unwrap();
        let expr = parse_expression(&mut parser).unwrap();
        assert!(parser.at_eof(), "trailing tokens in {:?}", source);
        expr
    }

    #[test]
    fn test_binary_precedence() {
        let Expression::Binary(add) = parse("1 + 2 * 3") else {
            panic!("expected binary expression");
        };
        assert_eq!(add.operator, BinaryOperator::Add);
        assert!(matches!(*add.right, Expression::Binary(ref mul) if mul.operator == BinaryOperator::Multiply));
    }

    #[test]
    fn test_exponent_right_associative() {
        let Expression::Binary(outer) = parse("2 ** 3 ** 2") else {
            panic!("expected binary expression");
        };
        assert!(matches!(*outer.left, Expression::NumberLiteral(_)));
        assert!(matches!(*outer.right, Expression::Binary(_)));
    }

    #[test]
    fn test_logical_and_conditional() {
        assert!(matches!(parse("a ?? b"), Expression::Logical(_)));
        assert!(matches!(parse("a ? b : c"), Expression::Conditional(_)));
    }

    #[test]
    fn test_assignment_forms() {
        assert!(matches!(parse("x = 1"), Expression::Assignment(_)));
        assert!(matches!(parse("x ??= y"), Expression::Assignment(ref a) if a.operator == AssignmentOperator::NullishAssign));
        assert!(matches!(parse("[a, b] = pair"), Expression::Assignment(_)));
        assert!(matches!(parse("({ a = 1 } = obj)"), Expression::Parenthesized(_)));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("1 = x").unwrap();
        assert!(parse_expression(&mut parser).is_err());
    }

    #[test]
    fn test_arrow_functions() {
        assert!(matches!(parse("x => x"), Expression::Arrow(ref a) if a.params.len() == 1));
        assert!(matches!(parse("(a, b = 1) => { return a; }"), Expression::Arrow(ref a) if a.params.len() == 2));
        assert!(matches!(parse("async x => x"), Expression::Arrow(ref a) if a.is_async));
        assert!(matches!(parse("async () => {}"), Expression::Arrow(ref a) if a.is_async));
        assert!(matches!(parse("async(x)"), Expression::Call(_)));
    }

    #[test]
    fn test_mixin_call_chain() {
        let Expression::Call(outer) = parse("A(B(LitElement))") else {
            panic!("expected call");
        };
        assert!(matches!(outer.arguments[0], Argument::Expression(Expression::Call(_))));
    }

    #[test]
    fn test_member_and_optional_chain() {
        assert!(matches!(parse("a.b.c"), Expression::Member(_)));
        assert!(matches!(parse("a?.b"), Expression::Member(ref m) if m.optional));
        assert!(matches!(parse("a?.[0]"), Expression::Index(ref i) if i.optional));
        assert!(matches!(parse("a?.(1)"), Expression::Call(ref c) if c.optional));
        assert!(matches!(parse("this.#secret"), Expression::Member(ref m) if m.private));
    }

    #[test]
    fn test_new_expressions() {
        let Expression::New(new) = parse("new Foo.Bar(1)") else {
            panic!("expected new expression");
        };
        assert!(matches!(*new.callee, Expression::Member(_)));
        assert_eq!(new.arguments.len(), 1);

        assert!(matches!(parse("new Foo"), Expression::New(ref n) if n.arguments.is_empty()));
        assert!(matches!(parse("new Foo().bar()"), Expression::Call(_)));
    }

    #[test]
    fn test_import_meta_and_dynamic_import() {
        assert!(matches!(parse("import.meta.hot"), Expression::Member(_)));
        assert!(matches!(parse("import('./a.js')"), Expression::ImportCall(_)));
    }

    #[test]
    fn test_template_substitutions() {
        let Expression::TemplateLiteral(template) = parse("`a${b + 1}c${d}`") else {
            panic!("expected template literal");
        };
        let substitutions = template
            .parts
            .iter()
            .filter(|part| matches!(part, TemplatePart::Expression(_)))
            .count();
        assert_eq!(substitutions, 2);
    }

    #[test]
    fn test_tagged_template() {
        assert!(matches!(parse("html`<p>${name}</p>`"), Expression::TaggedTemplate(_)));
    }

    #[test]
    fn test_object_literal_members() {
        let Expression::Object(object) = parse("{ a, b: 1, [c]: 2, m() {}, get x() { return 1; }, async *g() {}, ...d }") else {
            panic!("expected object literal");
        };
        assert_eq!(object.properties.len(), 7);
        assert!(matches!(object.properties[3], ObjectProperty::Method(_)));
        assert!(matches!(object.properties[6], ObjectProperty::Spread(_)));
    }

    #[test]
    fn test_class_expression() {
        let Expression::Class(class) = parse("class extends A(B) { static x = 1; }") else {
            panic!("expected class expression");
        };
        assert!(class.name.is_none());
        assert!(matches!(class.extends.as_deref(), Some(Expression::Call(_))));
    }

    #[test]
    fn test_postfix_update_respects_line_break() {
        let mut parser = Parser::new("a\n++b").unwrap();
        let expr = parse_expression(&mut parser).unwrap();
        assert!(matches!(expr, Expression::Identifier(_)));
        assert!(parser.check(&Token::PlusPlus));
    }

    #[test]
    fn test_sequence_expression() {
        assert!(matches!(parse("a, b, c"), Expression::Sequence(ref s) if s.expressions.len() == 3));
    }
}
