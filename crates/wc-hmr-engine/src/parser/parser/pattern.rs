//! Pattern parsing (for destructuring and parameter bindings)

use super::guards::LoopGuard;
use super::{expr, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::interner::Symbol;
use crate::parser::token::Token;

/// Parse a binding pattern (identifier or destructuring).
pub fn parse_binding_pattern(parser: &mut Parser) -> Result<Pattern, ParseError> {
    parser.enter("pattern")?;

    let result = match parser.current() {
        // Array destructuring: [a, b], [x, , z], [first, ...rest], [y = 10]
        Token::LeftBracket => parse_array_pattern(parser),

        // Object destructuring: { x, y }, { x: newX, y = 0 }, { a, ...rest }
        Token::LeftBrace => parse_object_pattern(parser),

        Token::Identifier(_) => parser.parse_identifier().map(Pattern::Identifier),

        _ => Err(parser.unexpected_token(&[
            Token::Identifier(Symbol::dummy()),
            Token::LeftBracket,
            Token::LeftBrace,
        ])),
    };

    parser.exit();
    result
}

/// Optional `= default` after a binding element.
fn parse_default(parser: &mut Parser) -> Result<Option<Expression>, ParseError> {
    if parser.eat(&Token::Equal) {
        Ok(Some(parser.with_in(true, expr::parse_assignment)?))
    } else {
        Ok(None)
    }
}

fn parse_array_pattern(parser: &mut Parser) -> Result<Pattern, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBracket)?;

    let mut elements = Vec::new();
    let mut rest = None;
    let mut guard = LoopGuard::new("array_pattern_elements");

    while !parser.check(&Token::RightBracket) && !parser.at_eof() {
        guard.check()?;

        // Hole: [a, , c]
        if parser.eat(&Token::Comma) {
            elements.push(None);
            continue;
        }

        if parser.eat(&Token::DotDotDot) {
            rest = Some(Box::new(parse_binding_pattern(parser)?));
            break;
        }

        let element_start = parser.current_span();
        let pattern = parse_binding_pattern(parser)?;
        let default = parse_default(parser)?;
        elements.push(Some(PatternElement {
            pattern,
            default,
            span: parser.span_from(&element_start),
        }));

        if !parser.check(&Token::RightBracket) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightBracket)?;

    Ok(Pattern::Array(ArrayPattern {
        elements,
        rest,
        span: parser.span_from(&start_span),
    }))
}

fn parse_object_pattern(parser: &mut Parser) -> Result<Pattern, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBrace)?;

    let mut properties = Vec::new();
    let mut rest = None;
    let mut guard = LoopGuard::new("object_pattern_properties");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;

        if parser.eat(&Token::DotDotDot) {
            rest = Some(parser.parse_identifier()?);
            break;
        }

        let property_start = parser.current_span();
        let key = expr::parse_property_key(parser)?;

        let (value, shorthand) = if parser.eat(&Token::Colon) {
            (parse_binding_pattern(parser)?, false)
        } else {
            match &key {
                PropertyKey::Identifier(id) => (Pattern::Identifier(*id), true),
                _ => return Err(parser.unexpected_token(&[Token::Colon])),
            }
        };
        let default = parse_default(parser)?;

        properties.push(ObjectPatternProperty {
            key,
            value,
            default,
            shorthand,
            span: parser.span_from(&property_start),
        });

        if !parser.check(&Token::RightBrace) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightBrace)?;

    Ok(Pattern::Object(ObjectPattern {
        properties,
        rest,
        span: parser.span_from(&start_span),
    }))
}

/// Parse a parenthesized formal parameter list: `(a, { b } = {}, ...rest)`
pub fn parse_formal_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, ParseError> {
    parser.expect(Token::LeftParen)?;

    let mut params = Vec::new();
    let mut guard = LoopGuard::new("function_parameters");

    while !parser.check(&Token::RightParen) && !parser.at_eof() {
        guard.check()?;
        let start_span = parser.current_span();

        let is_rest = parser.eat(&Token::DotDotDot);
        let pattern = parse_binding_pattern(parser)?;
        let default_value = if is_rest { None } else { parse_default(parser)? };

        params.push(Parameter {
            pattern,
            default_value,
            is_rest,
            span: parser.span_from(&start_span),
        });

        // A rest parameter must be last
        if is_rest {
            break;
        }
        if !parser.check(&Token::RightParen) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightParen)?;
    Ok(params)
}
