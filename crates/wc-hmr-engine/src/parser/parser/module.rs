//! Import and export declarations

use super::guards::LoopGuard;
use super::{class, expr, stmt, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::interner::Symbol;
use crate::parser::token::{Span, Token};

/// Parse an import declaration.
///
/// ```text
/// import './side-effect.js';
/// import LitElement, { html as h, "odd name" as odd } from 'lit';
/// import * as ns from './ns.js' with { type: 'json' };
/// ```
pub fn parse_import_declaration(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Import)?;

    let mut specifiers = Vec::new();

    if !matches!(parser.current(), Token::String(_)) {
        let mut needs_more = true;

        if matches!(parser.current(), Token::Identifier(_)) {
            specifiers.push(ImportSpecifier::Default(parser.parse_identifier()?));
            needs_more = parser.eat(&Token::Comma);
        }

        if needs_more {
            match parser.current() {
                Token::Star => {
                    parser.advance();
                    parser.expect_word("as")?;
                    specifiers.push(ImportSpecifier::Namespace(parser.parse_identifier()?));
                }
                Token::LeftBrace => parse_named_imports(parser, &mut specifiers)?,
                _ => return Err(parser.unexpected_token(&[Token::Star, Token::LeftBrace])),
            }
        }

        parser.expect_word("from")?;
    }

    let source = parse_module_specifier(parser)?;
    skip_import_attributes(parser)?;
    parser.consume_semicolon()?;

    Ok(Statement::ImportDecl(ImportDecl {
        specifiers,
        source,
        span: parser.span_from(&start_span),
    }))
}

fn parse_named_imports(parser: &mut Parser, specifiers: &mut Vec<ImportSpecifier>) -> Result<(), ParseError> {
    parser.expect(Token::LeftBrace)?;
    let mut guard = LoopGuard::new("import_specifiers");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;

        let name = parse_module_export_name(parser)?;
        let alias = if parser.is_word("as") {
            parser.advance();
            Some(parser.parse_identifier()?)
        } else {
            None
        };

        // A string name cannot be a local binding
        if alias.is_none() {
            if let ModuleExportName::String(lit) = &name {
                return Err(ParseError::invalid_syntax(
                    "A string import name must be renamed with `as`",
                    lit.span,
                ));
            }
        }
        specifiers.push(ImportSpecifier::Named { name, alias });

        if !parser.check(&Token::RightBrace) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightBrace)?;
    Ok(())
}

/// Parse an export declaration, starting at `export` (or at decorators
/// written before it, already parsed into `decorators`).
pub fn parse_export_declaration(
    parser: &mut Parser,
    start_span: Span,
    decorators: Vec<Decorator>,
) -> Result<Statement, ParseError> {
    parser.expect(Token::Export)?;

    let export = if parser.eat(&Token::Default) {
        let value = parse_export_default(parser, decorators)?;
        ExportDecl::Default {
            value,
            span: parser.span_from(&start_span),
        }
    } else if parser.eat(&Token::Star) {
        let alias = if parser.is_word("as") {
            parser.advance();
            Some(parse_module_export_name(parser)?)
        } else {
            None
        };
        parser.expect_word("from")?;
        let source = parse_module_specifier(parser)?;
        skip_import_attributes(parser)?;
        parser.consume_semicolon()?;
        ExportDecl::All {
            alias,
            source,
            span: parser.span_from(&start_span),
        }
    } else if parser.check(&Token::LeftBrace) {
        let specifiers = parse_export_specifiers(parser)?;
        let source = if parser.is_word("from") {
            parser.advance();
            let source = parse_module_specifier(parser)?;
            skip_import_attributes(parser)?;
            Some(source)
        } else {
            None
        };
        parser.consume_semicolon()?;
        ExportDecl::Named {
            specifiers,
            source,
            span: parser.span_from(&start_span),
        }
    } else {
        let declaration = parse_exported_declaration(parser, decorators)?;
        ExportDecl::Declaration {
            declaration: Box::new(declaration),
            span: parser.span_from(&start_span),
        }
    };

    Ok(Statement::ExportDecl(export))
}

fn parse_export_default(parser: &mut Parser, mut decorators: Vec<Decorator>) -> Result<DefaultExport, ParseError> {
    let start_span = parser.current_span();
    decorators.extend(class::parse_decorators(parser)?);

    if parser.check(&Token::Class) {
        let class = expr::parse_class_expression(parser, start_span, decorators)?;
        return Ok(DefaultExport::Class(class));
    }
    if !decorators.is_empty() {
        return Err(parser.unexpected_token(&[Token::Class]));
    }

    if parser.check(&Token::Function) {
        return expr::parse_function(parser, start_span, false).map(DefaultExport::Function);
    }
    if parser.is_word("async") && matches!(parser.peek(), Some(Token::Function)) && !parser.line_break_before_nth(1) {
        parser.advance();
        return expr::parse_function(parser, start_span, true).map(DefaultExport::Function);
    }

    let value = parser.with_in(true, expr::parse_assignment)?;
    parser.consume_semicolon()?;
    Ok(DefaultExport::Expression(value))
}

/// `export const ...`, `export function ...`, `export @dec class ...`
fn parse_exported_declaration(parser: &mut Parser, mut decorators: Vec<Decorator>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    decorators.extend(class::parse_decorators(parser)?);

    if !decorators.is_empty() || parser.check(&Token::Class) {
        return stmt::parse_class_declaration(parser, start_span, decorators);
    }

    let is_declaration_start = parser.check_any(&[Token::Var, Token::Let, Token::Const, Token::Function])
        || (parser.is_word("async") && matches!(parser.peek(), Some(Token::Function)));
    if !is_declaration_start {
        return Err(parser.unexpected_token(&[
            Token::Const,
            Token::Let,
            Token::Var,
            Token::Function,
            Token::Class,
            Token::Default,
            Token::LeftBrace,
            Token::Star,
        ]));
    }

    stmt::parse_statement(parser)
}

fn parse_export_specifiers(parser: &mut Parser) -> Result<Vec<ExportSpecifier>, ParseError> {
    parser.expect(Token::LeftBrace)?;

    let mut specifiers = Vec::new();
    let mut guard = LoopGuard::new("export_specifiers");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;

        let name = parse_module_export_name(parser)?;
        let alias = if parser.is_word("as") {
            parser.advance();
            Some(parse_module_export_name(parser)?)
        } else {
            None
        };
        specifiers.push(ExportSpecifier { name, alias });

        if !parser.check(&Token::RightBrace) {
            parser.expect(Token::Comma)?;
        }
    }

    parser.expect(Token::RightBrace)?;
    Ok(specifiers)
}

/// An identifier name (reserved words allowed) or a string literal.
fn parse_module_export_name(parser: &mut Parser) -> Result<ModuleExportName, ParseError> {
    match parser.current() {
        Token::String(value) => {
            let lit = StringLiteral {
                value: *value,
                span: parser.current_span(),
            };
            parser.advance();
            Ok(ModuleExportName::String(lit))
        }
        _ => parser.parse_identifier_name().map(ModuleExportName::Identifier),
    }
}

fn parse_module_specifier(parser: &mut Parser) -> Result<StringLiteral, ParseError> {
    match parser.current() {
        Token::String(value) => {
            let lit = StringLiteral {
                value: *value,
                span: parser.current_span(),
            };
            parser.advance();
            Ok(lit)
        }
        _ => Err(parser.unexpected_token(&[Token::String(Symbol::dummy())])),
    }
}

/// Skip `with { type: 'json' }` (or the older `assert { ... }`) after a
/// module specifier.
fn skip_import_attributes(parser: &mut Parser) -> Result<(), ParseError> {
    let has_attributes = parser.check(&Token::With)
        || (parser.is_word("assert") && !parser.has_line_break_before());
    if has_attributes && matches!(parser.peek(), Some(Token::LeftBrace)) {
        parser.advance();
        expr::parse_object_literal(parser)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> (Statement, Parser<'_>) {
        let mut parser = Parser::new(source).unwrap();
        let stmt = stmt::parse_statement(&mut parser).unwrap();
        assert!(parser.at_eof(), "trailing tokens in {:?}", source);
        (stmt, parser)
    }

    #[test]
    fn test_import_forms() {
        let (stmt, parser) = parse_one("import LitElement, { html as h, css, 'odd name' as odd } from 'lit';");
        let Statement::ImportDecl(import) = stmt else {
            panic!("expected import");
        };
        assert_eq!(parser.resolve(import.source.value), "lit");
        assert_eq!(import.specifiers.len(), 4);
        assert!(matches!(import.specifiers[0], ImportSpecifier::Default(_)));

        let locals: Vec<&str> = import
            .specifiers
            .iter()
            .filter_map(|s| s.local())
            .map(|id| parser.resolve(id.name))
            .collect();
        assert_eq!(locals, vec!["LitElement", "h", "css", "odd"]);
    }

    #[test]
    fn test_side_effect_and_namespace_imports() {
        let (stmt, _) = parse_one("import './side-effect.js'");
        assert!(matches!(stmt, Statement::ImportDecl(ref i) if i.specifiers.is_empty()));

        let (stmt, _) = parse_one("import * as ns from './ns.js';");
        assert!(matches!(stmt, Statement::ImportDecl(ref i) if matches!(i.specifiers[0], ImportSpecifier::Namespace(_))));
    }

    #[test]
    fn test_import_attributes_are_skipped() {
        let (stmt, _) = parse_one("import data from './data.json' with { type: 'json' };");
        assert!(matches!(stmt, Statement::ImportDecl(_)));
    }

    #[test]
    fn test_string_import_requires_alias() {
        let mut parser = Parser::new("import { 'a-b' } from 'x';").unwrap();
        assert!(stmt::parse_statement(&mut parser).is_err());
    }

    #[test]
    fn test_export_forms() {
        let (stmt, _) = parse_one("export class A extends B {}");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::Declaration { .. })));

        let (stmt, _) = parse_one("export default class extends LitElement {}");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::Default { value: DefaultExport::Class(_), .. })));

        let (stmt, _) = parse_one("export default async function () {}");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::Default { value: DefaultExport::Function(_), .. })));

        let (stmt, _) = parse_one("export default 42;");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::Default { value: DefaultExport::Expression(_), .. })));

        let (stmt, _) = parse_one("export { a, b as default } from './x.js';");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::Named { source: Some(_), .. })));

        let (stmt, _) = parse_one("export * as ns from './x.js';");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::All { alias: Some(_), .. })));
    }

    #[test]
    fn test_decorated_exports() {
        let (stmt, _) = parse_one("@customElement('x-a') export class A extends LitElement {}");
        let Statement::ExportDecl(ExportDecl::Declaration { declaration, span }) = stmt else {
            panic!("expected export declaration");
        };
        assert_eq!(span.start, 0);
        assert!(matches!(*declaration, Statement::ClassDecl(ref c) if c.decorators.len() == 1));

        let (stmt, _) = parse_one("export @customElement('x-a') class A extends LitElement {}");
        assert!(matches!(stmt, Statement::ExportDecl(ExportDecl::Declaration { .. })));
    }

    #[test]
    fn test_invalid_export() {
        let mut parser = Parser::new("export 42;").unwrap();
        assert!(stmt::parse_statement(&mut parser).is_err());
    }
}
