//! Statement parsing

use super::guards::LoopGuard;
use super::{class, expr, module, pattern, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::{Span, Token};

/// Parse a statement.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.enter("statement")?;

    // Use inner function to ensure depth is always decremented
    fn inner(parser: &mut Parser) -> Result<Statement, ParseError> {
        let start_span = parser.current_span();

        match parser.current() {
            Token::Var | Token::Let | Token::Const => parse_variable_statement(parser),
            Token::Function => parse_function_declaration(parser, start_span, false),
            Token::Class => parse_class_declaration(parser, start_span, Vec::new()),
            Token::At => {
                let decorators = class::parse_decorators(parser)?;
                if parser.check(&Token::Export) {
                    module::parse_export_declaration(parser, start_span, decorators)
                } else if parser.check(&Token::Class) {
                    parse_class_declaration(parser, start_span, decorators)
                } else {
                    Err(parser.unexpected_token(&[Token::Class, Token::Export]))
                }
            }
            Token::If => parse_if(parser),
            Token::While => parse_while(parser),
            Token::Do => parse_do_while(parser),
            Token::For => parse_for(parser),
            Token::Switch => parse_switch(parser),
            Token::Try => parse_try(parser),
            Token::Return => parse_return(parser),
            Token::Break | Token::Continue => parse_break_or_continue(parser),
            Token::Throw => parse_throw(parser),
            Token::Debugger => {
                parser.advance();
                parser.consume_semicolon()?;
                Ok(Statement::Debugger(parser.span_from(&start_span)))
            }
            Token::LeftBrace => parse_block_statement(parser).map(Statement::Block),
            Token::Semicolon => {
                parser.advance();
                Ok(Statement::Empty(start_span))
            }
            // `import(...)` and `import.meta` start expression statements
            Token::Import if !matches!(parser.peek(), Some(Token::LeftParen | Token::Dot)) => {
                module::parse_import_declaration(parser)
            }
            Token::Export => module::parse_export_declaration(parser, start_span, Vec::new()),
            Token::With => Err(ParseError::invalid_syntax(
                "`with` statements are not allowed in modules",
                start_span,
            )
            .with_suggestion("Modules are strict mode code; use a local variable instead")),
            Token::Identifier(_) if matches!(parser.peek(), Some(Token::Colon)) => parse_labeled(parser),
            Token::Identifier(_)
                if parser.is_word("async")
                    && matches!(parser.peek(), Some(Token::Function))
                    && !parser.line_break_before_nth(1) =>
            {
                parser.advance();
                parse_function_declaration(parser, start_span, true)
            }
            _ => parse_expression_statement(parser),
        }
    }

    let result = inner(parser);
    parser.exit();
    result
}

// ============================================================================
// Declarations
// ============================================================================

/// Parse `var`/`let`/`const` declarators without the terminating `;`.
///
/// Shared with `for` heads, where the caller controls `allow_in`.
pub fn parse_variable_declaration(parser: &mut Parser) -> Result<VariableDecl, ParseError> {
    let start_span = parser.current_span();
    let kind = match parser.expect_any(&[Token::Var, Token::Let, Token::Const])? {
        Token::Var => VariableKind::Var,
        Token::Let => VariableKind::Let,
        _ => VariableKind::Const,
    };

    let mut declarations = Vec::new();
    let mut guard = LoopGuard::new("variable_declarators");

    loop {
        guard.check()?;
        let declarator_start = parser.current_span();

        let pattern = pattern::parse_binding_pattern(parser)?;
        let initializer = if parser.eat(&Token::Equal) {
            Some(expr::parse_assignment(parser)?)
        } else {
            None
        };

        declarations.push(VariableDeclarator {
            pattern,
            initializer,
            span: parser.span_from(&declarator_start),
        });

        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    Ok(VariableDecl {
        kind,
        declarations,
        span: parser.span_from(&start_span),
    })
}

fn parse_variable_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let mut decl = parser.with_in(true, parse_variable_declaration)?;

    for declarator in &decl.declarations {
        if declarator.initializer.is_some() {
            continue;
        }
        if decl.kind == VariableKind::Const {
            return Err(ParseError::invalid_syntax(
                "Missing initializer in const declaration",
                declarator.span,
            )
            .with_suggestion("Use 'let' for variables assigned later"));
        }
        if !matches!(declarator.pattern, Pattern::Identifier(_)) {
            return Err(ParseError::invalid_syntax(
                "Missing initializer in destructuring declaration",
                declarator.span,
            ));
        }
    }

    parser.consume_semicolon()?;
    decl.span = parser.span_from(&start_span);
    Ok(Statement::VariableDecl(decl))
}

fn parse_function_declaration(
    parser: &mut Parser,
    start_span: Span,
    is_async: bool,
) -> Result<Statement, ParseError> {
    let function = expr::parse_function(parser, start_span, is_async)?;
    let Some(name) = function.name else {
        return Err(ParseError::invalid_syntax(
            "Function declarations require a name",
            function.span,
        ));
    };

    Ok(Statement::FunctionDecl(FunctionDecl {
        name,
        params: function.params,
        body: function.body,
        is_async: function.is_async,
        is_generator: function.is_generator,
        span: function.span,
    }))
}

/// Parse `class Name [extends Heritage] { ... }` as a declaration.
pub fn parse_class_declaration(
    parser: &mut Parser,
    start_span: Span,
    decorators: Vec<Decorator>,
) -> Result<Statement, ParseError> {
    let class_span = parser.current_span();
    let parts = class::parse_class(parser)?;
    let Some(name) = parts.name else {
        return Err(ParseError::invalid_syntax(
            "Class declarations require a name",
            class_span,
        ));
    };

    Ok(Statement::ClassDecl(ClassDecl {
        decorators,
        name,
        extends: parts.extends,
        members: parts.members,
        span: parser.span_from(&start_span),
    }))
}

// ============================================================================
// Blocks and Function Bodies
// ============================================================================

/// Parse `{ statements }`.
pub fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBrace)?;

    let mut statements = Vec::new();
    let mut guard = LoopGuard::new("block_statements");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;
        statements.push(parse_statement(parser)?);
    }

    parser.expect(Token::RightBrace)?;

    Ok(BlockStatement {
        statements,
        span: parser.span_from(&start_span),
    })
}

/// Parse a function body; `in` is always an operator inside it.
pub fn parse_function_body(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    parser.with_in(true, parse_block_statement)
}

// ============================================================================
// Control Flow
// ============================================================================

/// `( expression )` around a condition
fn parse_condition(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect(Token::LeftParen)?;
    let condition = parser.with_in(true, expr::parse_expression)?;
    parser.expect(Token::RightParen)?;
    Ok(condition)
}

fn parse_if(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::If)?;

    let condition = parse_condition(parser)?;
    let then_branch = Box::new(parse_statement(parser)?);
    let else_branch = if parser.eat(&Token::Else) {
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };

    Ok(Statement::If(IfStatement {
        condition,
        then_branch,
        else_branch,
        span: parser.span_from(&start_span),
    }))
}

fn parse_while(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::While)?;

    let condition = parse_condition(parser)?;
    let body = Box::new(parse_statement(parser)?);

    Ok(Statement::While(WhileStatement {
        condition,
        body,
        span: parser.span_from(&start_span),
    }))
}

fn parse_do_while(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Do)?;

    let body = Box::new(parse_statement(parser)?);
    parser.expect(Token::While)?;
    let condition = parse_condition(parser)?;
    // The `;` after do-while is always optional
    parser.eat(&Token::Semicolon);

    Ok(Statement::DoWhile(DoWhileStatement {
        body,
        condition,
        span: parser.span_from(&start_span),
    }))
}

/// `for (init; test; update)`, `for (x in obj)`, `for (x of it)`,
/// `for await (x of it)`
fn parse_for(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::For)?;
    let is_await = parser.eat(&Token::Await);
    parser.expect(Token::LeftParen)?;

    let init = if parser.check(&Token::Semicolon) {
        None
    } else if parser.check_any(&[Token::Var, Token::Let, Token::Const]) {
        let decl = parser.with_in(false, parse_variable_declaration)?;
        if parser.check(&Token::In) || parser.is_word("of") {
            return parse_for_in_of(parser, start_span, ForHead::VariableDecl(decl), is_await);
        }
        Some(ForInit::VariableDecl(decl))
    } else {
        let target = parser.with_in(false, expr::parse_expression)?;
        if parser.check(&Token::In) || parser.is_word("of") {
            if !target.is_assignment_target() {
                return Err(ParseError::invalid_syntax(
                    "Invalid left-hand side in for loop",
                    *target.span(),
                ));
            }
            return parse_for_in_of(parser, start_span, ForHead::Target(target), is_await);
        }
        Some(ForInit::Expression(target))
    };

    if is_await {
        return Err(ParseError::invalid_syntax(
            "`for await` requires an `of` loop",
            start_span,
        ));
    }

    parser.expect(Token::Semicolon)?;
    let test = if parser.check(&Token::Semicolon) {
        None
    } else {
        Some(parser.with_in(true, expr::parse_expression)?)
    };
    parser.expect(Token::Semicolon)?;
    let update = if parser.check(&Token::RightParen) {
        None
    } else {
        Some(parser.with_in(true, expr::parse_expression)?)
    };
    parser.expect(Token::RightParen)?;

    let body = Box::new(parse_statement(parser)?);

    Ok(Statement::For(ForStatement {
        init,
        test,
        update,
        body,
        span: parser.span_from(&start_span),
    }))
}

fn parse_for_in_of(
    parser: &mut Parser,
    start_span: Span,
    left: ForHead,
    is_await: bool,
) -> Result<Statement, ParseError> {
    let is_of = parser.is_word("of");
    parser.advance();

    if let ForHead::VariableDecl(decl) = &left {
        if decl.declarations.len() != 1 || decl.declarations[0].initializer.is_some() {
            return Err(ParseError::invalid_syntax(
                "for-in/of loop variable declaration must be a single binding without initializer",
                decl.span,
            ));
        }
    }

    if is_of {
        let right = parser.with_in(true, expr::parse_assignment)?;
        parser.expect(Token::RightParen)?;
        let body = Box::new(parse_statement(parser)?);
        Ok(Statement::ForOf(ForOfStatement {
            left,
            right,
            body,
            is_await,
            span: parser.span_from(&start_span),
        }))
    } else {
        if is_await {
            return Err(ParseError::invalid_syntax(
                "`for await` requires an `of` loop",
                start_span,
            ));
        }
        let right = parser.with_in(true, expr::parse_expression)?;
        parser.expect(Token::RightParen)?;
        let body = Box::new(parse_statement(parser)?);
        Ok(Statement::ForIn(ForInStatement {
            left,
            right,
            body,
            span: parser.span_from(&start_span),
        }))
    }
}

fn parse_switch(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Switch)?;

    let discriminant = parse_condition(parser)?;
    parser.expect(Token::LeftBrace)?;

    let mut cases = Vec::new();
    let mut case_guard = LoopGuard::new("switch_cases");
    let mut consequent_guard = LoopGuard::new("switch_case_statements");

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        case_guard.check()?;
        let case_start = parser.current_span();

        let test = if parser.eat(&Token::Case) {
            Some(parser.with_in(true, expr::parse_expression)?)
        } else {
            parser.expect(Token::Default)?;
            None
        };
        parser.expect(Token::Colon)?;

        let mut consequent = Vec::new();
        consequent_guard.reset();
        while !parser.check_any(&[Token::Case, Token::Default, Token::RightBrace]) && !parser.at_eof() {
            consequent_guard.check()?;
            consequent.push(parse_statement(parser)?);
        }

        cases.push(SwitchCase {
            test,
            consequent,
            span: parser.span_from(&case_start),
        });
    }

    parser.expect(Token::RightBrace)?;

    Ok(Statement::Switch(SwitchStatement {
        discriminant,
        cases,
        span: parser.span_from(&start_span),
    }))
}

fn parse_try(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Try)?;

    let body = parse_block_statement(parser)?;

    let catch_clause = if parser.check(&Token::Catch) {
        let catch_start = parser.current_span();
        parser.advance();
        let param = if parser.eat(&Token::LeftParen) {
            let param = pattern::parse_binding_pattern(parser)?;
            parser.expect(Token::RightParen)?;
            Some(param)
        } else {
            None
        };
        let body = parse_block_statement(parser)?;
        Some(CatchClause {
            param,
            body,
            span: parser.span_from(&catch_start),
        })
    } else {
        None
    };

    let finally_clause = if parser.eat(&Token::Finally) {
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    if catch_clause.is_none() && finally_clause.is_none() {
        return Err(parser.unexpected_token(&[Token::Catch, Token::Finally]));
    }

    Ok(Statement::Try(TryStatement {
        body,
        catch_clause,
        finally_clause,
        span: parser.span_from(&start_span),
    }))
}

/// Whether the operand of `return`/`break`/`continue` is absent: ASI
/// applies at a line break.
fn at_statement_end(parser: &Parser) -> bool {
    parser.check_any(&[Token::Semicolon, Token::RightBrace, Token::Eof]) || parser.has_line_break_before()
}

fn parse_return(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Return)?;

    let value = if at_statement_end(parser) {
        None
    } else {
        Some(parser.with_in(true, expr::parse_expression)?)
    };
    parser.consume_semicolon()?;

    Ok(Statement::Return(ReturnStatement {
        value,
        span: parser.span_from(&start_span),
    }))
}

fn parse_break_or_continue(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let is_break = matches!(parser.advance(), Token::Break);

    let label = if !at_statement_end(parser) && matches!(parser.current(), Token::Identifier(_)) {
        Some(parser.parse_identifier()?)
    } else {
        None
    };
    parser.consume_semicolon()?;

    let span = parser.span_from(&start_span);
    Ok(if is_break {
        Statement::Break(BreakStatement { label, span })
    } else {
        Statement::Continue(ContinueStatement { label, span })
    })
}

fn parse_throw(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Throw)?;

    if parser.has_line_break_before() {
        return Err(ParseError::invalid_syntax(
            "Illegal newline after throw",
            parser.current_span(),
        ));
    }
    let value = parser.with_in(true, expr::parse_expression)?;
    parser.consume_semicolon()?;

    Ok(Statement::Throw(ThrowStatement {
        value,
        span: parser.span_from(&start_span),
    }))
}

fn parse_labeled(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let label = parser.parse_identifier()?;
    parser.expect(Token::Colon)?;
    let body = Box::new(parse_statement(parser)?);

    Ok(Statement::Labeled(LabeledStatement {
        label,
        body,
        span: parser.span_from(&start_span),
    }))
}

fn parse_expression_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let expression = parser.with_in(true, expr::parse_expression)?;
    parser.consume_semicolon()?;

    Ok(Statement::Expression(ExpressionStatement {
        expression,
        span: parser.span_from(&start_span),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Statement {
        let mut parser = Parser::new(source).unwrap();
        let stmt = parse_statement(&mut parser).unwrap();
        assert!(parser.at_eof(), "trailing tokens in {:?}", source);
        stmt
    }

    fn parse_all(source: &str) -> Vec<Statement> {
        let (module, _) = Parser::new(source).unwrap().parse().unwrap();
        module.statements
    }

    #[test]
    fn test_variable_declaration_span_includes_semicolon() {
        let source = "const a = 1, { b } = c;";
        let Statement::VariableDecl(decl) = parse_one(source) else {
            panic!("expected variable declaration");
        };
        assert_eq!(decl.declarations.len(), 2);
        assert_eq!(decl.span.end, source.len());
    }

    #[test]
    fn test_const_requires_initializer() {
        let mut parser = Parser::new("const a;").unwrap();
        let err = parse_statement(&mut parser).unwrap_err();
        assert!(err.message.contains("Missing initializer"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_asi() {
        let statements = parse_all("let a = 1\nlet b = 2\nfoo()\n");
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_on_same_line() {
        let mut parser = Parser::new("a b").unwrap();
        assert!(parse_statement(&mut parser).is_err());
    }

    #[test]
    fn test_return_restricted_production() {
        let Statement::FunctionDecl(func) = parse_one("function f() { return\n1 }") else {
            panic!("expected function");
        };
        assert_eq!(func.body.statements.len(), 2);
        assert!(matches!(&func.body.statements[0], Statement::Return(r) if r.value.is_none()));
    }

    #[test]
    fn test_for_variants() {
        assert!(matches!(parse_one("for (let i = 0; i < n; i++) {}"), Statement::For(_)));
        assert!(matches!(parse_one("for (const key in obj) {}"), Statement::ForIn(_)));
        assert!(matches!(parse_one("for (const x of xs) {}"), Statement::ForOf(_)));
        assert!(matches!(parse_one("for (;;) break;"), Statement::For(_)));
        assert!(matches!(parse_one("for (a.b of xs);"), Statement::ForOf(_)));
        assert!(matches!(parse_one("for await (const x of xs) {}"), Statement::ForOf(ref f) if f.is_await));
        assert!(matches!(parse_one("for (let i = ('a' in o) ? 1 : 0; i;) {}"), Statement::For(_)));
    }

    #[test]
    fn test_control_flow() {
        assert!(matches!(parse_one("if (a) b(); else { c(); }"), Statement::If(ref s) if s.else_branch.is_some()));
        assert!(matches!(parse_one("while (x) x--;"), Statement::While(_)));
        assert!(matches!(parse_one("do x++; while (x < 5)"), Statement::DoWhile(_)));
        assert!(matches!(parse_one("outer: for (;;) { continue outer; }"), Statement::Labeled(_)));
        assert!(matches!(parse_one("try {} catch {} finally {}"), Statement::Try(_)));
        assert!(matches!(parse_one("throw new Error('x');"), Statement::Throw(_)));
        assert!(matches!(parse_one("debugger;"), Statement::Debugger(_)));
    }

    #[test]
    fn test_switch_cases() {
        let Statement::Switch(switch) = parse_one("switch (x) { case 1: a(); b(); case 2: default: c(); }") else {
            panic!("expected switch");
        };
        assert_eq!(switch.cases.len(), 3);
        assert_eq!(switch.cases[0].consequent.len(), 2);
        assert!(switch.cases[1].consequent.is_empty());
        assert!(switch.cases[2].test.is_none());
    }

    #[test]
    fn test_try_requires_handler() {
        let mut parser = Parser::new("try {}").unwrap();
        assert!(parse_statement(&mut parser).is_err());
    }

    #[test]
    fn test_class_declarations() {
        assert!(matches!(parse_one("class A extends B {}"), Statement::ClassDecl(_)));
        let Statement::ClassDecl(decl) = parse_one("@customElement('x-a') class A extends LitElement {}") else {
            panic!("expected class declaration");
        };
        assert_eq!(decl.decorators.len(), 1);
        assert_eq!(decl.span.start, 0);

        let mut parser = Parser::new("class extends B {}").unwrap();
        assert!(parse_statement(&mut parser).is_err());
    }

    #[test]
    fn test_async_function_declaration() {
        assert!(matches!(parse_one("async function load() { await x; }"), Statement::FunctionDecl(ref f) if f.is_async));
    }

    #[test]
    fn test_import_expressions_are_statements() {
        assert!(matches!(parse_one("import('./lazy.js');"), Statement::Expression(_)));
        assert!(matches!(parse_one("import.meta.hot.accept();"), Statement::Expression(_)));
    }

    #[test]
    fn test_with_is_rejected() {
        let mut parser = Parser::new("with (obj) {}").unwrap();
        let err = parse_statement(&mut parser).unwrap_err();
        assert!(err.message.contains("with"));
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("{}{}", "{".repeat(500), "}".repeat(500));
        let mut parser = Parser::new(&source).unwrap();
        let err = parse_statement(&mut parser).unwrap_err();
        assert!(err.message.contains("Maximum nesting depth"));
    }
}
