//! Statement AST nodes
//!
//! This module defines all statement types of a JavaScript module, including:
//! - Variable declarations (var, let, const)
//! - Function and class declarations
//! - Control flow statements (if, loops, switch, try, labels)
//! - Import/export declarations

use super::*;
use crate::parser::token::Span;

/// Top-level or block-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration: var/let/const
    VariableDecl(VariableDecl),

    /// Function declaration (including async and generator functions)
    FunctionDecl(FunctionDecl),

    /// Class declaration
    ClassDecl(ClassDecl),

    /// Import statement
    ImportDecl(ImportDecl),

    /// Export statement
    ExportDecl(ExportDecl),

    /// Expression statement (e.g., function call)
    Expression(ExpressionStatement),

    /// If statement
    If(IfStatement),

    /// Switch statement
    Switch(SwitchStatement),

    /// While loop
    While(WhileStatement),

    /// Do-while loop
    DoWhile(DoWhileStatement),

    /// For loop
    For(ForStatement),

    /// For-in loop
    ForIn(ForInStatement),

    /// For-of loop (including `for await`)
    ForOf(ForOfStatement),

    /// Break statement
    Break(BreakStatement),

    /// Continue statement
    Continue(ContinueStatement),

    /// Return statement
    Return(ReturnStatement),

    /// Throw statement
    Throw(ThrowStatement),

    /// Try-catch-finally
    Try(TryStatement),

    /// Labeled statement: `outer: for (...) {}`
    Labeled(LabeledStatement),

    /// Block statement: `{ ... }`
    Block(BlockStatement),

    /// Debugger statement
    Debugger(Span),

    /// Empty statement (;)
    Empty(Span),
}

impl Statement {
    /// Get the span of this statement
    pub fn span(&self) -> &Span {
        match self {
            Statement::VariableDecl(s) => &s.span,
            Statement::FunctionDecl(s) => &s.span,
            Statement::ClassDecl(s) => &s.span,
            Statement::ImportDecl(s) => &s.span,
            Statement::ExportDecl(s) => s.span(),
            Statement::Expression(s) => &s.span,
            Statement::If(s) => &s.span,
            Statement::Switch(s) => &s.span,
            Statement::While(s) => &s.span,
            Statement::DoWhile(s) => &s.span,
            Statement::For(s) => &s.span,
            Statement::ForIn(s) => &s.span,
            Statement::ForOf(s) => &s.span,
            Statement::Break(s) => &s.span,
            Statement::Continue(s) => &s.span,
            Statement::Return(s) => &s.span,
            Statement::Throw(s) => &s.span,
            Statement::Try(s) => &s.span,
            Statement::Labeled(s) => &s.span,
            Statement::Block(s) => &s.span,
            Statement::Debugger(span) => span,
            Statement::Empty(span) => span,
        }
    }

    /// Check if this statement is a declaration
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Statement::VariableDecl(_) | Statement::FunctionDecl(_) | Statement::ClassDecl(_)
        )
    }
}

// ============================================================================
// Variable Declaration
// ============================================================================

/// Variable declaration: `const a = 1, { b } = c;`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// var, let or const
    pub kind: VariableKind,

    /// One or more declarators
    pub declarations: Vec<VariableDeclarator>,

    /// Includes the terminating semicolon when present
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

/// A single `pattern = initializer` inside a variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub pattern: Pattern,
    pub initializer: Option<Expression>,
    pub span: Span,
}

// ============================================================================
// Function Declaration
// ============================================================================

/// Function declaration
///
/// # Example
/// ```text
/// async function* load(url, { retries = 3 } = {}) {
///     yield await fetch(url);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub body: BlockStatement,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub pattern: Pattern,
    /// Default value for the parameter (e.g., `x = 10`)
    pub default_value: Option<Expression>,
    /// Rest parameter: `...args`
    pub is_rest: bool,
    pub span: Span,
}

// ============================================================================
// Classes
// ============================================================================

/// Class declaration
///
/// # Example
/// ```text
/// @customElement('my-element')
/// class MyElement extends Mixin(LitElement) {
///     static properties = { name: {} };
///     #count = 0;
///
///     render() {
///         return html`<p>${this.name}</p>`;
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Decorators (@customElement, etc.)
    pub decorators: Vec<Decorator>,

    pub name: Identifier,

    /// Superclass expression (any left-hand-side expression)
    pub extends: Option<Expression>,

    pub members: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Methods, accessors and the constructor
    Method(MethodDecl),
    /// Instance or static field
    Field(FieldDecl),
    /// `static { ... }`
    StaticBlock(BlockStatement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

/// Method declaration, shared by class bodies and object literals
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub decorators: Vec<Decorator>,
    pub key: PropertyKey,
    pub kind: MethodKind,
    pub params: Vec<Parameter>,
    pub body: BlockStatement,
    pub is_static: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

/// Field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub decorators: Vec<Decorator>,
    pub key: PropertyKey,
    pub initializer: Option<Expression>,
    pub is_static: bool,
    pub span: Span,
}

/// Decorator: @decorator or @decorator(arg1, arg2)
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub expression: Expression,
    pub span: Span,
}

// ============================================================================
// Control Flow Statements
// ============================================================================

/// If statement
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}

/// Switch statement
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// None for default case
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
    pub span: Span,
}

/// While loop
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

/// Do-while loop
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub body: Box<Statement>,
    pub condition: Expression,
    pub span: Span,
}

/// For loop
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VariableDecl(VariableDecl),
    Expression(Expression),
}

/// Left-hand side of a for-in or for-of statement
#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    /// `var`/`let`/`const` binding
    VariableDecl(VariableDecl),
    /// Existing assignment target: `for (obj.key in source)`
    Target(Expression),
}

/// For-in loop: for (const key in object) { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

/// For-of loop: for (const item of collection) { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
    /// `for await (...)`
    pub is_await: bool,
    pub span: Span,
}

/// Break statement
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

/// Continue statement
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

/// Return statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

/// Throw statement
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub value: Expression,
    pub span: Span,
}

/// Try-catch-finally
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub body: BlockStatement,
    pub catch_clause: Option<CatchClause>,
    pub finally_clause: Option<BlockStatement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// None for `catch { ... }`
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    pub label: Identifier,
    pub body: Box<Statement>,
    pub span: Span,
}

/// Block statement - a sequence of statements wrapped in { }.
///
/// Also the body of functions, methods, static blocks and catch clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// Expression statement
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    /// Includes the terminating semicolon when present
    pub span: Span,
}

// ============================================================================
// Module System
// ============================================================================

/// Import declaration
///
/// # Example
/// ```text
/// import './side-effect.js';
/// import Base, { LitElement as Lit, "odd-name" as odd } from 'lit';
/// import * as utils from './utils.js';
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Empty for side-effect imports
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLiteral,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// import { foo } or import { foo as bar }
    Named {
        name: ModuleExportName,
        alias: Option<Identifier>,
    },
    /// import * as foo
    Namespace(Identifier),
    /// import foo (default)
    Default(Identifier),
}

impl ImportSpecifier {
    /// The binding this specifier introduces in the importing module.
    pub fn local(&self) -> Option<&Identifier> {
        match self {
            ImportSpecifier::Named { name, alias } => alias.as_ref().or(name.as_identifier()),
            ImportSpecifier::Namespace(id) | ImportSpecifier::Default(id) => Some(id),
        }
    }
}

/// Name of an import or export binding as seen by the other module.
///
/// ES2022 allows string names: `export { a as "kebab-name" }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleExportName {
    Identifier(Identifier),
    String(StringLiteral),
}

impl ModuleExportName {
    pub fn symbol(&self) -> Symbol {
        match self {
            ModuleExportName::Identifier(id) => id.name,
            ModuleExportName::String(lit) => lit.value,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            ModuleExportName::Identifier(id) => Some(id),
            ModuleExportName::String(_) => None,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ModuleExportName::Identifier(id) => &id.span,
            ModuleExportName::String(lit) => &lit.span,
        }
    }
}

/// Export declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    /// export const x = 42; export class Foo {}
    Declaration {
        declaration: Box<Statement>,
        span: Span,
    },

    /// export default class Foo {} / export default expr;
    Default { value: DefaultExport, span: Span },

    /// export { foo, bar as baz } / export { x } from "./foo";
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<StringLiteral>,
        span: Span,
    },

    /// export * from "./foo"; export * as ns from "./foo";
    All {
        alias: Option<ModuleExportName>,
        source: StringLiteral,
        span: Span,
    },
}

impl ExportDecl {
    pub fn span(&self) -> &Span {
        match self {
            ExportDecl::Declaration { span, .. }
            | ExportDecl::Default { span, .. }
            | ExportDecl::Named { span, .. }
            | ExportDecl::All { span, .. } => span,
        }
    }
}

/// Payload of `export default`
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultExport {
    /// `export default function name() {}` (name optional)
    Function(FunctionExpression),
    /// `export default class Name extends Base {}` (name optional)
    Class(ClassExpression),
    /// `export default <assignment expression>;`
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub name: ModuleExportName,
    pub alias: Option<ModuleExportName>,
}
