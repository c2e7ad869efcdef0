//! Expression AST nodes
//!
//! Every expression form a browser module can contain: literals, operators,
//! member access and calls, function and class expressions, and the module
//! specific forms `import.meta` and `import()`.

use super::*;
use crate::parser::token::Span;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Number literal: 42, 0xFF, 1e3
    NumberLiteral(NumberLiteral),

    /// BigInt literal: 10n
    BigIntLiteral(BigIntLiteral),

    /// String literal: 'hello'
    StringLiteral(StringLiteral),

    /// Template literal: `Hello ${name}`
    TemplateLiteral(TemplateLiteral),

    /// Tagged template: html`<p>${name}</p>`
    TaggedTemplate(TaggedTemplateExpression),

    /// Regular expression literal: /ab+c/gi
    RegExpLiteral(RegExpLiteral),

    /// Boolean literal: true, false
    BooleanLiteral(BooleanLiteral),

    /// Null literal
    NullLiteral(Span),

    /// Identifier reference
    Identifier(Identifier),

    /// Bare private name, only valid as `#x in obj`
    PrivateName(Identifier),

    /// this
    This(Span),

    /// super (only as `super(...)`, `super.x` or `super[x]`)
    Super(Span),

    /// Array literal: [1, , ...rest]
    Array(ArrayExpression),

    /// Object literal: { a, b: 1, [c]: 2, m() {}, ...d }
    Object(ObjectExpression),

    /// Function expression
    Function(FunctionExpression),

    /// Arrow function: (x) => x * 2
    Arrow(ArrowFunction),

    /// Class expression: class extends Base {}
    Class(ClassExpression),

    /// Unary operation: -x, !x, typeof x
    Unary(UnaryExpression),

    /// Update operation: ++x, x--
    Update(UpdateExpression),

    /// Binary operation: a + b, a instanceof B
    Binary(BinaryExpression),

    /// Logical operation: a && b, a ?? b
    Logical(LogicalExpression),

    /// Assignment: x = 5, x ??= y
    Assignment(AssignmentExpression),

    /// Conditional (ternary): a ? b : c
    Conditional(ConditionalExpression),

    /// Comma-separated sequence: a, b
    Sequence(SequenceExpression),

    /// Function call: foo(1, 2), foo?.(x)
    Call(CallExpression),

    /// Constructor call: new Foo()
    New(NewExpression),

    /// Member access: obj.prop, obj?.prop, this.#secret
    Member(MemberExpression),

    /// Computed member access: arr[0], obj?.[key]
    Index(IndexExpression),

    /// import.meta / new.target
    MetaProperty(MetaProperty),

    /// Dynamic import: import('./module.js')
    ImportCall(ImportCallExpression),

    /// await promise
    Await(AwaitExpression),

    /// yield value / yield* iterable
    Yield(YieldExpression),

    /// Parenthesized expression: (a)
    Parenthesized(ParenthesizedExpression),
}

impl Expression {
    pub fn span(&self) -> &Span {
        match self {
            Expression::NumberLiteral(e) => &e.span,
            Expression::BigIntLiteral(e) => &e.span,
            Expression::StringLiteral(e) => &e.span,
            Expression::TemplateLiteral(e) => &e.span,
            Expression::TaggedTemplate(e) => &e.span,
            Expression::RegExpLiteral(e) => &e.span,
            Expression::BooleanLiteral(e) => &e.span,
            Expression::NullLiteral(span) => span,
            Expression::Identifier(e) => &e.span,
            Expression::PrivateName(e) => &e.span,
            Expression::This(span) => span,
            Expression::Super(span) => span,
            Expression::Array(e) => &e.span,
            Expression::Object(e) => &e.span,
            Expression::Function(e) => &e.span,
            Expression::Arrow(e) => &e.span,
            Expression::Class(e) => &e.span,
            Expression::Unary(e) => &e.span,
            Expression::Update(e) => &e.span,
            Expression::Binary(e) => &e.span,
            Expression::Logical(e) => &e.span,
            Expression::Assignment(e) => &e.span,
            Expression::Conditional(e) => &e.span,
            Expression::Sequence(e) => &e.span,
            Expression::Call(e) => &e.span,
            Expression::New(e) => &e.span,
            Expression::Member(e) => &e.span,
            Expression::Index(e) => &e.span,
            Expression::MetaProperty(e) => &e.span,
            Expression::ImportCall(e) => &e.span,
            Expression::Await(e) => &e.span,
            Expression::Yield(e) => &e.span,
            Expression::Parenthesized(e) => &e.span,
        }
    }

    /// Check if this expression is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::NumberLiteral(_)
                | Expression::BigIntLiteral(_)
                | Expression::StringLiteral(_)
                | Expression::TemplateLiteral(_)
                | Expression::RegExpLiteral(_)
                | Expression::BooleanLiteral(_)
                | Expression::NullLiteral(_)
        )
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Parenthesized(inner) = expr {
            expr = &inner.expression;
        }
        expr
    }

    /// Whether this expression may appear on the left of `=`.
    ///
    /// Array and object literals count; they are reinterpreted as
    /// destructuring targets.
    pub fn is_assignment_target(&self) -> bool {
        match self.unparenthesized() {
            Expression::Identifier(_) => true,
            Expression::Member(m) => !m.optional,
            Expression::Index(i) => !i.optional,
            Expression::Array(_) | Expression::Object(_) => {
                !matches!(self, Expression::Parenthesized(_))
            }
            _ => false,
        }
    }
}

// ============================================================================
// Literal Expressions
// ============================================================================

/// Number literal: 42, 0xFF, 0b1010, 3.14, 1e10
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub span: Span,
}

/// BigInt literal, digits as written without the trailing `n`
#[derive(Debug, Clone, PartialEq)]
pub struct BigIntLiteral {
    pub digits: Symbol,
    pub span: Span,
}

/// String literal: 'hello', "world" (value is the cooked text)
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: Symbol,
    pub span: Span,
}

/// Template literal: `Hello ${name}`
///
/// `parts` alternates text and substitutions, always starting and ending
/// with a (possibly empty) string part.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    pub parts: Vec<TemplatePart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    String(Symbol),
    Expression(Box<Expression>),
}

/// Tagged template: css`:host { display: block; }`
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplateExpression {
    pub tag: Box<Expression>,
    pub quasi: TemplateLiteral,
    pub span: Span,
}

/// Regular expression literal: /pattern/flags
#[derive(Debug, Clone, PartialEq)]
pub struct RegExpLiteral {
    pub pattern: Symbol,
    pub flags: Symbol,
    pub span: Span,
}

/// Boolean literal: true, false
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

// ============================================================================
// Array and Object Literals
// ============================================================================

/// Array literal. `None` elements are holes: `[a, , b]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    pub elements: Vec<Option<ArrayElement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Expression(Expression),
    /// ...iterable
    Spread(Expression),
}

/// Object literal
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectProperty>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    /// `key: value` or shorthand `key`
    Property(Property),
    /// `method() {}`, `get x() {}`, `async *gen() {}`
    Method(MethodDecl),
    /// `...source`
    Spread(SpreadProperty),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expression,
    /// `{ a }` or `{ a = 1 }` (the latter only as a destructuring target,
    /// stored as an assignment value)
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadProperty {
    pub argument: Expression,
    pub span: Span,
}

/// Property name in object literals, class bodies and object patterns
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Identifier(Identifier),
    PrivateName(Identifier),
    StringLiteral(StringLiteral),
    NumberLiteral(NumberLiteral),
    /// `[expr]`
    Computed(Box<Expression>),
}

impl PropertyKey {
    pub fn span(&self) -> &Span {
        match self {
            PropertyKey::Identifier(id) | PropertyKey::PrivateName(id) => &id.span,
            PropertyKey::StringLiteral(lit) => &lit.span,
            PropertyKey::NumberLiteral(lit) => &lit.span,
            PropertyKey::Computed(expr) => expr.span(),
        }
    }
}

// ============================================================================
// Functions and Classes
// ============================================================================

/// Function expression: function name(a, b) { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub name: Option<Identifier>,
    pub params: Vec<Parameter>,
    pub body: BlockStatement,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

/// Arrow function: (a, b) => a + b
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<Parameter>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expression(Box<Expression>),
    Block(BlockStatement),
}

/// Class expression: `const A = class B extends C {}`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassExpression {
    pub decorators: Vec<Decorator>,
    pub name: Option<Identifier>,
    pub extends: Option<Box<Expression>>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

// ============================================================================
// Operators
// ============================================================================

/// Unary operation: -x, !x, typeof x
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

/// Update operation: ++x, x--
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

/// Binary operation: a + b
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Equality
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,

    // Relational
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    In,
    Instanceof,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,

    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
}

/// Short-circuiting operation: a && b, a || b, a ?? b
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub operator: LogicalOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    NullishCoalescing,
}

/// Assignment: x = 5, x += 1, [a, b] = pair
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub operator: AssignmentOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    ExponentAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

/// Conditional (ternary): condition ? a : b
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

/// Comma sequence: a, b, c
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

// ============================================================================
// Calls and Member Access
// ============================================================================

/// Function call: callee(args)
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Argument>,
    /// `callee?.(args)`
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Expression(Expression),
    /// ...iterable
    Spread(Expression),
}

impl Argument {
    pub fn expression(&self) -> &Expression {
        match self {
            Argument::Expression(expr) | Argument::Spread(expr) => expr,
        }
    }
}

/// Constructor call: new Foo(args). `arguments` is empty for `new Foo`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// Member access: object.property
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    /// `object.#property`
    pub private: bool,
    /// `object?.property`
    pub optional: bool,
    pub span: Span,
}

/// Computed member access: object[index]
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    /// `object?.[index]`
    pub optional: bool,
    pub span: Span,
}

/// Meta property: `import.meta`, `new.target`
#[derive(Debug, Clone, PartialEq)]
pub struct MetaProperty {
    pub meta: Identifier,
    pub property: Identifier,
    pub span: Span,
}

/// Dynamic import: import(specifier, options)
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCallExpression {
    pub source: Box<Expression>,
    pub options: Option<Box<Expression>>,
    pub span: Span,
}

// ============================================================================
// Async and Generators
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AwaitExpression {
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpression {
    pub argument: Option<Box<Expression>>,
    /// `yield*`
    pub delegate: bool,
    pub span: Span,
}

/// Parenthesized expression, kept so spans and mixin unwrapping see the
/// source shape
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpression {
    pub expression: Box<Expression>,
    pub span: Span,
}
