//! Builders for the statements the transform adds
//!
//! Every node built here carries [`Span::synthetic`], which tells
//! [`crate::codegen`] to print it rather than copy source text.

use crate::parser::ast::*;
use crate::parser::{Interner, Span, Symbol};
use crate::virtual_modules::{patch_module_path, NAMESPACE, RUNTIME_PATH};

/// Pre-interned names used by the synthesized statements.
pub struct Synthesizer {
    namespace: Symbol,
    register: Symbol,
    import: Symbol,
    meta: Symbol,
    url: Symbol,
    hot: Symbol,
    accept: Symbol,
    runtime_path: Symbol,
}

impl Synthesizer {
    pub fn new(interner: &mut Interner) -> Self {
        Self {
            namespace: interner.intern(NAMESPACE),
            register: interner.intern("register"),
            import: interner.intern("import"),
            meta: interner.intern("meta"),
            url: interner.intern("url"),
            hot: interner.intern("hot"),
            accept: interner.intern("accept"),
            runtime_path: interner.intern(RUNTIME_PATH),
        }
    }

    /// `__$wc_hmr$__.register(import.meta.url, <class>);`
    pub fn registration(&self, class: Symbol) -> Statement {
        let callee = member(identifier(self.namespace), self.register);
        let url = member(self.import_meta(), self.url);
        expression_statement(call(callee, vec![url, identifier(class)]))
    }

    /// Patch imports, the runtime namespace import and the hot-accept guard,
    /// in the order they open the module.
    pub fn prologue(&self, interner: &mut Interner, patches: &[usize]) -> Vec<Statement> {
        let mut statements: Vec<Statement> = patches
            .iter()
            .map(|&index| import(Vec::new(), interner.intern(&patch_module_path(index))))
            .collect();

        let namespace = ImportSpecifier::Namespace(Identifier::synthetic(self.namespace));
        statements.push(import(vec![namespace], self.runtime_path));
        statements.push(self.hot_accept_guard());
        statements
    }

    /// `if (import.meta.hot) { import.meta.hot.accept(() => {}); }`
    fn hot_accept_guard(&self) -> Statement {
        let hot = || member(self.import_meta(), self.hot);
        let noop = Expression::Arrow(ArrowFunction {
            params: Vec::new(),
            body: ArrowBody::Block(block(Vec::new())),
            is_async: false,
            span: Span::synthetic(),
        });
        let accept = expression_statement(call(member(hot(), self.accept), vec![noop]));

        Statement::If(IfStatement {
            condition: hot(),
            then_branch: Box::new(Statement::Block(block(vec![accept]))),
            else_branch: None,
            span: Span::synthetic(),
        })
    }

    fn import_meta(&self) -> Expression {
        Expression::MetaProperty(MetaProperty {
            meta: Identifier::synthetic(self.import),
            property: Identifier::synthetic(self.meta),
            span: Span::synthetic(),
        })
    }
}

fn identifier(name: Symbol) -> Expression {
    Expression::Identifier(Identifier::synthetic(name))
}

fn member(object: Expression, property: Symbol) -> Expression {
    Expression::Member(MemberExpression {
        object: Box::new(object),
        property: Identifier::synthetic(property),
        private: false,
        optional: false,
        span: Span::synthetic(),
    })
}

fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::Call(CallExpression {
        callee: Box::new(callee),
        arguments: arguments.into_iter().map(Argument::Expression).collect(),
        optional: false,
        span: Span::synthetic(),
    })
}

fn block(statements: Vec<Statement>) -> BlockStatement {
    BlockStatement {
        statements,
        span: Span::synthetic(),
    }
}

fn expression_statement(expression: Expression) -> Statement {
    Statement::Expression(ExpressionStatement {
        expression,
        span: Span::synthetic(),
    })
}

fn import(specifiers: Vec<ImportSpecifier>, source: Symbol) -> Statement {
    Statement::ImportDecl(ImportDecl {
        specifiers,
        source: StringLiteral {
            value: source,
            span: Span::synthetic(),
        },
        span: Span::synthetic(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prologue_shape() {
        let mut interner = Interner::new();
        let synth = Synthesizer::new(&mut interner);
        let prologue = synth.prologue(&mut interner, &[3, 0]);

        assert_eq!(prologue.len(), 4);
        assert!(prologue.iter().all(|stmt| stmt.span().is_synthetic()));

        let Statement::ImportDecl(first) = &prologue[0] else {
            panic!("expected patch import");
        };
        assert!(first.specifiers.is_empty());
        assert_eq!(interner.resolve(first.source.value), "/__web-dev-server__/wc-hmr/patch/3.js");
        assert!(matches!(prologue[3], Statement::If(_)));
    }

    #[test]
    fn test_registration_references_class() {
        let mut interner = Interner::new();
        let synth = Synthesizer::new(&mut interner);
        let foo = interner.intern("Foo");

        let Statement::Expression(stmt) = synth.registration(foo) else {
            panic!("expected expression statement");
        };
        let Expression::Call(call) = &stmt.expression else {
            panic!("expected call");
        };
        assert_eq!(call.arguments.len(), 2);
        assert!(matches!(&call.arguments[1], Argument::Expression(Expression::Identifier(id)) if id.name == foo));
    }
}
