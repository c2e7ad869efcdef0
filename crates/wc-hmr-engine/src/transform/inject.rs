//! Class hierarchy matching and registration injection
//!
//! A class is registered when it is a named class declaration, or a class
//! expression directly initializing a `const`/`let`/`var` binding, and its
//! heritage unwinds (through mixin calls) to a base class name. The
//! registration statement goes right after the declaration that binds the
//! class, in the same statement list; an `export` wrapping that declaration
//! is the anchor when there is one.
//!
//! Class expressions anywhere else (arguments, array elements, parameter
//! defaults) have no binding to register and are left alone.

use super::resolver::ResolvedBaseClasses;
use super::synthetic::Synthesizer;
use crate::parser::ast::*;
use crate::parser::Interner;

/// Unwind `Mixin(Other(Base))` to `Base`.
///
/// Follows the first argument of each call. Spread arguments, optional
/// calls (`f?.(Base)`) and anything that is not a call or identifier end
/// the walk without a result.
pub fn mixin_root(heritage: &Expression) -> Option<&Identifier> {
    let mut current = heritage.unparenthesized();
    loop {
        match current {
            Expression::Identifier(id) => return Some(id),
            Expression::Call(call) if !call.optional => match call.arguments.first()? {
                Argument::Expression(arg) => current = arg.unparenthesized(),
                Argument::Spread(_) => return None,
            },
            _ => return None,
        }
    }
}

/// Insert a registration after every matching class in `module`.
///
/// Returns the registered class names in discovery order (source order,
/// outer classes before the ones nested inside them).
pub fn inject_registrations(
    module: &mut Module,
    interner: &Interner,
    base_classes: &ResolvedBaseClasses,
    synth: &Synthesizer,
) -> Vec<Identifier> {
    let mut injector = Injector {
        interner,
        base_classes,
        synth,
        registered: Vec::new(),
    };
    injector.visit_module_mut(module);
    injector.registered
}

struct Injector<'a> {
    interner: &'a Interner,
    base_classes: &'a ResolvedBaseClasses,
    synth: &'a Synthesizer,
    registered: Vec<Identifier>,
}

impl Injector<'_> {
    fn extends_base_class(&self, heritage: Option<&Expression>) -> bool {
        heritage
            .and_then(mixin_root)
            .is_some_and(|root| self.base_classes.contains(root.name))
    }

    /// Names of the classes `stmt` binds that must be registered after it.
    fn classes_to_register(&self, stmt: &Statement) -> Vec<Identifier> {
        match stmt {
            Statement::ClassDecl(decl) if self.extends_base_class(decl.extends.as_ref()) => {
                vec![decl.name]
            }
            Statement::VariableDecl(decl) => decl
                .declarations
                .iter()
                .filter_map(|declarator| {
                    let binding = declarator.pattern.as_identifier()?;
                    match declarator.initializer.as_ref()?.unparenthesized() {
                        Expression::Class(class) if self.extends_base_class(class.extends.as_deref()) => {
                            Some(*binding)
                        }
                        _ => None,
                    }
                })
                .collect(),
            Statement::ExportDecl(ExportDecl::Declaration { declaration, .. }) => {
                self.classes_to_register(declaration)
            }
            Statement::ExportDecl(ExportDecl::Default {
                value: DefaultExport::Class(class),
                ..
            }) => match class.name {
                Some(name) if self.extends_base_class(class.extends.as_deref()) => vec![name],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

impl VisitorMut for Injector<'_> {
    fn visit_statements_mut(&mut self, statements: &mut Vec<Statement>) {
        let original = std::mem::take(statements);
        statements.reserve(original.len());

        for mut stmt in original {
            let classes = self.classes_to_register(&stmt);
            self.registered.extend(classes.iter().copied());

            self.visit_statement_mut(&mut stmt);
            statements.push(stmt);

            for class in classes {
                tracing::debug!(
                    class = self.interner.resolve(class.name),
                    line = class.span.line,
                    "injecting registration"
                );
                statements.push(self.synth.registration(class.name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn heritage(source: &str) -> Expression {
        let (module, _) = Parser::new(source).unwrap().parse().unwrap();
        match module.statements.into_iter().next() {
            Some(Statement::ClassDecl(decl)) => decl.extends.unwrap(),
            other => panic!("expected class, got {:?}", other),
        }
    }

    fn registered(source: &str, names: &[&str]) -> Vec<String> {
        let (mut module, mut interner) = Parser::new(source).unwrap().parse().unwrap();
        let mut base_classes = ResolvedBaseClasses::default();
        for name in names {
            base_classes.names.insert(interner.intern(name));
        }
        let synth = Synthesizer::new(&mut interner);
        inject_registrations(&mut module, &interner, &base_classes, &synth)
            .iter()
            .map(|id| interner.resolve(id.name).to_string())
            .collect()
    }

    #[test]
    fn test_mixin_root() {
        let (module, interner) = Parser::new("class A extends X(Y((Base)), z) {}").unwrap().parse().unwrap();
        let Statement::ClassDecl(decl) = &module.statements[0] else {
            panic!("expected class");
        };
        let root = mixin_root(decl.extends.as_ref().unwrap()).unwrap();
        assert_eq!(interner.resolve(root.name), "Base");
    }

    #[test]
    fn test_mixin_root_dead_ends() {
        for source in [
            "class A extends ns.Base {}",
            "class A extends Mixin() {}",
            "class A extends Mixin(...bases) {}",
            "class A extends Mixin?.(Base) {}",
            "class A extends Mixin(ns.Base) {}",
        ] {
            assert!(mixin_root(&heritage(source)).is_none(), "{}", source);
        }
    }

    #[test]
    fn test_declaration_sites() {
        let source = "
            class A extends Base {}
            const B = class extends Base {}, C = class Inner extends Base {}, d = 1;
            let [E] = [class extends Base {}];
            export class F extends Mixin(Base) {}
            export default class G extends Base {}
            class H extends Other {}
        ";
        assert_eq!(registered(source, &["Base"]), vec!["A", "B", "C", "F", "G"]);
    }

    #[test]
    fn test_unnamed_default_export_is_skipped() {
        assert!(registered("export default class extends Base {}", &["Base"]).is_empty());
    }

    #[test]
    fn test_nested_sites_in_discovery_order() {
        let source = "
            class Outer extends Base {
                method() { class Inner extends Base {} }
            }
            function f() { if (x) { const Local = class extends Base {}; } }
            items.map(() => { class InArrow extends Base {} });
        ";
        assert_eq!(registered(source, &["Base"]), vec!["Outer", "Inner", "Local", "InArrow"]);
    }

    #[test]
    fn test_expression_positions_are_not_registered() {
        let source = "
            const list = [class A extends Base {}];
            console.log(class C extends Base {});
            function bar(x = class D extends Base {}) {}
            const wrapped = (0, class extends Base {});
        ";
        assert!(registered(source, &["Base"]).is_empty());
    }

    #[test]
    fn test_registration_follows_anchor() {
        let (mut module, mut interner) =
            Parser::new("class A extends Base {}\nfoo();").unwrap().parse().unwrap();
        let mut base_classes = ResolvedBaseClasses::default();
        base_classes.names.insert(interner.intern("Base"));
        let synth = Synthesizer::new(&mut interner);

        inject_registrations(&mut module, &interner, &base_classes, &synth);

        assert_eq!(module.statements.len(), 3);
        assert!(!module.statements[0].span().is_synthetic());
        assert!(module.statements[1].span().is_synthetic());
        assert!(!module.statements[2].span().is_synthetic());
    }
}
