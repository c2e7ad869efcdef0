//! Source re-serialization
//!
//! The transform only adds statements, so output is the original text with
//! the added statements spliced in. Nodes with a real span are never
//! re-printed; synthetic nodes are printed by a small printer covering the
//! shapes the transform builds.
//!
//! Placement:
//! - a leading run of synthetic statements in the module body is the
//!   prologue, inserted at offset 0 (after a hashbang line, if any);
//! - any other synthetic statement follows the nearest real statement
//!   before it, after a blank line, at that statement's line indentation.

use crate::parser::ast::*;
use crate::parser::lexer::hashbang_len;
use crate::parser::{Interner, Span};

/// Render `module` against the `source` it was parsed from.
pub fn generate(source: &str, module: &Module, interner: &Interner) -> String {
    let mut splicer = Splicer {
        source,
        printer: Printer { source, interner },
        insertions: Vec::new(),
    };
    splicer.prologue(&module.statements);
    splicer.visit_module(module);
    splicer.finish()
}

// ============================================================================
// Splicing
// ============================================================================

struct Splicer<'a> {
    source: &'a str,
    printer: Printer<'a>,
    /// (byte offset, text), applied in offset order
    insertions: Vec<(usize, String)>,
}

impl<'a> Splicer<'a> {
    fn prologue(&mut self, statements: &[Statement]) {
        let run: Vec<&Statement> = statements
            .iter()
            .take_while(|stmt| stmt.span().is_synthetic())
            .collect();
        if run.is_empty() {
            return;
        }

        let mut text = String::new();
        let (offset, after_hashbang) = prologue_offset(self.source);
        if after_hashbang && offset == self.source.len() && !self.source.ends_with('\n') {
            text.push('\n');
        }

        for (i, stmt) in run.iter().enumerate() {
            if i > 0 {
                let consecutive_imports =
                    matches!(run[i - 1], Statement::ImportDecl(_)) && matches!(stmt, Statement::ImportDecl(_));
                text.push_str(if consecutive_imports { "\n" } else { "\n\n" });
            }
            text.push_str(&self.printer.statement(stmt, ""));
        }
        text.push_str("\n\n");

        self.insertions.push((offset, text));
    }

    fn insert_after(&mut self, anchor: &Span, run: &[&Statement]) {
        let indent = line_indent(self.source, anchor.start);
        let line_end = self.source[anchor.end..]
            .find('\n')
            .map_or(self.source.len(), |i| anchor.end + i);
        let rest = &self.source[anchor.end..line_end];

        let mut text = String::new();
        for stmt in run {
            text.push_str("\n\n");
            text.push_str(indent);
            text.push_str(&self.printer.statement(stmt, indent));
        }

        let rest_of_line = rest.trim();
        if rest_of_line.is_empty() || rest_of_line.starts_with("//") {
            let offset = if rest.ends_with('\r') { line_end - 1 } else { line_end };
            self.insertions.push((offset, text));
        } else {
            // More code on the anchor's line continues on a fresh line
            text.push('\n');
            text.push_str(indent);
            self.insertions.push((anchor.end, text));
        }
    }

    fn finish(mut self) -> String {
        self.insertions.sort_by_key(|(offset, _)| *offset);

        let added: usize = self.insertions.iter().map(|(_, text)| text.len()).sum();
        let mut output = String::with_capacity(self.source.len() + added);
        let mut copied = 0;
        for (offset, text) in &self.insertions {
            output.push_str(&self.source[copied..*offset]);
            output.push_str(text);
            copied = *offset;
        }
        output.push_str(&self.source[copied..]);
        output
    }
}

impl Visitor for Splicer<'_> {
    fn visit_statements(&mut self, statements: &[Statement]) {
        let mut anchor: Option<Span> = None;
        let mut i = 0;

        while i < statements.len() {
            if !statements[i].span().is_synthetic() {
                anchor = Some(*statements[i].span());
                i += 1;
                continue;
            }

            let run: Vec<&Statement> = statements[i..]
                .iter()
                .take_while(|stmt| stmt.span().is_synthetic())
                .collect();
            i += run.len();

            // Without an anchor this is the module prologue, placed separately
            if let Some(anchor) = anchor {
                self.insert_after(&anchor, &run);
            }
        }

        walk_statements(self, statements);
    }
}

/// Where the prologue goes, and whether a hashbang line precedes it.
fn prologue_offset(source: &str) -> (usize, bool) {
    let hashbang = hashbang_len(source);
    if hashbang == 0 {
        return (0, false);
    }
    let rest = &source[hashbang..];
    let terminator = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') || rest.starts_with('\r') {
        1
    } else {
        0
    };
    (hashbang + terminator, true)
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &source[line_start..line_start + width]
}

// ============================================================================
// Printing
// ============================================================================

const INDENT: &str = "  ";

struct Printer<'a> {
    source: &'a str,
    interner: &'a Interner,
}

impl Printer<'_> {
    fn name(&self, id: &Identifier) -> &str {
        self.interner.resolve(id.name)
    }

    fn statement(&self, stmt: &Statement, indent: &str) -> String {
        if !stmt.span().is_synthetic() {
            return stmt.span().slice(self.source).to_string();
        }

        match stmt {
            Statement::ImportDecl(decl) => self.import(decl),
            Statement::Expression(stmt) => format!("{};", self.expression(&stmt.expression, indent)),
            Statement::If(stmt) => {
                let mut out = format!(
                    "if ({}) {}",
                    self.expression(&stmt.condition, indent),
                    self.statement(&stmt.then_branch, indent)
                );
                if let Some(else_branch) = &stmt.else_branch {
                    out.push_str(" else ");
                    out.push_str(&self.statement(else_branch, indent));
                }
                out
            }
            Statement::Block(block) => self.block(block, indent),
            Statement::Empty(_) => ";".to_string(),
            other => {
                tracing::debug!(?other, "no printer for synthetic statement");
                String::new()
            }
        }
    }

    fn block(&self, block: &BlockStatement, indent: &str) -> String {
        if block.statements.is_empty() {
            return "{}".to_string();
        }

        let inner = format!("{}{}", indent, INDENT);
        let mut out = String::from("{\n");
        for stmt in &block.statements {
            out.push_str(&inner);
            out.push_str(&self.statement(stmt, &inner));
            out.push('\n');
        }
        out.push_str(indent);
        out.push('}');
        out
    }

    fn import(&self, decl: &ImportDecl) -> String {
        let source = quote(self.interner.resolve(decl.source.value));
        if decl.specifiers.is_empty() {
            return format!("import {};", source);
        }

        let mut clauses = Vec::new();
        let mut named = Vec::new();
        for spec in &decl.specifiers {
            match spec {
                ImportSpecifier::Default(local) => clauses.push(self.name(local).to_string()),
                ImportSpecifier::Namespace(local) => clauses.push(format!("* as {}", self.name(local))),
                ImportSpecifier::Named { name, alias } => {
                    let imported = match name {
                        ModuleExportName::Identifier(id) => self.name(id).to_string(),
                        ModuleExportName::String(lit) => quote(self.interner.resolve(lit.value)),
                    };
                    named.push(match alias {
                        Some(alias) => format!("{} as {}", imported, self.name(alias)),
                        None => imported,
                    });
                }
            }
        }
        if !named.is_empty() {
            clauses.push(format!("{{ {} }}", named.join(", ")));
        }

        format!("import {} from {};", clauses.join(", "), source)
    }

    fn expression(&self, expr: &Expression, indent: &str) -> String {
        if !expr.span().is_synthetic() {
            return expr.span().slice(self.source).to_string();
        }

        match expr {
            Expression::Identifier(id) => self.name(id).to_string(),
            Expression::StringLiteral(lit) => quote(self.interner.resolve(lit.value)),
            Expression::BooleanLiteral(lit) => lit.value.to_string(),
            Expression::NullLiteral(_) => "null".to_string(),
            Expression::This(_) => "this".to_string(),
            Expression::MetaProperty(meta) => format!("{}.{}", self.name(&meta.meta), self.name(&meta.property)),
            Expression::Member(member) => format!(
                "{}{}{}{}",
                self.expression(&member.object, indent),
                if member.optional { "?." } else { "." },
                if member.private { "#" } else { "" },
                self.name(&member.property)
            ),
            Expression::Call(call) => format!(
                "{}{}({})",
                self.expression(&call.callee, indent),
                if call.optional { "?." } else { "" },
                self.arguments(&call.arguments, indent)
            ),
            Expression::Arrow(arrow) => {
                let params: Vec<String> = arrow.params.iter().map(|param| self.parameter(param, indent)).collect();
                let body = match &arrow.body {
                    ArrowBody::Block(block) => self.block(block, indent),
                    ArrowBody::Expression(expr) => self.expression(expr, indent),
                };
                format!(
                    "{}({}) => {}",
                    if arrow.is_async { "async " } else { "" },
                    params.join(", "),
                    body
                )
            }
            Expression::Parenthesized(paren) => format!("({})", self.expression(&paren.expression, indent)),
            other => {
                tracing::debug!(?other, "no printer for synthetic expression");
                String::new()
            }
        }
    }

    fn arguments(&self, arguments: &[Argument], indent: &str) -> String {
        arguments
            .iter()
            .map(|arg| match arg {
                Argument::Expression(expr) => self.expression(expr, indent),
                Argument::Spread(expr) => format!("...{}", self.expression(expr, indent)),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parameter(&self, param: &Parameter, indent: &str) -> String {
        let pattern = match &param.pattern {
            Pattern::Identifier(id) if id.span.is_synthetic() => self.name(id).to_string(),
            other => other.span().slice(self.source).to_string(),
        };
        let mut out = if param.is_rest { format!("...{}", pattern) } else { pattern };
        if let Some(default) = &param.default_value {
            out.push_str(" = ");
            out.push_str(&self.expression(default, indent));
        }
        out
    }
}

/// Single-quoted JavaScript string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::transform::Synthesizer;

    fn parse(source: &str) -> (Module, Interner) {
        Parser::new(source).unwrap().parse().unwrap()
    }

    #[test]
    fn test_untouched_module_round_trips() {
        let source = "#!/usr/bin/env node\n// comment\nconst a = `x${1}`;   \n\n";
        let (module, interner) = parse(source);
        assert_eq!(generate(source, &module, &interner), source);
    }

    #[test]
    fn test_prologue_printing() {
        let source = "foo();\n";
        let (mut module, mut interner) = parse(source);
        let synth = Synthesizer::new(&mut interner);
        let prologue = synth.prologue(&mut interner, &[1]);
        module.statements.splice(0..0, prologue);

        assert_eq!(
            generate(source, &module, &interner),
            "import '/__web-dev-server__/wc-hmr/patch/1.js';\n\
             import * as __$wc_hmr$__ from '/__web-dev-server__/wc-hmr/runtime.js';\n\
             \n\
             if (import.meta.hot) {\n\
             \x20 import.meta.hot.accept(() => {});\n\
             }\n\
             \n\
             foo();\n"
        );
    }

    #[test]
    fn test_prologue_after_hashbang() {
        assert_eq!(prologue_offset("#!/bin/node\r\nx"), (13, true));
        assert_eq!(prologue_offset("#!/bin/node"), (11, true));
        assert_eq!(prologue_offset("x"), (0, false));
    }

    #[test]
    fn test_registration_placement() {
        let source = "function f() {\n\tclass A {} // trailing\n}\nclass B {} next();\n";
        let (mut module, mut interner) = parse(source);
        let synth = Synthesizer::new(&mut interner);
        let a = interner.intern("A");
        let b = interner.intern("B");

        let Statement::FunctionDecl(func) = &mut module.statements[0] else {
            panic!("expected function");
        };
        func.body.statements.push(synth.registration(a));
        module.statements.insert(2, synth.registration(b));

        assert_eq!(
            generate(source, &module, &interner),
            "function f() {\n\tclass A {} // trailing\n\n\t__$wc_hmr$__.register(import.meta.url, A);\n}\n\
             class B {}\n\n__$wc_hmr$__.register(import.meta.url, B);\n next();\n"
        );
    }

    #[test]
    fn test_line_indent() {
        let source = "a\n    b\n\tc";
        assert_eq!(line_indent(source, 6), "    ");
        assert_eq!(line_indent(source, 9), "\t");
        assert_eq!(line_indent(source, 0), "");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
    }
}
