//! AST visitor pattern for traversing the syntax tree
//!
//! [`Visitor`] walks the tree by shared reference, [`VisitorMut`] by mutable
//! reference. Both route every statement list (module body, blocks, function
//! bodies, static blocks, switch cases) through a single hook,
//! `visit_statements` / `visit_statements_mut`, so a transform can see and
//! edit whole lists instead of single statements.
//!
//! # Example
//!
//! ```rust
//! use wc_hmr_engine::parser::ast::*;
//!
//! struct CountClasses {
//!     count: usize,
//! }
//!
//! impl Visitor for CountClasses {
//!     fn visit_class_decl(&mut self, decl: &ClassDecl) {
//!         self.count += 1;
//!         walk_class_decl(self, decl);
//!     }
//! }
//! ```

use super::*;

/// AST visitor trait
///
/// Implement this trait to traverse the AST. Each visit method has a default
/// implementation that calls the corresponding walk function.
pub trait Visitor: Sized {
    // Top-level
    fn visit_module(&mut self, module: &Module) {
        walk_module(self, module);
    }

    // Statements
    fn visit_statements(&mut self, statements: &[Statement]) {
        walk_statements(self, statements);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_variable_decl(&mut self, decl: &VariableDecl) {
        walk_variable_decl(self, decl);
    }

    fn visit_function_decl(&mut self, decl: &FunctionDecl) {
        walk_function_decl(self, decl);
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        walk_class_decl(self, decl);
    }

    fn visit_class_member(&mut self, member: &ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_decorator(&mut self, decorator: &Decorator) {
        self.visit_expression(&decorator.expression);
    }

    fn visit_import_decl(&mut self, _decl: &ImportDecl) {}

    fn visit_export_decl(&mut self, decl: &ExportDecl) {
        walk_export_decl(self, decl);
    }

    fn visit_block_statement(&mut self, block: &BlockStatement) {
        self.visit_statements(&block.statements);
    }

    // Expressions
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_call_expression(&mut self, expr: &CallExpression) {
        walk_call_expression(self, expr);
    }

    fn visit_function_expression(&mut self, func: &FunctionExpression) {
        walk_function_expression(self, func);
    }

    fn visit_arrow_function(&mut self, func: &ArrowFunction) {
        walk_arrow_function(self, func);
    }

    fn visit_class_expression(&mut self, class: &ClassExpression) {
        walk_class_expression(self, class);
    }

    // Leaves
    fn visit_identifier(&mut self, _id: &Identifier) {}

    fn visit_pattern(&mut self, pattern: &Pattern) {
        walk_pattern(self, pattern);
    }
}

// ============================================================================
// Walk functions (shared)
// ============================================================================

pub fn walk_module<V: Visitor>(visitor: &mut V, module: &Module) {
    visitor.visit_statements(&module.statements);
}

pub fn walk_statements<V: Visitor>(visitor: &mut V, statements: &[Statement]) {
    for stmt in statements {
        visitor.visit_statement(stmt);
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::VariableDecl(decl) => visitor.visit_variable_decl(decl),
        Statement::FunctionDecl(decl) => visitor.visit_function_decl(decl),
        Statement::ClassDecl(decl) => visitor.visit_class_decl(decl),
        Statement::ImportDecl(decl) => visitor.visit_import_decl(decl),
        Statement::ExportDecl(decl) => visitor.visit_export_decl(decl),
        Statement::Expression(stmt) => visitor.visit_expression(&stmt.expression),
        Statement::If(stmt) => {
            visitor.visit_expression(&stmt.condition);
            visitor.visit_statement(&stmt.then_branch);
            if let Some(else_branch) = &stmt.else_branch {
                visitor.visit_statement(else_branch);
            }
        }
        Statement::Switch(stmt) => {
            visitor.visit_expression(&stmt.discriminant);
            for case in &stmt.cases {
                if let Some(test) = &case.test {
                    visitor.visit_expression(test);
                }
                visitor.visit_statements(&case.consequent);
            }
        }
        Statement::While(stmt) => {
            visitor.visit_expression(&stmt.condition);
            visitor.visit_statement(&stmt.body);
        }
        Statement::DoWhile(stmt) => {
            visitor.visit_statement(&stmt.body);
            visitor.visit_expression(&stmt.condition);
        }
        Statement::For(stmt) => {
            match &stmt.init {
                Some(ForInit::VariableDecl(decl)) => visitor.visit_variable_decl(decl),
                Some(ForInit::Expression(expr)) => visitor.visit_expression(expr),
                None => {}
            }
            if let Some(test) = &stmt.test {
                visitor.visit_expression(test);
            }
            if let Some(update) = &stmt.update {
                visitor.visit_expression(update);
            }
            visitor.visit_statement(&stmt.body);
        }
        Statement::ForIn(stmt) => {
            walk_for_head(visitor, &stmt.left);
            visitor.visit_expression(&stmt.right);
            visitor.visit_statement(&stmt.body);
        }
        Statement::ForOf(stmt) => {
            walk_for_head(visitor, &stmt.left);
            visitor.visit_expression(&stmt.right);
            visitor.visit_statement(&stmt.body);
        }
        Statement::Return(stmt) => {
            if let Some(value) = &stmt.value {
                visitor.visit_expression(value);
            }
        }
        Statement::Throw(stmt) => visitor.visit_expression(&stmt.value),
        Statement::Try(stmt) => {
            visitor.visit_block_statement(&stmt.body);
            if let Some(catch) = &stmt.catch_clause {
                if let Some(param) = &catch.param {
                    visitor.visit_pattern(param);
                }
                visitor.visit_block_statement(&catch.body);
            }
            if let Some(finally) = &stmt.finally_clause {
                visitor.visit_block_statement(finally);
            }
        }
        Statement::Labeled(stmt) => visitor.visit_statement(&stmt.body),
        Statement::Block(block) => visitor.visit_block_statement(block),
        Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Debugger(_)
        | Statement::Empty(_) => {}
    }
}

fn walk_for_head<V: Visitor>(visitor: &mut V, head: &ForHead) {
    match head {
        ForHead::VariableDecl(decl) => visitor.visit_variable_decl(decl),
        ForHead::Target(expr) => visitor.visit_expression(expr),
    }
}

pub fn walk_variable_decl<V: Visitor>(visitor: &mut V, decl: &VariableDecl) {
    for declarator in &decl.declarations {
        visitor.visit_pattern(&declarator.pattern);
        if let Some(init) = &declarator.initializer {
            visitor.visit_expression(init);
        }
    }
}

pub fn walk_function_decl<V: Visitor>(visitor: &mut V, decl: &FunctionDecl) {
    visitor.visit_identifier(&decl.name);
    walk_params(visitor, &decl.params);
    visitor.visit_block_statement(&decl.body);
}

pub fn walk_class_decl<V: Visitor>(visitor: &mut V, decl: &ClassDecl) {
    for decorator in &decl.decorators {
        visitor.visit_decorator(decorator);
    }
    visitor.visit_identifier(&decl.name);
    if let Some(extends) = &decl.extends {
        visitor.visit_expression(extends);
    }
    for member in &decl.members {
        visitor.visit_class_member(member);
    }
}

pub fn walk_class_member<V: Visitor>(visitor: &mut V, member: &ClassMember) {
    match member {
        ClassMember::Method(method) => walk_method(visitor, method),
        ClassMember::Field(field) => {
            for decorator in &field.decorators {
                visitor.visit_decorator(decorator);
            }
            walk_property_key(visitor, &field.key);
            if let Some(init) = &field.initializer {
                visitor.visit_expression(init);
            }
        }
        ClassMember::StaticBlock(block) => visitor.visit_block_statement(block),
    }
}

fn walk_method<V: Visitor>(visitor: &mut V, method: &MethodDecl) {
    for decorator in &method.decorators {
        visitor.visit_decorator(decorator);
    }
    walk_property_key(visitor, &method.key);
    walk_params(visitor, &method.params);
    visitor.visit_block_statement(&method.body);
}

fn walk_params<V: Visitor>(visitor: &mut V, params: &[Parameter]) {
    for param in params {
        visitor.visit_pattern(&param.pattern);
        if let Some(default) = &param.default_value {
            visitor.visit_expression(default);
        }
    }
}

fn walk_property_key<V: Visitor>(visitor: &mut V, key: &PropertyKey) {
    if let PropertyKey::Computed(expr) = key {
        visitor.visit_expression(expr);
    }
}

pub fn walk_export_decl<V: Visitor>(visitor: &mut V, decl: &ExportDecl) {
    match decl {
        ExportDecl::Declaration { declaration, .. } => visitor.visit_statement(declaration),
        ExportDecl::Default { value, .. } => match value {
            DefaultExport::Function(func) => visitor.visit_function_expression(func),
            DefaultExport::Class(class) => visitor.visit_class_expression(class),
            DefaultExport::Expression(expr) => visitor.visit_expression(expr),
        },
        ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier(id) => visitor.visit_identifier(id),
        Expression::TemplateLiteral(template) => walk_template(visitor, template),
        Expression::TaggedTemplate(tagged) => {
            visitor.visit_expression(&tagged.tag);
            walk_template(visitor, &tagged.quasi);
        }
        Expression::Array(array) => {
            for element in array.elements.iter().flatten() {
                match element {
                    ArrayElement::Expression(e) | ArrayElement::Spread(e) => {
                        visitor.visit_expression(e)
                    }
                }
            }
        }
        Expression::Object(object) => {
            for property in &object.properties {
                match property {
                    ObjectProperty::Property(prop) => {
                        walk_property_key(visitor, &prop.key);
                        visitor.visit_expression(&prop.value);
                    }
                    ObjectProperty::Method(method) => walk_method(visitor, method),
                    ObjectProperty::Spread(spread) => visitor.visit_expression(&spread.argument),
                }
            }
        }
        Expression::Function(func) => visitor.visit_function_expression(func),
        Expression::Arrow(func) => visitor.visit_arrow_function(func),
        Expression::Class(class) => visitor.visit_class_expression(class),
        Expression::Unary(e) => visitor.visit_expression(&e.operand),
        Expression::Update(e) => visitor.visit_expression(&e.argument),
        Expression::Binary(e) => {
            visitor.visit_expression(&e.left);
            visitor.visit_expression(&e.right);
        }
        Expression::Logical(e) => {
            visitor.visit_expression(&e.left);
            visitor.visit_expression(&e.right);
        }
        Expression::Assignment(e) => {
            visitor.visit_expression(&e.left);
            visitor.visit_expression(&e.right);
        }
        Expression::Conditional(e) => {
            visitor.visit_expression(&e.test);
            visitor.visit_expression(&e.consequent);
            visitor.visit_expression(&e.alternate);
        }
        Expression::Sequence(e) => {
            for expr in &e.expressions {
                visitor.visit_expression(expr);
            }
        }
        Expression::Call(call) => visitor.visit_call_expression(call),
        Expression::New(e) => {
            visitor.visit_expression(&e.callee);
            for arg in &e.arguments {
                visitor.visit_expression(arg.expression());
            }
        }
        Expression::Member(e) => visitor.visit_expression(&e.object),
        Expression::Index(e) => {
            visitor.visit_expression(&e.object);
            visitor.visit_expression(&e.index);
        }
        Expression::ImportCall(e) => {
            visitor.visit_expression(&e.source);
            if let Some(options) = &e.options {
                visitor.visit_expression(options);
            }
        }
        Expression::Await(e) => visitor.visit_expression(&e.argument),
        Expression::Yield(e) => {
            if let Some(argument) = &e.argument {
                visitor.visit_expression(argument);
            }
        }
        Expression::Parenthesized(e) => visitor.visit_expression(&e.expression),
        Expression::NumberLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::PrivateName(_)
        | Expression::This(_)
        | Expression::Super(_)
        | Expression::MetaProperty(_) => {}
    }
}

fn walk_template<V: Visitor>(visitor: &mut V, template: &TemplateLiteral) {
    for part in &template.parts {
        if let TemplatePart::Expression(expr) = part {
            visitor.visit_expression(expr);
        }
    }
}

pub fn walk_call_expression<V: Visitor>(visitor: &mut V, expr: &CallExpression) {
    visitor.visit_expression(&expr.callee);
    for arg in &expr.arguments {
        visitor.visit_expression(arg.expression());
    }
}

pub fn walk_function_expression<V: Visitor>(visitor: &mut V, func: &FunctionExpression) {
    if let Some(name) = &func.name {
        visitor.visit_identifier(name);
    }
    walk_params(visitor, &func.params);
    visitor.visit_block_statement(&func.body);
}

pub fn walk_arrow_function<V: Visitor>(visitor: &mut V, func: &ArrowFunction) {
    walk_params(visitor, &func.params);
    match &func.body {
        ArrowBody::Expression(expr) => visitor.visit_expression(expr),
        ArrowBody::Block(block) => visitor.visit_block_statement(block),
    }
}

pub fn walk_class_expression<V: Visitor>(visitor: &mut V, class: &ClassExpression) {
    for decorator in &class.decorators {
        visitor.visit_decorator(decorator);
    }
    if let Some(name) = &class.name {
        visitor.visit_identifier(name);
    }
    if let Some(extends) = &class.extends {
        visitor.visit_expression(extends);
    }
    for member in &class.members {
        visitor.visit_class_member(member);
    }
}

pub fn walk_pattern<V: Visitor>(visitor: &mut V, pattern: &Pattern) {
    match pattern {
        Pattern::Identifier(id) => visitor.visit_identifier(id),
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                visitor.visit_pattern(&element.pattern);
                if let Some(default) = &element.default {
                    visitor.visit_expression(default);
                }
            }
            if let Some(rest) = &array.rest {
                visitor.visit_pattern(rest);
            }
        }
        Pattern::Object(object) => {
            for prop in &object.properties {
                walk_property_key(visitor, &prop.key);
                visitor.visit_pattern(&prop.value);
                if let Some(default) = &prop.default {
                    visitor.visit_expression(default);
                }
            }
            if let Some(rest) = &object.rest {
                visitor.visit_identifier(rest);
            }
        }
    }
}

// ============================================================================
// Mutable visitor
// ============================================================================

/// Mutable AST visitor
///
/// Same shape as [`Visitor`], by `&mut`. Only the nodes that own statements
/// or can contain them get a hook; leaves are skipped.
pub trait VisitorMut: Sized {
    fn visit_module_mut(&mut self, module: &mut Module) {
        self.visit_statements_mut(&mut module.statements);
    }

    fn visit_statements_mut(&mut self, statements: &mut Vec<Statement>) {
        walk_statements_mut(self, statements);
    }

    fn visit_statement_mut(&mut self, stmt: &mut Statement) {
        walk_statement_mut(self, stmt);
    }

    fn visit_class_member_mut(&mut self, member: &mut ClassMember) {
        walk_class_member_mut(self, member);
    }

    fn visit_block_statement_mut(&mut self, block: &mut BlockStatement) {
        self.visit_statements_mut(&mut block.statements);
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }
}

pub fn walk_statements_mut<V: VisitorMut>(visitor: &mut V, statements: &mut Vec<Statement>) {
    for stmt in statements.iter_mut() {
        visitor.visit_statement_mut(stmt);
    }
}

pub fn walk_statement_mut<V: VisitorMut>(visitor: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::VariableDecl(decl) => walk_variable_decl_mut(visitor, decl),
        Statement::FunctionDecl(decl) => {
            walk_params_mut(visitor, &mut decl.params);
            visitor.visit_block_statement_mut(&mut decl.body);
        }
        Statement::ClassDecl(decl) => {
            walk_decorators_mut(visitor, &mut decl.decorators);
            if let Some(extends) = &mut decl.extends {
                visitor.visit_expression_mut(extends);
            }
            for member in &mut decl.members {
                visitor.visit_class_member_mut(member);
            }
        }
        Statement::ExportDecl(decl) => match decl {
            ExportDecl::Declaration { declaration, .. } => {
                visitor.visit_statement_mut(declaration)
            }
            ExportDecl::Default { value, .. } => match value {
                DefaultExport::Function(func) => walk_function_expression_mut(visitor, func),
                DefaultExport::Class(class) => walk_class_expression_mut(visitor, class),
                DefaultExport::Expression(expr) => visitor.visit_expression_mut(expr),
            },
            ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
        },
        Statement::Expression(stmt) => visitor.visit_expression_mut(&mut stmt.expression),
        Statement::If(stmt) => {
            visitor.visit_expression_mut(&mut stmt.condition);
            visitor.visit_statement_mut(&mut stmt.then_branch);
            if let Some(else_branch) = &mut stmt.else_branch {
                visitor.visit_statement_mut(else_branch);
            }
        }
        Statement::Switch(stmt) => {
            visitor.visit_expression_mut(&mut stmt.discriminant);
            for case in &mut stmt.cases {
                if let Some(test) = &mut case.test {
                    visitor.visit_expression_mut(test);
                }
                visitor.visit_statements_mut(&mut case.consequent);
            }
        }
        Statement::While(stmt) => {
            visitor.visit_expression_mut(&mut stmt.condition);
            visitor.visit_statement_mut(&mut stmt.body);
        }
        Statement::DoWhile(stmt) => {
            visitor.visit_statement_mut(&mut stmt.body);
            visitor.visit_expression_mut(&mut stmt.condition);
        }
        Statement::For(stmt) => {
            match &mut stmt.init {
                Some(ForInit::VariableDecl(decl)) => walk_variable_decl_mut(visitor, decl),
                Some(ForInit::Expression(expr)) => visitor.visit_expression_mut(expr),
                None => {}
            }
            if let Some(test) = &mut stmt.test {
                visitor.visit_expression_mut(test);
            }
            if let Some(update) = &mut stmt.update {
                visitor.visit_expression_mut(update);
            }
            visitor.visit_statement_mut(&mut stmt.body);
        }
        Statement::ForIn(stmt) => {
            walk_for_head_mut(visitor, &mut stmt.left);
            visitor.visit_expression_mut(&mut stmt.right);
            visitor.visit_statement_mut(&mut stmt.body);
        }
        Statement::ForOf(stmt) => {
            walk_for_head_mut(visitor, &mut stmt.left);
            visitor.visit_expression_mut(&mut stmt.right);
            visitor.visit_statement_mut(&mut stmt.body);
        }
        Statement::Return(stmt) => {
            if let Some(value) = &mut stmt.value {
                visitor.visit_expression_mut(value);
            }
        }
        Statement::Throw(stmt) => visitor.visit_expression_mut(&mut stmt.value),
        Statement::Try(stmt) => {
            visitor.visit_block_statement_mut(&mut stmt.body);
            if let Some(catch) = &mut stmt.catch_clause {
                visitor.visit_block_statement_mut(&mut catch.body);
            }
            if let Some(finally) = &mut stmt.finally_clause {
                visitor.visit_block_statement_mut(finally);
            }
        }
        Statement::Labeled(stmt) => visitor.visit_statement_mut(&mut stmt.body),
        Statement::Block(block) => visitor.visit_block_statement_mut(block),
        Statement::ImportDecl(_)
        | Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Debugger(_)
        | Statement::Empty(_) => {}
    }
}

fn walk_for_head_mut<V: VisitorMut>(visitor: &mut V, head: &mut ForHead) {
    match head {
        ForHead::VariableDecl(decl) => walk_variable_decl_mut(visitor, decl),
        ForHead::Target(expr) => visitor.visit_expression_mut(expr),
    }
}

fn walk_variable_decl_mut<V: VisitorMut>(visitor: &mut V, decl: &mut VariableDecl) {
    for declarator in &mut decl.declarations {
        walk_pattern_mut(visitor, &mut declarator.pattern);
        if let Some(init) = &mut declarator.initializer {
            visitor.visit_expression_mut(init);
        }
    }
}

fn walk_decorators_mut<V: VisitorMut>(visitor: &mut V, decorators: &mut [Decorator]) {
    for decorator in decorators {
        visitor.visit_expression_mut(&mut decorator.expression);
    }
}

pub fn walk_class_member_mut<V: VisitorMut>(visitor: &mut V, member: &mut ClassMember) {
    match member {
        ClassMember::Method(method) => walk_method_mut(visitor, method),
        ClassMember::Field(field) => {
            walk_decorators_mut(visitor, &mut field.decorators);
            walk_property_key_mut(visitor, &mut field.key);
            if let Some(init) = &mut field.initializer {
                visitor.visit_expression_mut(init);
            }
        }
        ClassMember::StaticBlock(block) => visitor.visit_block_statement_mut(block),
    }
}

fn walk_method_mut<V: VisitorMut>(visitor: &mut V, method: &mut MethodDecl) {
    walk_decorators_mut(visitor, &mut method.decorators);
    walk_property_key_mut(visitor, &mut method.key);
    walk_params_mut(visitor, &mut method.params);
    visitor.visit_block_statement_mut(&mut method.body);
}

fn walk_params_mut<V: VisitorMut>(visitor: &mut V, params: &mut [Parameter]) {
    for param in params {
        walk_pattern_mut(visitor, &mut param.pattern);
        if let Some(default) = &mut param.default_value {
            visitor.visit_expression_mut(default);
        }
    }
}

fn walk_property_key_mut<V: VisitorMut>(visitor: &mut V, key: &mut PropertyKey) {
    if let PropertyKey::Computed(expr) = key {
        visitor.visit_expression_mut(expr);
    }
}

fn walk_function_expression_mut<V: VisitorMut>(visitor: &mut V, func: &mut FunctionExpression) {
    walk_params_mut(visitor, &mut func.params);
    visitor.visit_block_statement_mut(&mut func.body);
}

fn walk_class_expression_mut<V: VisitorMut>(visitor: &mut V, class: &mut ClassExpression) {
    walk_decorators_mut(visitor, &mut class.decorators);
    if let Some(extends) = &mut class.extends {
        visitor.visit_expression_mut(extends);
    }
    for member in &mut class.members {
        visitor.visit_class_member_mut(member);
    }
}

// Default values inside patterns can hold functions and classes.
fn walk_pattern_mut<V: VisitorMut>(visitor: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Identifier(_) => {}
        Pattern::Array(array) => {
            for element in array.elements.iter_mut().flatten() {
                walk_pattern_mut(visitor, &mut element.pattern);
                if let Some(default) = &mut element.default {
                    visitor.visit_expression_mut(default);
                }
            }
            if let Some(rest) = &mut array.rest {
                walk_pattern_mut(visitor, rest);
            }
        }
        Pattern::Object(object) => {
            for prop in &mut object.properties {
                walk_property_key_mut(visitor, &mut prop.key);
                walk_pattern_mut(visitor, &mut prop.value);
                if let Some(default) = &mut prop.default {
                    visitor.visit_expression_mut(default);
                }
            }
        }
    }
}

pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::TemplateLiteral(template) => walk_template_mut(visitor, template),
        Expression::TaggedTemplate(tagged) => {
            visitor.visit_expression_mut(&mut tagged.tag);
            walk_template_mut(visitor, &mut tagged.quasi);
        }
        Expression::Array(array) => {
            for element in array.elements.iter_mut().flatten() {
                match element {
                    ArrayElement::Expression(e) | ArrayElement::Spread(e) => {
                        visitor.visit_expression_mut(e)
                    }
                }
            }
        }
        Expression::Object(object) => {
            for property in &mut object.properties {
                match property {
                    ObjectProperty::Property(prop) => {
                        walk_property_key_mut(visitor, &mut prop.key);
                        visitor.visit_expression_mut(&mut prop.value);
                    }
                    ObjectProperty::Method(method) => walk_method_mut(visitor, method),
                    ObjectProperty::Spread(spread) => {
                        visitor.visit_expression_mut(&mut spread.argument)
                    }
                }
            }
        }
        Expression::Function(func) => walk_function_expression_mut(visitor, func),
        Expression::Arrow(func) => {
            walk_params_mut(visitor, &mut func.params);
            match &mut func.body {
                ArrowBody::Expression(expr) => visitor.visit_expression_mut(expr),
                ArrowBody::Block(block) => visitor.visit_block_statement_mut(block),
            }
        }
        Expression::Class(class) => walk_class_expression_mut(visitor, class),
        Expression::Unary(e) => visitor.visit_expression_mut(&mut e.operand),
        Expression::Update(e) => visitor.visit_expression_mut(&mut e.argument),
        Expression::Binary(e) => {
            visitor.visit_expression_mut(&mut e.left);
            visitor.visit_expression_mut(&mut e.right);
        }
        Expression::Logical(e) => {
            visitor.visit_expression_mut(&mut e.left);
            visitor.visit_expression_mut(&mut e.right);
        }
        Expression::Assignment(e) => {
            visitor.visit_expression_mut(&mut e.left);
            visitor.visit_expression_mut(&mut e.right);
        }
        Expression::Conditional(e) => {
            visitor.visit_expression_mut(&mut e.test);
            visitor.visit_expression_mut(&mut e.consequent);
            visitor.visit_expression_mut(&mut e.alternate);
        }
        Expression::Sequence(e) => {
            for expr in &mut e.expressions {
                visitor.visit_expression_mut(expr);
            }
        }
        Expression::Call(e) => {
            visitor.visit_expression_mut(&mut e.callee);
            walk_arguments_mut(visitor, &mut e.arguments);
        }
        Expression::New(e) => {
            visitor.visit_expression_mut(&mut e.callee);
            walk_arguments_mut(visitor, &mut e.arguments);
        }
        Expression::Member(e) => visitor.visit_expression_mut(&mut e.object),
        Expression::Index(e) => {
            visitor.visit_expression_mut(&mut e.object);
            visitor.visit_expression_mut(&mut e.index);
        }
        Expression::ImportCall(e) => {
            visitor.visit_expression_mut(&mut e.source);
            if let Some(options) = &mut e.options {
                visitor.visit_expression_mut(options);
            }
        }
        Expression::Await(e) => visitor.visit_expression_mut(&mut e.argument),
        Expression::Yield(e) => {
            if let Some(argument) = &mut e.argument {
                visitor.visit_expression_mut(argument);
            }
        }
        Expression::Parenthesized(e) => visitor.visit_expression_mut(&mut e.expression),
        Expression::NumberLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::Identifier(_)
        | Expression::PrivateName(_)
        | Expression::This(_)
        | Expression::Super(_)
        | Expression::MetaProperty(_) => {}
    }
}

fn walk_template_mut<V: VisitorMut>(visitor: &mut V, template: &mut TemplateLiteral) {
    for part in &mut template.parts {
        if let TemplatePart::Expression(expr) = part {
            visitor.visit_expression_mut(expr);
        }
    }
}

fn walk_arguments_mut<V: VisitorMut>(visitor: &mut V, arguments: &mut [Argument]) {
    for arg in arguments {
        match arg {
            Argument::Expression(e) | Argument::Spread(e) => visitor.visit_expression_mut(e),
        }
    }
}
