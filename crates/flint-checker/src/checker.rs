//! Type checking over a parsed [`Library`].
//!
//! The checker validates declarations against a shallow nominal type
//! system: built-in names (`i64`, `string`, `fn`) plus every declared
//! object and enum name. An unresolved lookup yields the empty type `""`,
//! which compares unequal to every real type and surfaces as a mismatch
//! at the use site. Calls type as the wildcard `?`.

use flint_syntax::ast::*;

/// Run the checker over `lib`, returning the collected diagnostics.
///
/// Never stops at the first error. `let` declarations that omit a type
/// annotation get the inferred type written back in place, which is why
/// the library is taken mutably; a second run over the same library
/// produces the same diagnostics.
pub fn check(lib: &mut Library) -> Vec<String> {
    let mut checker = Checker::new();
    checker.declare_types(&lib.type_decls);
    for f in &mut lib.functions {
        if let Node::Function { name, lambda } = f {
            checker.scopes[0].push((name.clone(), "fn".to_string()));
            checker.scopes.push(Vec::new());
            for p in &lambda.params {
                match &p.ty {
                    // Parameters are recorded in the per-function scope, not
                    // the root, so they cannot leak across functions.
                    Some(ty) => checker.innermost().push((p.name.clone(), ty.clone())),
                    None => checker.error(format!(
                        "Function '{}' arg '{}' doesn't have a type.",
                        p.name, p.name
                    )),
                }
            }
            checker.check_lambda(lambda);
            checker.scopes.pop();
        }
    }
    checker.errors
}

struct Checker {
    errors: Vec<String>,
    /// Result type of the most recently checked node. `""` means
    /// unresolved or statement-like.
    result: String,
    /// Value-type environment: a stack of `(name, type)` scopes paralleling
    /// the evaluator's scope stack.
    scopes: Vec<Vec<(String, String)>>,
    /// Every known type name, built-ins first.
    types: Vec<String>,
    /// Member tables per declared type.
    member_types: Vec<(String, Vec<(String, String)>)>,
}

impl Checker {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            result: String::new(),
            scopes: vec![Vec::new()],
            types: vec!["i64".to_string(), "string".to_string(), "fn".to_string()],
            member_types: Vec::new(),
        }
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn innermost(&mut self) -> &mut Vec<(String, String)> {
        self.scopes.last_mut().expect("scope stack is never empty")
    }

    fn is_type_name(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    /// Declared type of `member` on `type_name`, or `""` if unknown.
    fn member_type(&self, type_name: &str, member: &str) -> String {
        for (tname, members) in &self.member_types {
            if tname == type_name {
                for (n, t) in members {
                    if n == member {
                        return t.clone();
                    }
                }
            }
        }
        String::new()
    }

    /// Resolve a possibly-dotted symbol to a type name.
    ///
    /// The first segment is either a declared type name (enum access) or a
    /// value looked up innermost-scope-first; each remaining segment chains
    /// through the member tables.
    fn symbol_type(&self, name: &str) -> String {
        match name.split_once('.') {
            Some((first, rest)) => {
                let mut ty = if self.is_type_name(first) {
                    first.to_string()
                } else {
                    self.symbol_type(first)
                };
                for segment in rest.split('.') {
                    ty = self.member_type(&ty, segment);
                }
                ty
            }
            None => {
                for scope in self.scopes.iter().rev() {
                    if let Some((_, ty)) = scope.iter().rev().find(|(n, _)| n == name) {
                        return ty.clone();
                    }
                }
                String::new()
            }
        }
    }

    /// Build the type and member tables from the library's declarations.
    fn declare_types(&mut self, type_decls: &[Node]) {
        for decl in type_decls {
            match decl {
                Node::ObjectType { name, members } => {
                    self.types.push(name.clone());
                    let mut table = Vec::new();
                    for m in members {
                        match &m.ty {
                            Some(ty) => {
                                if !self.is_type_name(ty) {
                                    self.error(format!("(Unknown type) '{}'", ty));
                                }
                                table.push((m.name.clone(), ty.clone()));
                            }
                            // Untyped members are reported and dropped from
                            // the schema.
                            None => self.error(
                                "(Object types) Object doesn't have type definition.".to_string(),
                            ),
                        }
                    }
                    self.member_types.push((name.clone(), table));
                }
                Node::EnumDef { name, variants } => {
                    self.types.push(name.clone());
                    let table = variants.iter().map(|v| (v.clone(), name.clone())).collect();
                    self.member_types.push((name.clone(), table));
                }
                _ => {}
            }
        }
    }

    fn check_lambda(&mut self, lambda: &mut Lambda) {
        if let Node::Sequence(stmts) = lambda.body.as_mut() {
            for stmt in stmts {
                self.check_node(stmt);
            }
        }
    }

    fn check_body(&mut self, body: &mut Node) {
        if let Node::Sequence(stmts) = body {
            for stmt in stmts {
                self.check_node(stmt);
            }
        }
    }

    fn check_node(&mut self, node: &mut Node) {
        match node {
            Node::Number(_) => self.result = "i64".to_string(),
            Node::Str(_) => self.result = "string".to_string(),
            Node::Symbol(name) => self.result = self.symbol_type(name),
            Node::BinOp { lhs, rhs, .. } => {
                self.check_node(lhs);
                let lhs_type = self.result.clone();
                self.check_node(rhs);
                let rhs_type = self.result.clone();
                if lhs_type != rhs_type {
                    self.error(format!(
                        "(Binary Op) Type mismatch: '{}' != '{}'.",
                        lhs_type, rhs_type
                    ));
                }
                self.result = lhs_type;
            }
            Node::Comparison { lhs, rhs, .. } => {
                self.check_node(lhs);
                let lhs_type = self.result.clone();
                self.check_node(rhs);
                let rhs_type = self.result.clone();
                if lhs_type != rhs_type {
                    self.error(format!(
                        "(Comparison) Type mismatch: '{}' != '{}'.",
                        lhs_type, rhs_type
                    ));
                }
                self.result = "i64".to_string();
            }
            Node::Sequence(stmts) => {
                for stmt in stmts {
                    self.check_node(stmt);
                }
            }
            Node::Call { .. } => self.result = "?".to_string(),
            Node::Lambda(lambda) => self.check_lambda(lambda),
            Node::Function { lambda, .. } => self.check_lambda(lambda),
            Node::Assign { target, value } => {
                let lhs_type = self.symbol_type(target);
                self.check_node(value);
                let rhs_type = self.result.clone();
                if lhs_type != rhs_type {
                    self.error(format!(
                        "(Assign) Type mismatch in assign: '{}' != '{}'.",
                        lhs_type, rhs_type
                    ));
                }
                self.result = String::new();
            }
            Node::Initialize { decl, value } => {
                self.check_node(value);
                let inferred = self.result.clone();
                match &decl.ty {
                    Some(declared) if *declared != inferred => {
                        self.error(format!(
                            "(Initialize) Type mismatch: '{}' != '{}'.",
                            declared, inferred
                        ));
                    }
                    _ => {
                        decl.ty = Some(inferred.clone());
                        self.innermost().push((decl.name.clone(), inferred));
                    }
                }
            }
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                self.check_node(condition);
                // If bodies execute in the enclosing scope at runtime, so
                // their bindings are recorded in the current scope too.
                self.check_body(then_body);
                if let Some(else_body) = else_body {
                    self.check_body(else_body);
                }
                self.result = String::new();
            }
            Node::Loop {
                condition, body, ..
            } => {
                if let Some(condition) = condition {
                    self.check_node(condition);
                }
                self.scopes.push(Vec::new());
                self.check_body(body);
                self.scopes.pop();
                self.result = String::new();
            }
            Node::ObjectInit { type_name, fields } => {
                if !self.is_type_name(type_name) {
                    self.error(format!("(Object Init) Unknown type name '{}'.", type_name));
                }
                for (field, value) in fields {
                    self.check_node(value);
                    let rhs_type = self.result.clone();
                    let lhs_type = self.member_type(type_name, field);
                    if lhs_type != rhs_type {
                        self.error(format!(
                            "(Object Init) Member type doesn't match type defined. '{}' != '{}'.",
                            lhs_type, rhs_type
                        ));
                    }
                }
                self.result = type_name.clone();
            }
            Node::ObjectType { .. } | Node::EnumDef { .. } => self.result = String::new(),
        }
    }
}
