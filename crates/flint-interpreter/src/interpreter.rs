//! Main interpreter engine and builtins.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::scope::Scope;
use crate::value::{ObjectData, Value};
use flint_syntax::ast::*;
use flint_syntax::error::{error, Result};

/// A builtin host function: receives the evaluated argument values and
/// produces the call result.
pub type Builtin = fn(&mut Interpreter, &[Value]) -> Result<Value>;

pub struct Interpreter {
    /// Lexically stacked scopes; index 0 is the root scope holding
    /// top-level functions and enum objects.
    scopes: Vec<Scope>,
    /// Declared object types in source order, for member layout at
    /// construction time.
    object_types: Vec<(String, Vec<Param>)>,
    /// Registered host functions, searched by name before user functions.
    builtins: Vec<(String, Builtin)>,
    /// Output sink for `print`/`println`.
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to standard output.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter printing to the given sink.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let mut interp = Self {
            scopes: Vec::new(),
            object_types: Vec::new(),
            builtins: Vec::new(),
            out,
        };
        interp.register_builtin("print", builtin_print);
        interp.register_builtin("println", builtin_println);
        interp
    }

    /// Register a host function callable from Flint code by name.
    pub fn register_builtin(&mut self, name: &str, f: Builtin) {
        self.builtins.push((name.to_string(), f));
    }

    /// Execute `lib` starting from `main` and return its integer result.
    ///
    /// Installs the root scope, binds every enum as an object of ordinal
    /// members and every top-level function as a function value, then
    /// evaluates the body of `main` directly in the root scope (no call
    /// scope, no arguments).
    pub fn run(&mut self, lib: &Library) -> Result<i64> {
        self.scopes.clear();
        self.scopes.push(Scope::new());
        self.object_types.clear();

        for decl in &lib.type_decls {
            match decl {
                Node::ObjectType { name, members } => {
                    self.object_types.push((name.clone(), members.clone()));
                }
                Node::EnumDef { name, variants } => {
                    let members = variants
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (v.clone(), Value::I64(i as i64)))
                        .collect();
                    let data = ObjectData {
                        type_name: name.clone(),
                        members,
                    };
                    self.scopes[0].define(name.clone(), Value::Object(Rc::new(RefCell::new(data))));
                }
                _ => {}
            }
        }

        for f in &lib.functions {
            self.eval(f)?;
        }

        let main = match self.scopes[0].get("main") {
            Some(v) => v.clone(),
            None => return error("Undefined function 'main'"),
        };
        let Value::Function(lambda) = main else {
            return error("'main' is not a function");
        };
        match self.eval(&lambda.body)? {
            Value::I64(n) => Ok(n),
            other => error(format!("'main' must return an integer, got {:?}", other)),
        }
    }

    fn innermost(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is never empty")
    }

    fn eval(&mut self, node: &Node) -> Result<Value> {
        match node {
            Node::Number(n) => Ok(Value::I64(*n)),
            Node::Str(s) => Ok(Value::Str(s.clone())),
            Node::Symbol(name) => self.lookup(name),
            Node::BinOp { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                match (lhs, rhs) {
                    (Value::I64(a), Value::I64(b)) => match op {
                        BinOpKind::Add => Ok(Value::I64(a.wrapping_add(b))),
                        BinOpKind::Sub => Ok(Value::I64(a.wrapping_sub(b))),
                        BinOpKind::Mul => Ok(Value::I64(a.wrapping_mul(b))),
                        BinOpKind::Div => {
                            if b == 0 {
                                return error("division by zero");
                            }
                            Ok(Value::I64(a.wrapping_div(b)))
                        }
                    },
                    (a, b) => {
                        let verb = match op {
                            BinOpKind::Add => "add",
                            BinOpKind::Sub => "subtract",
                            BinOpKind::Mul => "multiply",
                            BinOpKind::Div => "divide",
                        };
                        error(format!("Cannot {} {:?} and {:?}", verb, a, b))
                    }
                }
            }
            Node::Comparison { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                match (lhs, rhs) {
                    (Value::I64(a), Value::I64(b)) => {
                        let truth = match op {
                            CmpKind::Eq => a == b,
                            CmpKind::Lt => a < b,
                            CmpKind::Gt => a > b,
                            CmpKind::Lte => a <= b,
                            CmpKind::Gte => a >= b,
                        };
                        Ok(Value::I64(truth as i64))
                    }
                    (a, b) => error(format!("Cannot compare {:?} and {:?}", a, b)),
                }
            }
            Node::Sequence(stmts) => {
                let mut last = Value::Unknown;
                for stmt in stmts {
                    last = self.eval(stmt)?;
                }
                Ok(last)
            }
            Node::Call { target, args } => self.eval_call(target, args),
            Node::Lambda(lambda) => Ok(Value::Function(Rc::new(lambda.clone()))),
            Node::Function { name, lambda } => {
                self.set_value(name, Value::Function(Rc::new(lambda.clone())))?;
                Ok(Value::Unknown)
            }
            Node::Assign { target, value } => {
                let value = self.eval(value)?;
                self.set_value(target, value.clone())?;
                Ok(value)
            }
            Node::Initialize { decl, value } => {
                let value = self.eval(value)?;
                if let Some(ty) = &decl.ty {
                    if *ty != value.type_name() {
                        return error(format!(
                            "Binding '{}' declared as '{}' but initialized with '{}'",
                            decl.name,
                            ty,
                            value.type_name()
                        ));
                    }
                }
                self.innermost().define(decl.name.clone(), value.clone());
                Ok(value)
            }
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                let cond = self.eval(condition)?;
                let n = match &cond {
                    Value::I64(n) => *n,
                    other => {
                        return error(format!("if condition must be an integer, got {:?}", other))
                    }
                };
                if n > 0 {
                    self.eval(then_body)
                } else if let Some(else_body) = else_body {
                    self.eval(else_body)
                } else {
                    Ok(cond)
                }
            }
            Node::Loop {
                kind: LoopKind::While,
                condition,
                body,
            } => {
                let Some(condition) = condition else {
                    return error("while loop has no condition");
                };
                loop {
                    let cond = self.eval(condition)?;
                    let n = match &cond {
                        Value::I64(n) => *n,
                        other => {
                            return error(format!(
                                "while condition must be an integer, got {:?}",
                                other
                            ))
                        }
                    };
                    if n == 0 {
                        return Ok(cond);
                    }
                    // each iteration runs in a fresh scope
                    self.scopes.push(Scope::new());
                    let result = self.eval(body);
                    self.scopes.pop();
                    result?;
                }
            }
            Node::ObjectInit { type_name, fields } => {
                let mut values = Vec::with_capacity(fields.len());
                for (name, expr) in fields {
                    values.push((name.clone(), self.eval(expr)?));
                }
                self.construct_object(type_name, values)
            }
            Node::ObjectType { .. } | Node::EnumDef { .. } => {
                error("type declarations cannot be evaluated")
            }
        }
    }

    fn eval_call(&mut self, target: &str, args: &[Node]) -> Result<Value> {
        let mut argv = Vec::with_capacity(args.len());
        for arg in args {
            argv.push(self.eval(arg)?);
        }

        // builtins shadow user functions of the same name
        if let Some(f) = self
            .builtins
            .iter()
            .find(|(name, _)| name == target)
            .map(|(_, f)| *f)
        {
            return f(self, &argv);
        }

        let callee = self.lookup(target)?;
        let Value::Function(lambda) = callee else {
            return error(format!("'{}' is not a function", target));
        };
        if lambda.params.len() != argv.len() {
            return error(format!(
                "Function '{}' expected {} args, got {}",
                target,
                lambda.params.len(),
                argv.len()
            ));
        }

        self.scopes.push(Scope::new());
        let result = self.eval_call_body(target, &lambda, argv);
        self.scopes.pop();
        result
    }

    /// Bind `this` and the formals in the already-pushed call scope, then
    /// evaluate the body.
    fn eval_call_body(&mut self, target: &str, lambda: &Rc<Lambda>, argv: Vec<Value>) -> Result<Value> {
        self.innermost()
            .define("this".to_string(), Value::Function(lambda.clone()));
        for (param, value) in lambda.params.iter().zip(argv) {
            if let Some(ty) = &param.ty {
                if *ty != value.type_name() {
                    return error(format!(
                        "Function '{}' parameter '{}' expects '{}', got '{}'",
                        target,
                        param.name,
                        ty,
                        value.type_name()
                    ));
                }
            }
            self.innermost().define(param.name.clone(), value);
        }
        self.eval(&lambda.body)
    }

    /// Read a possibly-dotted symbol: the first segment walks the scope
    /// stack innermost-first, each further segment descends into object
    /// members.
    fn lookup(&self, name: &str) -> Result<Value> {
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(first) {
                return match rest {
                    Some(path) => member_value(value, path),
                    None => Ok(value.clone()),
                };
            }
        }
        error(format!("Undefined variable '{}'", name))
    }

    /// Write a possibly-dotted symbol. A dotted write mutates the member
    /// of the existing object in place; an unqualified write overwrites
    /// the first binding found, or creates one in the innermost scope.
    fn set_value(&mut self, name: &str, value: Value) -> Result<()> {
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(first) {
                return match rest {
                    Some(path) => set_member(slot, path, value),
                    None => {
                        *slot = value;
                        Ok(())
                    }
                };
            }
        }
        match rest {
            Some(_) => error(format!("Undefined variable '{}'", first)),
            None => {
                self.innermost().define(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Build an object value for `type_name` from evaluated initializers.
    ///
    /// Members take the declared order of the object type; fields missing
    /// from the initializer default to `Unknown`. The built-in names pass
    /// their first initializer value straight through.
    fn construct_object(
        &mut self,
        type_name: &str,
        values: Vec<(String, Value)>,
    ) -> Result<Value> {
        if type_name == "i64" || type_name == "string" {
            return match values.into_iter().next() {
                Some((_, v)) => Ok(v),
                None => error(format!("'{}' initializer needs a value", type_name)),
            };
        }
        for (name, members) in &self.object_types {
            if name == type_name {
                let mut data = ObjectData {
                    type_name: type_name.to_string(),
                    members: Vec::with_capacity(members.len()),
                };
                for member in members {
                    let value = values
                        .iter()
                        .find(|(n, _)| n == &member.name)
                        .map(|(_, v)| v.clone())
                        .unwrap_or(Value::Unknown);
                    data.members.push((member.name.clone(), value));
                }
                return Ok(Value::Object(Rc::new(RefCell::new(data))));
            }
        }
        error(format!("Unknown object type '{}'", type_name))
    }

    fn write_values(&mut self, args: &[Value]) -> Result<()> {
        let mut text = String::new();
        for (i, value) in args.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(&value.to_string());
        }
        self.out
            .write_all(text.as_bytes())
            .map_err(|e| format!("IO error: {}", e))?;
        self.out.flush().map_err(|e| format!("IO error: {}", e))?;
        Ok(())
    }
}

fn member_value(value: &Value, path: &str) -> Result<Value> {
    let (first, rest) = match path.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (path, None),
    };
    match value {
        Value::Object(obj) => {
            let obj = obj.borrow();
            for (name, member) in &obj.members {
                if name == first {
                    return match rest {
                        Some(path) => member_value(member, path),
                        None => Ok(member.clone()),
                    };
                }
            }
            error(format!("No member '{}' on '{}'", first, obj.type_name))
        }
        other => error(format!("Cannot access member '{}' on {:?}", first, other)),
    }
}

fn set_member(slot: &mut Value, path: &str, value: Value) -> Result<()> {
    let (first, rest) = match path.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (path, None),
    };
    match slot {
        Value::Object(obj) => {
            let mut obj = obj.borrow_mut();
            let type_name = obj.type_name.clone();
            for (name, member) in obj.members.iter_mut() {
                if name == first {
                    return match rest {
                        Some(path) => set_member(member, path, value),
                        None => {
                            *member = value;
                            Ok(())
                        }
                    };
                }
            }
            error(format!("No member '{}' on '{}'", first, type_name))
        }
        other => error(format!("Cannot assign member '{}' on {:?}", first, other)),
    }
}

/// `print(values…)`: values space-separated, no trailing newline.
fn builtin_print(interp: &mut Interpreter, args: &[Value]) -> Result<Value> {
    interp.write_values(args)?;
    Ok(Value::I64(0))
}

/// `println(values…)`: as `print` plus a newline.
fn builtin_println(interp: &mut Interpreter, args: &[Value]) -> Result<Value> {
    interp.write_values(args)?;
    interp
        .out
        .write_all(b"\n")
        .map_err(|e| format!("IO error: {}", e))?;
    interp.out.flush().map_err(|e| format!("IO error: {}", e))?;
    Ok(Value::I64(0))
}
