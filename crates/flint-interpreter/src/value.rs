//! Runtime values for the Flint interpreter.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use flint_syntax::ast::Lambda;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer value
    I64(i64),
    /// A string value
    Str(String),
    /// A callable function value
    Function(Rc<Lambda>),
    /// A record instance, shared by reference
    Object(Rc<RefCell<ObjectData>>),
    /// Sentinel for a slot that has not been written yet
    Unknown,
}

/// A record instance: type name plus fields in declared member order.
///
/// Enum values reuse this shape: the type name is the enum's name and the
/// members are `(variant, ordinal)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    pub type_name: String,
    pub members: Vec<(String, Value)>,
}

impl Value {
    /// The nominal type name used by runtime type checks.
    pub fn type_name(&self) -> String {
        match self {
            Value::I64(_) => "i64".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Function(_) => "fn".to_string(),
            Value::Object(obj) => obj.borrow().type_name.clone(),
            Value::Unknown => "unknown".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I64(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(obj) => {
                let obj = obj.borrow();
                write!(f, "{} {{ ", obj.type_name)?;
                for (i, (name, value)) in obj.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " , ")?;
                    }
                    write!(f, ".{} = {}", name, value)?;
                }
                write!(f, " }}")
            }
            Value::Function(_) | Value::Unknown => write!(f, "[unknown]"),
        }
    }
}
