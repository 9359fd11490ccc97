//! Scope stack bindings for the Flint interpreter.

use crate::value::Value;

/// A single lexical scope: name/value pairs in binding order.
///
/// Bindings are an ordered list searched back-to-front, so re-declaring a
/// name with `let` shadows the earlier entry for the rest of the scope.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    values: Vec<(String, Value)>,
}

impl Scope {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a binding without checking for an existing one.
    pub fn define(&mut self, name: String, value: Value) {
        self.values.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values
            .iter_mut()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}
