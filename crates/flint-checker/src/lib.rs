//! Flint type checker: validates a parsed library against a shallow
//! nominal type system.
//!
//! Checking is non-fatal by design. Diagnostics are collected into a list
//! of strings and returned; callers decide whether to keep going. The only
//! mutation the checker performs is backfilling the omitted type
//! annotation of `let` declarations with the inferred type.

pub mod checker;

pub use checker::check;
