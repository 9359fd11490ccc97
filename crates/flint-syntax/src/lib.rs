//! Flint language syntax definitions and abstract syntax tree.
//!
//! This crate provides the foundational types for the Flint programming
//! language: abstract syntax tree (AST) nodes, the `Library` compilation
//! unit, and error handling utilities. All other crates in the Flint
//! workspace depend on these fundamental types.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │            Interpreter              │  <- Executes a Library
//! ├─────────────────────────────────────┤
//! │            Type checker             │  <- Annotates a Library
//! ├─────────────────────────────────────┤
//! │              Parser                 │  <- Produces a Library
//! ├─────────────────────────────────────┤
//! │           Source Code               │  <- Raw text input
//! └─────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use flint_syntax::ast::Node;
//!
//! let expr = Node::Number(42);
//! let stmt = Node::Symbol("total".to_string());
//! ```

/// Abstract syntax tree node definitions.
///
/// This module defines the complete AST structure for Flint programs,
/// including expressions, statements, declarations and the `Library`
/// compilation unit.
pub mod ast;

/// Error handling utilities and types.
///
/// This module provides the error and result types used for fatal
/// conditions across the Flint toolchain.
pub mod error;

// Re-export all public items for convenience
pub use ast::*;
pub use error::*;
