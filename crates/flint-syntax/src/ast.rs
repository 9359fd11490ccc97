//! AST (abstract syntax tree) types for the Flint language.

/// Arithmetic operator tags for [`Node::BinOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison operator tags for [`Node::Comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpKind {
    Eq,
    Lt,
    Gt,
    Lte,
    Gte,
}

/// Loop flavors. Only `while` exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
}

/// A declared name with an optional type annotation.
///
/// Used for `let` bindings, lambda parameters and object members. The type
/// checker backfills `ty` on `let` declarations that omit it.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<String>,
}

/// A function value: parameters plus a body sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub params: Vec<Param>,
    /// Always a [`Node::Sequence`].
    pub body: Box<Node>,
}

/// AST nodes: expressions, statements and top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(i64),
    Str(String),
    /// Identifier, possibly dotted (`a.b.c`).
    Symbol(String),
    BinOp {
        op: BinOpKind,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Comparison {
        op: CmpKind,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// Ordered statements forming the body of a scope.
    Sequence(Vec<Node>),
    Call {
        target: String,
        args: Vec<Node>,
    },
    Lambda(Lambda),
    Function {
        name: String,
        lambda: Lambda,
    },
    Assign {
        target: String,
        value: Box<Node>,
    },
    Initialize {
        decl: Param,
        value: Box<Node>,
    },
    If {
        condition: Box<Node>,
        then_body: Box<Node>,
        else_body: Option<Box<Node>>,
    },
    Loop {
        kind: LoopKind,
        condition: Option<Box<Node>>,
        body: Box<Node>,
    },
    ObjectType {
        name: String,
        members: Vec<Param>,
    },
    ObjectInit {
        type_name: String,
        fields: Vec<(String, Node)>,
    },
    EnumDef {
        name: String,
        variants: Vec<String>,
    },
}

/// A parsed compilation unit: the declarations one source file contributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    /// [`Node::Function`] declarations in source order.
    pub functions: Vec<Node>,
    /// [`Node::ObjectType`] and [`Node::EnumDef`] declarations in source order.
    pub type_decls: Vec<Node>,
}
