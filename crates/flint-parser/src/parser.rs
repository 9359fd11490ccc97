//! Flint parser: scannerless recursive descent with full backtracking.
//!
//! Every production records the input offset on entry and restores it on
//! any mismatch, so a failed alternative leaves the cursor untouched.
//! Parsing never aborts: malformed input backtracks until the top level
//! returns whatever was recognized, and trailing input is ignored.
//! Diagnostics accumulate in the parser and survive backtracking.

use flint_syntax::ast::*;

/// Parse `src` into a [`Library`] plus the accumulated diagnostics.
pub fn parse(src: &str) -> (Library, Vec<String>) {
    let mut parser = Parser::new(src);
    let lib = parser.parse_library();
    (lib, parser.into_errors())
}

/// Backtracking cursor over the source bytes.
pub struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given source string.
    pub fn new(input: &'a str) -> Self {
        Self {
            src: input.as_bytes(),
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Diagnostics recorded so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consume the parser, returning its diagnostics.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.pos += 1;
        }
    }

    /// Match `lit` exactly after skipping whitespace. Restores the cursor
    /// on mismatch.
    fn literal(&mut self, lit: &str) -> bool {
        let off = self.pos;
        self.skip_ws();
        for &b in lit.as_bytes() {
            if self.peek() != Some(b) {
                self.pos = off;
                return false;
            }
            self.bump();
        }
        true
    }

    /// Identifier: an ASCII letter followed by letters, digits and `_`.
    /// When `scoped`, `.` is accepted as a continuation character so that
    /// dotted member paths lex as one symbol.
    fn symbol(&mut self, scoped: bool) -> Option<String> {
        let off = self.pos;
        self.skip_ws();
        if !matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
            self.pos = off;
            return None;
        }
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || (scoped && b == b'.') {
                self.bump();
            } else {
                break;
            }
        }
        Some(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    /// Base-10 number literal. Digits accumulate with wrapping 64-bit
    /// arithmetic; there is no sign and no overflow check.
    fn number(&mut self) -> Option<Node> {
        let off = self.pos;
        self.skip_ws();
        if !matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos = off;
            return None;
        }
        let mut v: i64 = 0;
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            v = v.wrapping_mul(10).wrapping_add((b - b'0') as i64);
            self.bump();
        }
        Some(Node::Number(v))
    }

    /// String literal: every byte up to the next `"`, no escapes. A string
    /// that reaches end of input unterminated is a silent no-match.
    fn string_lit(&mut self) -> Option<Node> {
        let off = self.pos;
        self.skip_ws();
        if self.peek() != Some(b'"') {
            self.pos = off;
            return None;
        }
        self.bump();
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => {
                    let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                    self.bump();
                    return Some(Node::Str(text));
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    self.pos = off;
                    return None;
                }
            }
        }
    }

    /// `symbol (':' symbol)?`
    fn arg_decl(&mut self) -> Option<Param> {
        let off = self.pos;
        let name = match self.symbol(true) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal(":") {
            return Some(Param { name, ty: None });
        }
        match self.symbol(true) {
            Some(ty) => Some(Param { name, ty: Some(ty) }),
            None => {
                self.pos = off;
                None
            }
        }
    }

    /// Binary arithmetic production. The left operand is a number or a
    /// symbol (additionally a call for `+`); the right operand recurses
    /// into the full expression grammar, so chains group to the right.
    fn binary(&mut self, op: &str, kind: BinOpKind, call_lhs: bool) -> Option<Node> {
        let off = self.pos;
        self.skip_ws();
        let mut lhs = self.number();
        if lhs.is_none() && call_lhs {
            lhs = self.call();
        }
        if lhs.is_none() {
            lhs = self.symbol(true).map(Node::Symbol);
        }
        let lhs = match lhs {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal(op) {
            self.pos = off;
            return None;
        }
        let rhs = match self.expr() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        Some(Node::BinOp {
            op: kind,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn comparison_op(&mut self) -> Option<CmpKind> {
        let off = self.pos;
        match self.peek() {
            Some(b'=') => {
                self.bump();
                if self.peek() == Some(b'=') {
                    self.bump();
                    return Some(CmpKind::Eq);
                }
            }
            Some(b'>') => {
                self.bump();
                if self.peek() == Some(b'=') {
                    self.bump();
                    return Some(CmpKind::Gte);
                }
                return Some(CmpKind::Gt);
            }
            Some(b'<') => {
                self.bump();
                if self.peek() == Some(b'=') {
                    self.bump();
                    return Some(CmpKind::Lte);
                }
                return Some(CmpKind::Lt);
            }
            _ => {}
        }
        self.pos = off;
        None
    }

    fn comparison(&mut self) -> Option<Node> {
        let off = self.pos;
        self.skip_ws();
        let lhs = match self.number().or_else(|| self.symbol(true).map(Node::Symbol)) {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        self.skip_ws();
        let op = match self.comparison_op() {
            Some(op) => op,
            None => {
                self.pos = off;
                return None;
            }
        };
        let rhs = match self.expr() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        Some(Node::Comparison {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn call(&mut self) -> Option<Node> {
        let off = self.pos;
        let target = match self.symbol(true) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("(") {
            self.pos = off;
            return None;
        }

        let mut args = Vec::new();
        let mut fail = false;
        if let Some(arg0) = self.expr() {
            args.push(arg0);
            let mut did;
            loop {
                let comma = self.literal(",");
                let arg = self.expr();
                match (comma, arg) {
                    (true, Some(a)) => {
                        did = true;
                        args.push(a);
                    }
                    (true, None) | (false, Some(_)) => {
                        fail = true;
                        break;
                    }
                    (false, None) => {
                        did = false;
                    }
                }
                if !did {
                    break;
                }
            }
        }
        if fail || !self.literal(")") {
            self.pos = off;
            return None;
        }
        Some(Node::Call { target, args })
    }

    /// `'(' arg_decls? ')' '->' symbol? scope`
    ///
    /// The optional return-type symbol after `->` is parsed and discarded;
    /// the AST does not store it.
    fn lambda(&mut self) -> Option<Lambda> {
        let off = self.pos;
        let o_paren = self.literal("(");

        let mut params = Vec::new();
        if let Some(p0) = self.arg_decl() {
            params.push(p0);
            loop {
                if !self.literal(",") {
                    break;
                }
                match self.arg_decl() {
                    Some(p) => params.push(p),
                    None => break,
                }
            }
        }

        let c_paren = self.literal(")");
        let arrow = self.literal("->");
        let _return_type = self.symbol(true);
        let body = self.scope();

        if o_paren && c_paren && arrow {
            if let Some(body) = body {
                return Some(Lambda {
                    params,
                    body: Box::new(body),
                });
            }
        }
        self.pos = off;
        None
    }

    fn assign(&mut self) -> Option<Node> {
        let off = self.pos;
        let target = match self.symbol(true) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("=") {
            self.pos = off;
            return None;
        }
        let value = match self.expr() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        Some(Node::Assign {
            target,
            value: Box::new(value),
        })
    }

    fn initialize(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("let") {
            self.pos = off;
            return None;
        }
        let decl = match self.arg_decl() {
            Some(d) => d,
            None => {
                self.error("No value decleration after 'let'.");
                self.pos = off;
                return None;
            }
        };
        if !self.literal("=") {
            self.error("No assignment after 'let'.");
            self.pos = off;
            return None;
        }
        let value = match self.expr() {
            Some(n) => n,
            None => {
                self.error("Missing expression after assignment in value initialization.");
                self.pos = off;
                return None;
            }
        };
        Some(Node::Initialize {
            decl,
            value: Box::new(value),
        })
    }

    /// `symbol '{' ('.' symbol '=' expr (',' '.' symbol '=' expr)*)? '}'`
    fn object_init(&mut self) -> Option<Node> {
        let off = self.pos;
        let type_name = match self.symbol(true) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("{") {
            self.pos = off;
            return None;
        }

        let mut fields = Vec::new();
        let mut is_first = true;
        loop {
            if !is_first && !self.literal(",") {
                break;
            }
            is_first = false;

            if !self.literal(".") {
                break;
            }
            let field = match self.symbol(true) {
                Some(s) => s,
                None => {
                    self.error("No symbol after '.' in object initializer.");
                    self.pos = off;
                    return None;
                }
            };
            if !self.literal("=") {
                self.error("No '=' after object field specifier in object initializer.");
                self.pos = off;
                return None;
            }
            let value = match self.expr() {
                Some(n) => n,
                None => {
                    self.error("No expression after object field specifier and '='.");
                    self.pos = off;
                    return None;
                }
            };
            fields.push((field, value));
        }

        if !self.literal("}") {
            self.error("No closing '}' in object initializer.");
            self.pos = off;
            return None;
        }
        Some(Node::ObjectInit { type_name, fields })
    }

    /// `'enum' symbol '{' symbol (',' symbol)* '}'`
    ///
    /// Enum variants are parsed without dot-extension so that `A.B` inside
    /// an enum body is two identifiers, not one dotted symbol.
    fn enum_def(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("enum") {
            self.pos = off;
            return None;
        }
        let name = match self.symbol(false) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("{") {
            self.pos = off;
            return None;
        }

        let mut variants = Vec::new();
        let mut is_first = true;
        loop {
            if !is_first && !self.literal(",") {
                break;
            }
            is_first = false;
            match self.symbol(false) {
                Some(s) => variants.push(s),
                None => break,
            }
        }

        if !self.literal("}") {
            self.pos = off;
            return None;
        }
        Some(Node::EnumDef { name, variants })
    }

    /// `'object' symbol '{' arg_decl* '}'` — members separated by
    /// whitespace only.
    fn object_type(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("object") {
            self.pos = off;
            return None;
        }
        let name = match self.symbol(true) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("{") {
            self.pos = off;
            return None;
        }

        let mut members = Vec::new();
        while let Some(member) = self.arg_decl() {
            members.push(member);
        }

        if !self.literal("}") {
            self.pos = off;
            return None;
        }
        Some(Node::ObjectType { name, members })
    }

    fn function(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("fn") {
            self.pos = off;
            return None;
        }
        let name = match self.symbol(true) {
            Some(s) => s,
            None => {
                self.pos = off;
                return None;
            }
        };
        let lambda = match self.lambda() {
            Some(l) => l,
            None => {
                self.pos = off;
                return None;
            }
        };
        Some(Node::Function { name, lambda })
    }

    fn if_stmt(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("if") || !self.literal("(") {
            self.pos = off;
            return None;
        }
        let condition = match self.expr() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal(")") {
            self.pos = off;
            return None;
        }
        let then_body = match self.scope() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("else") {
            return Some(Node::If {
                condition: Box::new(condition),
                then_body: Box::new(then_body),
                else_body: None,
            });
        }
        let else_body = match self.scope() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        Some(Node::If {
            condition: Box::new(condition),
            then_body: Box::new(then_body),
            else_body: Some(Box::new(else_body)),
        })
    }

    fn while_stmt(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("while") || !self.literal("(") {
            self.pos = off;
            return None;
        }
        let condition = self.expr();
        if !self.literal(")") {
            self.pos = off;
            return None;
        }
        let body = match self.scope() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        Some(Node::Loop {
            kind: LoopKind::While,
            condition: condition.map(Box::new),
            body: Box::new(body),
        })
    }

    fn statement(&mut self) -> Option<Node> {
        let off = self.pos;
        if let Some(n) = self.if_stmt() {
            return Some(n);
        }
        if let Some(n) = self.while_stmt() {
            return Some(n);
        }
        let expr = self.expr();
        let semi = self.literal(";");
        if let (Some(n), true) = (expr, semi) {
            return Some(n);
        }
        self.pos = off;
        None
    }

    fn statement_sequence(&mut self) -> Option<Node> {
        let off = self.pos;
        self.skip_ws();
        let first = match self.statement() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        let mut stmts = vec![first];
        while let Some(stmt) = self.statement() {
            stmts.push(stmt);
        }
        Some(Node::Sequence(stmts))
    }

    /// `'{' statement+ '}'`
    fn scope(&mut self) -> Option<Node> {
        let off = self.pos;
        if !self.literal("{") {
            self.pos = off;
            return None;
        }
        let seq = match self.statement_sequence() {
            Some(n) => n,
            None => {
                self.pos = off;
                return None;
            }
        };
        if !self.literal("}") {
            self.pos = off;
            return None;
        }
        Some(seq)
    }

    /// Expression alternatives, tried in order; the first success wins.
    /// Binary productions have no precedence disambiguation beyond this
    /// ordering, so the leftmost operator binds outermost.
    pub fn expr(&mut self) -> Option<Node> {
        let off = self.pos;
        self.skip_ws();

        if let Some(n) = self.object_init() {
            return Some(n);
        }
        if let Some(n) = self.initialize() {
            return Some(n);
        }
        if let Some(n) = self.assign() {
            return Some(n);
        }
        if let Some(l) = self.lambda() {
            return Some(Node::Lambda(l));
        }
        if let Some(n) = self.binary("*", BinOpKind::Mul, false) {
            return Some(n);
        }
        if let Some(n) = self.binary("/", BinOpKind::Div, false) {
            return Some(n);
        }
        if let Some(n) = self.binary("+", BinOpKind::Add, true) {
            return Some(n);
        }
        if let Some(n) = self.binary("-", BinOpKind::Sub, false) {
            return Some(n);
        }
        if let Some(n) = self.comparison() {
            return Some(n);
        }
        if let Some(n) = self.call() {
            return Some(n);
        }
        if let Some(n) = self.number() {
            return Some(n);
        }
        if let Some(n) = self.string_lit() {
            return Some(n);
        }
        if let Some(s) = self.symbol(true) {
            return Some(Node::Symbol(s));
        }

        self.pos = off;
        None
    }

    /// `(function | object_type | enum_def)*`
    ///
    /// Stops at the first position where none of the declaration forms
    /// matches; the rest of the input is ignored.
    pub fn parse_library(&mut self) -> Library {
        let mut lib = Library::default();
        loop {
            self.skip_ws();
            if let Some(f) = self.function() {
                lib.functions.push(f);
            } else if let Some(o) = self.object_type() {
                lib.type_decls.push(o);
            } else if let Some(e) = self.enum_def() {
                lib.type_decls.push(e);
            } else {
                break;
            }
        }
        lib
    }
}
