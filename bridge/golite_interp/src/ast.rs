//! Syntax tree for Golite programs.

use std::fmt;
use std::sync::Arc;

/// 1-based source position (line, byte column).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub const fn new(line: u32, col: u32) -> Self {
        Pos { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A parsed source unit: everything passed to one `evaluate` call.
#[derive(Clone, Debug, Default)]
pub struct Program {
    /// Name from a `package` clause, if any.
    pub package: Option<String>,
    pub stmts: Vec<Stmt>,
}

/// Type syntax. Only used to compute zero values; the interpreter is
/// dynamically typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// `int`, `string`, `pkg.Name`, ...
    Named(String),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// Anything else (`*T`, `map[K]V`, `func(...)`).
    Opaque,
}

/// A top-level `func` declaration.
#[derive(Debug, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<String>,
    /// Whether the last parameter is variadic (`args ...T`).
    pub variadic: bool,
    pub body: Block,
    pub pos: Pos,
}

pub type Block = Vec<Stmt>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    /// The binary operator applied by a compound assignment.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Import(Vec<ImportSpec>),
    Func(Arc<FuncDecl>),
    Var {
        name: String,
        ty: Option<TypeExpr>,
        init: Option<Expr>,
        pos: Pos,
    },
    /// `name := value`
    Define {
        name: String,
        value: Expr,
        pos: Pos,
    },
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
        pos: Pos,
    },
    /// `x++` (`delta = 1`) or `x--` (`delta = -1`).
    IncDec {
        target: Expr,
        delta: i64,
        pos: Pos,
    },
    Expr(Expr),
    Return(Option<Expr>, Pos),
    Break(Pos),
    Continue(Pos),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        /// Either another `If` or a `Block`.
        otherwise: Option<Box<Stmt>>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    Range {
        key: Option<String>,
        value: Option<String>,
        iterable: Expr,
        body: Block,
        pos: Pos,
    },
    Block(Block),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: String,
    pub pos: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Go precedence: `||` 1, `&&` 2, comparisons 3, additive 4, multiplicative 5.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 5,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Pos) -> Self {
        Expr { kind, pos }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Str(String),
    Bool(bool),
    Nil,
    Ident(String),
    /// `[]T{a, b, c}`
    List(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Index(Box<Expr>, Box<Expr>),
    /// `x.name`, only meaningful for package members.
    Selector(Box<Expr>, String),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        /// Last argument was written `xs...`.
        spread: bool,
    },
}
