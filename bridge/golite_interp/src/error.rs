//! Error types for lexing, parsing and evaluation.
//!
//! Two failure channels exist and they are deliberately different:
//!
//! - [`EvalError`] is an ordinary error value. Compile-like problems
//!   (`undefined: x`, mismatched types) and syntax errors travel this way.
//! - [`Fault`] is a Go-style runtime panic. It unwinds the Rust stack with a
//!   `Fault` payload (`panic(v)`, index out of range, divide by zero, call
//!   depth exhausted) and is only stopped by whoever embeds the interpreter.

use std::fmt;

use crate::ast::Pos;

/// Lexer/parser failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub pos: Pos,
    pub message: String,
}

impl SyntaxError {
    pub fn new(pos: Pos, message: impl Into<String>) -> Self {
        SyntaxError {
            pos,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: syntax error: {}", self.pos, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Typed evaluation error categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    Syntax {
        message: String,
    },
    UndefinedName {
        name: String,
    },
    UndefinedMember {
        package: String,
        member: String,
    },
    UnknownPackage {
        path: String,
    },
    MismatchedTypes {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    InvalidOperation {
        message: String,
    },
    NotCallable {
        type_name: &'static str,
    },
    NotIndexable {
        type_name: &'static str,
    },
    ArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },
    ArgumentType {
        func: String,
        expected: &'static str,
        got: &'static str,
    },
    NonBoolCondition {
        statement: &'static str,
        type_name: &'static str,
    },
    CannotAssign {
        target: String,
    },
    MisplacedBranch {
        keyword: &'static str,
    },
    MisplacedReturn,
    Unsupported {
        feature: String,
    },
    Write {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { message } => write!(f, "syntax error: {message}"),
            Self::UndefinedName { name } => write!(f, "undefined: {name}"),
            Self::UndefinedMember { package, member } => {
                write!(f, "undefined: {package}.{member}")
            }
            Self::UnknownPackage { path } => {
                write!(f, "unable to find source related to: {path:?}")
            }
            Self::MismatchedTypes { op, left, right } => write!(
                f,
                "invalid operation: operator {op} mismatched types {left} and {right}"
            ),
            Self::InvalidOperation { message } => write!(f, "invalid operation: {message}"),
            Self::NotCallable { type_name } => write!(
                f,
                "invalid operation: cannot call non-function (value of type {type_name})"
            ),
            Self::NotIndexable { type_name } => {
                write!(f, "invalid operation: cannot index value of type {type_name}")
            }
            Self::ArgumentCount {
                name,
                expected,
                got,
            } => {
                let which = if got < expected {
                    "not enough"
                } else {
                    "too many"
                };
                write!(
                    f,
                    "{which} arguments in call to {name} (have {got}, want {expected})"
                )
            }
            Self::ArgumentType {
                func,
                expected,
                got,
            } => write!(
                f,
                "cannot use value of type {got} as {expected} value in argument to {func}"
            ),
            Self::NonBoolCondition {
                statement,
                type_name,
            } => write!(
                f,
                "non-boolean condition in {statement} statement (type {type_name})"
            ),
            Self::CannotAssign { target } => write!(f, "cannot assign to {target}"),
            Self::MisplacedBranch { keyword } => write!(f, "{keyword} is not in a loop"),
            Self::MisplacedReturn => write!(f, "return is not in a function"),
            Self::Unsupported { feature } => write!(f, "{feature} is not supported"),
            Self::Write { message } => write!(f, "write error: {message}"),
        }
    }
}

/// An ordinary evaluation error, optionally anchored to a source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub pos: Option<Pos>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, pos: Pos) -> Self {
        EvalError {
            kind,
            pos: Some(pos),
        }
    }

    pub fn undefined(name: impl Into<String>, pos: Pos) -> Self {
        Self::new(EvalErrorKind::UndefinedName { name: name.into() }, pos)
    }

    pub fn invalid(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(
            EvalErrorKind::InvalidOperation {
                message: message.into(),
            },
            pos,
        )
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{pos}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<SyntaxError> for EvalError {
    fn from(err: SyntaxError) -> Self {
        EvalError::new(
            EvalErrorKind::Syntax {
                message: err.message,
            },
            err.pos,
        )
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Panic payload for a Go-style runtime panic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    description: String,
}

impl Fault {
    pub fn new(description: impl Into<String>) -> Self {
        Fault {
            description: description.into(),
        }
    }

    /// Unwind with a `Fault` payload.
    pub fn raise(description: impl Into<String>) -> ! {
        std::panic::panic_any(Fault::new(description))
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Failure to construct or configure an [`Interpreter`](crate::Interpreter).
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("max call depth must be at least 1")]
    ZeroCallDepth,
    #[error("package {0:?} is already registered")]
    DuplicatePackage(String),
}
