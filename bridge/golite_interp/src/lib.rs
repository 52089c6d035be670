//! Golite: a small Go-flavoured scripting language.
//!
//! The pipeline is `lexer` → `parser` → tree-walking [`Interpreter`]. A
//! session is created with an output sink and a set of library packages:
//!
//! ```text
//! let mut interp = Interpreter::new(shared_stdout(), InterpOptions::default())?;
//! interp.use_symbols(stdlib::symbols())?;
//! interp.evaluate(r#"import "fmt"; fmt.Println("hi")"#)?;
//! ```
//!
//! Ordinary failures come back as [`EvalError`]. Go runtime panics unwind
//! with a [`Fault`] payload and must be caught by the embedder.

pub mod ast;
pub mod builtins;
pub mod environment;
mod error;
pub mod format;
pub mod interpreter;
pub mod lexer;
pub mod operators;
pub mod parser;
mod stack;
pub mod stdlib;
mod value;

pub use error::{EvalError, EvalErrorKind, EvalResult, Fault, InitError, SyntaxError};
pub use interpreter::{InterpOptions, Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use stack::ensure_sufficient_stack;
pub use value::{NativeFunc, Value};
