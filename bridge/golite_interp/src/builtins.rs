//! Native function plumbing and the universe builtins.
//!
//! Universe builtins (`print`, `println`, `len`, `append`, `panic`) are
//! always in scope. Library packages live in [`crate::stdlib`] and must be
//! imported.

use std::sync::Arc;

use golite_capture::OutputSink;

use crate::ast::Pos;
use crate::error::{EvalError, EvalErrorKind, EvalResult, Fault};
use crate::format;
use crate::value::{NativeFunc, Value};

/// Signature shared by every builtin and library function.
pub type NativeFn = fn(&NativeCall<'_>, Vec<Value>) -> EvalResult<Value>;

/// Call context handed to a [`NativeFn`].
pub struct NativeCall<'a> {
    pub name: &'static str,
    pub pos: Pos,
    stdout: &'a OutputSink,
}

impl<'a> NativeCall<'a> {
    pub fn new(name: &'static str, pos: Pos, stdout: &'a OutputSink) -> Self {
        NativeCall { name, pos, stdout }
    }

    /// Write program output.
    pub fn write(&self, text: &str) -> EvalResult<()> {
        self.stdout.write_str(text).map_err(|err| {
            EvalError::new(
                EvalErrorKind::Write {
                    message: err.to_string(),
                },
                self.pos,
            )
        })
    }

    pub fn arity(&self, args: &[Value], expected: usize) -> EvalResult<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(self.arity_error(args.len(), expected))
        }
    }

    pub fn min_arity(&self, args: &[Value], expected: usize) -> EvalResult<()> {
        if args.len() >= expected {
            Ok(())
        } else {
            Err(self.arity_error(args.len(), expected))
        }
    }

    fn arity_error(&self, got: usize, expected: usize) -> EvalError {
        EvalError::new(
            EvalErrorKind::ArgumentCount {
                name: self.name.to_string(),
                expected,
                got,
            },
            self.pos,
        )
    }

    pub fn str_arg<'v>(&self, value: &'v Value) -> EvalResult<&'v str> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(self.type_error("string", other)),
        }
    }

    pub fn int_arg(&self, value: &Value) -> EvalResult<i64> {
        match value {
            Value::Int(n) => Ok(*n),
            other => Err(self.type_error("int", other)),
        }
    }

    pub fn type_error(&self, expected: &'static str, got: &Value) -> EvalError {
        EvalError::new(
            EvalErrorKind::ArgumentType {
                func: self.name.to_string(),
                expected,
                got: got.type_name(),
            },
            self.pos,
        )
    }
}

const UNIVERSE: &[NativeFunc] = &[
    NativeFunc {
        name: "print",
        func: builtin_print,
    },
    NativeFunc {
        name: "println",
        func: builtin_println,
    },
    NativeFunc {
        name: "len",
        func: builtin_len,
    },
    NativeFunc {
        name: "append",
        func: builtin_append,
    },
    NativeFunc {
        name: "panic",
        func: builtin_panic,
    },
];

/// Look up a universe builtin by name.
pub fn universe(name: &str) -> Option<NativeFunc> {
    UNIVERSE.iter().find(|builtin| builtin.name == name).copied()
}

fn builtin_print(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    let text: String = args.iter().map(ToString::to_string).collect();
    call.write(&text)?;
    Ok(Value::Nil)
}

fn builtin_println(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.write(&format::sprintln(&args))?;
    Ok(Value::Nil)
}

fn builtin_len(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    let len = match &args[0] {
        Value::Str(s) => s.len(),
        Value::List(items) => items.len(),
        Value::Nil => 0,
        other => {
            return Err(EvalError::invalid(
                format!("invalid argument: {other} (type {}) for len", other.type_name()),
                call.pos,
            ))
        }
    };
    Ok(Value::Int(len as i64))
}

fn builtin_append(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.min_arity(&args, 1)?;
    let mut args = args.into_iter();
    let mut items = match args.next() {
        Some(Value::List(items)) => items,
        Some(Value::Nil) | None => Arc::new(Vec::new()),
        Some(other) => {
            return Err(EvalError::invalid(
                format!(
                    "invalid argument: {other} (type {}) is not a slice",
                    other.type_name()
                ),
                call.pos,
            ))
        }
    };
    Arc::make_mut(&mut items).extend(args);
    Ok(Value::List(items))
}

fn builtin_panic(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    Fault::raise(args[0].to_string())
}

#[cfg(test)]
mod tests;
