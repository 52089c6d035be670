//! Runtime values.

use std::fmt;
use std::sync::Arc;

use crate::ast::{FuncDecl, TypeExpr};
use crate::builtins::NativeFn;

/// A Golite runtime value.
///
/// Lists are copy-on-write (`Arc::make_mut` on mutation), so reading a
/// variable never deep-copies it.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Arc<Vec<Value>>),
    Func(Arc<FuncDecl>),
    Native(NativeFunc),
}

/// A builtin or library function.
#[derive(Clone, Copy)]
pub struct NativeFunc {
    /// Qualified name (`len`, `fmt.Println`).
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunc({})", self.name)
    }
}

impl PartialEq for NativeFunc {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Name of the value's type as shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "slice",
            Value::Func(_) | Value::Native(_) => "func",
        }
    }

    /// Zero value for a declared type.
    pub fn zero(ty: &TypeExpr) -> Self {
        match ty {
            TypeExpr::Named(name) => match name.as_str() {
                "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
                | "uint32" | "uint64" | "byte" | "rune" | "uintptr" => Value::Int(0),
                "string" => Value::Str(String::new()),
                "bool" => Value::Bool(false),
                _ => Value::Nil,
            },
            TypeExpr::Slice(_) => Value::list(Vec::new()),
            TypeExpr::Opaque => Value::Nil,
        }
    }
}

/// Go's `%v` formatting.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("<nil>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Func(decl) => write!(f, "func {}", decl.name),
            Value::Native(native) => write!(f, "func {}", native.name),
        }
    }
}
