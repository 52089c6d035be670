//! Unary and binary operators, and index resolution.
//!
//! Integer arithmetic wraps like Go's fixed-width ints. Division by zero and
//! out-of-range indices are runtime panics ([`Fault`]), not errors.

use std::cmp::Ordering;

use crate::ast::{BinaryOp, Pos, UnaryOp};
use crate::error::{EvalError, EvalErrorKind, EvalResult, Fault};
use crate::value::Value;

pub fn unary(op: UnaryOp, operand: Value, pos: Pos) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (op, other) => {
            let symbol = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Not => "!",
            };
            Err(not_defined(symbol, &other, pos))
        }
    }
}

/// Apply a non-short-circuit binary operator.
pub fn binary(op: BinaryOp, left: Value, right: Value, pos: Pos) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b, pos),
        (Value::Str(a), Value::Str(b)) => match op {
            BinaryOp::Add => Ok(Value::Str(format!("{a}{b}"))),
            _ => compare(op, a.cmp(b)).ok_or_else(|| not_defined(op.symbol(), &left, pos)),
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinaryOp::Eq => Ok(Value::Bool(a == b)),
            BinaryOp::NotEq => Ok(Value::Bool(a != b)),
            _ => Err(not_defined(op.symbol(), &left, pos)),
        },
        (Value::Nil, Value::Nil) => match op {
            BinaryOp::Eq | BinaryOp::NotEq => Err(EvalError::invalid(
                format!("nil {} nil (operator {} not defined on nil)", op.symbol(), op.symbol()),
                pos,
            )),
            _ => Err(not_defined(op.symbol(), &left, pos)),
        },
        (Value::List(items), Value::Nil) | (Value::Nil, Value::List(items)) => match op {
            BinaryOp::Eq => Ok(Value::Bool(items.is_empty())),
            BinaryOp::NotEq => Ok(Value::Bool(!items.is_empty())),
            _ => Err(not_defined(op.symbol(), &left, pos)),
        },
        (Value::List(_), Value::List(_)) => Err(EvalError::invalid(
            format!(
                "{left} {} {right} (slice can only be compared to nil)",
                op.symbol()
            ),
            pos,
        )),
        _ if left.type_name() == right.type_name() => Err(not_defined(op.symbol(), &left, pos)),
        _ => Err(EvalError::new(
            EvalErrorKind::MismatchedTypes {
                op: op.symbol(),
                left: left.type_name(),
                right: right.type_name(),
            },
            pos,
        )),
    }
}

fn int_op(op: BinaryOp, a: i64, b: i64, pos: Pos) -> EvalResult<Value> {
    let value = match op {
        BinaryOp::Add => Value::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => {
            Fault::raise("runtime error: integer divide by zero")
        }
        BinaryOp::Div => Value::Int(a.wrapping_div(b)),
        BinaryOp::Rem => Value::Int(a.wrapping_rem(b)),
        BinaryOp::And | BinaryOp::Or => return Err(not_defined(op.symbol(), &Value::Int(a), pos)),
        _ => match compare(op, a.cmp(&b)) {
            Some(value) => value,
            None => return Err(not_defined(op.symbol(), &Value::Int(a), pos)),
        },
    };
    Ok(value)
}

fn compare(op: BinaryOp, ordering: Ordering) -> Option<Value> {
    let result = match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => return None,
    };
    Some(Value::Bool(result))
}

/// Truthiness check for `&&`, `||` operands.
pub fn logical_operand(op: BinaryOp, value: &Value, pos: Pos) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(not_defined(op.symbol(), other, pos)),
    }
}

/// Resolve `index` against a sequence of length `len`, faulting when out of range.
pub fn index_of(index: &Value, len: usize, pos: Pos) -> EvalResult<usize> {
    let Value::Int(i) = index else {
        return Err(EvalError::invalid(
            format!(
                "invalid argument: index {index} (type {}) must be integer",
                index.type_name()
            ),
            pos,
        ));
    };
    match usize::try_from(*i) {
        Ok(at) if at < len => Ok(at),
        _ => Fault::raise(format!(
            "runtime error: index out of range [{i}] with length {len}"
        )),
    }
}

/// `base[index]` for lists and strings (a string index yields the byte).
pub fn index(base: &Value, index: &Value, pos: Pos) -> EvalResult<Value> {
    match base {
        Value::List(items) => Ok(items[index_of(index, items.len(), pos)?].clone()),
        Value::Str(s) => {
            let bytes = s.as_bytes();
            Ok(Value::Int(i64::from(bytes[index_of(index, bytes.len(), pos)?])))
        }
        Value::Nil => index_of(index, 0, pos).map(|_| Value::Nil),
        other => Err(EvalError::new(
            EvalErrorKind::NotIndexable {
                type_name: other.type_name(),
            },
            pos,
        )),
    }
}

fn not_defined(symbol: &str, operand: &Value, pos: Pos) -> EvalError {
    EvalError::invalid(
        format!(
            "operator {symbol} not defined on {operand} (type {})",
            operand.type_name()
        ),
        pos,
    )
}
