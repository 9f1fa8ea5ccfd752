//! Element reader and binary evaluator (distilled spec §4.1, §4.2).

use std::borrow::Cow;

use crate::{
    environment::Environment,
    exception::{RunResult, SemanticError},
    graph::{Element, Expr, Operator},
    value::Value,
};

/// Converts a leaf parse element into a value, borrowing from the environment
/// where possible so that read-only uses (printing, comparing) never allocate.
///
/// Identifiers borrow the environment's stored value; literals own their
/// (freshly parsed or cloned) value outright. Only the assignment-store path
/// and string concatenation need to force an owned copy, via `Cow::into_owned`.
pub fn read_element<'env>(element: &Element, env: &'env impl Environment, line: u32) -> RunResult<Cow<'env, Value>> {
    match element {
        // The frontend only ever emits well-formed numeric literal text; a parse
        // failure here would be a frontend bug, not a reachable semantic error.
        Element::IntLiteral(text) => Ok(Cow::Owned(Value::Int(
            text.parse().unwrap_or_else(|_| panic!("frontend emitted malformed int literal: {text:?}")),
        ))),
        Element::RealLiteral(text) => Ok(Cow::Owned(Value::Real(
            text.parse().unwrap_or_else(|_| panic!("frontend emitted malformed real literal: {text:?}")),
        ))),
        Element::StringLiteral(text) => Ok(Cow::Owned(Value::Str(text.clone()))),
        Element::True => Ok(Cow::Owned(Value::Bool(true))),
        Element::False => Ok(Cow::Owned(Value::Bool(false))),
        Element::Identifier(name) => env
            .read_by_name(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| SemanticError::NameUndefined { name: name.clone(), line }),
    }
}

/// Evaluates an expression node: a single element, or a binary operator over
/// two elements. Always returns an owned value, since the binary arithmetic
/// and comparison kernels each produce a fresh scalar or string.
pub fn eval(expr: &Expr, env: &impl Environment, line: u32) -> RunResult<Value> {
    match expr {
        Expr::Unary(element) => Ok(read_element(element, env, line)?.into_owned()),
        Expr::Binary(lhs, op, rhs) => {
            let lhs = read_element(lhs, env, line)?;
            let rhs = read_element(rhs, env, line)?;
            if op.is_comparison() {
                compare(&lhs, *op, &rhs, line)
            } else {
                arithmetic(&lhs, *op, &rhs, line)
            }
        }
    }
}

fn compare(lhs: &Value, op: Operator, rhs: &Value, line: u32) -> RunResult<Value> {
    use std::cmp::Ordering;

    let ordering = match (numeric_payload(lhs), numeric_payload(rhs)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).expect("NaN is unreachable for int/bool/real literals"),
        _ => match (lhs, rhs) {
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => return Err(SemanticError::TypeError { line }),
        },
    };

    let result = match op {
        Operator::Eq => ordering == Ordering::Equal,
        Operator::NotEq => ordering != Ordering::Equal,
        Operator::Lt => ordering == Ordering::Less,
        Operator::LtE => ordering != Ordering::Greater,
        Operator::Gt => ordering == Ordering::Greater,
        Operator::GtE => ordering != Ordering::Less,
        Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod | Operator::Pow => {
            unreachable!("arithmetic operators never reach the comparison kernel")
        }
    };
    Ok(Value::Bool(result))
}

/// Widens `Int`/`Bool` to `f64` for mixed comparisons; returns `None` for `Str`.
fn numeric_payload(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Real(r) => Some(*r),
        Value::Str(_) => None,
    }
}

fn arithmetic(lhs: &Value, op: Operator, rhs: &Value, line: u32) -> RunResult<Value> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => {
            if op == Operator::Add {
                let mut out = String::with_capacity(a.len() + b.len());
                out.push_str(a);
                out.push_str(b);
                Ok(Value::Str(out))
            } else {
                Err(SemanticError::TypeError { line })
            }
        }
        // Booleans are numeric for comparison (see `numeric_payload`) but not for
        // arithmetic: the dispatch table has no Bool row, so this falls through
        // to the same `invalid operand types` error a string operand gets.
        (Value::Str(_), _) | (_, Value::Str(_)) | (Value::Bool(_), _) | (_, Value::Bool(_)) => {
            Err(SemanticError::TypeError { line })
        }
        (int_like_lhs, int_like_rhs) => {
            let a = as_int(int_like_lhs);
            let b = as_int(int_like_rhs);
            match (a, b) {
                (Some(a), Some(b)) => int_arithmetic(a, op, b, line),
                _ => real_arithmetic(as_real(int_like_lhs), op, as_real(int_like_rhs), line),
            }
        }
    }
}

/// Returns the integer payload of an `Int` value; `None` for `Real` (and for
/// `Bool`/`Str`, though `arithmetic` routes those to `TypeError` before this runs).
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Real(_) | Value::Bool(_) | Value::Str(_) => None,
    }
}

fn as_real(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Real(r) => *r,
        Value::Bool(_) | Value::Str(_) => unreachable!("bool/string are filtered out before arithmetic widening"),
    }
}

fn int_arithmetic(a: i64, op: Operator, b: i64, line: u32) -> RunResult<Value> {
    match op {
        Operator::Add => Ok(Value::Int(a.wrapping_add(b))),
        Operator::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        Operator::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        Operator::Div => {
            if b == 0 {
                Err(SemanticError::DivByZero { line })
            } else {
                Ok(Value::Int(a.wrapping_div(b)))
            }
        }
        Operator::Mod => {
            if b == 0 {
                Err(SemanticError::ModByZero { line })
            } else {
                Ok(Value::Int(a.wrapping_rem(b)))
            }
        }
        Operator::Pow => Ok(Value::Int(int_pow(a, b))),
        Operator::Eq | Operator::NotEq | Operator::Lt | Operator::LtE | Operator::Gt | Operator::GtE => {
            unreachable!("comparison operators never reach the arithmetic kernel")
        }
    }
}

/// Repeated-multiplication integer exponentiation. `0^0 == 1`. A negative
/// exponent yields `0`: the inductive product loop never runs, which the
/// distilled spec flags as a likely-unintended but specified behavior (§9).
fn int_pow(base: i64, exponent: i64) -> i64 {
    if exponent < 0 {
        return 0;
    }
    let mut result: i64 = 1;
    for _ in 0..exponent {
        result = result.wrapping_mul(base);
    }
    result
}

fn real_arithmetic(a: f64, op: Operator, b: f64, line: u32) -> RunResult<Value> {
    match op {
        Operator::Add => Ok(Value::Real(a + b)),
        Operator::Sub => Ok(Value::Real(a - b)),
        Operator::Mul => Ok(Value::Real(a * b)),
        Operator::Div => {
            if b == 0.0 {
                Err(SemanticError::DivByZero { line })
            } else {
                Ok(Value::Real(a / b))
            }
        }
        Operator::Mod => {
            if b == 0.0 {
                Err(SemanticError::ModByZero { line })
            } else {
                Ok(Value::Real(a % b))
            }
        }
        Operator::Pow => Ok(Value::Real(a.powf(b))),
        Operator::Eq | Operator::NotEq | Operator::Lt | Operator::LtE | Operator::Gt | Operator::GtE => {
            unreachable!("comparison operators never reach the arithmetic kernel")
        }
    }
}
