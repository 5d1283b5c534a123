//! Typed operator semantics.
//!
//! Shared by the compiler's constant folding and the machine's dispatch,
//! so a folded expression always produces what the machine would have.

use std::cmp::Ordering;

use rill_ir::{BinaryOp, UnaryOp};

use crate::{EvalErrorKind, Value};

/// Apply a binary operator.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalErrorKind> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            let (Value::Number(a), Value::Number(b)) = (left, right) else {
                return Err(invalid_operands(op, left, right));
            };
            Ok(Value::Number(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                _ => a / b,
            }))
        }
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordering = match (left, right) {
                (Value::Number(a), Value::Number(b)) => match a.partial_cmp(b) {
                    Some(ordering) => ordering,
                    // NaN is unordered with everything.
                    None => return Ok(Value::Bool(false)),
                },
                _ => match (left.as_str(), right.as_str()) {
                    (Some(a), Some(b)) => a.cmp(b),
                    _ => return Err(invalid_operands(op, left, right)),
                },
            };
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::LtEq => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And | BinaryOp::Or => {
            let (Value::Bool(a), Value::Bool(b)) = (left, right) else {
                return Err(invalid_operands(op, left, right));
            };
            Ok(Value::Bool(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            }))
        }
        BinaryOp::Concat => Ok(Value::string(format!("{left}{right}"))),
    }
}

/// Apply a unary operator.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalErrorKind> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Inc, Value::Number(n)) => Ok(Value::Number(n + 1.0)),
        (UnaryOp::Dec, Value::Number(n)) => Ok(Value::Number(n - 1.0)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(EvalErrorKind::InvalidOperand {
            op: op.as_symbol(),
            operand: operand.type_name(),
        }),
    }
}

fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> EvalErrorKind {
    EvalErrorKind::InvalidOperands {
        op: op.as_symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}
