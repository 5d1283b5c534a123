//! Runtime error categories.
//!
//! `EvalErrorKind` says *what* went wrong; the machine wraps it with *where*
//! (a call-stack trace with source spans) before handing it to the host.
//! Native functions return it directly.

use std::fmt;

use rill_diagnostic::ErrorCode;
use rill_ir::Name;

/// Typed runtime error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Names
    UnboundName {
        name: Name,
    },
    AssignToConstant {
        name: Name,
    },

    // Types
    InvalidOperand {
        op: &'static str,
        operand: &'static str,
    },
    InvalidOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    NotACondition {
        type_name: &'static str,
    },
    NotIndexable {
        type_name: &'static str,
        key: String,
    },
    InvalidJumpTarget {
        type_name: &'static str,
    },

    // Stack
    StackOverflow {
        capacity: usize,
    },
    StackUnderflow,

    // Access
    MissingIndex {
        index: String,
        len: usize,
    },
    MissingKey {
        key: String,
    },

    // Calls
    ArityMismatch {
        name: Name,
        expected: usize,
        got: usize,
    },
    NotCallable {
        type_name: &'static str,
    },
    CallDepthExceeded {
        depth: usize,
    },
    UnknownLabel {
        label: String,
    },

    /// Failure reported by a native function.
    Native {
        message: String,
    },
}

impl EvalErrorKind {
    /// Error raised by a native function.
    pub fn native(message: impl Into<String>) -> Self {
        EvalErrorKind::Native {
            message: message.into(),
        }
    }

    /// Diagnostic code for this category.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnboundName { .. } => ErrorCode::E3001,
            Self::InvalidOperand { .. }
            | Self::InvalidOperands { .. }
            | Self::NotACondition { .. }
            | Self::NotIndexable { .. }
            | Self::InvalidJumpTarget { .. } => ErrorCode::E3002,
            Self::StackOverflow { .. } => ErrorCode::E3003,
            Self::StackUnderflow => ErrorCode::E3004,
            Self::MissingIndex { .. } | Self::MissingKey { .. } => ErrorCode::E3005,
            Self::ArityMismatch { .. } => ErrorCode::E3006,
            Self::UnknownLabel { .. } => ErrorCode::E3007,
            Self::NotCallable { .. } => ErrorCode::E3008,
            Self::CallDepthExceeded { .. } => ErrorCode::E3009,
            Self::Native { .. } => ErrorCode::E3010,
            Self::AssignToConstant { .. } => ErrorCode::E3011,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundName { name } => write!(f, "unbound name `{name}`"),
            Self::AssignToConstant { name } => write!(f, "cannot assign to constant `{name}`"),
            Self::InvalidOperand { op, operand } => {
                write!(f, "invalid operand for `{op}`: {operand}")
            }
            Self::InvalidOperands { op, left, right } => {
                write!(f, "invalid operands for `{op}`: {left} and {right}")
            }
            Self::NotACondition { type_name } => {
                write!(f, "condition must be a bool, found {type_name}")
            }
            Self::NotIndexable { type_name, key } => {
                write!(f, "cannot read property `{key}` of {type_name}")
            }
            Self::InvalidJumpTarget { type_name } => {
                write!(f, "jump target must be a string, found {type_name}")
            }
            Self::StackOverflow { capacity } => {
                write!(f, "operand stack overflow (capacity {capacity})")
            }
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::MissingIndex { index, len } => {
                write!(f, "index `{index}` out of bounds for array of length {len}")
            }
            Self::MissingKey { key } => write!(f, "key `{key}` not found"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "`{name}` expects {expected} argument{}, got {got}",
                if *expected == 1 { "" } else { "s" }
            ),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::CallDepthExceeded { depth } => {
                write!(f, "call stack overflow (depth {depth})")
            }
            Self::UnknownLabel { label } => write!(f, "no label `{label}` in this function"),
            Self::Native { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for EvalErrorKind {}

#[cfg(test)]
mod tests;
