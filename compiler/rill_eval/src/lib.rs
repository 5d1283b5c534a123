//! Rill Eval - the virtual machine.
//!
//! Executes compiled [`Script`](rill_value::Script)s one instruction at a
//! time on a bounded operand stack and a bounded call stack.
//!
//! # Architecture
//!
//! - `Machine`: dispatch loop, call frames and scope management
//! - `MachineConfig`: stack and call-depth limits
//! - `RuntimeError`: an `EvalErrorKind` plus the call-stack trace at the
//!   failing instruction, convertible to a diagnostic
//!
//! Operator semantics are shared with the compiler's constant folding and
//! live in `rill_value`.

mod config;
mod errors;
mod machine;
mod stack;

pub use config::MachineConfig;
pub use errors::{RuntimeError, TraceFrame};
pub use machine::{ExecState, Machine, StopHandle};
