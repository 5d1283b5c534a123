//! Rill Value - the runtime data model.
//!
//! This crate provides everything the compiler produces and the machine
//! consumes:
//! - Runtime values (`Value`, `Complex`, `Array`, `Object`, `Heap`)
//! - Native functions (`Builtin`, `NativeContext`)
//! - Scopes (`ScopeArena`, `ScopeId`)
//! - Compiled code (`Function`, `Instruction`, `Label`, `DebugSymbols`, `Script`)
//! - Runtime error categories (`EvalErrorKind`)
//! - Typed operator semantics shared by folding and execution

mod errors;
mod function;
mod native;
mod operators;
mod scope;
mod script;
mod value;

pub use errors::EvalErrorKind;
pub use function::{DebugSymbols, Function, Instruction, Label, LabelKind, PropertyPath};
pub use native::{Builtin, NativeContext, NativeFn};
pub use operators::{evaluate_binary, evaluate_unary};
pub use scope::{AssignError, DefineError, Mutability, ScopeArena, ScopeId};
pub use script::Script;
pub use value::{Array, Complex, Heap, Object, Value};
