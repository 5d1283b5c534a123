//! Compiler for rill.
//!
//! Lowers the reader's syntax trees into [`Function`](rill_value::Function)s:
//! special forms become jumps and stores, operators over literals are
//! folded, and names bound at compile time (constants, host natives) are
//! embedded directly into the instructions that use them.
//!
//! Compilation either produces a complete [`Script`] or fails with a
//! [`CompileError`]; nothing runs before compilation has finished.

mod assembler;
mod context;
mod error;
mod forms;
mod keyword;
mod operators;

use std::sync::Arc;

use rill_ir::SourceFile;
use rill_value::{ScopeArena, Script};

pub use assembler::{Assembler, MAIN};
pub use error::{CompileError, CompileErrorKind};
pub use forms::ANONYMOUS;

/// Read and compile `source` against the natives bound in the root scope
/// of `builtins`.
pub fn compile(source: &Arc<SourceFile>, builtins: &ScopeArena) -> Result<Script, CompileError> {
    let nodes = rill_parse::read(source.text())?;
    Assembler::new(Arc::clone(source), builtins).assemble_script(&nodes)
}
