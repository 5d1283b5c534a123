//! Native functions supplied by the host.
//!
//! A native function receives the machine (through [`NativeContext`]) and
//! its arguments as an [`Array`], and pushes zero or more results.

use std::fmt;
use std::sync::Arc;

use rill_ir::Name;

use crate::{Array, EvalErrorKind, Value};

/// Signature shared by every native callback.
pub type NativeFn =
    dyn Fn(&mut dyn NativeContext, Array) -> Result<(), EvalErrorKind> + Send + Sync;

/// What a native function may do to the machine that called it.
pub trait NativeContext {
    /// Push a result onto the operand stack.
    fn push(&mut self, value: Value) -> Result<(), EvalErrorKind>;

    /// Ask the machine to stop before its next instruction.
    fn stop(&mut self);
}

/// A named native callback.
#[derive(Clone)]
pub struct Builtin {
    name: Name,
    func: Arc<NativeFn>,
}

impl Builtin {
    pub fn new<F>(name: impl Into<Name>, func: F) -> Self
    where
        F: Fn(&mut dyn NativeContext, Array) -> Result<(), EvalErrorKind> + Send + Sync + 'static,
    {
        Builtin {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Invoke with already-collected arguments.
    pub fn call(&self, ctx: &mut dyn NativeContext, args: Array) -> Result<(), EvalErrorKind> {
        (self.func)(ctx, args)
    }

    /// Allocation address, used to tell apart builtins sharing a name.
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}
