//! The rill toolchain.
//!
//! Ties the pipeline together for hosts and for the `rill` binary:
//! [`load`] compiles source text against a set of natives, [`run`] executes
//! the resulting script. Both report failures through one [`Error`] type,
//! and compilation always finishes before anything runs.

pub mod commands;
mod error;
pub mod prelude;

use std::sync::{Arc, Once};

use rill_eval::{Machine, MachineConfig};
use rill_value::{ScopeArena, Script, Value};
use tracing::debug;

pub use error::Error;
pub use rill_diagnostic::ColorMode;
pub use rill_eval::{ExecState, RuntimeError};
pub use rill_ir::SourceFile;

/// Compile an already loaded source file.
pub fn compile(source: &Arc<SourceFile>, builtins: &ScopeArena) -> Result<Script, Error> {
    Ok(rill_compile::compile(source, builtins)?)
}

/// Compile source text under a display name.
pub fn load(
    name: impl Into<String>,
    text: impl Into<String>,
    builtins: &ScopeArena,
) -> Result<(Arc<SourceFile>, Script), Error> {
    let source = SourceFile::new(name, text);
    let script = compile(&source, builtins)?;
    Ok((source, script))
}

/// Run a script to completion and return what it left on the operand
/// stack, bottom first.
pub fn run(script: &Script, config: MachineConfig) -> Result<Vec<Value>, Error> {
    let mut machine = Machine::new(script, config);
    let state = machine.execute()?;
    debug!(?state, results = machine.stack_len(), "script ended");
    Ok(machine.take_stack())
}

static TRACING_INIT: Once = Once::new();

/// Install a log subscriber when `RILL_LOG` (or `RUST_LOG`) is set.
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_env("RILL_LOG").or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .try_init();
        }
    });
}
