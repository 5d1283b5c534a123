//! Failure of either pipeline phase.

use std::fmt;
use std::sync::Arc;

use rill_compile::CompileError;
use rill_diagnostic::{Diagnostic, ErrorCode, Report};
use rill_eval::RuntimeError;
use rill_ir::SourceFile;

#[derive(Clone, Debug)]
pub enum Error {
    /// The source did not compile; nothing was executed.
    Compile(CompileError),
    /// Execution failed.
    Runtime(RuntimeError),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Compile(err) => err.code(),
            Error::Runtime(err) => err.code(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Compile(err) => err.to_diagnostic(),
            Error::Runtime(err) => err.to_diagnostic(),
        }
    }

    /// Bind the diagnostic to its source. Runtime errors point into the
    /// source of the failing function; `source` is the fallback.
    pub fn report(&self, source: &Arc<SourceFile>) -> Report {
        let source = match self {
            Error::Runtime(err) => err.source().unwrap_or(source),
            Error::Compile(_) => source,
        };
        Report::new(self.to_diagnostic(), Arc::clone(source))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(err) => write!(f, "{err}"),
            Error::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compile(err) => Some(err),
            Error::Runtime(err) => Some(err),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compile(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Runtime(err)
    }
}
