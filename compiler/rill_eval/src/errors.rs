//! Runtime errors with call-stack traces.

use std::fmt;
use std::sync::Arc;

use rill_diagnostic::{Diagnostic, ErrorCode, Report};
use rill_ir::{Name, SourceFile, Span};
use rill_value::EvalErrorKind;

/// One active call at the time of an error, innermost first.
#[derive(Clone, Debug)]
pub struct TraceFrame {
    pub function: Name,
    /// Instruction being executed: the failing one for the innermost
    /// frame, the pending call for the others.
    pub index: usize,
    pub span: Option<Span>,
    pub source: Arc<SourceFile>,
}

impl fmt::Display for TraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in {} at instruction {}", self.function, self.index)
    }
}

/// A runtime failure: what went wrong and the call stack it happened in.
#[derive(Clone, Debug)]
pub struct RuntimeError {
    pub kind: EvalErrorKind,
    /// Innermost frame first; never empty.
    pub trace: Vec<TraceFrame>,
}

impl RuntimeError {
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Span of the failing instruction.
    pub fn span(&self) -> Option<Span> {
        self.trace.first().and_then(|frame| frame.span)
    }

    /// Source of the function that failed.
    pub fn source(&self) -> Option<&Arc<SourceFile>> {
        self.trace.first().map(|frame| &frame.source)
    }

    /// Primary label at the failing instruction; one secondary label per
    /// caller frame.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        let mut frames = self.trace.iter();
        if let Some(innermost) = frames.next() {
            match innermost.span {
                Some(span) => diagnostic = diagnostic.with_label(span, innermost.to_string()),
                None => diagnostic = diagnostic.with_note(innermost.to_string()),
            }
        }
        for frame in frames {
            match frame.span {
                Some(span) => diagnostic = diagnostic.with_secondary_label(span, frame.to_string()),
                None => diagnostic = diagnostic.with_note(frame.to_string()),
            }
        }
        diagnostic
    }

    /// Diagnostic bundled with the source it points into.
    pub fn report(&self) -> Option<Report> {
        let source = self.source()?;
        Some(Report::new(self.to_diagnostic(), Arc::clone(source)))
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for RuntimeError {}
