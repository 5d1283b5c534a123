//! Diagnostic Emitters
//!
//! Rendering of [`Diagnostic`]s for people: with or without ANSI colors,
//! and as source snippets when the source text is attached.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Sink for rendered diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    fn flush(&mut self);

    /// Closing line after `error_count` errors; nothing when there were none.
    fn emit_summary(&mut self, error_count: usize);
}
