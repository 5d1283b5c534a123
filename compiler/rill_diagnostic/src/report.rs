//! A diagnostic bound to the source file it points into.

use std::fmt;
use std::sync::Arc;

use rill_ir::SourceFile;

use crate::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use crate::span_utils::{CodeLocation, LineOffsetTable};
use crate::Diagnostic;

/// A diagnostic together with its source, ready for rendering.
#[derive(Clone, Debug)]
#[must_use = "reports should be rendered or returned, not silently dropped"]
pub struct Report {
    pub diagnostic: Diagnostic,
    pub source: Arc<SourceFile>,
}

impl Report {
    pub fn new(diagnostic: Diagnostic, source: Arc<SourceFile>) -> Self {
        Report { diagnostic, source }
    }

    /// Line and column of the primary span, if there is one.
    pub fn location(&self) -> Option<CodeLocation> {
        let span = self.diagnostic.primary_span()?;
        let text = self.source.text();
        Some(LineOffsetTable::build(text).location(text, span))
    }

    /// Render as a source snippet.
    pub fn render(&self, mode: ColorMode) -> String {
        let mut out = Vec::new();
        {
            let mut emitter = TerminalEmitter::with_color_mode(&mut out, mode, false)
                .with_source(self.source.text())
                .with_file_path(self.source.name());
            emitter.emit(&self.diagnostic);
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(ColorMode::Never).trim_end())
    }
}

impl std::error::Error for Report {}
