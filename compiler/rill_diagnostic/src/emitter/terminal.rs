//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.
//! When the source text is attached, every label is rendered as a
//! line-numbered snippet with a caret underline; spans crossing lines get
//! a bracket in the left margin that closes with a caret at the span end.

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Spans longer than this many lines are shown with their middle elided.
const MAX_SNIPPET_LINES: u32 = 6;

/// Lines of surrounding source shown before and after a span.
const CONTEXT_LINES: u32 = 1;

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse a `--color=` value.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Attached source text for snippet rendering.
struct SnippetSource<'s> {
    text: &'s str,
    lines: LineOffsetTable,
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<'s, W: Write> {
    writer: W,
    colors: bool,
    source: Option<SnippetSource<'s>>,
    file_path: Option<String>,
}

impl<'s, W: Write> TerminalEmitter<'s, W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
            file_path: None,
        }
    }

    /// Attach source text so labels render as snippets instead of byte offsets.
    #[must_use]
    pub fn with_source(mut self, text: &'s str) -> Self {
        self.source = Some(SnippetSource {
            text,
            lines: LineOffsetTable::build(text),
        });
        self
    }

    /// Set the path shown in `--> path:line:col` headers.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Write text with optional ANSI color codes.
    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    /// `error[E0000]: message`
    fn write_header(&mut self, diagnostic: &Diagnostic) {
        self.write_colored("error", colors::ERROR);
        self.write_colored(&format!("[{}]", diagnostic.code), colors::BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);
    }

    fn label_color(label: &Label) -> &'static str {
        if label.is_primary {
            colors::ERROR
        } else {
            colors::SECONDARY
        }
    }

    /// Fallback rendering when no source is attached.
    fn emit_label_plain(&mut self, label: &Label) {
        let marker = if label.is_primary { "-->" } else { "   " };
        let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
        self.write_colored(&label.message, Self::label_color(label));
        let _ = writeln!(self.writer);
    }

    fn emit_label_snippet(&mut self, label: &Label) {
        let Some(source) = self.source.as_ref() else {
            self.emit_label_plain(label);
            return;
        };
        let text = source.text;
        let loc = source.lines.location(text, label.span);
        let last_line = u32::try_from(source.lines.line_count()).unwrap_or(u32::MAX);
        let before: Vec<(u32, String)> = (loc.start_line.saturating_sub(CONTEXT_LINES).max(1)
            ..loc.start_line)
            .map(|n| (n, source.lines.line_text(text, n).to_string()))
            .collect();
        let after: Vec<(u32, String)> = (loc.end_line + 1
            ..=loc.end_line.saturating_add(CONTEXT_LINES).min(last_line))
            .map(|n| (n, source.lines.line_text(text, n).to_string()))
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();
        let widest = after.last().map_or(loc.end_line, |(n, _)| *n);
        let gutter = widest.to_string().len();
        // Context lines line up with the text after a bracket column.
        let indent = if loc.is_multiline() { "  " } else { "" };
        let path = self.file_path.as_deref().unwrap_or("<source>");
        let marker = if label.is_primary { "-->" } else { ":::" };
        let underline = if label.is_primary { '^' } else { '-' };
        let color = Self::label_color(label);

        // Collect the lines first so `self` is free for writing.
        let lines: Vec<(u32, String)> = (loc.start_line..=loc.end_line)
            .map(|n| (n, source.lines.line_text(text, n).to_string()))
            .collect();

        let _ = writeln!(
            self.writer,
            "{:gutter$}{marker} {path}:{}:{}",
            "", loc.start_line, loc.start_column
        );
        let _ = writeln!(self.writer, "{:gutter$} |", "");
        for (number, line) in &before {
            let _ = writeln!(self.writer, "{number:>gutter$} | {indent}{line}");
        }

        if loc.is_multiline() {
            let span_lines = lines.len();
            for (i, (number, line)) in lines.iter().enumerate() {
                let elide = span_lines > MAX_SNIPPET_LINES as usize
                    && i >= 2
                    && i + 2 < span_lines;
                if elide {
                    if i == 2 {
                        let _ = writeln!(self.writer, "{:gutter$} | |  ...", "");
                    }
                    continue;
                }
                let bracket = if i == 0 { '/' } else { '|' };
                let _ = write!(self.writer, "{number:>gutter$} | ");
                self.write_colored(&bracket.to_string(), color);
                let _ = writeln!(self.writer, " {line}");
            }
            let bar = "_".repeat(loc.end_column as usize);
            let _ = write!(self.writer, "{:gutter$} | ", "");
            self.write_colored(&format!("|{bar}{underline}"), color);
        } else {
            let line = lines.first().map_or("", |(_, l)| l.as_str());
            let _ = writeln!(self.writer, "{:>gutter$} | {line}", loc.start_line);
            let pad = " ".repeat(loc.start_column.saturating_sub(1) as usize);
            let width = (loc.end_column.saturating_sub(loc.start_column) as usize + 1).max(1);
            let carets = underline.to_string().repeat(width);
            let _ = write!(self.writer, "{:gutter$} | {pad}", "");
            self.write_colored(&carets, color);
        }

        if label.message.is_empty() {
            let _ = writeln!(self.writer);
        } else {
            let _ = write!(self.writer, " ");
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
        }
        for (number, line) in &after {
            let _ = writeln!(self.writer, "{number:>gutter$} | {indent}{line}");
        }
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_header(diagnostic);

        for label in &diagnostic.labels {
            if self.source.is_some() {
                self.emit_label_snippet(label);
            } else {
                self.emit_label_plain(label);
            }
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.write_colored("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        let what = match error_count {
            0 => return,
            1 => "previous error".to_string(),
            n => format!("{n} previous errors"),
        };
        self.write_colored("error", colors::ERROR);
        let _ = writeln!(self.writer, ": aborting due to {what}");
    }
}

impl TerminalEmitter<'_, io::Stderr> {
    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

#[cfg(test)]
mod tests;
