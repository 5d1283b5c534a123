//! Scan errors.

use std::fmt;

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::Span;

/// A scan error and where it happened.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What went wrong while scanning.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// End of input inside a quoted string.
    UnterminatedString,
    /// End of input right after a backslash.
    UnterminatedEscape,
    /// Backslash followed by a character outside `" ' \ t r n`.
    InvalidEscape { escape_char: char },
    /// Line break inside a quoted string.
    NewlineInString,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::UnterminatedEscape => ErrorCode::E0002,
            LexErrorKind::InvalidEscape { .. } => ErrorCode::E0003,
            LexErrorKind::NewlineInString => ErrorCode::E0004,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self.kind {
            LexErrorKind::UnterminatedString => diag
                .with_label(self.span, "string starts here")
                .with_suggestion("add a closing quote"),
            LexErrorKind::UnterminatedEscape => {
                diag.with_label(self.span, "input ends after this backslash")
            }
            LexErrorKind::InvalidEscape { .. } => diag
                .with_label(self.span, "unknown escape")
                .with_note("valid escapes are \\\" \\' \\\\ \\t \\r \\n"),
            LexErrorKind::NewlineInString => diag
                .with_label(self.span, "string is not closed on this line")
                .with_suggestion("use \\n for a line break inside a string"),
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedEscape => write!(f, "unterminated escape sequence"),
            Self::InvalidEscape { escape_char } => {
                write!(f, "invalid escape sequence `\\{escape_char}`")
            }
            Self::NewlineInString => write!(f, "string literal crosses a line break"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests;
