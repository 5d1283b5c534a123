//! Reader errors.

use std::fmt;

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::Span;
use rill_lexer::{LexError, TokenKind};

/// A scan or syntax error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadError {
    pub kind: ReadErrorKind,
    /// Primary location. For unclosed delimiters this is the opening one.
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadErrorKind {
    /// The tokeniser failed.
    Lex(LexError),
    /// A closing delimiter with nothing open.
    UnexpectedClose { found: TokenKind },
    /// Input ended with a delimiter still open.
    Unclosed { open: TokenKind },
    /// A closing delimiter of the wrong kind.
    Mismatched {
        open: TokenKind,
        open_span: Span,
        found: TokenKind,
    },
    /// A map literal with a key but no value.
    OddMapEntries,
    /// A map key that is not a string, symbol or number.
    InvalidMapKey { found: &'static str },
    /// A word that starts like a number but does not parse as one.
    InvalidNumber { text: String },
}

impl ReadError {
    pub fn new(kind: ReadErrorKind, span: Span) -> Self {
        ReadError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            ReadErrorKind::Lex(err) => err.code(),
            ReadErrorKind::UnexpectedClose { .. } => ErrorCode::E1001,
            ReadErrorKind::Unclosed { .. } => ErrorCode::E1002,
            ReadErrorKind::Mismatched { .. } => ErrorCode::E1003,
            ReadErrorKind::OddMapEntries | ReadErrorKind::InvalidMapKey { .. } => {
                ErrorCode::E1004
            }
            ReadErrorKind::InvalidNumber { .. } => ErrorCode::E1005,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match &self.kind {
            ReadErrorKind::Lex(err) => err.to_diagnostic(),
            ReadErrorKind::UnexpectedClose { .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(self.span, "nothing to close here"),
            ReadErrorKind::Unclosed { open } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(self.span, "opened here")
                .with_suggestion(format!(
                    "add a matching {}",
                    open.closing().map_or("delimiter", TokenKind::display_name)
                )),
            ReadErrorKind::Mismatched { open_span, .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(self.span, "closes the wrong delimiter")
                .with_secondary_label(*open_span, "opened here"),
            ReadErrorKind::OddMapEntries => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(self.span, "this map")
                .with_note("map literals alternate keys and values"),
            ReadErrorKind::InvalidMapKey { .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(self.span, "expected a string, symbol or number"),
            ReadErrorKind::InvalidNumber { .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(self.span, "not a number"),
        }
    }
}

impl From<LexError> for ReadError {
    fn from(err: LexError) -> Self {
        let span = err.span;
        ReadError::new(ReadErrorKind::Lex(err), span)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ReadErrorKind::Lex(err) => write!(f, "{err}"),
            ReadErrorKind::UnexpectedClose { found } => {
                write!(f, "unexpected closing {}", found.display_name())
            }
            ReadErrorKind::Unclosed { open } => write!(f, "unclosed {}", open.display_name()),
            ReadErrorKind::Mismatched { open, found, .. } => write!(
                f,
                "mismatched closing delimiter: {} does not close {}",
                found.display_name(),
                open.display_name()
            ),
            ReadErrorKind::OddMapEntries => write!(f, "map literal has a key without a value"),
            ReadErrorKind::InvalidMapKey { found } => write!(f, "invalid map key: {found}"),
            ReadErrorKind::InvalidNumber { text } => write!(f, "invalid number literal `{text}`"),
        }
    }
}

impl std::error::Error for ReadError {}
