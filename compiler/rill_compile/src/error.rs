//! Compile errors.

use std::fmt;

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::{Name, Span};
use rill_parse::ReadError;
use rill_value::Label;

/// An error raised while turning source into a [`rill_value::Script`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CompileErrorKind {
    /// Scanning or reading failed before compilation started.
    Read(ReadError),
    /// A special form with the wrong shape.
    Malformed {
        form: &'static str,
        expected: &'static str,
    },
    /// `const` over a name already bound in the same scope.
    ConstRedefinition { name: Name },
    /// `break` or `continue` with no enclosing loop.
    OutsideLoop { keyword: &'static str },
    /// `const` whose value does not reduce to a literal.
    NonConstant { name: Name },
    /// A symbol was required.
    ExpectedName { form: &'static str, found: &'static str },
    /// `()`.
    EmptyExpression,
    /// An operator applied to the wrong number of operands.
    OperatorArity {
        op: &'static str,
        expected: &'static str,
        got: usize,
    },
    /// The same user label placed twice in one function.
    DuplicateLabel { label: Label },
    /// A symbol survived to the final pass unresolved.
    UnresolvedSymbol { name: Name },
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        CompileError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            CompileErrorKind::Read(err) => err.code(),
            CompileErrorKind::Malformed { .. } => ErrorCode::E2001,
            CompileErrorKind::ConstRedefinition { .. } => ErrorCode::E2002,
            CompileErrorKind::OutsideLoop { .. } => ErrorCode::E2003,
            CompileErrorKind::NonConstant { .. } => ErrorCode::E2004,
            CompileErrorKind::ExpectedName { .. } => ErrorCode::E2005,
            CompileErrorKind::EmptyExpression => ErrorCode::E2006,
            CompileErrorKind::OperatorArity { .. } => ErrorCode::E2007,
            CompileErrorKind::DuplicateLabel { .. } => ErrorCode::E2008,
            CompileErrorKind::UnresolvedSymbol { .. } => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let base = Diagnostic::error(self.code()).with_message(self.to_string());
        match &self.kind {
            CompileErrorKind::Read(err) => err.to_diagnostic(),
            CompileErrorKind::Malformed { expected, .. } => base
                .with_label(self.span, "malformed here")
                .with_note(format!("expected {expected}")),
            CompileErrorKind::ConstRedefinition { .. } => base
                .with_label(self.span, "already defined in this scope")
                .with_suggestion("pick a different name, or use `define` for a mutable binding"),
            CompileErrorKind::OutsideLoop { .. } => {
                base.with_label(self.span, "not inside a loop")
            }
            CompileErrorKind::NonConstant { .. } => base
                .with_label(self.span, "not known at compile time")
                .with_note("constants must reduce to a literal"),
            CompileErrorKind::ExpectedName { found, .. } => {
                base.with_label(self.span, format!("found a {found}"))
            }
            CompileErrorKind::EmptyExpression => base.with_label(self.span, "empty expression"),
            CompileErrorKind::OperatorArity { expected, .. } => {
                base.with_label(self.span, format!("expected {expected}"))
            }
            CompileErrorKind::DuplicateLabel { .. } => {
                base.with_label(self.span, "placed again here")
            }
            CompileErrorKind::UnresolvedSymbol { .. } => base
                .with_label(self.span, "unresolved")
                .with_note("this is a compiler bug"),
        }
    }
}

impl From<ReadError> for CompileError {
    fn from(err: ReadError) -> Self {
        let span = err.span;
        CompileError::new(CompileErrorKind::Read(err), span)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CompileErrorKind::Read(err) => write!(f, "{err}"),
            CompileErrorKind::Malformed { form, .. } => write!(f, "malformed `{form}`"),
            CompileErrorKind::ConstRedefinition { name } => {
                write!(f, "constant `{name}` is already defined")
            }
            CompileErrorKind::OutsideLoop { keyword } => {
                write!(f, "`{keyword}` outside of a loop")
            }
            CompileErrorKind::NonConstant { name } => {
                write!(f, "value of constant `{name}` is not a literal")
            }
            CompileErrorKind::ExpectedName { form, .. } => {
                write!(f, "`{form}` expects a name")
            }
            CompileErrorKind::EmptyExpression => write!(f, "empty expression"),
            CompileErrorKind::OperatorArity { op, expected, got } => {
                write!(f, "`{op}` expects {expected}, got {got}")
            }
            CompileErrorKind::DuplicateLabel { label } => {
                write!(f, "label `{label}` is defined twice")
            }
            CompileErrorKind::UnresolvedSymbol { name } => {
                write!(f, "internal error: symbol `{name}` reached code generation")
            }
        }
    }
}

impl std::error::Error for CompileError {}
