use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_codes() {
    let span = Span::new(0, 1);
    assert_eq!(
        LexError::new(LexErrorKind::UnterminatedString, span).code(),
        ErrorCode::E0001
    );
    assert_eq!(
        LexError::new(LexErrorKind::UnterminatedEscape, span).code(),
        ErrorCode::E0002
    );
    assert_eq!(
        LexError::new(LexErrorKind::InvalidEscape { escape_char: 'q' }, span).code(),
        ErrorCode::E0003
    );
    assert_eq!(
        LexError::new(LexErrorKind::NewlineInString, span).code(),
        ErrorCode::E0004
    );
}

#[test]
fn test_diagnostic_carries_span() {
    let err = LexError::new(LexErrorKind::InvalidEscape { escape_char: 'q' }, Span::new(3, 5));
    let diag = err.to_diagnostic();
    assert_eq!(diag.message, "invalid escape sequence `\\q`");
    assert_eq!(diag.primary_span(), Some(Span::new(3, 5)));
    assert_eq!(diag.phase(), rill_diagnostic::Phase::Scan);
}
