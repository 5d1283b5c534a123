use pretty_assertions::assert_eq;
use rill_ir::Span;

use super::*;
use crate::ErrorCode;

fn render(diag: &Diagnostic, source: Option<&str>, mode: ColorMode) -> String {
    let mut out = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut out, mode, false);
        if let Some(text) = source {
            emitter = emitter.with_source(text).with_file_path("main.rl");
        }
        emitter.emit(diag);
        emitter.flush();
    }
    String::from_utf8(out).unwrap_or_default()
}

fn unbound_y() -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001)
        .with_message("unbound name `y`")
        .with_label(Span::new(20, 21), "not found")
}

#[test]
fn test_color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn test_color_mode_parse() {
    assert_eq!(ColorMode::parse("always"), Some(ColorMode::Always));
    assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::parse("auto"), Some(ColorMode::Auto));
    assert_eq!(ColorMode::parse("sometimes"), None);
}

#[test]
fn test_plain_fallback_without_source() {
    let text = render(&unbound_y(), None, ColorMode::Never);
    assert_eq!(
        text,
        "error[E3001]: unbound name `y`\n  --> 20..21: not found\n\n"
    );
}

#[test]
fn test_single_line_snippet() {
    let text = render(
        &unbound_y(),
        Some("(define x 5)\n(print y)"),
        ColorMode::Never,
    );
    let expected = concat!(
        "error[E3001]: unbound name `y`\n",
        " --> main.rl:2:8\n",
        "  |\n",
        "1 | (define x 5)\n",
        "2 | (print y)\n",
        "  |        ^ not found\n",
        "\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn test_neighbouring_lines_are_shown() {
    let source = "(define a 1)\n(define b 2)\n(print missing)\n(print a)\n(print b)\n";
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("unbound name `missing`")
        .with_label(Span::new(33, 40), "not found");
    let text = render(&diag, Some(source), ColorMode::Never);
    let expected = concat!(
        "error[E3001]: unbound name `missing`\n",
        " --> main.rl:3:8\n",
        "  |\n",
        "2 | (define b 2)\n",
        "3 | (print missing)\n",
        "  |        ^^^^^^^ not found\n",
        "4 | (print a)\n",
        "\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn test_context_stops_at_file_bounds() {
    let diag = Diagnostic::error(ErrorCode::E2006)
        .with_message("empty expression")
        .with_label(Span::new(0, 2), "here");
    let text = render(&diag, Some("()\n"), ColorMode::Never);
    assert_eq!(
        text,
        "error[E2006]: empty expression\n --> main.rl:1:1\n  |\n1 | ()\n  | ^^ here\n\n"
    );
}

#[test]
fn test_wide_span_underline() {
    let diag = Diagnostic::error(ErrorCode::E2005)
        .with_message("expected a name")
        .with_label(Span::new(8, 10), "here");
    let text = render(&diag, Some("(define 42 x)"), ColorMode::Never);
    assert!(text.contains("1 | (define 42 x)\n"), "{text}");
    assert!(text.contains("  |         ^^ here\n"), "{text}");
}

#[test]
fn test_secondary_label_uses_dashes() {
    let diag = unbound_y().with_secondary_label(Span::new(1, 7), "in this call");
    let text = render(&diag, Some("(define x 5)\n(print y)"), ColorMode::Never);
    assert!(text.contains(" ::: main.rl:1:2\n"), "{text}");
    assert!(text.contains("  |  ------ in this call\n"), "{text}");
}

#[test]
fn test_multiline_snippet() {
    let source = "(loop (< i 3)\n  (set i 1))";
    let diag = Diagnostic::error(ErrorCode::E3002)
        .with_message("type mismatch")
        .with_label(Span::new(0, 26), "in this loop");
    let text = render(&diag, Some(source), ColorMode::Never);
    assert!(text.contains("1 | / (loop (< i 3)\n"), "{text}");
    assert!(text.contains("2 | |   (set i 1))\n"), "{text}");
    assert!(text.contains("  | |____________^ in this loop\n"), "{text}");
}

#[test]
fn test_long_multiline_span_is_elided() {
    let source = "(a\n1\n2\n3\n4\n5\n6\n7)";
    let diag = Diagnostic::error(ErrorCode::E3002)
        .with_message("long")
        .with_label(Span::from_range(0..source.len()), "");
    let text = render(&diag, Some(source), ColorMode::Never);
    assert!(text.contains("|  ..."), "{text}");
    assert!(text.contains("1 | / (a\n"), "{text}");
    assert!(text.contains("8 | | 7)\n"), "{text}");
    assert!(!text.contains("4 | | 3\n"), "{text}");
}

#[test]
fn test_notes_and_suggestions() {
    let diag = unbound_y()
        .with_note("names are resolved at run time")
        .with_suggestion("define `y` before use");
    let text = render(&diag, None, ColorMode::Never);
    assert!(text.contains("  = note: names are resolved at run time\n"));
    assert!(text.contains("  = help: define `y` before use\n"));
}

#[test]
fn test_colors_only_when_enabled() {
    let colored = render(&unbound_y(), Some("(define x 5)\n(print y)"), ColorMode::Always);
    assert!(colored.contains(colors::ERROR));
    assert!(colored.contains(colors::RESET));

    let plain = render(&unbound_y(), Some("(define x 5)\n(print y)"), ColorMode::Never);
    assert!(!plain.contains('\x1b'));
}

#[test]
fn test_summary() {
    let mut out = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false);
        emitter.emit_summary(1);
        emitter.emit_summary(3);
        emitter.emit_summary(0);
    }
    let text = String::from_utf8(out).unwrap_or_default();
    assert_eq!(
        text,
        "error: aborting due to previous error\n\
         error: aborting due to 3 previous errors\n"
    );
}

#[test]
fn test_emit_all() {
    let mut out = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false);
        emitter.emit_all(&[unbound_y(), unbound_y()]);
    }
    let text = String::from_utf8(out).unwrap_or_default();
    assert_eq!(text.matches("error[E3001]").count(), 2);
}
