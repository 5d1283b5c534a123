//! Error locations and rendered reports.

use pretty_assertions::assert_eq;
use rill_diagnostic::{CodeLocation, ColorMode};

use crate::common::{compile_with_sink, run_err};

fn compile_report(text: &str) -> String {
    let (_, result) = compile_with_sink(text);
    let source = rillc::SourceFile::new("test.rl", text);
    match result {
        Ok(_) => panic!("expected `{text}` to fail to compile"),
        Err(err) => err.report(&source).render(ColorMode::Never),
    }
}

#[test]
fn undefined_name_points_at_the_symbol() {
    let text = "(define a 1)\n(print missing)";
    let (_, err) = run_err(text);
    let source = rillc::SourceFile::new("test.rl", text);
    let report = err.report(&source);
    assert_eq!(
        report.location(),
        Some(CodeLocation {
            start_line: 2,
            start_column: 8,
            end_line: 2,
            end_column: 14,
        })
    );
}

#[test]
fn constant_redefinition_renders_a_snippet() {
    let rendered = compile_report("(const x 1)\n(const x 2)");
    assert!(rendered.starts_with("error[E2002]: "), "{rendered}");
    assert!(rendered.contains(" --> test.rl:2:1"), "{rendered}");
    assert!(rendered.contains("2 | (const x 2)"), "{rendered}");
    assert!(rendered.contains("  | ^^^^^^^^^^^ already defined in this scope"), "{rendered}");
    assert!(rendered.contains("= help: "), "{rendered}");
}

#[test]
fn multi_line_spans_get_a_bracket() {
    let rendered = compile_report("(break\n)");
    assert!(rendered.contains("error[E2003]"), "{rendered}");
    assert!(rendered.contains("1 | / (break"), "{rendered}");
    assert!(rendered.contains("2 | | )"), "{rendered}");
    assert!(rendered.contains("  | |_^ not inside a loop"), "{rendered}");
}

#[test]
fn runtime_reports_list_the_call_stack() {
    let text = "(function inner () (print nope))\n(function outer () (inner))\n(outer)";
    let (_, err) = run_err(text);
    let source = rillc::SourceFile::new("test.rl", text);
    let rendered = err.report(&source).render(ColorMode::Never);
    assert!(rendered.starts_with("error[E3001]: "), "{rendered}");
    assert!(rendered.contains(" --> test.rl:1:27"), "{rendered}");
    assert!(rendered.contains("in outer at instruction"), "{rendered}");
    assert!(rendered.contains("in <main> at instruction"), "{rendered}");
}
