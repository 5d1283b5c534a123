//! Programs run against the prelude.

use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_eval::MachineConfig;
use rill_value::{EvalErrorKind, Value};
use rillc::Error;

use crate::common::{run, run_err, run_err_with};

fn runtime_kind(err: &Error) -> &EvalErrorKind {
    match err {
        Error::Runtime(err) => &err.kind,
        Error::Compile(err) => panic!("expected a runtime error, got {err}"),
    }
}

#[test]
fn prints_through_the_prelude() {
    assert_eq!(run("(print (+ 1 2 3))").0, "6\n");
    assert_eq!(run("(define add +)\n(print (add 1 2 3))").0, "6\n");
    assert_eq!(run("(print \"a\" [1 \"b\"])").0, "a [1 \"b\"]\n");
}

#[test]
fn stored_values_come_back_unchanged() {
    for literal in ["true", "false", "5", "-2.5", "\"hi\"", "[1 [2] \"x\"]", "{a 1 b [true]}"] {
        let (_, expected) = run(literal);
        let (_, stack) = run(&format!("(define x {literal}) (x)"));
        assert_eq!(stack, expected, "{literal}");
    }

    let (_, stack) = run("(define x (function (a) a)) x");
    assert_eq!(stack.len(), 1);
    assert!(stack[0].is_function());
    assert_eq!(stack[0].type_name(), "function");
}

#[test]
fn counting_loop_stops_at_three() {
    let (_, stack) = run(
        "(define i 0)
         (define runs 0)
         (loop (< i 3)
           (set runs (+ runs 1))
           (set i (+ i 1)))
         i
         runs",
    );
    assert_eq!(stack, vec![Value::Number(3.0), Value::Number(3.0)]);
}

#[test]
fn recursive_functions_run() {
    let (output, _) = run(
        "(function fact (n)
           (if (<= n 1) (return 1))
           (return (* n (fact (- n 1)))))
         (print (fact 5))",
    );
    assert_eq!(output, "120\n");
}

#[test]
fn operand_stack_limits_are_errors() {
    let config = MachineConfig::default().with_stack_size(4);
    let (_, err) = run_err_with("(loop true 1)", config);
    assert_eq!(err.code(), ErrorCode::E3003);
    assert_eq!(runtime_kind(&err), &EvalErrorKind::StackOverflow { capacity: 4 });

    let (_, err) = run_err("(function nothing () (return)) (define x (nothing))");
    assert_eq!(err.code(), ErrorCode::E3004);
    assert_eq!(runtime_kind(&err), &EvalErrorKind::StackUnderflow);
}

#[test]
fn wrong_argument_count_fails_before_the_body() {
    let (output, err) = run_err("(function f (a b) (print \"body\"))\n(f 1)");
    assert_eq!(err.code(), ErrorCode::E3006);
    assert_eq!(output, "");
}

#[test]
fn output_before_a_failure_is_kept() {
    let (output, err) = run_err("(print \"before\")\n(print missing)\n(print \"after\")");
    assert_eq!(output, "before\n");
    assert_eq!(err.code(), ErrorCode::E3001);
}

#[test]
fn single_operands_are_type_checked() {
    for source in [
        "(+ \"a\")",
        "(* \"a\")",
        "(/ [1])",
        "(&& 5)",
        "(|| null)",
        "(define s \"x\") (+ s)",
        "(define n 1) (&& n)",
    ] {
        let (_, err) = run_err(source);
        assert_eq!(err.code(), ErrorCode::E3002, "{source}");
    }
}

#[test]
fn well_typed_single_operands_pass_through() {
    let (_, stack) = run(
        "(define n 4) (define b true)
         (+ n) (* n) (/ n) (&& b) (|| b) ($ n)",
    );
    assert_eq!(
        stack,
        vec![
            Value::Number(4.0),
            Value::Number(4.0),
            Value::Number(4.0),
            Value::Bool(true),
            Value::Bool(true),
            Value::string("4"),
        ]
    );
    let (_, stack) = run("(+ 2) (&& false) ($ true)");
    assert_eq!(
        stack,
        vec![Value::Number(2.0), Value::Bool(false), Value::string("true")]
    );
}

#[test]
fn define_cannot_replace_a_constant() {
    let (_, err) = run_err("(const x 1)\n(define x 9)");
    assert_eq!(err.code(), ErrorCode::E3011);

    let (_, stack) = run("(define y 1) (define y 2) y");
    assert_eq!(stack, vec![Value::Number(2.0)]);
}
