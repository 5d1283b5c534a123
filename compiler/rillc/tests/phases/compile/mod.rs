//! What compilation produces before anything runs.

use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_value::{Instruction, Label, Value};
use rustc_hash::FxHashSet;

use crate::common::{compile_err, compile_ok, compile_with_sink};

#[test]
fn literal_arithmetic_folds_to_one_push() {
    for (source, sum) in [("(+ 1 2)", 3.0), ("(+ 0.5 0.25)", 0.75), ("(+ -4 4)", 0.0)] {
        let script = compile_ok(source);
        assert_eq!(
            script.main().instructions(),
            &[Instruction::Push(Value::Number(sum))],
            "{source}"
        );
    }
}

#[test]
fn generated_labels_never_collide() {
    let script = compile_ok(
        "(define i 0)
         (loop (< i 2)
           (loop false 1)
           (if (== i 0) (set i 1) (set i 2)))
         (loop false 2)
         (if true 3)",
    );
    let main = script.main();
    let mut targets = FxHashSet::default();
    let mut jumps = 0;
    for instruction in main.instructions() {
        let label: Option<&Label> = match instruction {
            Instruction::Jump(label)
            | Instruction::JumpTrue(label)
            | Instruction::JumpFalse(label) => Some(label),
            _ => None,
        };
        if let Some(label) = label {
            jumps += 1;
            assert!(main.label(label).is_some(), "{label} does not resolve");
            targets.insert(label.clone());
        }
    }
    assert!(jumps >= 6, "{}", main.disassemble());
    // Three loops each own a start and an end label.
    assert!(targets.len() >= 6, "{}", main.disassemble());
}

#[test]
fn break_outside_a_loop_is_rejected() {
    assert_eq!(compile_err("(break)").code(), ErrorCode::E2003);
    assert_eq!(compile_err("(function f () (continue))").code(), ErrorCode::E2003);
    assert_eq!(
        compile_err("(loop true (function f () (break)))").code(),
        ErrorCode::E2003
    );
}

#[test]
fn constants_cannot_be_redefined() {
    assert_eq!(compile_err("(const x 1)\n(const x 2)").code(), ErrorCode::E2002);
}

#[test]
fn function_constants_stay_inside_the_function() {
    // The inner `x` is gone once `f` is compiled, so this is not a clash.
    let script = compile_ok("(function f () (const x 1) x)\n(const x 2)\nx");
    assert_eq!(
        script.main().instructions().last(),
        Some(&Instruction::Push(Value::Number(2.0)))
    );

    let script = compile_ok("(function f () (const y 1) y)\ny");
    assert_eq!(
        script.main().instructions(),
        &[Instruction::Get("y".into())]
    );
}

#[test]
fn compile_errors_stop_before_execution() {
    let (sink, result) = compile_with_sink("(print \"side effect\")\n(break)");
    assert!(result.is_err());
    assert_eq!(sink.contents(), "");
}
