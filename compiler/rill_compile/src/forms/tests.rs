#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_ir::{BinaryOp, Name, SourceFile, UnaryOp};
use rill_value::{Instruction, Label, LabelKind, ScopeArena, Script, Value};

use crate::{compile, CompileError};

fn compile_source(source: &str) -> Result<Script, CompileError> {
    compile(&SourceFile::new("test.rl", source), &ScopeArena::new())
}

fn main_code(source: &str) -> Vec<Instruction> {
    compile_source(source)
        .unwrap()
        .main()
        .instructions()
        .to_vec()
}

fn error_code(source: &str) -> ErrorCode {
    compile_source(source).unwrap_err().code()
}

fn name(text: &str) -> Name {
    Name::from(text)
}

fn generated(kind: LabelKind, id: u32) -> Label {
    Label::Generated { kind, id }
}

fn immediate(op: BinaryOp, value: f64) -> Instruction {
    Instruction::Binary {
        op,
        immediate: Some(Value::Number(value)),
    }
}

#[test]
fn loop_lowers_to_test_body_and_back_edge() {
    let script = compile_source("(loop (< i 3) (set i (+ i 1)))").unwrap();
    let main = script.main();
    let start = generated(LabelKind::LoopStart, 0);
    let end = generated(LabelKind::LoopEnd, 1);
    assert_eq!(
        main.instructions(),
        &[
            Instruction::Get(name("i")),
            immediate(BinaryOp::Lt, 3.0),
            Instruction::JumpFalse(end.clone()),
            Instruction::Get(name("i")),
            immediate(BinaryOp::Add, 1.0),
            Instruction::Set(name("i")),
            Instruction::Jump(start.clone()),
        ]
    );
    assert_eq!(main.label(&start), Some(0));
    assert_eq!(main.label(&end), Some(7));
}

#[test]
fn loop_on_literal_true_has_no_test() {
    let end = generated(LabelKind::LoopEnd, 1);
    assert_eq!(
        main_code("(loop true (break))"),
        vec![
            Instruction::Jump(end),
            Instruction::Jump(generated(LabelKind::LoopStart, 0)),
        ]
    );
}

#[test]
fn continue_targets_innermost_loop() {
    let code = main_code("(loop a (loop b (continue)))");
    assert!(code.contains(&Instruction::Jump(generated(LabelKind::LoopStart, 2))));
}

#[test]
fn generated_labels_never_collide() {
    let script = compile_source(
        "(loop a (if b (break))) (loop c (if d 1 2)) (if e (loop f (continue)))",
    )
    .unwrap();
    let main = script.main();
    let mut ids = Vec::new();
    for id in 0..16 {
        for kind in [
            LabelKind::LoopStart,
            LabelKind::LoopEnd,
            LabelKind::SwitchNext,
            LabelKind::SwitchEnd,
        ] {
            if main.label(&generated(kind, id)).is_some() {
                ids.push(id);
            }
        }
    }
    let count = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert!(count >= 10);
}

#[test]
fn break_outside_loop_is_a_compile_error() {
    assert_eq!(error_code("(break)"), ErrorCode::E2003);
    assert_eq!(error_code("(if x (continue))"), ErrorCode::E2003);
}

#[test]
fn loop_labels_do_not_cross_function_boundaries() {
    assert_eq!(
        error_code("(loop true (function f () (break)))"),
        ErrorCode::E2003
    );
}

#[test]
fn if_with_else_becomes_two_clauses() {
    let script = compile_source("(if x 1 2)").unwrap();
    let main = script.main();
    let end = generated(LabelKind::SwitchEnd, 0);
    let next = generated(LabelKind::SwitchNext, 1);
    assert_eq!(
        main.instructions(),
        &[
            Instruction::Get(name("x")),
            Instruction::JumpFalse(next.clone()),
            Instruction::Push(Value::Number(1.0)),
            Instruction::Jump(end.clone()),
            Instruction::Push(Value::Number(2.0)),
        ]
    );
    assert_eq!(main.label(&next), Some(4));
    assert_eq!(main.label(&end), Some(5));
}

#[test]
fn unless_inverts_the_condition() {
    assert_eq!(
        main_code("(unless x 1)"),
        vec![
            Instruction::Get(name("x")),
            Instruction::Unary(UnaryOp::Not),
            Instruction::JumpFalse(generated(LabelKind::SwitchNext, 1)),
            Instruction::Push(Value::Number(1.0)),
        ]
    );
}

#[test]
fn switch_tests_guards_in_order() {
    let code = main_code("(switch ((== x 1) (a)) ((== x 2) (b)) (true (c)))");
    let guards: Vec<_> = code
        .iter()
        .filter(|instruction| matches!(instruction, Instruction::JumpFalse(_)))
        .collect();
    assert_eq!(guards.len(), 2);
    let exits = code
        .iter()
        .filter(|instruction| {
            **instruction == Instruction::Jump(generated(LabelKind::SwitchEnd, 0))
        })
        .count();
    assert_eq!(exits, 2);
}

#[test]
fn malformed_switch_clause() {
    assert_eq!(error_code("(switch x)"), ErrorCode::E2001);
    assert_eq!(error_code("(if x)"), ErrorCode::E2001);
}

#[test]
fn set_stores_targets_right_to_left() {
    assert_eq!(
        main_code("(set a b (f))"),
        vec![
            Instruction::Get(name("f")),
            Instruction::Call(0),
            Instruction::Set(name("b")),
            Instruction::Set(name("a")),
        ]
    );
}

#[test]
fn assignment_needs_a_name() {
    let err = compile_source("(define 5 1)").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(err.span.start, 8);
    assert_eq!(error_code("(set x)"), ErrorCode::E2001);
}

#[test]
fn const_folds_into_later_uses() {
    assert_eq!(
        main_code("(const x (+ 1 2)) (+ x 1)"),
        vec![Instruction::Push(Value::Number(4.0))]
    );
}

#[test]
fn const_redefinition_fails() {
    assert_eq!(error_code("(const x 1) (const x 2)"), ErrorCode::E2002);
}

#[test]
fn const_requires_a_literal() {
    assert_eq!(error_code("(const x (f))"), ErrorCode::E2004);
    assert_eq!(error_code("(const x)"), ErrorCode::E2001);
}

#[test]
fn const_inside_function_does_not_leak() {
    let script = compile_source("(function f () (const x 1) (x)) (x)").unwrap();
    assert_eq!(
        script.main().instructions(),
        &[Instruction::Get(name("x")), Instruction::Call(0)]
    );
    assert_eq!(script.scopes().lookup(script.global(), "x"), None);
}

#[test]
fn nested_constants_may_shadow_outer_ones() {
    assert!(compile_source("(const x 1) (function f () (const x 2))").is_ok());
}

#[test]
fn named_top_level_function_is_bound_at_compile_time() {
    let script = compile_source("(function twice (n) (* n 2)) (twice 4)").unwrap();
    let twice = script.scopes().lookup(script.global(), "twice").cloned();
    let twice = twice.unwrap();
    assert_eq!(twice.type_name(), "function");
    assert_eq!(
        script.main().instructions(),
        &[
            Instruction::Push(Value::Number(4.0)),
            Instruction::CallDirect {
                callee: twice.clone(),
                args: 1,
            },
        ]
    );
    let function = twice.as_function().unwrap();
    assert_eq!(function.params(), &[name("n")]);
    assert_eq!(
        function.instructions(),
        &[
            Instruction::Get(name("n")),
            immediate(BinaryOp::Mul, 2.0),
        ]
    );
}

#[test]
fn recursive_reference_is_resolved_at_run_time() {
    let script = compile_source("(function f (n) (f n))").unwrap();
    let f = script.scopes().lookup(script.global(), "f").cloned().unwrap();
    assert_eq!(
        f.as_function().unwrap().instructions(),
        &[
            Instruction::Get(name("n")),
            Instruction::Get(name("f")),
            Instruction::Call(1),
        ]
    );
}

#[test]
fn parameters_shadow_constants() {
    let script = compile_source("(const n 5) (function f (n) n)").unwrap();
    let f = script.scopes().lookup(script.global(), "f").cloned().unwrap();
    assert_eq!(
        f.as_function().unwrap().instructions(),
        &[Instruction::Get(name("n"))]
    );
}

#[test]
fn nested_named_function_is_defined_at_run_time() {
    let script = compile_source("(function outer () (function inner () 1))").unwrap();
    let outer = script.scopes().lookup(script.global(), "outer").cloned().unwrap();
    let code = outer.as_function().unwrap().instructions().to_vec();
    assert_eq!(code.len(), 2);
    assert!(matches!(&code[0], Instruction::Push(value) if value.is_function()));
    assert_eq!(code[1], Instruction::Define(name("inner")));
}

#[test]
fn named_function_in_value_position_is_also_pushed() {
    let code = main_code("(g (function f () 1))");
    assert!(matches!(&code[0], Instruction::Push(value) if value.is_function()));
    assert_eq!(code[1], Instruction::Define(name("f")));
    assert_eq!(code[2], code[0]);
    assert_eq!(code[4], Instruction::Call(1));
}

#[test]
fn anonymous_function_is_a_push() {
    let code = main_code("(define g (function (a) a))");
    assert_eq!(code.len(), 2);
    assert!(matches!(&code[0], Instruction::Push(value) if value.is_function()));
}

#[test]
fn function_without_parameter_list_is_malformed() {
    assert_eq!(error_code("(function f)"), ErrorCode::E2001);
    assert_eq!(error_code("(function f (1) 1)"), ErrorCode::E2005);
}

#[test]
fn jump_to_literal_label_is_direct() {
    assert_eq!(
        main_code("(jump :done) (:done)"),
        vec![Instruction::Jump(Label::User(name("done")))]
    );
}

#[test]
fn jump_to_computed_target_is_dynamic() {
    assert_eq!(
        main_code("(jump target)"),
        vec![Instruction::Get(name("target")), Instruction::JumpDynamic]
    );
    assert_eq!(error_code("(jump 5)"), ErrorCode::E2001);
}

#[test]
fn return_pushes_results_then_returns() {
    let script = compile_source("(function pair () (return 1 2))").unwrap();
    let pair = script.scopes().lookup(script.global(), "pair").cloned().unwrap();
    assert_eq!(
        pair.as_function().unwrap().instructions(),
        &[
            Instruction::Push(Value::Number(1.0)),
            Instruction::Push(Value::Number(2.0)),
            Instruction::CallReturn,
        ]
    );
}
