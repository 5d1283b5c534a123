#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_ir::{BinaryOp, Name, SourceFile, UnaryOp};
use rill_value::{Instruction, ScopeArena, Value};

use crate::compile;

fn main_code(source: &str) -> Vec<Instruction> {
    compile(&SourceFile::new("test.rl", source), &ScopeArena::new())
        .unwrap()
        .main()
        .instructions()
        .to_vec()
}

fn error_code(source: &str) -> ErrorCode {
    compile(&SourceFile::new("test.rl", source), &ScopeArena::new())
        .unwrap_err()
        .code()
}

fn push(value: impl Into<Value>) -> Instruction {
    Instruction::Push(value.into())
}

fn get(name: &str) -> Instruction {
    Instruction::Get(Name::from(name))
}

fn binary(op: BinaryOp) -> Instruction {
    Instruction::Binary {
        op,
        immediate: None,
    }
}

#[test]
fn variadic_folding() {
    assert_eq!(main_code("(+ 1 2 3)"), vec![push(6.0)]);
    assert_eq!(main_code("(- 10 2 3)"), vec![push(5.0)]);
    assert_eq!(main_code("(* 2 (+ 1 2))"), vec![push(6.0)]);
    assert_eq!(main_code("(/ 1 0)"), vec![push(f64::INFINITY)]);
}

#[test]
fn comparison_and_logic_fold() {
    assert_eq!(main_code("(< 1 2)"), vec![push(true)]);
    assert_eq!(main_code("(== \"a\" \"a\")"), vec![push(true)]);
    assert_eq!(main_code("(&& true false)"), vec![push(false)]);
    assert_eq!(main_code("(! true)"), vec![push(false)]);
}

#[test]
fn concat_renders_operands() {
    assert_eq!(main_code("($ \"n=\" 1)"), vec![push("n=1")]);
    assert_eq!(main_code("($ 2.5)"), vec![push("2.5")]);
    assert_eq!(
        main_code("($ x)"),
        vec![push(""), get("x"), binary(BinaryOp::Concat)]
    );
}

#[test]
fn single_operand_minus_negates() {
    assert_eq!(main_code("(- 5)"), vec![push(-5.0)]);
    assert_eq!(
        main_code("(- x)"),
        vec![get("x"), Instruction::Unary(UnaryOp::Neg)]
    );
}

fn checked(op: BinaryOp, identity: impl Into<Value>) -> Instruction {
    Instruction::Binary {
        op,
        immediate: Some(identity.into()),
    }
}

#[test]
fn single_operand_folds_when_well_typed() {
    assert_eq!(main_code("(+ 4)"), vec![push(4.0)]);
    assert_eq!(main_code("(* 2.5)"), vec![push(2.5)]);
    assert_eq!(main_code("(/ 8)"), vec![push(8.0)]);
    assert_eq!(main_code("(&& true)"), vec![push(true)]);
    assert_eq!(main_code("(|| false)"), vec![push(false)]);
}

#[test]
fn single_operand_keeps_its_type_check() {
    assert_eq!(main_code("(+ x)"), vec![get("x"), checked(BinaryOp::Add, -0.0)]);
    assert_eq!(main_code("(* x)"), vec![get("x"), checked(BinaryOp::Mul, 1.0)]);
    assert_eq!(main_code("(&& x)"), vec![get("x"), checked(BinaryOp::And, true)]);
    // A literal of the wrong type is left to fail at run time.
    assert_eq!(
        main_code("(+ \"a\")"),
        vec![push("a"), checked(BinaryOp::Add, -0.0)]
    );
    assert_eq!(
        main_code("(|| null)"),
        vec![push(Value::Null), checked(BinaryOp::Or, false)]
    );
}

#[test]
fn failing_fold_is_left_for_run_time() {
    assert_eq!(
        main_code("(+ 1 \"a\")"),
        vec![push(1.0), push("a"), binary(BinaryOp::Add)]
    );
    assert_eq!(
        main_code("(! 1)"),
        vec![push(1.0), Instruction::Unary(UnaryOp::Not)]
    );
}

#[test]
fn operator_arity_is_checked() {
    assert_eq!(error_code("(< 1 2 3)"), ErrorCode::E2007);
    assert_eq!(error_code("(== 1)"), ErrorCode::E2007);
    assert_eq!(error_code("(+)"), ErrorCode::E2007);
    assert_eq!(error_code("(!)"), ErrorCode::E2007);
    assert_eq!(error_code("(! a b)"), ErrorCode::E2007);
}

#[test]
fn increment_steps_a_variable() {
    assert_eq!(
        main_code("(++ i)"),
        vec![
            get("i"),
            Instruction::Unary(UnaryOp::Inc),
            Instruction::Set(Name::from("i")),
        ]
    );
    assert_eq!(error_code("(++ 5)"), ErrorCode::E2005);
    assert_eq!(error_code("(-- a b)"), ErrorCode::E2007);
}

#[test]
fn compound_assignment_desugars_to_set() {
    assert_eq!(
        main_code("(+= i 2)"),
        vec![
            get("i"),
            Instruction::Binary {
                op: BinaryOp::Add,
                immediate: Some(Value::Number(2.0)),
            },
            Instruction::Set(Name::from("i")),
        ]
    );
    assert_eq!(
        main_code("($= s x)"),
        vec![
            get("s"),
            get("x"),
            binary(BinaryOp::Concat),
            Instruction::Set(Name::from("s")),
        ]
    );
    assert_eq!(error_code("(*= i)"), ErrorCode::E2007);
}
