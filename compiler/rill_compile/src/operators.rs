//! Operator forms: folding, immediates and desugaring.

use rill_ir::{BinaryOp, Name, Span, UnaryOp};
use rill_parse::{Node, NodeKind};
use rill_value::{evaluate_binary, evaluate_unary, Instruction, Value};

use crate::assembler::{literal, op, Assembler, Code};
use crate::context::{Ctx, Form};
use crate::keyword::Keyword;
use crate::{CompileError, CompileErrorKind};

fn arity(op: &'static str, expected: &'static str, got: usize, span: Span) -> CompileError {
    CompileError::new(CompileErrorKind::OperatorArity { op, expected, got }, span)
}

impl Assembler {
    fn operands(&mut self, args: &[Node], ctx: &Ctx) -> Result<Vec<Code>, CompileError> {
        let operand_ctx = ctx.in_form(Form::Operator);
        args.iter()
            .map(|arg| self.node(arg, &operand_ctx))
            .collect()
    }

    /// `(op a b …)` folds left to right. Numeric literal operands after the
    /// first become immediates of the binary instruction.
    pub(crate) fn binary(
        &mut self,
        operator: BinaryOp,
        args: &[Node],
        span: Span,
        ctx: &Ctx,
    ) -> Result<Code, CompileError> {
        let symbol = operator.as_symbol();
        if operator.is_comparison() && args.len() != 2 {
            return Err(arity(symbol, "2 operands", args.len(), span));
        }
        if args.is_empty() {
            return Err(arity(symbol, "at least 1 operand", 0, span));
        }

        let mut parts = self.operands(args, ctx)?;
        if parts.len() == 1 {
            let only = parts.remove(0);
            return Ok(single_operand(operator, only, span));
        }

        if let Some(folded) = fold(operator, &parts) {
            return Ok(vec![op(Instruction::Push(folded), span)]);
        }

        let mut parts = parts.into_iter();
        let mut code = parts.next().unwrap_or_default();
        for part in parts {
            let immediate = literal(&part)
                .filter(|value| value.as_number().is_some())
                .cloned();
            if immediate.is_none() {
                code.extend(part);
            }
            code.push(op(
                Instruction::Binary {
                    op: operator,
                    immediate,
                },
                span,
            ));
        }
        Ok(code)
    }

    /// `(! x)`
    pub(crate) fn not(&mut self, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        if args.len() != 1 {
            return Err(arity("!", "1 operand", args.len(), span));
        }
        let code = self.operands(args, ctx)?.remove(0);
        Ok(unary(UnaryOp::Not, code, span))
    }

    /// `(++ x)` and `(-- x)` step a variable in place.
    pub(crate) fn step(
        &mut self,
        operator: UnaryOp,
        args: &[Node],
        span: Span,
        ctx: &Ctx,
    ) -> Result<Code, CompileError> {
        let [target] = args else {
            return Err(arity(operator.as_symbol(), "1 operand", args.len(), span));
        };
        let Some(name) = target.as_symbol() else {
            return Err(CompileError::new(
                CompileErrorKind::ExpectedName {
                    form: operator.as_symbol(),
                    found: target.describe(),
                },
                target.span,
            ));
        };
        let mut code = self.symbol(name, target.span, ctx);
        code.push(op(Instruction::Unary(operator), span));
        code.push(op(Instruction::Set(name.clone()), target.span));
        Ok(code)
    }

    /// `(+= x v …)` is `(set x (+ x v …))`.
    pub(crate) fn compound(
        &mut self,
        operator: BinaryOp,
        args: &[Node],
        span: Span,
        ctx: &Ctx,
    ) -> Result<Code, CompileError> {
        let Some((target, operands)) = args.split_first().filter(|(_, rest)| !rest.is_empty())
        else {
            return Err(arity(
                Keyword::Compound(operator).as_str(),
                "a name and at least 1 operand",
                args.len(),
                span,
            ));
        };

        let head = |text: &str| Node::atom(Value::variable(Name::from(text)), span);
        let mut inner = Vec::with_capacity(operands.len() + 2);
        inner.push(head(operator.as_symbol()));
        inner.push(target.clone());
        inner.extend(operands.iter().cloned());

        let desugared = Node::new(
            NodeKind::Expression(vec![
                head("set"),
                target.clone(),
                Node::new(NodeKind::Expression(inner), span),
            ]),
            span,
        );
        self.node(&desugared, ctx)
    }
}

/// Fold every operand when all are literals and each step succeeds.
/// A step that fails is left to fail at run time.
fn fold(operator: BinaryOp, parts: &[Code]) -> Option<Value> {
    let values = parts
        .iter()
        .map(|part| literal(part))
        .collect::<Option<Vec<_>>>()?;
    let (first, rest) = values.split_first()?;
    rest.iter().try_fold((*first).clone(), |acc, value| {
        evaluate_binary(operator, &acc, value).ok()
    })
}

/// Fold a unary operator over a literal, or append the instruction.
fn unary(operator: UnaryOp, mut code: Code, span: Span) -> Code {
    if let Some(folded) = literal(&code).and_then(|value| evaluate_unary(operator, value).ok()) {
        return vec![op(Instruction::Push(folded), span)];
    }
    code.push(op(Instruction::Unary(operator), span));
    code
}

/// One operand: `-` negates, `$` renders to a string, the rest combine
/// the operand with their identity so the operand type is still checked.
fn single_operand(operator: BinaryOp, mut code: Code, span: Span) -> Code {
    match operator {
        BinaryOp::Sub => unary(UnaryOp::Neg, code, span),
        BinaryOp::Concat => {
            if let Some(value) = literal(&code) {
                return vec![op(Instruction::Push(Value::string(value.to_string())), span)];
            }
            let mut rendered = vec![op(Instruction::Push(Value::string("")), span)];
            rendered.extend(code);
            rendered.push(op(
                Instruction::Binary {
                    op: BinaryOp::Concat,
                    immediate: None,
                },
                span,
            ));
            rendered
        }
        _ => {
            let Some(identity) = identity(operator) else {
                return code;
            };
            let folded =
                literal(&code).and_then(|value| evaluate_binary(operator, value, &identity).ok());
            if let Some(folded) = folded {
                return vec![op(Instruction::Push(folded), span)];
            }
            code.push(op(
                Instruction::Binary {
                    op: operator,
                    immediate: Some(identity),
                },
                span,
            ));
            code
        }
    }
}

/// Right operand that leaves a well-typed left operand unchanged.
fn identity(operator: BinaryOp) -> Option<Value> {
    match operator {
        // `-0 + -0` stays `-0`, unlike `-0 + 0`.
        BinaryOp::Add => Some(Value::Number(-0.0)),
        BinaryOp::Mul | BinaryOp::Div => Some(Value::Number(1.0)),
        BinaryOp::And => Some(Value::Bool(true)),
        BinaryOp::Or => Some(Value::Bool(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
