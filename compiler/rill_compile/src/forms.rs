//! Special forms other than operators.

use rill_ir::{Name, Span};
use rill_parse::{Node, NodeKind};
use rill_value::{Instruction, Label, LabelKind, Value};
use tracing::trace;

use crate::assembler::{literal, op, Assembler, Code, Emit};
use crate::context::{Ctx, Form, LoopLabels};
use crate::keyword::Keyword;
use crate::{CompileError, CompileErrorKind};

/// Name given to functions defined without one.
pub const ANONYMOUS: &str = "<anonymous>";

fn malformed(form: &'static str, expected: &'static str, span: Span) -> CompileError {
    CompileError::new(CompileErrorKind::Malformed { form, expected }, span)
}

fn expect_name(form: &'static str, node: &Node) -> Result<Name, CompileError> {
    node.as_symbol().cloned().ok_or_else(|| {
        CompileError::new(
            CompileErrorKind::ExpectedName {
                form,
                found: node.describe(),
            },
            node.span,
        )
    })
}

impl Assembler {
    pub(crate) fn special_form(
        &mut self,
        keyword: Keyword,
        args: &[Node],
        span: Span,
        ctx: &Ctx,
    ) -> Result<Code, CompileError> {
        match keyword {
            Keyword::Function => self.function(args, span, ctx),
            Keyword::Set | Keyword::Define => self.assign(keyword, args, span, ctx),
            Keyword::Const => self.constant(args, span, ctx),
            Keyword::Loop => self.loop_form(args, span, ctx),
            Keyword::Break | Keyword::Continue => loop_jump(keyword, args, span, ctx),
            Keyword::If | Keyword::Unless => self.conditional(keyword, args, span, ctx),
            Keyword::Switch => self.switch(args, span, ctx),
            Keyword::Jump => self.jump(args, span, ctx),
            Keyword::Return => self.return_form(args, span, ctx),
            Keyword::Binary(operator) => self.binary(operator, args, span, ctx),
            Keyword::Not => self.not(args, span, ctx),
            Keyword::Step(operator) => self.step(operator, args, span, ctx),
            Keyword::Compound(operator) => self.compound(operator, args, span, ctx),
        }
    }

    /// `(function [name] (params…) body…)`
    fn function(&mut self, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let (name, rest) = match args.split_first() {
            Some((first, rest)) if first.as_symbol().is_some() => (first.as_symbol().cloned(), rest),
            _ => (None, args),
        };
        let Some((params_node, body)) = rest.split_first() else {
            return Err(malformed("function", "a parameter list", span));
        };
        let params = match &params_node.kind {
            NodeKind::Expression(items) | NodeKind::List(items) => items
                .iter()
                .map(|item| expect_name("function", item))
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(malformed("function", "a parameter list", params_node.span)),
        };

        let consts = self.scopes_mut().push_child(ctx.consts);
        let body_code = params
            .iter()
            .try_for_each(|param| {
                self.scopes_mut()
                    .define(consts, param.clone(), Value::variable(param.clone()))
                    .map_err(|_| {
                        CompileError::new(
                            CompileErrorKind::ConstRedefinition {
                                name: param.clone(),
                            },
                            params_node.span,
                        )
                    })
            })
            .and_then(|()| self.statements(body, &ctx.function_body(consts)));
        self.scopes_mut().pop(consts);

        let function_name = name.clone().unwrap_or_else(|| Name::from(ANONYMOUS));
        let value = Value::function(self.finish(function_name, params, body_code?)?);

        match name {
            Some(name) if ctx.binds_functions_statically() => {
                trace!(function = %name, "bound at compile time");
                self.scopes_mut()
                    .define_const(ctx.consts, name.clone(), value)
                    .map_err(|_| {
                        CompileError::new(CompileErrorKind::ConstRedefinition { name }, span)
                    })?;
                Ok(Code::new())
            }
            Some(name) => {
                let mut code = vec![
                    op(Instruction::Push(value.clone()), span),
                    op(Instruction::Define(name), span),
                ];
                if !ctx.is_statement() {
                    code.push(op(Instruction::Push(value), span));
                }
                Ok(code)
            }
            None => Ok(vec![op(Instruction::Push(value), span)]),
        }
    }

    /// `(set target… value)` and `(define target… value)`. The value is
    /// evaluated once; targets are stored right to left so that a call
    /// leaving several results binds them in order.
    fn assign(
        &mut self,
        keyword: Keyword,
        args: &[Node],
        span: Span,
        ctx: &Ctx,
    ) -> Result<Code, CompileError> {
        let form = keyword.as_str();
        let Some((value, targets)) = args.split_last().filter(|(_, targets)| !targets.is_empty())
        else {
            return Err(malformed(form, "at least one name and a value", span));
        };
        let names = targets
            .iter()
            .map(|target| expect_name(form, target))
            .collect::<Result<Vec<_>, _>>()?;

        let mut code = self.node(value, &ctx.in_form(Form::Assign))?;
        for (name, target) in names.into_iter().zip(targets).rev() {
            let instruction = if keyword == Keyword::Set {
                Instruction::Set(name)
            } else {
                Instruction::Define(name)
            };
            code.push(op(instruction, target.span));
        }
        Ok(code)
    }

    /// `(const name value)`: binds a literal in the current function's
    /// constant scope and emits nothing.
    fn constant(&mut self, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let [target, value_node] = args else {
            return Err(malformed("const", "a name and a value", span));
        };
        let name = expect_name("const", target)?;
        let code = self.node(value_node, &ctx.in_form(Form::Const))?;
        let Some(value) = literal(&code).cloned() else {
            return Err(CompileError::new(
                CompileErrorKind::NonConstant { name },
                value_node.span,
            ));
        };
        trace!(constant = %name, value = ?value, "bound constant");
        self.scopes_mut()
            .define_const(ctx.consts, name.clone(), value)
            .map_err(|_| CompileError::new(CompileErrorKind::ConstRedefinition { name }, span))?;
        Ok(Code::new())
    }

    /// `(loop cond body…)`
    ///
    /// ```text
    /// start: <cond> jump_false end <body> jump start end:
    /// ```
    fn loop_form(&mut self, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let Some((condition, body)) = args.split_first() else {
            return Err(malformed("loop", "a condition", span));
        };
        let labels = LoopLabels {
            start: self.fresh_label(LabelKind::LoopStart),
            end: self.fresh_label(LabelKind::LoopEnd),
        };
        let body_ctx = ctx.in_loop(labels.clone());

        let mut code = vec![Emit::Marker(labels.start.clone(), span)];
        let condition_code = self.node(condition, &body_ctx)?;
        // `(loop true ...)` runs until `break`.
        if literal(&condition_code) != Some(&Value::Bool(true)) {
            code.extend(condition_code);
            code.push(op(Instruction::JumpFalse(labels.end.clone()), condition.span));
        }
        code.extend(self.statements(body, &body_ctx)?);
        code.push(op(Instruction::Jump(labels.start), span));
        code.push(Emit::Marker(labels.end, span));
        Ok(code)
    }

    /// `(if cond then [else])` and `(unless cond then [else])`, rewritten
    /// as a switch.
    fn conditional(
        &mut self,
        keyword: Keyword,
        args: &[Node],
        span: Span,
        ctx: &Ctx,
    ) -> Result<Code, CompileError> {
        let (condition, then, otherwise) = match args {
            [condition, then] => (condition, then, None),
            [condition, then, otherwise] => (condition, then, Some(otherwise)),
            _ => {
                return Err(malformed(
                    keyword.as_str(),
                    "a condition, a branch and an optional else branch",
                    span,
                ))
            }
        };

        let guard = if keyword == Keyword::Unless {
            let not = Node::atom(Value::variable("!"), condition.span);
            Node::new(
                NodeKind::Expression(vec![not, condition.clone()]),
                condition.span,
            )
        } else {
            condition.clone()
        };
        let mut clauses = vec![Node::new(
            NodeKind::Expression(vec![guard, then.clone()]),
            condition.span.merge(then.span),
        )];
        if let Some(otherwise) = otherwise {
            let default = Node::atom(Value::Bool(true), otherwise.span);
            clauses.push(Node::new(
                NodeKind::Expression(vec![default, otherwise.clone()]),
                otherwise.span,
            ));
        }
        self.switch(&clauses, span, ctx)
    }

    /// `(switch (guard body…)…)`
    ///
    /// Each clause tests its guard and skips to the next clause when it is
    /// false. A literal `true` guard is a default clause and is not tested.
    fn switch(&mut self, clauses: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let clause_ctx = ctx.in_form(Form::Switch);
        let end = self.fresh_label(LabelKind::SwitchEnd);
        let mut code = Code::new();

        for (i, clause) in clauses.iter().enumerate() {
            let is_last = i + 1 == clauses.len();
            let Some((guard, body)) = clause.as_expression().and_then(<[Node]>::split_first) else {
                return Err(malformed(
                    "switch",
                    "clauses of the form `(guard body…)`",
                    clause.span,
                ));
            };

            let guard_code = self.node(guard, &clause_ctx)?;
            let next = if literal(&guard_code) == Some(&Value::Bool(true)) {
                None
            } else {
                let next = self.fresh_label(LabelKind::SwitchNext);
                code.extend(guard_code);
                code.push(op(Instruction::JumpFalse(next.clone()), guard.span));
                Some(next)
            };

            code.extend(self.statements(body, &clause_ctx)?);
            if !is_last {
                code.push(op(Instruction::Jump(end.clone()), clause.span));
            }
            if let Some(next) = next {
                code.push(Emit::Marker(next, clause.span));
            }
        }

        code.push(Emit::Marker(end, span));
        Ok(code)
    }

    /// `(jump target)`: a literal target names a user label; anything
    /// else is evaluated and resolved when executed.
    fn jump(&mut self, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let [target] = args else {
            return Err(malformed("jump", "one target", span));
        };
        let mut code = self.node(target, &ctx.in_form(Form::Jump))?;
        match literal(&code) {
            Some(value) => {
                let Some(label) = value.as_str() else {
                    return Err(malformed("jump", "a label name such as `:done`", target.span));
                };
                Ok(vec![op(Instruction::Jump(Label::User(Name::from(label))), span)])
            }
            None => {
                code.push(op(Instruction::JumpDynamic, span));
                Ok(code)
            }
        }
    }

    /// `(return value…)`
    fn return_form(&mut self, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let value_ctx = ctx.in_form(Form::Return);
        let mut code = Code::new();
        for arg in args {
            code.extend(self.node(arg, &value_ctx)?);
        }
        code.push(op(Instruction::CallReturn, span));
        Ok(code)
    }
}

/// `(break)` and `(continue)`
fn loop_jump(keyword: Keyword, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
    if !args.is_empty() {
        return Err(malformed(keyword.as_str(), "no operands", span));
    }
    let Some(labels) = &ctx.loop_labels else {
        return Err(CompileError::new(
            CompileErrorKind::OutsideLoop {
                keyword: keyword.as_str(),
            },
            span,
        ));
    };
    let target = if keyword == Keyword::Break {
        labels.end.clone()
    } else {
        labels.start.clone()
    };
    Ok(vec![op(Instruction::Jump(target), span)])
}

#[cfg(test)]
mod tests;
