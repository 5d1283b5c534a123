//! The dispatch loop.
//!
//! A [`Machine`] executes one [`Script`] on its own copy of the script's
//! scopes. The currently executing frame is held apart from the stack of
//! suspended callers, so the common path never indexes into the call
//! stack.
//!
//! Every call to a user function pushes a fresh scope whose parent is the
//! global scope; the scope is popped when the call returns. Scopes are
//! therefore created and released in strict stack order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rill_ir::Name;
use rill_value::{
    evaluate_binary, evaluate_unary, Array, AssignError, Complex, DefineError, EvalErrorKind,
    Function, Heap, Instruction, Label, NativeContext, ScopeArena, ScopeId, Script, Value,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::errors::{RuntimeError, TraceFrame};
use crate::stack::OperandStack;
use crate::MachineConfig;

/// Outcome of [`Machine::step`] and [`Machine::execute`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecState {
    /// More instructions remain.
    Running,
    /// The script ran to completion (or returned from top level).
    Finished,
    /// A stop was requested; execution can be resumed.
    Stopped,
}

/// Cloneable handle that stops a machine from elsewhere.
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the machine to stop before its next instruction.
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone, Debug)]
struct Frame {
    function: Heap<Function>,
    /// Next instruction to execute.
    index: usize,
    scope: ScopeId,
}

pub struct Machine {
    config: MachineConfig,
    scopes: ScopeArena,
    global: ScopeId,
    stack: OperandStack,
    current: Frame,
    /// Suspended callers, outermost first.
    callers: Vec<Frame>,
    running: Arc<AtomicBool>,
    finished: bool,
}

impl Machine {
    pub fn new(script: &Script, config: MachineConfig) -> Self {
        let global = script.global();
        let mut machine = Machine {
            config,
            scopes: script.scopes().clone(),
            global,
            stack: OperandStack::new(config.max_stack_size),
            current: Frame {
                function: script.main().clone(),
                index: 0,
                scope: global,
            },
            callers: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
            finished: false,
        };
        machine.settle();
        machine
    }

    /// Run until the script finishes or a stop is requested.
    ///
    /// A previous stop request is cleared first, so calling `execute`
    /// again resumes a stopped machine.
    pub fn execute(&mut self) -> Result<ExecState, RuntimeError> {
        self.running.store(true, Ordering::Release);
        loop {
            if !self.running.load(Ordering::Acquire) {
                warn!(
                    function = %self.current.function.name(),
                    index = self.current.index,
                    "execution stopped on request"
                );
                return Ok(ExecState::Stopped);
            }
            match self.step()? {
                ExecState::Running => {}
                state => return Ok(state),
            }
        }
    }

    /// Execute exactly one instruction.
    ///
    /// Falling off the end of a called function counts as a step: it
    /// performs the implicit return.
    pub fn step(&mut self) -> Result<ExecState, RuntimeError> {
        if self.finished {
            return Ok(ExecState::Finished);
        }

        let function = self.current.function.clone();
        let index = self.current.index;
        let Some(instruction) = function.instruction(index) else {
            self.return_from_call();
            self.settle();
            return Ok(self.state());
        };

        self.current.index += 1;
        trace!(function = %function.name(), index, %instruction, "dispatch");
        if let Err(kind) = self.dispatch(instruction) {
            self.finished = true;
            return Err(self.runtime_error(kind, index));
        }
        self.settle();
        Ok(self.state())
    }

    /// Request a stop before the next instruction.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.running))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pop a value off the operand stack.
    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop().ok()
    }

    pub fn peek(&self) -> Option<&Value> {
        self.stack.peek()
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Operand stack contents, bottom first.
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    /// Drain the operand stack, bottom first.
    pub fn take_stack(&mut self) -> Vec<Value> {
        self.stack.take()
    }

    /// Look up a name in the global scope chain.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.scopes.lookup(self.global, name)
    }

    /// Bind a host value in the global scope. Script constants cannot be
    /// replaced.
    pub fn define_global(&mut self, name: impl Into<Name>, value: Value) -> Result<(), DefineError> {
        self.scopes.define(self.global, name.into(), value)
    }

    fn state(&self) -> ExecState {
        if self.finished {
            ExecState::Finished
        } else {
            ExecState::Running
        }
    }

    /// Mark the machine finished once the top-level function has no
    /// instructions left.
    fn settle(&mut self) {
        if self.callers.is_empty() && self.current.index >= self.current.function.len() {
            self.finished = true;
        }
    }

    fn dispatch(&mut self, instruction: &Instruction) -> Result<(), EvalErrorKind> {
        match instruction {
            Instruction::Push(value) => self.stack.push(value.clone()),
            Instruction::Pop => self.stack.pop().map(drop),
            Instruction::Get(name) => {
                let value = self
                    .scopes
                    .lookup(self.current.scope, name)
                    .cloned()
                    .ok_or_else(|| EvalErrorKind::UnboundName { name: name.clone() })?;
                self.stack.push(value)
            }
            Instruction::Set(name) => {
                let value = self.stack.pop()?;
                self.scopes
                    .set(self.current.scope, name, value)
                    .map_err(|err| match err {
                        AssignError::Constant => {
                            EvalErrorKind::AssignToConstant { name: name.clone() }
                        }
                        AssignError::Undefined => EvalErrorKind::UnboundName { name: name.clone() },
                    })
            }
            Instruction::Define(name) => {
                let value = self.stack.pop()?;
                self.scopes
                    .define(self.current.scope, name.clone(), value)
                    .map_err(|_| EvalErrorKind::AssignToConstant { name: name.clone() })
            }
            Instruction::GetProperty(path) => {
                let mut value = self.stack.pop()?;
                for key in path {
                    value = value.property(key)?;
                }
                self.stack.push(value)
            }
            Instruction::ToArgument => {
                let value = self.stack.pop()?;
                let Some(array) = value.as_array() else {
                    return Err(EvalErrorKind::InvalidOperand {
                        op: "...",
                        operand: value.type_name(),
                    });
                };
                self.stack.push(Value::from(array.clone().into_arguments()))
            }
            Instruction::MakeArray(n) => {
                let items = self.stack.pop_n(*n)?;
                self.stack.push(Value::array(items))
            }
            Instruction::MakeObject(n) => {
                let flat = self.stack.pop_n(n.saturating_mul(2))?;
                let mut entries = FxHashMap::default();
                for pair in flat.chunks_exact(2) {
                    let [key, value] = pair else { continue };
                    let Some(key) = key.as_str() else {
                        return Err(EvalErrorKind::InvalidOperand {
                            op: "object key",
                            operand: key.type_name(),
                        });
                    };
                    entries.insert(Name::from(key), value.clone());
                }
                self.stack.push(Value::object(entries))
            }
            Instruction::Call(slots) => {
                let callee = self.stack.pop()?;
                self.call(callee, *slots)
            }
            Instruction::CallDirect { callee, args } => self.call(callee.clone(), *args),
            Instruction::CallReturn => {
                self.return_from_call();
                Ok(())
            }
            Instruction::Jump(label) => self.jump(label),
            Instruction::JumpTrue(label) => {
                if self.pop_condition()? {
                    self.jump(label)?;
                }
                Ok(())
            }
            Instruction::JumpFalse(label) => {
                if !self.pop_condition()? {
                    self.jump(label)?;
                }
                Ok(())
            }
            Instruction::JumpDynamic => {
                let target = self.stack.pop()?;
                let Some(name) = target.as_str() else {
                    return Err(EvalErrorKind::InvalidJumpTarget {
                        type_name: target.type_name(),
                    });
                };
                self.jump(&Label::User(Name::from(name)))
            }
            Instruction::Unary(op) => {
                let operand = self.stack.pop()?;
                self.stack.push(evaluate_unary(*op, &operand)?)
            }
            Instruction::Binary { op, immediate } => {
                let popped;
                let right = match immediate {
                    Some(value) => value,
                    None => {
                        popped = self.stack.pop()?;
                        &popped
                    }
                };
                let left = self.stack.pop()?;
                self.stack.push(evaluate_binary(*op, &left, right)?)
            }
        }
    }

    fn pop_condition(&mut self) -> Result<bool, EvalErrorKind> {
        let value = self.stack.pop()?;
        value.as_bool().ok_or(EvalErrorKind::NotACondition {
            type_name: value.type_name(),
        })
    }

    fn jump(&mut self, label: &Label) -> Result<(), EvalErrorKind> {
        let index = self
            .current
            .function
            .label(label)
            .ok_or_else(|| EvalErrorKind::UnknownLabel {
                label: label.to_string(),
            })?;
        self.current.index = index;
        Ok(())
    }

    /// Invoke `callee` with the top `slots` stack values. A plain value
    /// called with no arguments evaluates to itself.
    fn call(&mut self, callee: Value, slots: usize) -> Result<(), EvalErrorKind> {
        match callee {
            Value::Complex(Complex::Function(function)) => {
                let args = self.arguments(slots)?;
                self.enter(function, &args)
            }
            Value::Complex(Complex::Builtin(builtin)) => {
                let args = self.arguments(slots)?;
                trace!(builtin = %builtin.name(), args = args.len(), "native call");
                builtin.call(self, args)
            }
            value if slots == 0 => self.stack.push(value),
            value => Err(EvalErrorKind::NotCallable {
                type_name: value.type_name(),
            }),
        }
    }

    /// Pop `slots` values into an argument list, expanding spread arrays
    /// in place.
    fn arguments(&mut self, slots: usize) -> Result<Array, EvalErrorKind> {
        let values = self.stack.pop_n(slots)?;
        let mut items = Vec::with_capacity(values.len());
        for value in values {
            match value.as_array() {
                Some(spread) if spread.is_arguments() => items.extend(spread.iter().cloned()),
                _ => items.push(value),
            }
        }
        Ok(Array::new(items))
    }

    fn enter(&mut self, function: Heap<Function>, args: &Array) -> Result<(), EvalErrorKind> {
        if args.len() != function.arity() {
            return Err(EvalErrorKind::ArityMismatch {
                name: function.name().clone(),
                expected: function.arity(),
                got: args.len(),
            });
        }
        if self.callers.len() >= self.config.max_call_depth {
            return Err(EvalErrorKind::CallDepthExceeded {
                depth: self.config.max_call_depth,
            });
        }

        let scope = self.scopes.push_child(self.global);
        for (param, value) in function.params().iter().zip(args.iter()) {
            self.scopes
                .define(scope, param.clone(), value.clone())
                .map_err(|_| EvalErrorKind::AssignToConstant { name: param.clone() })?;
        }
        debug!(function = %function.name(), depth = self.callers.len() + 1, "call");
        let caller = std::mem::replace(
            &mut self.current,
            Frame {
                function,
                index: 0,
                scope,
            },
        );
        self.callers.push(caller);
        Ok(())
    }

    /// Resume the caller; values the callee left on the stack are its
    /// results. Returning from the top level ends execution.
    fn return_from_call(&mut self) {
        let Some(caller) = self.callers.pop() else {
            self.finished = true;
            return;
        };
        let callee = std::mem::replace(&mut self.current, caller);
        self.scopes.pop(callee.scope);
        debug!(function = %callee.function.name(), depth = self.callers.len(), "return");
    }

    fn runtime_error(&self, kind: EvalErrorKind, index: usize) -> RuntimeError {
        let innermost = std::iter::once((&self.current, index));
        let callers = self
            .callers
            .iter()
            .rev()
            .map(|frame| (frame, frame.index.saturating_sub(1)));
        let trace = innermost
            .chain(callers)
            .map(|(frame, index)| TraceFrame {
                function: frame.function.name().clone(),
                index,
                span: frame.function.span(index),
                source: Arc::clone(frame.function.source()),
            })
            .collect();
        debug!(error = %kind, "runtime error");
        RuntimeError { kind, trace }
    }
}

impl NativeContext for Machine {
    fn push(&mut self, value: Value) -> Result<(), EvalErrorKind> {
        self.stack.push(value)
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
