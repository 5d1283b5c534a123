//! Bounded operand stack.

use rill_value::{EvalErrorKind, Value};

#[derive(Debug)]
pub(crate) struct OperandStack {
    values: Vec<Value>,
    capacity: usize,
}

impl OperandStack {
    pub fn new(capacity: usize) -> Self {
        OperandStack {
            values: Vec::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    pub fn push(&mut self, value: Value) -> Result<(), EvalErrorKind> {
        if self.values.len() >= self.capacity {
            return Err(EvalErrorKind::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, EvalErrorKind> {
        self.values.pop().ok_or(EvalErrorKind::StackUnderflow)
    }

    /// Pop the top `n` values, returned bottom first.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, EvalErrorKind> {
        let start = self
            .values
            .len()
            .checked_sub(n)
            .ok_or(EvalErrorKind::StackUnderflow)?;
        Ok(self.values.split_off(start))
    }

    pub fn peek(&self) -> Option<&Value> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn take(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.values)
    }
}
