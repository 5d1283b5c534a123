//! Compiled functions.
//!
//! A `Function` is the compiler's output and the machine's input: a flat
//! instruction array, its parameter names, a label table mapping jump
//! targets to instruction indices, and one source span per instruction.
//! Functions never change after compilation and are shared by reference.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use rill_ir::{BinaryOp, Name, SourceFile, Span, UnaryOp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::Value;

/// Property path of a dotted name (`a.b.c` stores `b`, `c`).
pub type PropertyPath = SmallVec<[Name; 2]>;

/// A single machine instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// Push a literal.
    Push(Value),
    /// Discard the top of the stack.
    Pop,
    /// Resolve a name through the scope chain and push its value.
    Get(Name),
    /// Pop a value into the nearest existing binding of a name.
    Set(Name),
    /// Pop a value into the current scope.
    Define(Name),
    /// Pop a container and walk the path into it.
    GetProperty(PropertyPath),
    /// Mark the array on top of the stack as a spread argument list.
    ToArgument,
    /// Pop `n` values into an array.
    MakeArray(usize),
    /// Pop `n` key/value pairs into an object.
    MakeObject(usize),
    /// Pop a callee, then call it with the `n` stack slots below it.
    Call(usize),
    /// Call a callee resolved at compile time.
    CallDirect { callee: Value, args: usize },
    /// Return to the caller.
    CallReturn,
    Jump(Label),
    /// Pop a bool, jump if it is `true`.
    JumpTrue(Label),
    /// Pop a bool, jump if it is `false`.
    JumpFalse(Label),
    /// Pop a string naming a user label and jump to it.
    JumpDynamic,
    Unary(UnaryOp),
    /// Pop the right operand (unless `immediate` holds it) and the left.
    Binary {
        op: BinaryOp,
        immediate: Option<Value>,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(value) => write!(f, "push {value:?}"),
            Instruction::Pop => f.write_str("pop"),
            Instruction::Get(name) => write!(f, "get {name}"),
            Instruction::Set(name) => write!(f, "set {name}"),
            Instruction::Define(name) => write!(f, "define {name}"),
            Instruction::GetProperty(path) => {
                f.write_str("get_property ")?;
                for (i, key) in path.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Ok(())
            }
            Instruction::ToArgument => f.write_str("to_argument"),
            Instruction::MakeArray(n) => write!(f, "make_array {n}"),
            Instruction::MakeObject(n) => write!(f, "make_object {n}"),
            Instruction::Call(n) => write!(f, "call {n}"),
            Instruction::CallDirect { callee, args } => write!(f, "call_direct {callee:?} {args}"),
            Instruction::CallReturn => f.write_str("call_return"),
            Instruction::Jump(label) => write!(f, "jump {label}"),
            Instruction::JumpTrue(label) => write!(f, "jump_true {label}"),
            Instruction::JumpFalse(label) => write!(f, "jump_false {label}"),
            Instruction::JumpDynamic => f.write_str("jump_dynamic"),
            Instruction::Unary(op) => write!(f, "unary {}", op.as_symbol()),
            Instruction::Binary {
                op,
                immediate: None,
            } => write!(f, "binary {}", op.as_symbol()),
            Instruction::Binary {
                op,
                immediate: Some(value),
            } => write!(f, "binary {} {value:?}", op.as_symbol()),
        }
    }
}

/// What a compiler-generated label marks.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelKind {
    LoopStart,
    LoopEnd,
    SwitchNext,
    SwitchEnd,
}

impl LabelKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            LabelKind::LoopStart => "loop_start",
            LabelKind::LoopEnd => "loop_end",
            LabelKind::SwitchNext => "switch_next",
            LabelKind::SwitchEnd => "switch_end",
        }
    }
}

/// A jump target.
///
/// User labels come from `(:name)` markers; generated labels carry a
/// per-compilation counter, so the two can never collide.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Label {
    User(Name),
    Generated { kind: LabelKind, id: u32 },
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::User(name) => write!(f, ":{name}"),
            Label::Generated { kind, id } => write!(f, "{}#{id}", kind.as_str()),
        }
    }
}

/// Source spans for each instruction of one function.
#[derive(Clone, Debug)]
pub struct DebugSymbols {
    source: Arc<SourceFile>,
    spans: Vec<Span>,
}

impl DebugSymbols {
    pub fn new(source: Arc<SourceFile>, spans: Vec<Span>) -> Self {
        DebugSymbols { source, spans }
    }

    #[inline]
    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Span of the instruction at `index`.
    #[inline]
    pub fn span(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A compiled function.
#[derive(Clone, Debug)]
pub struct Function {
    name: Name,
    params: Vec<Name>,
    instructions: Vec<Instruction>,
    labels: FxHashMap<Label, usize>,
    debug: DebugSymbols,
}

impl Function {
    pub fn new(
        name: Name,
        params: Vec<Name>,
        instructions: Vec<Instruction>,
        labels: FxHashMap<Label, usize>,
        debug: DebugSymbols,
    ) -> Self {
        debug_assert_eq!(instructions.len(), debug.len());
        Function {
            name,
            params,
            instructions,
            labels,
            debug,
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[Name] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[inline]
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Resolved instruction index of a label.
    #[inline]
    pub fn label(&self, label: &Label) -> Option<usize> {
        self.labels.get(label).copied()
    }

    #[inline]
    pub fn debug_symbols(&self) -> &DebugSymbols {
        &self.debug
    }

    /// Span of the instruction at `index`.
    #[inline]
    pub fn span(&self, index: usize) -> Option<Span> {
        self.debug.span(index)
    }

    #[inline]
    pub fn source(&self) -> &Arc<SourceFile> {
        self.debug.source()
    }

    /// Human-readable listing, nested functions included.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        self.disassemble_into(&mut out);
        out
    }

    fn disassemble_into(&self, out: &mut String) {
        let mut markers: Vec<(usize, &Label)> =
            self.labels.iter().map(|(label, &index)| (index, label)).collect();
        markers.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.to_string().cmp(&b.1.to_string())));

        let params: Vec<&str> = self.params.iter().map(Name::as_str).collect();
        let _ = writeln!(out, "function {} ({}):", self.name, params.join(" "));

        let mut nested = Vec::new();
        let mut pending = markers.iter().peekable();
        for (index, instruction) in self.instructions.iter().enumerate() {
            while let Some((_, label)) = pending.next_if(|(at, _)| *at == index) {
                let _ = writeln!(out, "{label}:");
            }
            let _ = writeln!(out, "  {index:04}  {instruction}");
            if let Instruction::Push(value) = instruction {
                if let Some(function) = value.as_function() {
                    nested.push(function.clone());
                }
            }
        }
        for (_, label) in pending {
            let _ = writeln!(out, "{label}:");
        }

        for function in nested {
            out.push('\n');
            function.disassemble_into(out);
        }
    }
}
