//! Lowering of syntax trees into flat instruction arrays.
//!
//! Each node compiles to a [`Code`] fragment: instructions tagged with the
//! span that produced them, interleaved with label markers. Fragments are
//! concatenated by the enclosing form and resolved into a [`Function`] by
//! [`Assembler::finish`], which turns markers into the label table.
//!
//! A fragment consisting of a single literal push is a compile-time
//! constant; operators, collections and calls inspect their operands'
//! fragments with [`literal`] to fold or specialise.

use std::sync::Arc;

use rill_ir::{Name, SourceFile, Span};
use rill_parse::{MapEntry, Node, NodeKind};
use rill_stack::ensure_sufficient_stack;
use rill_value::{
    DebugSymbols, Function, Instruction, Label, LabelKind, PropertyPath, ScopeArena, ScopeId,
    Script, Value,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::context::{Ctx, Form};
use crate::keyword::Keyword;
use crate::{CompileError, CompileErrorKind};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Emit {
    /// Binds a label to the next instruction.
    Marker(Label, Span),
    Op(Instruction, Span),
}

pub(crate) type Code = Vec<Emit>;

/// The value `code` pushes, if it is exactly one literal push.
pub(crate) fn literal(code: &[Emit]) -> Option<&Value> {
    match code {
        [Emit::Op(Instruction::Push(value), _)] if !value.is_variable() => Some(value),
        _ => None,
    }
}

pub(crate) fn op(instruction: Instruction, span: Span) -> Emit {
    Emit::Op(instruction, span)
}

/// Name of the function holding a script's top-level code.
pub const MAIN: &str = "<main>";

/// Compiles one source file against a set of host natives.
pub struct Assembler {
    scopes: ScopeArena,
    global: ScopeId,
    source: Arc<SourceFile>,
    next_label: u32,
}

impl Assembler {
    /// `builtins` is copied; its root scope becomes the root of the
    /// script's scope chain.
    pub fn new(source: Arc<SourceFile>, builtins: &ScopeArena) -> Self {
        let mut scopes = builtins.clone();
        let global = scopes.push_child(scopes.root());
        Assembler {
            scopes,
            global,
            source,
            next_label: 0,
        }
    }

    /// Compile top-level forms into a script. Constants declared at top
    /// level become bindings of the script's global scope.
    pub fn assemble_script(mut self, nodes: &[Node]) -> Result<Script, CompileError> {
        let consts = self.scopes.push_child(self.global);
        let body = self.statements(nodes, &Ctx::top_level(consts));
        if body.is_ok() {
            self.scopes.combine(consts, self.global);
        }
        self.scopes.pop(consts);
        let main = self.finish(Name::from(MAIN), Vec::new(), body?)?;
        debug!(
            file = self.source.name(),
            instructions = main.len(),
            labels = self.next_label,
            "compiled script"
        );
        Ok(Script::new(self.scopes, self.global, main))
    }

    pub(crate) fn fresh_label(&mut self, kind: LabelKind) -> Label {
        let id = self.next_label;
        self.next_label += 1;
        Label::Generated { kind, id }
    }

    pub(crate) fn scopes_mut(&mut self) -> &mut ScopeArena {
        &mut self.scopes
    }

    pub(crate) fn statements(&mut self, nodes: &[Node], ctx: &Ctx) -> Result<Code, CompileError> {
        let mut code = Code::new();
        for node in nodes {
            code.extend(self.node(node, ctx)?);
        }
        Ok(code)
    }

    pub(crate) fn node(&mut self, node: &Node, ctx: &Ctx) -> Result<Code, CompileError> {
        ensure_sufficient_stack(|| match &node.kind {
            NodeKind::Atom(value) => match value.as_variable() {
                Some(name) => Ok(self.symbol(name, node.span, ctx)),
                None => Ok(vec![op(Instruction::Push(value.clone()), node.span)]),
            },
            NodeKind::List(items) => self.list(items, node.span, ctx),
            NodeKind::Map(entries) => self.map(entries, node.span, ctx),
            NodeKind::Expression(children) => self.expression(children, node.span, ctx),
            NodeKind::Label(name) => Ok(vec![Emit::Marker(Label::User(name.clone()), node.span)]),
        })
    }

    fn expression(&mut self, children: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let Some((head, args)) = children.split_first() else {
            return Err(CompileError::new(CompileErrorKind::EmptyExpression, span));
        };
        if let NodeKind::Label(name) = &head.kind {
            if !args.is_empty() {
                return Err(CompileError::new(
                    CompileErrorKind::Malformed {
                        form: "label",
                        expected: "nothing after the label name",
                    },
                    span,
                ));
            }
            return Ok(vec![Emit::Marker(Label::User(name.clone()), span)]);
        }
        if let Some(keyword) = head.as_symbol().and_then(|name| Keyword::from_name(name)) {
            trace!(keyword = keyword.as_str(), "special form");
            return self.special_form(keyword, args, span, ctx);
        }
        self.call(head, args, span, ctx)
    }

    /// Arguments are pushed left to right, then the callee. A callee known
    /// at compile time is embedded in the call instruction.
    fn call(&mut self, callee: &Node, args: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let arg_ctx = ctx.in_form(Form::Call);
        let mut code = Code::new();
        for arg in args {
            code.extend(self.node(arg, &arg_ctx)?);
        }
        let callee_code = self.node(callee, &arg_ctx)?;
        match literal(&callee_code).cloned() {
            // `(x)` on a plain value evaluates to the value.
            Some(value) if args.is_empty() && !value.is_callable() => return Ok(callee_code),
            Some(value) => code.push(op(
                Instruction::CallDirect {
                    callee: value,
                    args: args.len(),
                },
                span,
            )),
            None => {
                code.extend(callee_code);
                code.push(op(Instruction::Call(args.len()), span));
            }
        }
        Ok(code)
    }

    /// Resolve a symbol in value position.
    ///
    /// Names bound at compile time (constants and host natives) become
    /// literal pushes; a dotted name is walked into the constant as far as
    /// its keys exist and looked up at run time from there. Everything
    /// else is resolved by name when executed. `...name` marks the value as
    /// a spread argument list.
    pub(crate) fn symbol(&mut self, name: &Name, span: Span, ctx: &Ctx) -> Code {
        if let Some(spread) = name.strip_prefix("...").filter(|rest| !rest.is_empty()) {
            let mut code = self.symbol(&Name::from(spread), span, ctx);
            code.push(op(Instruction::ToArgument, span));
            return code;
        }

        let (head, path) = split_path(name).unwrap_or((name.as_str(), PropertyPath::new()));
        // Parameters are recorded as symbols so they shadow outer constants.
        let resolved = self
            .scopes
            .lookup(ctx.consts, head)
            .filter(|value| !value.is_variable())
            .cloned();
        let Some(mut value) = resolved else {
            let head = if path.is_empty() {
                name.clone()
            } else {
                Name::from(head)
            };
            let mut code = vec![op(Instruction::Get(head), span)];
            if !path.is_empty() {
                code.push(op(Instruction::GetProperty(path), span));
            }
            return code;
        };

        let mut remaining = PropertyPath::new();
        let mut keys = path.into_iter();
        for key in keys.by_ref() {
            match value.property(&key) {
                Ok(next) => value = next,
                Err(_) => {
                    remaining.push(key);
                    break;
                }
            }
        }
        remaining.extend(keys);

        let mut code = vec![op(Instruction::Push(value), span)];
        if !remaining.is_empty() {
            code.push(op(Instruction::GetProperty(remaining), span));
        }
        code
    }

    fn list(&mut self, items: &[Node], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let item_ctx = ctx.in_form(Form::Collection);
        let parts = items
            .iter()
            .map(|item| self.node(item, &item_ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(values) = parts
            .iter()
            .map(|part| literal(part).cloned())
            .collect::<Option<Vec<_>>>()
        {
            return Ok(vec![op(Instruction::Push(Value::array(values)), span)]);
        }

        let mut code: Code = parts.into_iter().flatten().collect();
        code.push(op(Instruction::MakeArray(items.len()), span));
        Ok(code)
    }

    fn map(&mut self, entries: &[MapEntry], span: Span, ctx: &Ctx) -> Result<Code, CompileError> {
        let value_ctx = ctx.in_form(Form::Collection);
        let parts = entries
            .iter()
            .map(|entry| self.node(&entry.value, &value_ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if parts.iter().all(|part| literal(part).is_some()) {
            let mut object = FxHashMap::default();
            for (entry, part) in entries.iter().zip(&parts) {
                if let Some(value) = literal(part) {
                    object.insert(entry.key.clone(), value.clone());
                }
            }
            return Ok(vec![op(Instruction::Push(Value::object(object)), span)]);
        }

        let mut code = Code::new();
        for (entry, part) in entries.iter().zip(parts) {
            code.push(op(
                Instruction::Push(Value::string(entry.key.as_str())),
                entry.key_span,
            ));
            code.extend(part);
        }
        code.push(op(Instruction::MakeObject(entries.len()), span));
        Ok(code)
    }

    /// Resolve markers into a label table and build the function.
    pub(crate) fn finish(
        &self,
        name: Name,
        params: Vec<Name>,
        code: Code,
    ) -> Result<Function, CompileError> {
        let mut instructions = Vec::with_capacity(code.len());
        let mut spans = Vec::with_capacity(code.len());
        let mut labels = FxHashMap::default();

        for emit in code {
            match emit {
                Emit::Marker(label, span) => {
                    if labels.contains_key(&label) {
                        return Err(CompileError::new(
                            CompileErrorKind::DuplicateLabel { label },
                            span,
                        ));
                    }
                    labels.insert(label, instructions.len());
                }
                Emit::Op(instruction, span) => {
                    if let Instruction::Push(value) = &instruction {
                        if let Some(symbol) = value.as_variable() {
                            return Err(CompileError::new(
                                CompileErrorKind::UnresolvedSymbol {
                                    name: symbol.clone(),
                                },
                                span,
                            ));
                        }
                    }
                    instructions.push(instruction);
                    spans.push(span);
                }
            }
        }

        debug!(
            function = %name,
            instructions = instructions.len(),
            labels = labels.len(),
            "assembled function"
        );
        let debug = DebugSymbols::new(Arc::clone(&self.source), spans);
        Ok(Function::new(name, params, instructions, labels, debug))
    }
}

/// Split `a.b.c` into `a` and `[b, c]`. Names with empty segments (`.`,
/// `a.`, `...`) are not paths.
fn split_path(name: &str) -> Option<(&str, PropertyPath)> {
    let mut parts = name.split('.');
    let head = parts.next().filter(|head| !head.is_empty())?;
    let path: PropertyPath = parts.map(Name::from).collect();
    if path.is_empty() || path.iter().any(|key| key.is_empty()) {
        return None;
    }
    Some((head, path))
}
