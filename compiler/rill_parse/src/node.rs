//! Syntax tree nodes.

use rill_ir::{Name, Span};
use rill_value::Value;

/// A syntax node with the span it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Node shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// `( ... )`
    Expression(Vec<Node>),
    /// `[ ... ]`
    List(Vec<Node>),
    /// `{ key value ... }`
    Map(Vec<MapEntry>),
    /// A literal or a symbol (`Value::Variable`).
    Atom(Value),
    /// `:name` as the first element of an expression.
    Label(Name),
}

/// One `key value` pair of a map literal. Keys are resolved to text while
/// reading.
#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry {
    pub key: Name,
    pub key_span: Span,
    pub value: Node,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn atom(value: Value, span: Span) -> Self {
        Node::new(NodeKind::Atom(value), span)
    }

    /// The symbol name, if this is a symbol atom.
    pub fn as_symbol(&self) -> Option<&Name> {
        match &self.kind {
            NodeKind::Atom(value) => value.as_variable(),
            _ => None,
        }
    }

    /// The literal value, if this is a non-symbol atom.
    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Atom(value) if !value.is_variable() => Some(value),
            _ => None,
        }
    }

    /// Children of an expression.
    pub fn as_expression(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Expression(children) => Some(children),
            _ => None,
        }
    }

    /// Short description for error messages.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            NodeKind::Expression(_) => "expression",
            NodeKind::List(_) => "list",
            NodeKind::Map(_) => "map",
            NodeKind::Atom(value) if value.is_variable() => "symbol",
            NodeKind::Atom(_) => "literal",
            NodeKind::Label(_) => "label",
        }
    }
}
