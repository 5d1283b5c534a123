//! Reader for rill.
//!
//! Groups the token stream into a tree of [`Node`]s: `(...)` expressions,
//! `[...]` lists, `{...}` maps and atoms. Atoms are already classified into
//! runtime values (`null`, numbers, booleans, strings) or symbols, which
//! are carried as `Value::Variable` until the compiler resolves them.

mod error;
mod node;
mod reader;

pub use error::{ReadError, ReadErrorKind};
pub use node::{MapEntry, Node, NodeKind};

/// Read every top-level form of `source`.
pub fn read(source: &str) -> Result<Vec<Node>, ReadError> {
    reader::Reader::new(source).read_all()
}
