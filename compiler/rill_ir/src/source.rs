//! Source text with its display name.

use std::sync::Arc;

/// A named piece of source text.
///
/// Shared (via `Arc`) between the diagnostics renderer and the debug
/// symbols of every compiled function, so runtime errors can point back
/// into the program text long after compilation finished.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    text: String,
}

impl SourceFile {
    /// Create a shared source file.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(SourceFile {
            name: name.into(),
            text: text.into(),
        })
    }

    /// Display name (usually a path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full source text.
    pub fn text(&self) -> &str {
        &self.text
    }
}
