//! Name/value environments.
//!
//! Scopes live in a [`ScopeArena`] and refer to their parent by
//! [`ScopeId`] rather than by pointer. Lookups walk innermost to
//! outermost; `define` touches only the given scope; `set` updates the
//! nearest scope that already binds the name.
//!
//! The arena always contains a root scope (where host natives live).
//! Scopes above it are used in stack order: the compiler pushes one
//! constant scope per function it is compiling, the machine pushes one
//! scope per active call, and both pop them in reverse.

use rill_ir::Name;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::native::NativeContext;
use crate::{Array, EvalErrorKind, Value};

/// Handle to a scope inside a [`ScopeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The root scope every arena starts with.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Bound with `define` (or by the host).
    Mutable,
    /// Bound with `const`.
    Constant,
}

/// Error returned by [`ScopeArena::set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The nearest binding is a constant.
    Constant,
    /// No scope in the chain binds the name.
    Undefined,
}

/// Error returned by [`ScopeArena::define`] and [`ScopeArena::define_const`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefineError {
    /// The name is already bound in the same scope.
    Redefinition,
    /// The name is bound to a constant in the same scope.
    Constant,
}

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

#[derive(Clone, Debug, Default)]
struct Scope {
    bindings: FxHashMap<Name, Binding>,
    parent: Option<ScopeId>,
}

/// Owner of every scope of a script or machine.
#[derive(Clone, Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    /// An arena holding only an empty root scope.
    pub fn new() -> Self {
        ScopeArena {
            scopes: vec![Scope::default()],
        }
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Number of live scopes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Never true in practice: the root scope cannot be popped.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Create an empty scope whose parent is `parent`.
    pub fn push_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        });
        id
    }

    /// Drop `id` and every scope created after it. The root is never dropped.
    pub fn pop(&mut self, id: ScopeId) {
        debug_assert_eq!(id.index() + 1, self.scopes.len(), "scopes pop in stack order");
        if id != ScopeId::ROOT {
            self.scopes.truncate(id.index());
        }
    }

    #[inline]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(id.index()).and_then(|scope| scope.parent)
    }

    /// Resolve a name, innermost scope first.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<&Value> {
        let mut current = Some(id);
        while let Some(id) = current {
            let scope = self.scopes.get(id.index())?;
            if let Some(binding) = scope.bindings.get(name) {
                return Some(&binding.value);
            }
            current = scope.parent;
        }
        None
    }

    /// Resolve a name in `id` only.
    pub fn lookup_local(&self, id: ScopeId, name: &str) -> Option<&Value> {
        self.scopes
            .get(id.index())
            .and_then(|scope| scope.bindings.get(name))
            .map(|binding| &binding.value)
    }

    /// Bind (or rebind) a name in `id`. A constant in `id` stays as it is.
    pub fn define(&mut self, id: ScopeId, name: Name, value: Value) -> Result<(), DefineError> {
        let constant = self
            .scopes
            .get(id.index())
            .and_then(|scope| scope.bindings.get(&name))
            .is_some_and(|binding| binding.mutability == Mutability::Constant);
        if constant {
            return Err(DefineError::Constant);
        }
        self.insert(id, name, value, Mutability::Mutable);
        Ok(())
    }

    /// Bind a constant in `id`. Any existing binding of the name in the same
    /// scope is a redefinition.
    pub fn define_const(&mut self, id: ScopeId, name: Name, value: Value) -> Result<(), DefineError> {
        if self.lookup_local(id, &name).is_some() {
            return Err(DefineError::Redefinition);
        }
        self.insert(id, name, value, Mutability::Constant);
        Ok(())
    }

    fn insert(&mut self, id: ScopeId, name: Name, value: Value, mutability: Mutability) {
        if let Some(scope) = self.scopes.get_mut(id.index()) {
            scope.bindings.insert(name, Binding { value, mutability });
        }
    }

    /// Update the nearest existing binding of `name`.
    pub fn set(&mut self, id: ScopeId, name: &str, value: Value) -> Result<(), AssignError> {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(scope) = self.scopes.get_mut(id.index()) else {
                break;
            };
            if let Some(binding) = scope.bindings.get_mut(name) {
                if binding.mutability == Mutability::Constant {
                    return Err(AssignError::Constant);
                }
                binding.value = value;
                return Ok(());
            }
            current = scope.parent;
        }
        Err(AssignError::Undefined)
    }

    /// Copy every binding of `from` into `into`, keeping mutability.
    pub fn combine(&mut self, from: ScopeId, into: ScopeId) {
        let Some(source) = self.scopes.get(from.index()) else {
            return;
        };
        let bindings: Vec<_> = source
            .bindings
            .iter()
            .map(|(name, binding)| (name.clone(), binding.clone()))
            .collect();
        trace!(from = from.index(), into = into.index(), count = bindings.len(), "combine scopes");
        if let Some(target) = self.scopes.get_mut(into.index()) {
            target.bindings.extend(bindings);
        }
    }

    /// Names bound directly in `id`, sorted.
    pub fn local_names(&self, id: ScopeId) -> Vec<&Name> {
        let mut names: Vec<_> = self
            .scopes
            .get(id.index())
            .map(|scope| scope.bindings.keys().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Register a native function under a possibly dotted path.
    ///
    /// `"print"` binds a builtin directly; `"array.get"` binds (or extends)
    /// an `array` object whose `get` key holds the builtin.
    pub fn register_native<F>(&mut self, id: ScopeId, path: &str, func: F)
    where
        F: Fn(&mut dyn NativeContext, Array) -> Result<(), EvalErrorKind> + Send + Sync + 'static,
    {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        let leaf = Value::builtin(path, func);
        let value = insert_path(self.lookup_local(id, head), rest, leaf);
        // Hosts register before compiling, so this may replace anything.
        self.insert(id, Name::new(head), value, Mutability::Mutable);
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the object chain along `path` with `leaf` at its end.
fn insert_path(existing: Option<&Value>, path: &[&str], leaf: Value) -> Value {
    let Some((head, rest)) = path.split_first() else {
        return leaf;
    };
    let object = existing.and_then(Value::as_object).cloned().unwrap_or_default();
    let child = insert_path(object.get(head), rest, leaf);
    Value::from(object.with(Name::new(head), child))
}
