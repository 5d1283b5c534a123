//! A compiled program.

use crate::{Function, Heap, ScopeArena, ScopeId};

/// Root scopes plus the top-level function of a program.
///
/// The arena holds the host's builtin scope (the root) and the global scope
/// above it, which already contains the program's top-level constants.
/// Scripts are immutable; each machine runs on its own copy of the scopes.
#[derive(Clone, Debug)]
pub struct Script {
    scopes: ScopeArena,
    global: ScopeId,
    main: Heap<Function>,
}

impl Script {
    pub fn new(scopes: ScopeArena, global: ScopeId, main: Function) -> Self {
        Script {
            scopes,
            global,
            main: Heap::new(main),
        }
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    #[inline]
    pub fn global(&self) -> ScopeId {
        self.global
    }

    /// The anonymous function holding the program body.
    #[inline]
    pub fn main(&self) -> &Heap<Function> {
        &self.main
    }
}
