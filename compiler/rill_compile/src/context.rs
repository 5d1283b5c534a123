//! Compilation context.
//!
//! The context is passed down by reference and never mutated in place:
//! entering a loop, a special form or a nested function derives a new
//! context from the current one.

use rill_value::{Label, ScopeId};

/// The form whose operand is being compiled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Form {
    Assign,
    Const,
    Loop,
    Switch,
    Jump,
    Return,
    Operator,
    Call,
    Collection,
}

/// Jump targets of the innermost enclosing loop.
#[derive(Clone, Debug)]
pub(crate) struct LoopLabels {
    pub start: Label,
    pub end: Label,
}

#[derive(Clone, Debug)]
pub(crate) struct Ctx {
    pub loop_labels: Option<LoopLabels>,
    /// `None` at statement level.
    pub form: Option<Form>,
    /// Scope receiving `const` bindings of the function being compiled.
    pub consts: ScopeId,
    /// Function nesting depth; the script body is 0.
    pub depth: u32,
}

impl Ctx {
    pub fn top_level(consts: ScopeId) -> Self {
        Ctx {
            loop_labels: None,
            form: None,
            consts,
            depth: 0,
        }
    }

    #[must_use]
    pub fn in_form(&self, form: Form) -> Self {
        Ctx {
            form: Some(form),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn in_loop(&self, labels: LoopLabels) -> Self {
        Ctx {
            loop_labels: Some(labels),
            form: Some(Form::Loop),
            ..self.clone()
        }
    }

    /// Context for the body of a nested function. Loop labels do not
    /// cross function boundaries.
    #[must_use]
    pub fn function_body(&self, consts: ScopeId) -> Self {
        Ctx {
            loop_labels: None,
            form: None,
            consts,
            depth: self.depth + 1,
        }
    }

    /// Whether a value left by the form being compiled goes unused.
    pub fn is_statement(&self) -> bool {
        matches!(self.form, None | Some(Form::Loop | Form::Switch))
    }

    /// Named functions at statement level of the script body are bound at
    /// compile time instead of at run time.
    pub fn binds_functions_statically(&self) -> bool {
        self.form.is_none() && self.depth == 0
    }
}
