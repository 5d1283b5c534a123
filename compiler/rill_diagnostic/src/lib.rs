//! Diagnostic system for rich error reporting.
//!
//! Every failure in the rill pipeline (scanning, reading, compiling,
//! executing) is converted into a [`Diagnostic`]:
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Secondary labels (call-stack frames for runtime errors)
//!
//! A [`Report`] pairs a diagnostic with the source it refers to so it can
//! be rendered as a source snippet with caret annotations.

mod diagnostic;
pub mod emitter;
mod error_code;
mod report;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label};
pub use emitter::ColorMode;
pub use error_code::{ErrorCode, Phase};
pub use report::Report;
pub use span_utils::{CodeLocation, LineOffsetTable};
