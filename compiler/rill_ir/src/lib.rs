//! Rill IR - shared vocabulary types.
//!
//! This crate contains the small set of types every other rill crate agrees on:
//! - Spans for source locations
//! - Names for identifiers
//! - Source files (name + text) shared by diagnostics and debug symbols
//! - Operator enums used by the compiler and the virtual machine

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod name;
mod operators;
mod source;
mod span;

pub use name::Name;
pub use operators::{BinaryOp, UnaryOp};
pub use source::SourceFile;
pub use span::Span;
