//! Tokeniser for rill.
//!
//! Turns source text into a lazy stream of raw tokens: the six structural
//! characters `( ) [ ] { }`, bare words, and quoted strings (with escapes
//! already applied). Whitespace and `;` line comments are skipped.
//!
//! The stream is an `Iterator<Item = Result<Token, LexError>>`. The first
//! error ends it.

mod cursor;
mod lex_error;
mod token;
mod tokenizer;

pub use lex_error::{LexError, LexErrorKind};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;

/// Tokenise `source` lazily.
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    Tokenizer::new(source)
}
