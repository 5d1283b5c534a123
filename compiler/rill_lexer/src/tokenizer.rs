//! The token stream.

use std::borrow::Cow;

use rill_ir::Span;

use crate::cursor::Cursor;
use crate::{LexError, LexErrorKind, Token, TokenKind};

#[inline]
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
fn is_quote(byte: u8) -> bool {
    matches!(byte, b'"' | b'\'')
}

/// Bytes that end a bare word.
#[inline]
fn ends_word(byte: u8) -> bool {
    is_whitespace(byte) || is_quote(byte) || byte == b';' || TokenKind::structural(byte).is_some()
}

#[inline]
fn span(start: usize, end: usize) -> Span {
    Span::from_range(start..end)
}

/// Lazy tokeniser over one source string.
///
/// Yields tokens until end of input or the first error, then `None`.
#[derive(Clone, Debug)]
pub struct Tokenizer<'src> {
    cursor: Cursor<'src>,
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Tokenizer {
            cursor: Cursor::new(source),
            failed: false,
        }
    }

    /// Skip whitespace and `;` comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(is_whitespace);
            if self.cursor.current() == Some(b';') {
                self.cursor.eat_until_newline_or_eof();
            } else {
                return;
            }
        }
    }

    fn word(&mut self) -> Token<'src> {
        let start = self.cursor.pos();
        self.cursor.eat_while(|b| !ends_word(b));
        Token {
            kind: TokenKind::Word,
            text: Cow::Borrowed(self.cursor.slice_from(start)),
            span: span(start, self.cursor.pos()),
        }
    }

    /// Scan a quoted string; the cursor is on the opening quote.
    fn string(&mut self, quote: u8) -> Result<Token<'src>, LexError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        let mut text: Cow<'src, str> = Cow::Borrowed("");
        loop {
            let segment_start = self.cursor.pos();
            let delim = self.cursor.skip_to_string_delim(quote);
            let segment = self.cursor.slice_from(segment_start);
            if text.is_empty() {
                text = Cow::Borrowed(segment);
            } else {
                text.to_mut().push_str(segment);
            }

            match delim {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        span(start, self.cursor.pos()),
                    ));
                }
                Some(b'\n') => {
                    return Err(LexError::new(
                        LexErrorKind::NewlineInString,
                        span(start, self.cursor.pos()),
                    ));
                }
                Some(b'\\') => {
                    let escape_start = self.cursor.pos();
                    self.cursor.advance();
                    let Some(c) = self.cursor.current_char() else {
                        return Err(LexError::new(
                            LexErrorKind::UnterminatedEscape,
                            span(escape_start, self.cursor.pos()),
                        ));
                    };
                    self.cursor.advance_char();
                    let cooked = match c {
                        '"' | '\'' | '\\' => c,
                        't' => '\t',
                        'r' => '\r',
                        'n' => '\n',
                        _ => {
                            return Err(LexError::new(
                                LexErrorKind::InvalidEscape { escape_char: c },
                                span(escape_start, self.cursor.pos()),
                            ));
                        }
                    };
                    text.to_mut().push(cooked);
                }
                Some(_) => {
                    // Closing quote.
                    self.cursor.advance();
                    return Ok(Token {
                        kind: TokenKind::Str,
                        text,
                        span: span(start, self.cursor.pos()),
                    });
                }
            }
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_trivia();
        let byte = self.cursor.current()?;

        if let Some(kind) = TokenKind::structural(byte) {
            let start = self.cursor.pos();
            self.cursor.advance();
            return Some(Ok(Token {
                kind,
                text: Cow::Borrowed(self.cursor.slice_from(start)),
                span: span(start, self.cursor.pos()),
            }));
        }

        if is_quote(byte) {
            let result = self.string(byte);
            self.failed = result.is_err();
            return Some(result);
        }

        Some(Ok(self.word()))
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}
