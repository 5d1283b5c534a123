//! Byte cursor over source text.
//!
//! Every delimiter the tokeniser cares about is ASCII, so scanning works on
//! bytes. Positions only ever stop on ASCII bytes or at the end of input,
//! which keeps every slice on a character boundary.

/// Forward-only position in a source string.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Cursor { source, pos: 0 }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Byte at the cursor, or `None` at end of input.
    #[inline]
    pub(crate) fn current(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// Character at the cursor.
    #[inline]
    pub(crate) fn current_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.source.len());
    }

    /// Advance past the character at the cursor.
    #[inline]
    pub(crate) fn advance_char(&mut self) {
        let width = self.current_char().map_or(1, char::len_utf8);
        self.pos = (self.pos + width).min(self.source.len());
    }

    /// Advance while `pred` holds for the current byte.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (left unconsumed) or to end of input.
    pub(crate) fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.source.as_bytes()[self.pos..];
        match memchr::memchr(b'\n', remaining) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.source.len(),
        }
    }

    /// Advance to the next byte that ends a run of plain string content:
    /// the closing `quote`, a backslash, or a newline. Returns that byte,
    /// or `None` (cursor at end) if there is none.
    pub(crate) fn skip_to_string_delim(&mut self, quote: u8) -> Option<u8> {
        let remaining = &self.source.as_bytes()[self.pos..];
        match memchr::memchr3(quote, b'\\', b'\n', remaining) {
            Some(offset) => {
                self.pos += offset;
                self.current()
            }
            None => {
                self.pos = self.source.len();
                None
            }
        }
    }

    /// Source text between `start` and the cursor.
    #[inline]
    pub(crate) fn slice_from(&self, start: usize) -> &'src str {
        self.source.get(start..self.pos).unwrap_or("")
    }
}
