//! Line and column computation for spans.
//!
//! For repeated lookups on the same source, [`LineOffsetTable`]
//! pre-computes line offsets for O(log L) lookup instead of O(n) scanning.

use std::fmt;

use rill_ir::Span;

/// Start and end position of a span, 1-based, columns counted in characters.
///
/// `end_line`/`end_column` point at the last character covered by the span
/// (inclusive), so a one-character span has equal start and end.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CodeLocation {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl CodeLocation {
    /// Whether the span covers more than one physical line.
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// Pre-computed line offset table for efficient line/column lookup.
///
/// ```
/// use rill_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "line1\nline2\nline3";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
/// assert_eq!(table.offset_to_line_col(source, 12), (3, 1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// Get 1-based line number from a byte offset using binary search.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// Get 1-based (line, column) from a byte offset.
    ///
    /// The column counts characters (not bytes) from the start of the line.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.line_start(line);
        let offset = (offset as usize).min(source.len());
        let col_text = source.get(line_start..offset).unwrap_or("");
        let col = u32::try_from(col_text.chars().count()).unwrap_or(u32::MAX - 1) + 1;
        (line, col)
    }

    /// Compute the full location of a span.
    pub fn location(&self, source: &str, span: Span) -> CodeLocation {
        let (start_line, start_column) = self.offset_to_line_col(source, span.start);
        let last = if span.is_empty() {
            span.start
        } else {
            last_char_offset(source, span.end)
        };
        let (end_line, end_column) = self.offset_to_line_col(source, last);
        CodeLocation {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Text of a 1-based line, without its line terminator.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> &'s str {
        if line == 0 || line as usize > self.offsets.len() {
            return "";
        }
        let start = self.line_start(line);
        let end = self
            .offsets
            .get(line as usize)
            .map_or(source.len(), |next| (*next as usize).saturating_sub(1));
        source
            .get(start..end.max(start))
            .unwrap_or("")
            .trim_end_matches('\r')
    }

    /// Get the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    fn line_start(&self, line: u32) -> usize {
        self.offsets
            .get(line.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(0) as usize
    }
}

/// Byte offset of the character that ends just before `end`.
fn last_char_offset(source: &str, end: u32) -> u32 {
    let end = (end as usize).min(source.len());
    let start = source
        .get(..end)
        .and_then(|prefix| prefix.char_indices().next_back())
        .map_or(0, |(i, _)| i);
    u32::try_from(start).unwrap_or(u32::MAX)
}
