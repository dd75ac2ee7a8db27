//! Quoting helpers for field converters.
//!
//! The encoder itself never escapes anything. Each field renders its own
//! element text through these helpers, which know how deeply the composite
//! being written is embedded in other quoted contexts.
//!
//! One level of element quoting wraps the text in `"` and doubles every `"`
//! and `\` inside it. Doubling composes, so a quote or escape byte written at
//! [`QuoteLevel`] `n` is simply repeated `2^n` times; after `n` rounds of
//! unquoting by the enclosing literals it comes back as a single byte.

use crate::tokenizer::{CLOSE, DELIMITER, ESCAPE, OPEN, QUOTE};

/// How many quoted contexts the composite being written sits inside.
///
/// `QuoteLevel::NONE` is a top-level literal. A composite written as an
/// element of another composite (or of an array) is one level deeper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuoteLevel(u32);

impl QuoteLevel {
    pub const NONE: QuoteLevel = QuoteLevel(0);

    pub const fn new(depth: u32) -> Self {
        QuoteLevel(depth)
    }

    pub const fn depth(self) -> u32 {
        self.0
    }

    /// The level for a value embedded one quoted context deeper.
    pub const fn deeper(self) -> Self {
        QuoteLevel(self.0 + 1)
    }
}

/// Writes `b` so that it survives `level` rounds of unquoting.
pub fn push_escaped(out: &mut Vec<u8>, b: u8, level: QuoteLevel) {
    if b == QUOTE || b == ESCAPE {
        let copies = 1usize << level.depth().min(usize::BITS - 1);
        out.extend(std::iter::repeat(b).take(copies));
    } else {
        out.push(b);
    }
}

/// Writes an element quote byte for a composite at `level`.
pub fn push_quote(out: &mut Vec<u8>, level: QuoteLevel) {
    push_escaped(out, QUOTE, level);
}

/// True when `text` cannot be written as an unquoted element.
///
/// Empty text must be quoted so it is not read back as NULL.
pub fn needs_quoting(text: &[u8]) -> bool {
    text.is_empty()
        || text.iter().any(|&b| {
            matches!(b, QUOTE | ESCAPE | OPEN | CLOSE | DELIMITER) || b.is_ascii_whitespace()
        })
}

/// Appends `text` as one element of a composite written at `level`,
/// quoting it only when the grammar requires.
pub fn append_element(out: &mut Vec<u8>, text: &[u8], level: QuoteLevel) {
    if !needs_quoting(text) {
        out.extend_from_slice(text);
        return;
    }
    append_quoted(out, text, level);
}

/// Appends `text` as a quoted element regardless of its content.
pub fn append_quoted(out: &mut Vec<u8>, text: &[u8], level: QuoteLevel) {
    let inner = level.deeper();
    push_quote(out, level);
    for &b in text {
        push_escaped(out, b, inner);
    }
    push_quote(out, level);
}
