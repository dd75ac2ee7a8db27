//! Forward-only byte cursor over a composite literal.

/// A byte reader with one byte of lookahead.
///
/// The tokenizer never backtracks; `peek` exists only so the quoted-element
/// state can tell a doubled quote from a closing one.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the first byte of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor position (bytes consumed so far).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes and returns the next byte.
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consumes bytes up to (not including) the first one matching `stop`,
    /// returning them as a borrowed slice. Consumes to the end if no byte
    /// matches.
    pub fn take_until(&mut self, stop: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        let len = self.data[start..]
            .iter()
            .position(|&b| stop(b))
            .unwrap_or(self.data.len() - start);
        self.pos = start + len;
        &self.data[start..self.pos]
    }

    /// Skips ASCII whitespace.
    pub fn skip_whitespace(&mut self) {
        self.take_until(|b| !b.is_ascii_whitespace());
    }
}
