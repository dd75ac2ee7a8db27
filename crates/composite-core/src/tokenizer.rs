//! Composite tokenizer: splits `(e0,e1,...)` into raw element slices.
//!
//! The tokenizer is a byte-level state machine. It consumes the opening
//! parenthesis itself, then yields one element per [`Tokenizer::next_elem`]
//! call until the matching close parenthesis, after which it yields
//! [`Token::End`] forever.
//!
//! Element forms:
//!
//! - **Unquoted**: bytes up to the next `,` or `)`, taken verbatim. A
//!   zero-length unquoted element is SQL NULL and comes back as `None`.
//! - **Quoted**: `"..."`. Inside, `""` is a literal quote and `\` makes the
//!   following byte literal. `""` on its own is a present, empty value.
//!
//! Quoted elements are unescaped into a buffer owned by the tokenizer, so a
//! returned slice is only valid until the next call. Unquoted elements
//! borrow straight from the input.

use crate::error::{CompositeError, Result};
use crate::reader::Reader;

pub const OPEN: u8 = b'(';
pub const CLOSE: u8 = b')';
pub const DELIMITER: u8 = b',';
pub const QUOTE: u8 = b'"';
pub const ESCAPE: u8 = b'\\';

/// One step of tokenizer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    /// An element. `None` is an unquoted empty element (SQL NULL).
    Elem(Option<&'t [u8]>),
    /// The closing parenthesis was reached; no more elements follow.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the opening parenthesis.
    Open,
    /// Inside the parentheses, no element read yet.
    Start,
    /// Just consumed a `,`; an element (possibly empty) must follow.
    Next,
    /// A quoted element just closed; expects `,` or `)`.
    AfterElement,
    /// The closing parenthesis was consumed by the last element.
    Closing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuotedState {
    Quoted,
    QuotedEscape,
}

/// Where the bytes of the element just read live.
enum Step {
    Null,
    Input(usize, usize),
    Buffered,
    End,
}

/// Streaming tokenizer over one composite literal.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a [u8],
    reader: Reader<'a>,
    state: State,
    buf: Vec<u8>,
    elements: usize,
    failure: Option<(usize, String)>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned before the literal's opening
    /// parenthesis. Leading ASCII whitespace is ignored.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            reader: Reader::new(input),
            state: State::Open,
            buf: Vec::new(),
            elements: 0,
            failure: None,
        }
    }

    /// Number of elements produced so far.
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Returns the next element, or [`Token::End`] once the closing
    /// parenthesis has been consumed.
    ///
    /// Grammar violations return `MalformedLiteral`; the error is sticky and
    /// every later call returns it again.
    pub fn next_elem(&mut self) -> Result<Token<'_>> {
        if let Some((offset, message)) = &self.failure {
            return Err(CompositeError::malformed(*offset, message.clone()));
        }
        let step = match self.step() {
            Ok(step) => step,
            Err(err) => {
                if let CompositeError::MalformedLiteral { offset, message } = &err {
                    self.failure = Some((*offset, message.clone()));
                }
                return Err(err);
            }
        };
        Ok(match step {
            Step::Null => Token::Elem(None),
            Step::Input(start, end) => Token::Elem(Some(&self.input[start..end])),
            Step::Buffered => Token::Elem(Some(&self.buf)),
            Step::End => Token::End,
        })
    }

    fn step(&mut self) -> Result<Step> {
        loop {
            match self.state {
                State::Open => {
                    self.reader.skip_whitespace();
                    let at = self.reader.position();
                    match self.reader.next_byte() {
                        Some(OPEN) => self.state = State::Start,
                        Some(b) => {
                            return Err(CompositeError::malformed(
                                at,
                                format!("expected '(', found {:?}", b as char),
                            ))
                        }
                        None => return Err(CompositeError::malformed(at, "empty input")),
                    }
                }
                State::Start | State::Next => return self.read_element(),
                State::AfterElement => {
                    let at = self.reader.position();
                    match self.reader.next_byte() {
                        Some(DELIMITER) => return self.after_delimiter(),
                        Some(CLOSE) => self.state = State::Closing,
                        Some(b) => {
                            return Err(CompositeError::malformed(
                                at,
                                format!(
                                    "expected ',' or ')' after quoted element, found {:?}",
                                    b as char
                                ),
                            ))
                        }
                        None => return Err(truncated(at)),
                    }
                }
                State::Closing => {
                    self.finish()?;
                    return Ok(Step::End);
                }
                State::Done => return Ok(Step::End),
            }
        }
    }

    /// A `,` always introduces another element, so an element must be read
    /// before control returns to the caller.
    fn after_delimiter(&mut self) -> Result<Step> {
        self.state = State::Next;
        self.read_element()
    }

    fn read_element(&mut self) -> Result<Step> {
        let at = self.reader.position();
        match self.reader.peek() {
            None => Err(truncated(at)),
            Some(CLOSE) => {
                self.reader.next_byte();
                if self.state == State::Start {
                    self.finish()?;
                    return Ok(Step::End);
                }
                // `(a,)`: an empty element sits between the comma and the close.
                self.state = State::Closing;
                Ok(self.produce(Step::Null))
            }
            Some(DELIMITER) => {
                self.reader.next_byte();
                self.state = State::Next;
                Ok(self.produce(Step::Null))
            }
            Some(QUOTE) => {
                self.reader.next_byte();
                self.read_quoted(at)?;
                self.state = State::AfterElement;
                Ok(self.produce(Step::Buffered))
            }
            Some(_) => {
                let start = self.reader.position();
                let len = self
                    .reader
                    .take_until(|b| b == DELIMITER || b == CLOSE)
                    .len();
                let end = start + len;
                match self.reader.next_byte() {
                    Some(DELIMITER) => self.state = State::Next,
                    Some(_) => self.state = State::Closing,
                    None => return Err(truncated(end)),
                }
                Ok(self.produce(Step::Input(start, end)))
            }
        }
    }

    fn read_quoted(&mut self, open: usize) -> Result<()> {
        self.buf.clear();
        let mut state = QuotedState::Quoted;
        loop {
            let Some(b) = self.reader.next_byte() else {
                return Err(CompositeError::malformed(open, "unterminated quoted element"));
            };
            match state {
                QuotedState::QuotedEscape => {
                    self.buf.push(b);
                    state = QuotedState::Quoted;
                }
                QuotedState::Quoted => match b {
                    ESCAPE => state = QuotedState::QuotedEscape,
                    QUOTE if self.reader.peek() == Some(QUOTE) => {
                        self.reader.next_byte();
                        self.buf.push(QUOTE);
                    }
                    QUOTE => return Ok(()),
                    _ => self.buf.push(b),
                },
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.reader.skip_whitespace();
        if !self.reader.is_empty() {
            return Err(CompositeError::malformed(
                self.reader.position(),
                format!(
                    "{} unexpected byte(s) after closing parenthesis",
                    self.reader.remaining()
                ),
            ));
        }
        self.state = State::Done;
        Ok(())
    }

    fn produce(&mut self, step: Step) -> Step {
        self.elements += 1;
        step
    }
}

fn truncated(offset: usize) -> CompositeError {
    CompositeError::malformed(offset, "input ended before closing parenthesis")
}

/// Splits a whole literal into owned elements.
///
/// Handy for inspecting a literal without a field table; the decoder itself
/// streams through [`Tokenizer`] instead.
pub fn split(literal: &[u8]) -> Result<Vec<Option<Vec<u8>>>> {
    let mut tokenizer = Tokenizer::new(literal);
    let mut elems = Vec::new();
    while let Token::Elem(elem) = tokenizer.next_elem()? {
        elems.push(elem.map(<[u8]>::to_vec));
    }
    Ok(elems)
}
