//! Composite decoder: literal bytes → record.
//!
//! Decoding is best-effort. Every element is offered to its field even after
//! an earlier field failed, so the record ends up as complete as the input
//! allows, and the first problem is the one reported. Only a malformed
//! literal stops the loop early, because nothing read after it can be trusted.
//!
//! # Key design decisions
//!
//! - **Fewer elements than fields is fine**: the remaining fields keep the
//!   value they had before the call.
//! - **More elements than fields is an error, but not fatal**: the excess is
//!   still tokenized so the literal is checked through to its close.
//! - **NULL composite**: `None` input resets the target without tokenizing.

use tracing::{debug, trace};

use crate::codec::{CompositeCodec, Target};
use crate::error::{CompositeError, Result};
use crate::table::{Composite, Table};
use crate::tokenizer::{Token, Tokenizer};

impl<R: Composite> CompositeCodec<R> {
    /// Decodes `input` into `target`. `None` input is a NULL composite.
    ///
    /// On error the target keeps every field that converted successfully.
    pub fn decode(&self, target: Target<'_, R>, input: Option<&[u8]>) -> Result<()> {
        let unwritable = CompositeError::Unwritable { type_name: R::NAME };
        let (target, input) = match (target, input) {
            (Target::ReadOnly(_), _) => return Err(unwritable),
            (Target::Value(record), None) => {
                *record = R::default();
                return Ok(());
            }
            (Target::Optional(slot), None) => {
                *slot = None;
                return Ok(());
            }
            (target, Some(input)) => (target, input),
        };

        let table = self.table()?;
        let record = match target {
            Target::Value(record) => record,
            Target::Optional(slot) => slot.get_or_insert_with(R::default),
            Target::ReadOnly(_) => return Err(unwritable),
        };
        decode_fields(table, record, input)
    }

    /// Decodes a non-NULL literal into `record`.
    pub fn decode_value(&self, record: &mut R, input: &[u8]) -> Result<()> {
        self.decode(Target::Value(record), Some(input))
    }
}

fn decode_fields<R>(table: &Table<R>, record: &mut R, input: &[u8]) -> Result<()> {
    let mut tokenizer = Tokenizer::new(input);
    let mut first_err: Option<CompositeError> = None;
    let mut index = 0;

    loop {
        let elem = match tokenizer.next_elem() {
            Ok(Token::Elem(elem)) => elem,
            Ok(Token::End) => break,
            Err(err) => {
                debug!(table = table.name(), index, error = %err, "rejected composite literal");
                return Err(err);
            }
        };

        match table.field(index) {
            None => {
                if first_err.is_none() {
                    trace!(
                        table = table.name(),
                        fields = table.len(),
                        index,
                        "composite has more values than fields"
                    );
                    first_err = Some(CompositeError::FieldCountMismatch {
                        table: table.name(),
                        fields: table.len(),
                        index,
                    });
                }
            }
            Some(field) => {
                if let Err(source) = field.scan(record, elem) {
                    debug!(
                        table = table.name(),
                        field = field.name(),
                        index,
                        error = %source,
                        "field conversion failed"
                    );
                    if first_err.is_none() {
                        first_err = Some(CompositeError::FieldConversion {
                            table: table.name(),
                            field: field.name(),
                            index,
                            source,
                        });
                    }
                }
            }
        }
        index += 1;
    }

    trace!(table = table.name(), elements = index, "decoded composite");
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
