//! Composite encoder: record → literal bytes.
//!
//! The encoder only writes the punctuation, `(`, `,` and `)`. Each field
//! renders and quotes its own text for the [`QuoteLevel`] it is handed, which
//! is passed through unchanged. A nested composite field is what moves
//! one level deeper.
//!
//! # Example
//! ```
//! use composite_core::{Composite, CompositeCodec, QuoteLevel, TableBuilder};
//!
//! #[derive(Default)]
//! struct Tag {
//!     id: i64,
//!     label: String,
//! }
//!
//! impl Composite for Tag {
//!     const NAME: &'static str = "tag";
//!
//!     fn describe(table: &mut TableBuilder<Self>) {
//!         table
//!             .field("id", |t| &t.id, |t| &mut t.id)
//!             .field("label", |t| &t.label, |t| &mut t.label);
//!     }
//! }
//!
//! let tag = Tag { id: 7, label: "a, b".to_string() };
//! let mut out = Vec::new();
//! CompositeCodec::<Tag>::new()
//!     .encode(&mut out, &tag, QuoteLevel::NONE)
//!     .unwrap();
//! assert_eq!(out, b"(7,\"a, b\")");
//! ```

use crate::codec::CompositeCodec;
use crate::error::{CompositeError, Result};
use crate::quote::QuoteLevel;
use crate::table::Composite;
use crate::tokenizer::{CLOSE, DELIMITER, OPEN};

impl<R: Composite> CompositeCodec<R> {
    /// Appends the literal for `source` to `out`.
    ///
    /// Fails only when the table cannot be resolved or a field cannot render
    /// its value; in the latter case `out` holds a partial literal and should
    /// be discarded.
    pub fn encode(&self, out: &mut Vec<u8>, source: &R, level: QuoteLevel) -> Result<()> {
        let table = self.table()?;
        out.push(OPEN);
        for (i, field) in table.fields().iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER);
            }
            field
                .append(out, source, level)
                .map_err(|err| CompositeError::FieldEncode {
                    table: table.name(),
                    field: field.name(),
                    source: err,
                })?;
        }
        out.push(CLOSE);
        Ok(())
    }

    /// Encodes `source` as a standalone literal.
    pub fn to_literal(&self, source: &R) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out, source, QuoteLevel::NONE)?;
        Ok(out)
    }
}
