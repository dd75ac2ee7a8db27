//! # composite-core
//!
//! Decoder and encoder for the textual composite (row) literal format:
//! a parenthesized, comma-separated list of optionally double-quoted fields,
//! such as `(42,"Main St, 5",,t)`.
//!
//! The codec knows the grammar, not the field types. Each record type
//! declares an ordered [`Table`] of field descriptors through [`Composite`];
//! the codec tokenizes the literal and hands element `i` to field `i`.
//!
//! ## Quick start
//!
//! ```rust
//! use composite_core::{decode, encode, Composite, TableBuilder};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Address {
//!     street: String,
//!     zip: Option<i32>,
//! }
//!
//! impl Composite for Address {
//!     const NAME: &'static str = "address";
//!
//!     fn describe(table: &mut TableBuilder<Self>) {
//!         table
//!             .field("street", |a| &a.street, |a| &mut a.street)
//!             .field("zip", |a| &a.zip, |a| &mut a.zip);
//!     }
//! }
//!
//! let addr: Address = decode(br#"("Main St, 5",)"#).unwrap();
//! assert_eq!(addr, Address { street: "Main St, 5".into(), zip: None });
//! assert_eq!(encode(&addr).unwrap(), br#"("Main St, 5",)"#);
//! ```
//!
//! ## Modules
//!
//! - [`tokenizer`]: literal bytes → raw element slices
//! - [`decoder`]: elements → record, best-effort with first-error reporting
//! - [`encoder`]: record → literal bytes
//! - [`table`]: field descriptors and per-type tables
//! - [`registry`]: cached type → table lookup
//! - [`quote`]: quote-level aware escaping for field converters
//! - [`value`]: stock converters for common field types
//! - [`error`]: error types

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod quote;
pub mod reader;
pub mod registry;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use codec::{CompositeCodec, Target};
pub use error::{CompositeError, FieldError, Result};
pub use quote::QuoteLevel;
pub use registry::Registry;
pub use table::{Composite, FieldDescriptor, Table, TableBuilder};
pub use tokenizer::{Token, Tokenizer};
pub use value::{FieldValue, Json};

/// Decode a composite literal into a fresh `R`.
///
/// Any error discards the partially decoded record; use
/// [`CompositeCodec::decode`] to keep it.
pub fn decode<R: Composite>(literal: &[u8]) -> Result<R> {
    let mut record = R::default();
    CompositeCodec::<R>::new().decode_value(&mut record, literal)?;
    Ok(record)
}

/// Encode `record` as a top-level composite literal.
pub fn encode<R: Composite>(record: &R) -> Result<Vec<u8>> {
    CompositeCodec::<R>::new().to_literal(record)
}
