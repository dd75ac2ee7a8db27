//! The codec handle shared by the decoder and encoder.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::registry::Registry;
use crate::table::{Composite, Table};

/// Where a decoded composite goes.
#[derive(Debug)]
pub enum Target<'r, R> {
    /// A record slot. NULL resets it to `R::default()`.
    Value(&'r mut R),
    /// A NULL-able record slot. NULL sets it to `None`; a value materializes
    /// a default record first if the slot is empty.
    Optional(&'r mut Option<R>),
    /// A shared borrow. Decoding into it fails with `Unwritable`.
    ReadOnly(&'r R),
}

/// Composite literal decoder/encoder for record type `R`.
///
/// The field table is resolved through the registry on first use and kept
/// for the codec's lifetime.
pub struct CompositeCodec<R> {
    registry: Arc<Registry>,
    table: OnceLock<Arc<Table<R>>>,
}

impl<R: Composite> CompositeCodec<R> {
    /// A codec backed by [`Registry::global`].
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            table: OnceLock::new(),
        }
    }

    /// The field table for `R`.
    pub fn table(&self) -> Result<&Table<R>> {
        if let Some(table) = self.table.get() {
            return Ok(table.as_ref());
        }
        let table = self.registry.table::<R>()?;
        Ok(self.table.get_or_init(|| table).as_ref())
    }
}

impl<R: Composite> Default for CompositeCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for CompositeCodec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeCodec")
            .field("table", &self.table.get())
            .finish()
    }
}
