//! Table registry: type → [`Table`] lookup with a shared cache.
//!
//! Tables are derived on first lookup and cached by `TypeId`. Concurrent
//! first lookups of the same type may each derive a table; the first insert
//! wins and every caller gets that one.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::debug;

use crate::error::{CompositeError, Result};
use crate::table::{Composite, Table};

type Entry = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Registry {
    tables: DashMap<TypeId, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`CompositeCodec::new`].
    ///
    /// [`CompositeCodec::new`]: crate::CompositeCodec::new
    pub fn global() -> Arc<Registry> {
        static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Registry::new())))
    }

    /// Returns the table for `R`, deriving and caching it on first use.
    pub fn table<R: Composite>(&self) -> Result<Arc<Table<R>>> {
        let id = TypeId::of::<R>();
        // Clone out of the map before deriving; a derivation never runs
        // while a shard lock is held.
        let cached = self.tables.get(&id).map(|entry| Arc::clone(entry.value()));
        let entry = match cached {
            Some(entry) => entry,
            None => {
                let table = Table::<R>::derive()?;
                debug!(table = R::NAME, fields = table.len(), "derived composite table");
                let table: Entry = Arc::new(table);
                Arc::clone(self.tables.entry(id).or_insert(table).value())
            }
        };
        entry
            .downcast::<Table<R>>()
            .map_err(|_| CompositeError::Lookup {
                type_name: R::NAME,
                message: "registry entry holds a different type".to_string(),
            })
    }

    /// True once a table for `R` has been cached.
    pub fn contains<R: Composite>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<R>())
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tables", &self.tables.len())
            .finish()
    }
}
