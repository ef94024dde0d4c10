//! Canonical instances for unit structs.
//!
//! A bare type name such as `Coin` denotes a unit struct. Every occurrence of the
//! same name resolved through one [`UnitStructCache`] yields the same `Arc`, so
//! consumers can compare unit structs by identity. Entries are created lazily
//! and never evicted. A parse only inserts the names that appear as unit
//! structs in the document it returns.
//!
//! The cache is an explicit object. The process-wide instance is
//! [`UnitStructCache::global`]; parsers pick a scope through
//! [`UnitStructs`](crate::UnitStructs).
//!
//! ```rust
//! use std::sync::Arc;
//! use ron_notation::UnitStructCache;
//!
//! let cache = UnitStructCache::new();
//! let a = cache.get_or_insert("Coin");
//! let b = cache.get_or_insert("Coin");
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(cache.names(), vec!["Coin".to_string()]);
//! ```

use crate::Struct;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::trace;

/// Map from type name to its canonical zero-field [`Struct`].
///
/// Lookup-or-insert runs under one lock, so concurrent first uses of a name
/// still agree on a single instance.
#[derive(Debug, Default)]
pub struct UnitStructCache {
    entries: Mutex<IndexMap<String, Arc<Struct>>>,
}

static GLOBAL: OnceLock<UnitStructCache> = OnceLock::new();

impl UnitStructCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by default parser options.
    pub fn global() -> &'static UnitStructCache {
        GLOBAL.get_or_init(UnitStructCache::new)
    }

    /// Returns the canonical instance for `name`, creating it on first use.
    pub fn get_or_insert(&self, name: &str) -> Arc<Struct> {
        let mut entries = self.lock();
        if let Some(existing) = entries.get(name) {
            return Arc::clone(existing);
        }
        trace!(name, "caching unit struct");
        let created = Arc::new(Struct::unit(name));
        entries.insert(name.to_string(), Arc::clone(&created));
        created
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Cached names in first-seen order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    // A panic while holding the lock cannot leave a half-inserted entry.
    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Arc<Struct>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
