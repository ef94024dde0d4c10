//! Configuration options for the combinator parser.
//!
//! - [`ParserOptions`]: main configuration struct
//! - [`UnitStructs`]: which cache resolves bare type names
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use ron_notation::{parse_with_options, ParserOptions, UnitStructCache};
//!
//! // Unit structs shared only between parses that use this cache
//! let cache = Arc::new(UnitStructCache::new());
//! let options = ParserOptions::new().with_cache(Arc::clone(&cache));
//! parse_with_options("[Red, Green, Red]", &options).unwrap();
//! assert_eq!(cache.names(), vec!["Red".to_string(), "Green".to_string()]);
//!
//! // Very long sequences need a looser end-of-input guard
//! let big = format!("[{}]", vec!["1"; 20_000].join(", "));
//! assert!(parse_with_options(&big, &ParserOptions::new()).is_err());
//! let options = ParserOptions::new().with_loop_guard(None);
//! assert_eq!(parse_with_options(&big, &options).unwrap().as_list().unwrap().len(), 20_000);
//!
//! // Nesting is limited separately
//! let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
//! assert!(parse_with_options(&deep, &ParserOptions::new()).is_err());
//! let options = ParserOptions::new().with_max_depth(Some(256));
//! assert!(parse_with_options(&deep, &options).is_ok());
//! ```

use crate::{Struct, UnitStructCache};
use std::sync::Arc;

/// Default limit on end-of-input checks per parse.
pub const DEFAULT_LOOP_GUARD: usize = 10_000;

/// Default limit on how deeply values may nest.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Scope of the cache that resolves unit structs.
#[derive(Clone, Debug, Default)]
pub enum UnitStructs {
    /// Share instances across the whole process
    #[default]
    Global,
    /// Share instances between parsers holding this cache
    Shared(Arc<UnitStructCache>),
    /// Every occurrence gets a fresh instance
    Disabled,
}

/// Configuration for [`Parser`](crate::Parser).
///
/// # Examples
///
/// ```rust
/// use ron_notation::{ParserOptions, UnitStructs};
///
/// let options = ParserOptions::new()
///     .without_unit_struct_cache()
///     .with_loop_guard(Some(50_000))
///     .with_max_depth(Some(32));
/// assert!(matches!(options.unit_structs, UnitStructs::Disabled));
/// assert_eq!(options.loop_guard, Some(50_000));
/// assert_eq!(options.max_depth, Some(32));
/// ```
#[derive(Clone, Debug)]
pub struct ParserOptions {
    /// Cache used for bare type names
    pub unit_structs: UnitStructs,
    /// Maximum end-of-input checks per parse; `None` disables the guard
    pub loop_guard: Option<usize>,
    /// Maximum nesting depth of values; `None` removes the limit
    pub max_depth: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            unit_structs: UnitStructs::Global,
            loop_guard: Some(DEFAULT_LOOP_GUARD),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ParserOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unit_structs(mut self, unit_structs: UnitStructs) -> Self {
        self.unit_structs = unit_structs;
        self
    }

    #[must_use]
    pub fn with_cache(self, cache: Arc<UnitStructCache>) -> Self {
        self.with_unit_structs(UnitStructs::Shared(cache))
    }

    #[must_use]
    pub fn without_unit_struct_cache(self) -> Self {
        self.with_unit_structs(UnitStructs::Disabled)
    }

    #[must_use]
    pub fn with_loop_guard(mut self, loop_guard: Option<usize>) -> Self {
        self.loop_guard = loop_guard;
        self
    }

    /// Without a limit, deeply nested input can exhaust the stack.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolves a bare type name according to [`ParserOptions::unit_structs`].
    pub(crate) fn unit_struct(&self, name: &str) -> Arc<Struct> {
        match &self.unit_structs {
            UnitStructs::Global => UnitStructCache::global().get_or_insert(name),
            UnitStructs::Shared(cache) => cache.get_or_insert(name),
            UnitStructs::Disabled => Arc::new(Struct::unit(name)),
        }
    }
}
