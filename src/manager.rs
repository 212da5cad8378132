//! Cache manager.
//!
//! A `CacheManager` owns a set of named caches and hands out shared handles
//! to them. Looking up a name that does not exist yet creates the cache, so
//! callers never coordinate creation. A disabled manager hands out nothing,
//! which is how deployments switch caching off without touching call sites.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::store::NamedCache;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of named caches sharing one configuration.
pub struct CacheManager {
    name: String,
    caches: DashMap<String, Arc<NamedCache>>,
    config: CacheConfig,
}

impl CacheManager {
    /// Create a manager with the default cache configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CacheConfig::default())
    }

    /// Create a manager whose caches all use `config`.
    pub fn with_config(name: impl Into<String>, config: CacheConfig) -> Self {
        let name = name.into();
        debug!(manager = %name, enabled = config.enabled, "Creating cache manager");
        Self {
            name,
            caches: DashMap::new(),
            config,
        }
    }

    /// Create a manager that hands out no caches at all.
    pub fn disabled(name: impl Into<String>) -> Self {
        Self::with_config(name, CacheConfig::new().disabled())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Fetch the cache with this name, creating it on first use.
    ///
    /// Returns [`CacheError::Unavailable`] when the manager is disabled.
    /// Callers that treat the cache as optional match on the error and
    /// carry on.
    pub fn named_cache(&self, name: &str) -> CacheResult<Arc<NamedCache>> {
        if !self.config.enabled {
            debug!(manager = %self.name, cache = %name, "Cache manager disabled, no cache returned");
            return Err(CacheError::Unavailable {
                manager: self.name.clone(),
                cache: name.to_string(),
            });
        }
        let cache = self
            .caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(NamedCache::new(&self.name, name, &self.config)))
            .clone();
        Ok(cache)
    }

    /// Destroy a named cache, dropping all of its entries.
    ///
    /// Outstanding handles keep the old storage alive but detached; the next
    /// [`named_cache`](Self::named_cache) call for this name creates a fresh
    /// one.
    pub fn destroy_cache(&self, name: &str) -> bool {
        let destroyed = self.caches.remove(name).is_some();
        if destroyed {
            debug!(manager = %self.name, cache = %name, "Destroyed named cache");
        }
        destroyed
    }

    /// Names of all caches created so far, in no particular order.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.iter().map(|entry| entry.key().clone()).collect()
    }
}
