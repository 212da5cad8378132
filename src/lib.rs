//! Multi-tenant organization cache.
//!
//! Provides:
//! - A tenant organization cache facade keyed by organization id
//! - A cache manager handing out named, independently-scoped caches
//! - Scoped tenant flows with RAII restore of the calling context
//! - Versioned cache key schema
//! - TTL with jitter and bounded capacity per cache
//! - Per-cache Prometheus counters
//!
//! The facade is deliberately forgiving: when its cache is unavailable it
//! logs at debug level and behaves as an empty cache. Services that need to
//! observe failures use the [`CacheManager`] and [`CacheOperations`] layer
//! directly, which returns typed [`CacheResult`] errors.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tenant_cache::{CacheManager, CachedTenant, OrganizationId, TenantOrgCache};
//!
//! let manager = Arc::new(CacheManager::new("user_core"));
//! let cache = TenantOrgCache::new(manager);
//!
//! let org = OrganizationId::from("10084a8d-113f-4211-a0d5-efe36b082211");
//! cache.put(&org, &CachedTenant::new(42, "acme.example", true));
//!
//! let tenant: Option<CachedTenant> = cache.get(&org);
//! assert_eq!(tenant.map(|t| t.domain), Some("acme.example".to_string()));
//! ```

mod config;
mod context;
mod error;
mod keys;
mod manager;
mod metrics;
mod org;
mod store;

pub use config::{CacheConfig, DEFAULT_MAX_ENTRIES};
pub use context::{
    current_tenant, flow_depth, set_active_tenant, with_tenant, TenantFlow, TenantIdentity,
    SUPER_TENANT_DOMAIN, SUPER_TENANT_ID,
};
pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, OrganizationId, CACHE_VERSION};
pub use manager::CacheManager;
pub use metrics::CacheMetrics;
pub use org::{CachedTenant, TenantOrgCache, TENANT_ORG_CACHE};
pub use store::NamedCache;

use serde::{de::DeserializeOwned, Serialize};

/// Core operations of a named cache.
///
/// Values are stored by value: `put` serializes, `get` deserializes a fresh
/// copy, so mutating a returned value never affects the cached one.
pub trait CacheOperations {
    /// Store a value under `key`, replacing any existing entry.
    fn put<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<()>;

    /// Fetch the value under `key`, or `None` when absent or expired.
    fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>>;

    /// Whether a live entry exists under `key`.
    fn contains_key(&self, key: &str) -> bool;

    /// Remove the entry under `key`; `true` if one was removed.
    fn remove(&self, key: &str) -> bool;

    /// Remove every entry; returns how many were removed.
    fn remove_all(&self) -> usize;
}
