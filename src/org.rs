//! Tenant organization caching module.
//!
//! Provides the organization-id keyed cache of tenant records. Every
//! operation runs inside a super-tenant flow and degrades to a no-op when
//! the cache is unavailable, so callers treat the cache as best-effort.

use crate::context::TenantFlow;
use crate::keys::{CacheKey, OrganizationId};
use crate::manager::CacheManager;
use crate::store::NamedCache;
use crate::CacheOperations;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Name of the tenant organization cache within its manager.
pub const TENANT_ORG_CACHE: &str = "tenant_org_id";

/// Cached tenant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTenant {
    pub id: i32,
    pub domain: String,
    pub active: bool,
    pub cached_at: DateTime<Utc>,
}

impl CachedTenant {
    pub fn new(id: i32, domain: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            domain: domain.into(),
            active,
            cached_at: Utc::now(),
        }
    }
}

/// Organization-id keyed tenant cache.
///
/// Holds a shared [`CacheManager`] and fetches a fresh handle to the
/// [`TENANT_ORG_CACHE`] named cache on every operation, so a cache destroyed
/// or recreated under the manager is picked up transparently. All operations
/// are infallible at this level; failures are logged at debug and read as
/// absence.
pub struct TenantOrgCache {
    manager: Arc<CacheManager>,
}

impl TenantOrgCache {
    pub fn new(manager: Arc<CacheManager>) -> Self {
        Self { manager }
    }

    fn handle(&self) -> Option<Arc<NamedCache>> {
        match self.manager.named_cache(TENANT_ORG_CACHE) {
            Ok(cache) => Some(cache),
            Err(e) => {
                debug!(error = %e, "Tenant organization cache unavailable, skipping");
                None
            }
        }
    }

    /// Cache an entry under this organization id, replacing any existing one.
    pub fn put<T: Serialize>(&self, org_id: &OrganizationId, entry: &T) {
        let _flow = TenantFlow::enter_super();
        let Some(cache) = self.handle() else { return };
        let key = CacheKey::tenant_org(org_id);

        // Remove first so an overwrite is explicit rather than provider-defined.
        cache.remove(&key);
        match cache.put(&key, entry) {
            Ok(()) => debug!(
                org_id = %org_id,
                cache = %cache.name(),
                manager = %cache.manager_name(),
                "Cached tenant organization entry"
            ),
            Err(e) => debug!(
                org_id = %org_id,
                cache = %cache.name(),
                error = %e,
                "Failed to cache tenant organization entry"
            ),
        }
    }

    /// Look up the entry cached under this organization id.
    pub fn get<T: DeserializeOwned>(&self, org_id: &OrganizationId) -> Option<T> {
        let _flow = TenantFlow::enter_super();
        let cache = self.handle()?;
        let key = CacheKey::tenant_org(org_id);

        match cache.get::<T>(&key) {
            Ok(Some(entry)) => {
                debug!(org_id = %org_id, cache = %cache.name(), "Tenant organization cache hit");
                Some(entry)
            }
            Ok(None) => {
                debug!(org_id = %org_id, cache = %cache.name(), "Tenant organization cache miss");
                None
            }
            Err(e) => {
                debug!(
                    org_id = %org_id,
                    cache = %cache.name(),
                    error = %e,
                    "Tenant organization cache read failed"
                );
                None
            }
        }
    }

    /// Remove the entry cached under this organization id, if any.
    pub fn remove(&self, org_id: &OrganizationId) {
        let _flow = TenantFlow::enter_super();
        let Some(cache) = self.handle() else { return };
        let key = CacheKey::tenant_org(org_id);

        if cache.remove(&key) {
            debug!(
                org_id = %org_id,
                cache = %cache.name(),
                manager = %cache.manager_name(),
                "Removed tenant organization entry"
            );
        } else {
            debug!(org_id = %org_id, cache = %cache.name(), "No tenant organization entry to remove");
        }
    }

    /// Remove every entry from the tenant organization cache.
    pub fn clear(&self) {
        let _flow = TenantFlow::enter_super();
        let Some(cache) = self.handle() else { return };

        let removed = cache.remove_all();
        debug!(
            cache = %cache.name(),
            manager = %cache.manager_name(),
            removed,
            "Cleared tenant organization cache"
        );
    }
}
