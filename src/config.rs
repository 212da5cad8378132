//! Cache provider configuration.
//!
//! `CacheConfig` carries the policy a [`CacheManager`](crate::CacheManager)
//! applies to the caches it creates: entry capacity, time-to-live, and
//! whether caching is enabled at all. Deployments that tune caching without
//! a rebuild can override the defaults from the environment:
//!
//! - `TENANT_CACHE_ENABLED` - `true`/`false`, default `true`
//! - `TENANT_CACHE_MAX_ENTRIES` - per-cache capacity, `0` for unbounded
//! - `TENANT_CACHE_TTL_SECS` - entry lifetime in seconds, `0` to never expire

use crate::error::{CacheError, CacheResult};
use std::env;
use std::time::Duration;

/// Default maximum number of entries per named cache.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Policy applied to every cache a manager creates.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entries per cache; `None` means unbounded.
    pub max_entries: Option<usize>,
    /// Entry time-to-live; `None` means entries never expire.
    pub ttl: Option<Duration>,
    /// Apply 0-10% random jitter to TTLs so entries stored together do not
    /// expire together.
    pub ttl_jitter: bool,
    /// A disabled configuration makes every cache lookup answer unavailable.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(DEFAULT_MAX_ENTRIES),
            ttl: None,
            ttl_jitter: true,
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_entries = None;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.ttl_jitter = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Build a config from environment overrides, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> CacheResult<Self> {
        let enabled: bool = env::var("TENANT_CACHE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|_| {
                CacheError::Configuration("invalid TENANT_CACHE_ENABLED, expected true/false".into())
            })?;

        let max_entries: usize = env::var("TENANT_CACHE_MAX_ENTRIES")
            .unwrap_or_else(|_| DEFAULT_MAX_ENTRIES.to_string())
            .parse()
            .map_err(|_| {
                CacheError::Configuration("invalid TENANT_CACHE_MAX_ENTRIES, expected an integer".into())
            })?;

        let ttl_secs: u64 = env::var("TENANT_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| {
                CacheError::Configuration("invalid TENANT_CACHE_TTL_SECS, expected seconds".into())
            })?;

        Ok(Self {
            max_entries: (max_entries > 0).then_some(max_entries),
            ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            ttl_jitter: true,
            enabled,
        })
    }
}
