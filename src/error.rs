//! Cache error types

use thiserror::Error;

/// Errors surfaced by the caching layer.
///
/// The provider layer (`CacheManager`, `NamedCache`) returns these.
/// `TenantOrgCache` swallows them: writes degrade to no-ops and reads
/// answer absent, with a debug log either way.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No cache handle can be produced because the manager is disabled.
    #[error("cache {cache} under manager {manager} is unavailable")]
    Unavailable { manager: String, cache: String },

    /// Entry payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
