//! Cache key schema
//!
//! All lookups go through these builders so every consumer agrees on key
//! layout. Key format: v{VERSION}:{entity}:{identifier}

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Cache schema version - increment when changing key formats
pub const CACHE_VERSION: u32 = 1;

/// Opaque tenant organization identifier.
///
/// Equality and hashing follow the underlying id string and nothing else;
/// two values compare equal exactly when their organization ids do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrganizationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrganizationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for OrganizationId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Tenant lookup by organization id.
    /// Format: v1:tenant_org:{org_id}
    pub fn tenant_org(org_id: &OrganizationId) -> String {
        format!("v{}:tenant_org:{}", CACHE_VERSION, org_id)
    }

    /// Extract entity type from a key
    pub fn entity_type(key: &str) -> Option<&str> {
        // Format: v{N}:{entity}:...
        let mut parts = key.splitn(3, ':');
        let _version = parts.next()?;
        parts.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_org_key() {
        let org = OrganizationId::new("10084a8d-113f-4211-a0d5-efe36b082211");
        let key = CacheKey::tenant_org(&org);
        assert_eq!(key, "v1:tenant_org:10084a8d-113f-4211-a0d5-efe36b082211");
    }

    #[test]
    fn test_key_equality_tracks_org_id() {
        let a = OrganizationId::new("org-1");
        let b = OrganizationId::from("org-1");
        let c = OrganizationId::new("org-2");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(CacheKey::tenant_org(&a), CacheKey::tenant_org(&b));
        assert_ne!(CacheKey::tenant_org(&a), CacheKey::tenant_org(&c));
    }

    #[test]
    fn test_from_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let org = OrganizationId::from(id);
        assert_eq!(org.as_str(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_entity_type() {
        assert_eq!(CacheKey::entity_type("v1:tenant_org:123"), Some("tenant_org"));
        assert_eq!(CacheKey::entity_type("v1:realm_config:abc:def"), Some("realm_config"));
        assert_eq!(CacheKey::entity_type("invalid"), None);
    }

    #[test]
    fn test_serde_transparent() {
        let org = OrganizationId::new("org-9");
        let json = serde_json::to_string(&org).unwrap();
        assert_eq!(json, "\"org-9\"");
        let back: OrganizationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, org);
    }
}
