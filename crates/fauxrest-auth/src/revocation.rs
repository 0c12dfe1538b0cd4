//! Revoked token ids.
//!
//! A revocation entry maps a token's `jti` to the last second the token would
//! still verify (its `exp` plus leeway). Once that moment passes the token is
//! rejected for being expired anyway, so the entry can be pruned.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

/// Storage for token ids invalidated before their natural expiry.
///
/// Implementations must make [`revoke`](RevocationList::revoke) idempotent.
pub trait RevocationList: Send + Sync {
    /// Marks `jti` as revoked through `expires_at` (Unix seconds, inclusive).
    fn revoke(&self, jti: &str, expires_at: i64);

    fn is_revoked(&self, jti: &str) -> bool;

    /// Drops entries whose `expires_at` lies strictly before `now`. Returns how many were removed.
    fn prune(&self, now: i64) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local revocation list. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRevocationList {
    entries: RwLock<HashMap<String, i64>>,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationList for MemoryRevocationList {
    fn revoke(&self, jti: &str, expires_at: i64) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(jti.to_string(), expires_at);
        debug!(token.jti = %jti, revoked.count = entries.len(), "Token revoked");
    }

    fn is_revoked(&self, jti: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(jti)
    }

    fn prune(&self, now: i64) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at >= now);
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_then_is_revoked() {
        let list = MemoryRevocationList::new();
        assert!(!list.is_revoked("a"));

        list.revoke("a", 2_000);

        assert!(list.is_revoked("a"));
        assert!(!list.is_revoked("b"));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let list = MemoryRevocationList::new();
        list.revoke("a", 2_000);
        list.revoke("a", 2_000);

        assert_eq!(list.len(), 1);
        assert!(list.is_revoked("a"));
    }

    #[test]
    fn test_prune_drops_only_expired_entries() {
        let list = MemoryRevocationList::new();
        list.revoke("old", 1_000);
        list.revoke("edge", 1_500);
        list.revoke("fresh", 2_000);

        assert_eq!(list.prune(1_500), 1);
        assert_eq!(list.len(), 2);
        assert!(list.is_revoked("edge"));
        assert!(list.is_revoked("fresh"));
        assert!(!list.is_revoked("old"));

        assert_eq!(list.prune(1_501), 1);
        assert!(!list.is_revoked("edge"));
    }

    #[test]
    fn test_empty_list() {
        let list = MemoryRevocationList::new();
        assert!(list.is_empty());
        assert_eq!(list.prune(0), 0);
    }
}
