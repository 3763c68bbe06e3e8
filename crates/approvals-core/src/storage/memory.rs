//! In-memory approvals store.
//!
//! Keeps each principal's grants in a map guarded by a `tokio` `RwLock`.
//! Every replace bumps a per-principal version; when versioning is enabled
//! the version is reported with each snapshot and checked on replace.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ApprovalResult;
use crate::error::ApprovalError;
use crate::principal::Principal;
use crate::storage::approval::{ApprovalSnapshot, ApprovalStore};
use crate::types::Grant;

#[derive(Debug, Default)]
struct Entry {
    grants: Vec<Grant>,
    version: u64,
}

/// Process-local [`ApprovalStore`].
#[derive(Debug)]
pub struct InMemoryApprovalStore {
    entries: RwLock<HashMap<String, Entry>>,
    versioned: bool,
}

impl InMemoryApprovalStore {
    /// Creates an empty store that reports versions and rejects stale replaces.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            versioned: true,
        }
    }

    /// Creates an empty store that reports no versions (last-writer-wins).
    pub fn unversioned() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            versioned: false,
        }
    }

    /// Seeds the grants of `principal`, replacing anything stored.
    pub async fn insert(&self, principal: &Principal, grants: Vec<Grant>) {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(principal.access_token().to_string())
            .or_default();
        entry.grants = grants;
        entry.version += 1;
    }

    /// Current grants of `principal`, without going through the trait.
    pub async fn grants(&self, principal: &Principal) -> Vec<Grant> {
        self.entries
            .read()
            .await
            .get(principal.access_token())
            .map(|e| e.grants.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryApprovalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApprovalStore for InMemoryApprovalStore {
    async fn fetch_all(&self, principal: &Principal) -> ApprovalResult<ApprovalSnapshot> {
        let entries = self.entries.read().await;
        let (grants, version) = entries
            .get(principal.access_token())
            .map(|e| (e.grants.clone(), e.version))
            .unwrap_or_default();

        Ok(ApprovalSnapshot {
            grants,
            version: self.versioned.then(|| version.to_string()),
        })
    }

    async fn replace_all(
        &self,
        principal: &Principal,
        grants: &[Grant],
        expected_version: Option<&str>,
    ) -> ApprovalResult<()> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(principal.access_token().to_string())
            .or_default();

        if self.versioned
            && let Some(expected) = expected_version
            && expected != entry.version.to_string()
        {
            return Err(ApprovalError::conflict(format!(
                "expected version {expected}, store is at {}",
                entry.version
            )));
        }

        entry.grants = grants.to_vec();
        entry.version += 1;
        Ok(())
    }
}
