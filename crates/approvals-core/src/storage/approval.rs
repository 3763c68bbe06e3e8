//! Approvals store trait.
//!
//! # Implementation Notes
//!
//! Implementations should:
//!
//! - Return the principal's complete grant collection from `fetch_all`
//! - Treat `replace_all` as an overwrite of that collection, not a merge
//! - Report a version with each snapshot when they can, and refuse a replace
//!   whose `expected_version` is no longer current
//!
//! # Concurrency
//!
//! Fetch and replace are two separate calls with no transaction around them.
//! A store that reports versions turns a concurrent modification into
//! [`ApprovalError::Conflict`](crate::ApprovalError::Conflict). A store that
//! reports no version gives last-writer-wins: whatever changed between the
//! two calls is overwritten.

use async_trait::async_trait;

use crate::ApprovalResult;
use crate::principal::Principal;
use crate::types::Grant;

/// A principal's grant collection as read from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApprovalSnapshot {
    /// Every grant the store holds for the principal, in store order.
    pub grants: Vec<Grant>,

    /// Opaque version of the collection (an HTTP entity tag, for example).
    /// `None` when the store does not track versions.
    pub version: Option<String>,
}

impl ApprovalSnapshot {
    /// Creates an unversioned snapshot.
    pub fn unversioned(grants: Vec<Grant>) -> Self {
        Self {
            grants,
            version: None,
        }
    }
}

/// Storage trait for a user's grants.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// Fetches the principal's complete grant collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached, refuses the
    /// principal, or returns data that is not a grant collection.
    async fn fetch_all(&self, principal: &Principal) -> ApprovalResult<ApprovalSnapshot>;

    /// Overwrites the principal's grant collection with `grants`.
    ///
    /// `expected_version` is the version of the snapshot the replacement
    /// was computed from, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Conflict`](crate::ApprovalError::Conflict)
    /// when the collection changed since `expected_version`, or another
    /// error if the store fails.
    async fn replace_all(
        &self,
        principal: &Principal,
        grants: &[Grant],
        expected_version: Option<&str>,
    ) -> ApprovalResult<()>;
}
