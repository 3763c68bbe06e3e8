//! Revocation planning.
//!
//! A submission is the complete set of approvals the user wants to keep.
//! Every grant the user checked becomes `APPROVED`; every other grant,
//! including ones that were approved before, becomes `DENIED`. The result is
//! written back as a full replacement, so `current` must be the user's entire
//! grant set or unseen grants will be revoked.

use crate::selection::Selection;
use crate::types::{Grant, GrantStatus};

/// Status a grant receives for the given selection.
#[must_use]
pub fn status_for(grant: &Grant, selection: Option<&Selection>) -> GrantStatus {
    match selection {
        Some(selection) if selection.contains_grant(grant) => GrantStatus::Approved,
        _ => GrantStatus::Denied,
    }
}

/// Recomputes the status of every grant in `current`.
///
/// The output has the same length and order as the input. Only `status`
/// changes. Selected keys that match no grant are ignored.
#[must_use]
pub fn plan(current: Vec<Grant>, selection: Option<&Selection>) -> Vec<Grant> {
    current
        .into_iter()
        .map(|grant| {
            let status = status_for(&grant, selection);
            grant.with_status(status)
        })
        .collect()
}

/// Approved/denied counts of a planned grant set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub approved: usize,
    pub denied: usize,
}

impl PlanSummary {
    #[must_use]
    pub fn of(grants: &[Grant]) -> Self {
        let approved = grants.iter().filter(|g| g.status.is_approved()).count();
        Self {
            approved,
            denied: grants.len() - approved,
        }
    }
}
