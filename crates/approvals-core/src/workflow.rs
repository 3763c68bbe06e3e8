//! Show and submit orchestration.
//!
//! # Flow
//!
//! ```text
//! show:   fetch_all ─► group_by_client ─► GroupedView
//!
//! submit: fetch_all ─► group_by_client ─► flatten ─► plan(selection)
//!             └─► replace_all(planned, snapshot.version) ─► show
//! ```
//!
//! Each call is independent and holds no state between requests. Any store
//! failure aborts the call and is returned as is; nothing is retried and a
//! failed replace is not rolled back.
//!
//! Submit reads and then writes. The version captured by the fetch is sent
//! with the replace, so a store that tracks versions refuses the write if
//! someone else changed the grants in between. Against a store without
//! versions the later write silently wins.

use std::sync::Arc;

use crate::ApprovalResult;
use crate::aggregate::{GroupedView, group_by_client};
use crate::planner::{PlanSummary, plan};
use crate::principal::Principal;
use crate::selection::Selection;
use crate::storage::ApprovalStore;

/// Approvals workflow over an [`ApprovalStore`].
#[derive(Clone)]
pub struct ApprovalsWorkflow {
    store: Arc<dyn ApprovalStore>,
}

impl ApprovalsWorkflow {
    pub fn new(store: Arc<dyn ApprovalStore>) -> Self {
        Self { store }
    }

    /// Reads the principal's grants grouped by client. Read-only.
    pub async fn show(&self, principal: &Principal) -> ApprovalResult<GroupedView> {
        let snapshot = self.store.fetch_all(principal).await.inspect_err(|e| {
            tracing::warn!(error = %e, category = %e.category(), "Failed to fetch approvals");
        })?;

        let view = group_by_client(snapshot.grants);
        tracing::debug!(
            clients = view.client_count(),
            grants = view.grant_count(),
            "Approvals loaded"
        );
        Ok(view)
    }

    /// Applies `selection` as the complete set of desired approvals, then
    /// returns the resulting grouped view.
    ///
    /// `None` means nothing was checked: every grant is denied.
    pub async fn submit(
        &self,
        principal: &Principal,
        selection: Option<&Selection>,
    ) -> ApprovalResult<GroupedView> {
        let snapshot = self.store.fetch_all(principal).await.inspect_err(|e| {
            tracing::warn!(error = %e, category = %e.category(), "Failed to fetch approvals for update");
        })?;

        let current = group_by_client(snapshot.grants).flatten();
        let planned = plan(current, selection);
        let summary = PlanSummary::of(&planned);

        self.store
            .replace_all(principal, &planned, snapshot.version.as_deref())
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    category = %e.category(),
                    retryable = e.is_retryable(),
                    "Failed to replace approvals"
                );
            })?;

        tracing::info!(
            approved = summary.approved,
            denied = summary.denied,
            ignored_keys = selection.map_or(0, Selection::rejected),
            "Approvals updated"
        );

        self.show(principal).await
    }
}
