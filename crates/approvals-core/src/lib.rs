//! # approvals-core
//!
//! Core of the approvals service: lets an authenticated user review every
//! scope grant they issued to OAuth clients and approve or revoke them in bulk.
//!
//! This crate provides:
//! - The grant record model with opaque-field passthrough
//! - Structured selection keys and their form encoding
//! - Grouping of grants by client in first-seen order
//! - Revocation planning (full-replace semantics)
//! - The store contract plus an in-memory implementation
//! - The show/submit workflow
//!
//! ## Modules
//!
//! - [`types`] - Grant records and statuses
//! - [`selection`] - Selection keys submitted by the approvals form
//! - [`aggregate`] - Grouping grants by client
//! - [`planner`] - Recomputing grant statuses from a selection
//! - [`storage`] - Approvals store trait and in-memory store
//! - [`workflow`] - Show and submit orchestration
//! - [`activation`] - Account activation collaborator interface
//! - [`principal`] - The authenticated caller

pub mod activation;
pub mod aggregate;
pub mod error;
pub mod planner;
pub mod principal;
pub mod selection;
pub mod storage;
pub mod types;
pub mod workflow;

pub use activation::{AccountActivation, ActivationError, ActivationOutcome};
pub use aggregate::{GroupedView, group_by_client};
pub use error::{ApprovalError, ErrorCategory};
pub use planner::{PlanSummary, plan};
pub use principal::Principal;
pub use selection::{Selection, SelectionKey, SelectionKeyError};
pub use storage::{ApprovalSnapshot, ApprovalStore, InMemoryApprovalStore};
pub use types::{Grant, GrantStatus};
pub use workflow::ApprovalsWorkflow;

/// Type alias for approvals results.
pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use approvals_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ApprovalResult;
    pub use crate::aggregate::{GroupedView, group_by_client};
    pub use crate::error::{ApprovalError, ErrorCategory};
    pub use crate::planner::{PlanSummary, plan};
    pub use crate::principal::Principal;
    pub use crate::selection::{Selection, SelectionKey};
    pub use crate::storage::{ApprovalSnapshot, ApprovalStore, InMemoryApprovalStore};
    pub use crate::types::{Grant, GrantStatus};
    pub use crate::workflow::ApprovalsWorkflow;
}
