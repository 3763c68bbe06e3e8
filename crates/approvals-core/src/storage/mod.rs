//! Storage for user grants.
//!
//! The approvals store owns grant records. This service only reads a user's
//! full collection and writes a full replacement back, so the contract is two
//! methods wide.
//!
//! # Implementations
//!
//! - [`InMemoryApprovalStore`] - process-local store for tests and local runs
//! - `HttpApprovalStore` (in `approvals-server`) - remote store over HTTP

pub mod approval;
pub mod memory;

pub use approval::{ApprovalSnapshot, ApprovalStore};
pub use memory::InMemoryApprovalStore;
