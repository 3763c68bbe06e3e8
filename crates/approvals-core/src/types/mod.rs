//! Domain types shared across the approvals modules.
//!
//! ## Domain Types
//!
//! - [`Grant`] - A user's decision about one scope for one client
//! - [`GrantStatus`] - Approved, denied or still pending

pub mod grant;

pub use grant::{Grant, GrantStatus};
