pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod store;
pub mod templates;

pub use config::AppConfig;
pub use server::{AppState, ApprovalsServer, ServerBuilder, build_app};
pub use store::HttpApprovalStore;
