//! Account activation collaborator.
//!
//! New accounts are created through a separate two-step activation flow:
//! the user submits email and password, receives a code by email, then
//! redeems the code. This crate only describes the contract; the service
//! behind it lives elsewhere.

use async_trait::async_trait;

/// Where a freshly activated user is sent when the activation carried no
/// redirect URL.
pub const DEFAULT_REDIRECT: &str = "home";

/// Result of redeeming an activation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationOutcome {
    pub user_id: String,
    pub username: String,
    pub email: String,
    /// Client location to return to, if the activation was started by a client.
    pub redirect_url: Option<String>,
}

impl ActivationOutcome {
    /// Location the activated user is redirected to.
    #[must_use]
    pub fn redirect_target(&self) -> &str {
        self.redirect_url.as_deref().unwrap_or(DEFAULT_REDIRECT)
    }
}

/// Errors reported by the activation service.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    /// An account with this username already exists.
    #[error("username already exists")]
    UsernameExists,

    /// The activation code is unknown, used or expired.
    #[error("invalid activation code: {0}")]
    InvalidCode(String),

    /// The activation service failed.
    #[error("activation service error: {0}")]
    Service(String),
}

/// Account activation service contract.
#[async_trait]
pub trait AccountActivation: Send + Sync {
    /// Starts activation for a new account requested through `client_id`.
    async fn begin_activation(
        &self,
        email: &str,
        password: &str,
        client_id: &str,
    ) -> Result<(), ActivationError>;

    /// Redeems an activation code, creating the account.
    async fn complete_activation(&self, code: &str) -> Result<ActivationOutcome, ActivationError>;
}
