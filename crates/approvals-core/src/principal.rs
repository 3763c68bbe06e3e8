//! The authenticated caller.

use std::fmt;

/// An already-authenticated user, identified by the bearer token that
/// accompanied the request.
///
/// The token is relayed unchanged to the approvals store, which resolves it
/// to the user whose grants are read and replaced.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    access_token: String,
}

impl Principal {
    /// Creates a principal from a bearer token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
