//! Grant domain type.
//!
//! A grant (the store calls it an "approval") records whether a user has
//! authorized one scope for one client. The store may attach attributes this
//! service knows nothing about; they are captured in [`Grant::extra`] and
//! written back untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decision state of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantStatus {
    /// The user allows the client to use the scope.
    Approved,
    /// The user refused or revoked the scope.
    Denied,
    /// The client asked but the user has not decided yet.
    Pending,
}

impl GrantStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
            Self::Pending => "PENDING",
        }
    }

    /// Returns `true` for [`GrantStatus::Approved`].
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scope grant issued by the user to a client.
///
/// `client_id` and `scope` identify the grant; `status` is the only field
/// the approvals workflow ever writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Client application that requested the scope.
    pub client_id: String,

    /// Permission being granted.
    pub scope: String,

    /// Current decision.
    pub status: GrantStatus,

    /// Store attributes not modelled here (user id, expiry, timestamps...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Grant {
    /// Creates a grant with no extra attributes.
    pub fn new(client_id: impl Into<String>, scope: impl Into<String>, status: GrantStatus) -> Self {
        Self {
            client_id: client_id.into(),
            scope: scope.into(),
            status,
            extra: Map::new(),
        }
    }

    /// Adds an opaque attribute.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Returns a copy of this grant carrying `status`, everything else unchanged.
    #[must_use]
    pub fn with_status(mut self, status: GrantStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(GrantStatus::Approved).unwrap(),
            json!("APPROVED")
        );
        let status: GrantStatus = serde_json::from_value(json!("PENDING")).unwrap();
        assert_eq!(status, GrantStatus::Pending);
        assert_eq!(GrantStatus::Denied.to_string(), "DENIED");
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "userId": "u-1",
            "clientId": "app",
            "scope": "openid",
            "status": "PENDING",
            "expiresAt": "2026-12-01T00:00:00Z",
            "lastUpdatedAt": 1700000000
        });

        let grant: Grant = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(grant.client_id, "app");
        assert_eq!(grant.scope, "openid");
        assert_eq!(grant.extra.get("userId"), Some(&json!("u-1")));
        assert_eq!(grant.extra.len(), 3);

        assert_eq!(serde_json::to_value(&grant).unwrap(), raw);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let raw = json!({ "scope": "openid", "status": "APPROVED" });
        assert!(serde_json::from_value::<Grant>(raw).is_err());
    }

    #[test]
    fn test_with_status_keeps_extra() {
        let grant = Grant::new("app", "read", GrantStatus::Pending)
            .with_extra("userId", json!("u-9"))
            .with_status(GrantStatus::Approved);
        assert!(grant.status.is_approved());
        assert_eq!(grant.extra.get("userId"), Some(&json!("u-9")));
    }
}
