//! Approvals error types.
//!
//! This module defines the errors that can occur while reading or replacing a
//! user's grants. Store failures are split into retryable transport problems
//! and permanent rejections so callers can tell them apart.

use std::fmt;

/// Errors that can occur during approvals operations.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    /// The request has no usable principal, or the store refused its credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The store could not be reached or failed transiently.
    #[error("Approvals store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the transport failure.
        message: String,
    },

    /// The store answered but refused the request.
    #[error("Approvals store rejected request ({status}): {message}")]
    StoreRejected {
        /// HTTP status returned by the store.
        status: u16,
        /// Description of the rejection.
        message: String,
    },

    /// The store returned a payload that is not a grant collection.
    #[error("Invalid approvals data: {message}")]
    InvalidStoreData {
        /// Description of the decoding failure.
        message: String,
    },

    /// The grant set changed between fetch and replace.
    #[error("Approvals changed concurrently: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The service configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl ApprovalError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `StoreUnavailable` error.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `StoreRejected` error.
    #[must_use]
    pub fn store_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::StoreRejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `InvalidStoreData` error.
    #[must_use]
    pub fn invalid_store_data(message: impl Into<String>) -> Self {
        Self::InvalidStoreData {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if repeating the same call later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Returns `true` if the caller has to change something before retrying.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Conflict { .. })
    }

    /// Returns `true` if this is a server-side or upstream failure.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the error category for logging.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Authentication,
            Self::StoreUnavailable { .. } => ErrorCategory::Infrastructure,
            Self::StoreRejected { .. } => ErrorCategory::Upstream,
            Self::InvalidStoreData { .. } => ErrorCategory::Upstream,
            Self::Conflict { .. } => ErrorCategory::Concurrency,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of approvals errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or refused credentials.
    Authentication,
    /// Transport failures talking to the store.
    Infrastructure,
    /// The store answered with something unusable.
    Upstream,
    /// Lost-update protection fired.
    Concurrency,
    /// Configuration errors.
    Configuration,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Upstream => write!(f, "upstream"),
            Self::Concurrency => write!(f, "concurrency"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
