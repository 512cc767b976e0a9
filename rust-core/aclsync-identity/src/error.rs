// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for project resolution.

use aclsync_store::TlsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The call cannot be made with the given input, e.g. a blank token.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("invalid identity API URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// The identity service answered with a non-2xx status.
    #[error("identity service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid project list: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tls(#[from] TlsError),
}

impl IdentityError {
    /// Whether the failure is the caller's credentials rather than the service.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            IdentityError::Precondition(_) => true,
            IdentityError::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(IdentityError::Precondition("blank token".into()).is_unauthorized());
        assert!(IdentityError::Status {
            status: 401,
            message: String::new()
        }
        .is_unauthorized());
        assert!(!IdentityError::Status {
            status: 500,
            message: String::new()
        }
        .is_unauthorized());
        assert!(!IdentityError::Timeout(10).is_unauthorized());
    }
}
