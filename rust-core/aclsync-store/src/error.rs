// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for the ACLSync document store.
//
// Reads and writes fail with distinct enums so the manager can report
// which half of a read-modify-write cycle broke. None of these are retried
// by the store.

use std::path::PathBuf;
use std::time::Duration;

use aclsync_model::{DecodeError, EncodeError};
use thiserror::Error;

/// Failure while reading a document from the store.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure from `reqwest` (connect, TLS, body read).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The call exceeded the configured per-request timeout.
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// The store answered with a non-2xx status.
    #[error("store returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the body, or the raw body.
        message: String,
    },

    /// The response body is not JSON.
    #[error("invalid response envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The response has no string payload at the expected path.
    #[error("no payload at {path}")]
    MissingPayload {
        /// Dotted path that was looked up, e.g. `_source.roles`.
        path: String,
    },

    /// The payload is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded payload is not a valid ACL document.
    #[error("stored document is invalid: {0}")]
    Decode(#[from] DecodeError),

    /// The store cannot be reached (used by non-HTTP stores).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure while replacing a document in the store.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The document could not be serialized.
    #[error("document encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The envelope could not be serialized.
    #[error("envelope encoding failed: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure while loading TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid certificate material in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    /// Only one of client certificate and key was configured.
    #[error("client certificate and key must be configured together")]
    IncompleteIdentity,
}

/// Failure while constructing a store client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub(crate) fn fetch_transport_error(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout.as_millis() as u64)
    } else {
        FetchError::Network(err)
    }
}

pub(crate) fn write_transport_error(err: reqwest::Error, timeout: Duration) -> WriteError {
    if err.is_timeout() {
        WriteError::Timeout(timeout.as_millis() as u64)
    } else {
        WriteError::Network(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = FetchError::Status {
            status: 403,
            message: "no permissions".to_string(),
        };
        assert_eq!(err.to_string(), "store returned 403: no permissions");
    }

    #[test]
    fn test_missing_payload_display() {
        let err = FetchError::MissingPayload {
            path: "_source.roles".to_string(),
        };
        assert_eq!(err.to_string(), "no payload at _source.roles");
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(WriteError::Timeout(1500).to_string(), "timed out after 1500ms");
    }

    #[test]
    fn test_incomplete_identity_display() {
        assert!(TlsError::IncompleteIdentity
            .to_string()
            .contains("configured together"));
    }
}
