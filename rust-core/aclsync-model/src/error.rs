// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for the ACL document model.
//
// Decoding never yields a partially populated document: either the whole
// payload matches the document shape or one of these errors is returned.

use serde_json::error::Category;
use thiserror::Error;

/// Errors raised while decoding a stored ACL document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not syntactically valid JSON.
    #[error("malformed document: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The payload is valid JSON but does not have the document's shape
    /// (e.g. a string where a map was expected).
    #[error("invalid document shape: {0}")]
    InvalidShape(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => DecodeError::InvalidShape(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => DecodeError::Malformed(err),
        }
    }
}

/// Errors raised while encoding an ACL document.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Transport (JSON) serialization failed.
    #[error("transport encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Audit (YAML) serialization failed.
    #[error("audit encoding failed: {0}")]
    Audit(#[from] serde_yaml::Error),
}
