// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for ACL synchronization and the request handler.

use aclsync_identity::IdentityError;
use aclsync_store::{FetchError, StoreError, WriteError};
use thiserror::Error;

/// Failure of one synchronization cycle.
///
/// A `LoadFailed` cycle wrote nothing. A `WriteFailed` cycle may have
/// replaced `roles` but not `rolesmapping`; the next cycle for the same user
/// rewrites both.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to load ACL documents: {0}")]
    LoadFailed(#[source] FetchError),

    #[error("failed to write ACL documents: {0}")]
    WriteFailed(#[source] WriteError),
}

/// Failure while handling an inbound request.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A forwarded identity header is missing, blank or not valid UTF-8.
    /// Raised before any project lookup or store access.
    #[error("invalid {header} header: {reason}")]
    Header { header: &'static str, reason: String },

    #[error("cannot resolve user projects: {0}")]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid value for {var}: {reason}")]
    Env { var: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}
