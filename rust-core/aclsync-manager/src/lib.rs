// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ACLSync Document Manager
//
// Keeps Search Guard's per-user roles in step with the projects each user
// can see. The request handler resolves a caller's projects, and the
// document manager merges the caller's generated entry into the stored
// corpus.
//
// # Modules
//
// - [`manager`] -- `DocumentManager` and the sync cycle.
// - [`expiry`] -- What happens to entries past their expiry.
// - [`handler`] -- Header parsing, bypass list and the axum middleware.
// - [`clock`] -- System and manual clocks.
// - [`config`] -- Manager and extension configuration.
// - [`error`] -- Sync, handler and configuration errors.

pub mod clock;
pub mod config;
pub mod error;
pub mod expiry;
pub mod handler;
pub mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ExtensionConfig, ManagerConfig};
pub use error::{ConfigError, HandlerError, SyncError};
pub use expiry::{apply_expiry, ExpiryPolicy};
pub use handler::{
    principal_from_headers, sync_access_middleware, AccessControlExtension, ProcessOutcome,
};
pub use manager::{DocumentManager, SyncOutcome};

use aclsync_identity::OpenShiftClient;
use aclsync_store::SearchGuardClient;

/// The production extension: Search Guard store and OpenShift projects.
pub type ClusterLoggingExtension = AccessControlExtension<SearchGuardClient, OpenShiftClient>;

/// Build the production extension from `config`.
pub fn build_extension(config: &ExtensionConfig) -> Result<ClusterLoggingExtension, ConfigError> {
    config.validate()?;
    let store = SearchGuardClient::new(&config.store)?;
    let resolver = OpenShiftClient::new(&config.identity)?;
    let manager = DocumentManager::new(config.manager.clone(), store)?;
    Ok(AccessControlExtension::new(manager, resolver)
        .with_bypass_users(config.bypass_users.iter().cloned()))
}
