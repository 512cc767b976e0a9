// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ACL document manager.
//
// Each synchronization is one read-modify-write cycle over the whole
// corpus: load both documents, apply the expiry policy, upsert the caller's
// generated entry and replace both documents. The store has no conditional
// writes, so cycles are serialized through a lock shared by every clone of
// a manager. Another process writing the same documents can still race it.

use std::sync::Arc;

use aclsync_model::naming::role_name;
use aclsync_model::{AclDocument, AclDocuments, Principal};
use aclsync_store::DocumentStore;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace, warn, Level};

use crate::clock::{Clock, SystemClock};
use crate::config::ManagerConfig;
use crate::error::{ConfigError, SyncError};
use crate::expiry::apply_expiry;

/// Result of a successful [`DocumentManager::sync_acl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The principal is in the infra group; the store was not touched.
    Exempt,
    /// The principal's entry was written.
    Synchronized {
        role_name: String,
        /// Expiry written to both entries, in epoch milliseconds.
        expires: i64,
    },
}

/// Keeps the store's `roles` and `rolesmapping` documents current for the
/// principals that pass through it.
///
/// Cheap to clone when `S` is; clones share the store handle and the cycle
/// lock.
#[derive(Clone)]
pub struct DocumentManager<S: DocumentStore> {
    config: ManagerConfig,
    store: S,
    clock: Arc<dyn Clock>,
    cycle: Arc<Mutex<()>>,
}

impl<S: DocumentStore> DocumentManager<S> {
    /// Build a manager using the system clock. Fails on invalid `config`.
    pub fn new(config: ManagerConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(?config, store = store.name(), "creating document manager");
        Ok(Self {
            config,
            store,
            clock: Arc::new(SystemClock),
            cycle: Arc::new(Mutex::new(())),
        })
    }

    /// Replace the clock used for expiry timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `principal` belongs to the infra group.
    pub fn is_exempt(&self, principal: &Principal) -> bool {
        principal.is_member_of(&self.config.infra_group_name)
    }

    /// Make the store grant `principal` exactly its current projects.
    ///
    /// Infra group members are exempt and cause no store traffic. Otherwise
    /// both documents are read once and written once. The new expiry is
    /// never earlier than one already stored for the same role.
    #[instrument(skip_all, fields(user = %principal.username))]
    pub async fn sync_acl(&self, principal: &Principal) -> Result<SyncOutcome, SyncError> {
        if self.is_exempt(principal) {
            trace!(group = %self.config.infra_group_name, "infra group member, skipping");
            return Ok(SyncOutcome::Exempt);
        }

        let _cycle = self.cycle.lock().await;

        let mut docs = self.load_acl().await?;
        let now = self.clock.now_millis();
        let pruned = apply_expiry(self.config.expiry_policy, &mut docs, now);
        if !pruned.is_empty() {
            warn!(count = pruned.len(), roles = ?pruned, "pruned expired entries");
        }

        let name = role_name(&principal.username);
        let next = now.saturating_add(self.config.permission_expiration_millis);
        let expires = docs.expires_of(&name).map_or(next, |previous| previous.max(next));
        docs.add_user(principal, expires);

        self.write_acl(&docs).await?;
        info!(role = %name, expires, projects = principal.projects.len(), "synchronized ACL");
        Ok(SyncOutcome::Synchronized {
            role_name: name,
            expires,
        })
    }

    async fn load_acl(&self) -> Result<AclDocuments, SyncError> {
        debug!(store = self.store.name(), "loading ACL documents");
        let roles = self.store.fetch_roles().await.map_err(SyncError::LoadFailed)?;
        let roles_mapping = self
            .store
            .fetch_roles_mapping()
            .await
            .map_err(SyncError::LoadFailed)?;
        trace!(roles = roles.len(), mappings = roles_mapping.len(), "loaded ACL documents");
        Ok(AclDocuments::new(roles, roles_mapping))
    }

    async fn write_acl(&self, docs: &AclDocuments) -> Result<(), SyncError> {
        if tracing::enabled!(Level::TRACE) {
            trace_audit(&docs.roles);
            trace_audit(&docs.roles_mapping);
        }
        debug!(roles = docs.roles.len(), "flushing roles");
        self.store
            .replace_roles(&docs.roles)
            .await
            .map_err(SyncError::WriteFailed)?;
        debug!(mappings = docs.roles_mapping.len(), "flushing rolesmapping");
        self.store
            .replace_roles_mapping(&docs.roles_mapping)
            .await
            .map_err(SyncError::WriteFailed)
    }
}

fn trace_audit<D: AclDocument>(doc: &D) {
    match doc.encode_for_audit() {
        Ok(audit) => trace!(kind = %doc.kind(), %audit, "document to write"),
        Err(e) => trace!(kind = %doc.kind(), error = %e, "document has no audit rendering"),
    }
}
