// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! The Search Guard `roles` document.
//!
//! ```text
//! roleName:
//!   cluster: [permission, ...]
//!   expires: <epoch millis>
//!   indices:
//!     indexPattern:
//!       docType: [permission, ...]
//! ```
//!
//! Empty fields are omitted on the wire. Fields this crate does not model
//! (`tenants`, `readonly`, ...) are kept in [`Role::extra`] so that writing the
//! corpus back never strips configuration owned by other tooling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{AclDocument, DocKind};
use crate::naming::{
    escape_index_name, kibana_index_name, project_index_name, ALL_DOC_TYPES,
    CLUSTER_MONITOR_KIBANA, INDEX_KIBANA, INDEX_PROJECT, USER_CLUSTER_OPERATIONS,
};
use crate::principal::Principal;

/// docType -> permissions
pub type DocumentPermissions = BTreeMap<String, Vec<String>>;

/// indexPattern -> docType -> permissions
pub type IndexPermissions = BTreeMap<String, DocumentPermissions>;

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// A single role entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "cluster", default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_permissions: Vec<String>,

    /// Expiry in epoch milliseconds; zero means the entry never expires.
    #[serde(rename = "expires", default, skip_serializing_if = "is_zero")]
    pub expires_in_millis: i64,

    #[serde(rename = "indices", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indices_permissions: IndexPermissions,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Role {
    /// The role generated for a non-privileged principal: read access to its
    /// own Kibana index and to every project it can see.
    pub fn for_principal(principal: &Principal, expires: i64) -> Self {
        let mut indices = IndexPermissions::new();
        indices.insert(
            escape_index_name(&kibana_index_name(&principal.username)),
            wildcard_grant(INDEX_KIBANA),
        );
        for project in &principal.projects {
            indices.insert(
                escape_index_name(&project_index_name(project)),
                wildcard_grant(INDEX_PROJECT),
            );
        }

        Self {
            cluster_permissions: vec![
                CLUSTER_MONITOR_KIBANA.to_string(),
                USER_CLUSTER_OPERATIONS.to_string(),
            ],
            expires_in_millis: expires,
            indices_permissions: indices,
            extra: BTreeMap::new(),
        }
    }
}

fn wildcard_grant(permission: &str) -> DocumentPermissions {
    let mut grant = DocumentPermissions::new();
    grant.insert(ALL_DOC_TYPES.to_string(), vec![permission.to_string()]);
    grant
}

/// roleName -> Role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roles {
    entries: BTreeMap<String, Role>,
}

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_name: &str) -> Option<&Role> {
        self.entries.get(role_name)
    }

    /// Insert or fully replace the entry under `role_name`.
    pub fn insert(&mut self, role_name: impl Into<String>, role: Role) -> Option<Role> {
        self.entries.insert(role_name.into(), role)
    }

    pub fn remove(&mut self, role_name: &str) -> Option<Role> {
        self.entries.remove(role_name)
    }

    pub fn contains(&self, role_name: &str) -> bool {
        self.entries.contains_key(role_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Role)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Role)> for Roles {
    fn from_iter<T: IntoIterator<Item = (String, Role)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl AclDocument for Roles {
    const KIND: DocKind = DocKind::Roles;
}
