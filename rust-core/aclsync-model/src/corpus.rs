// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! The authorization corpus: `roles` and `rolesmapping`, always mutated
//! together.
//!
//! A corpus value is a snapshot read from the store, changed in memory for a
//! single principal and written back whole. Nothing about it outlives one
//! synchronization.

use std::collections::BTreeSet;

use crate::naming::role_name;
use crate::principal::Principal;
use crate::roles::{Role, Roles};
use crate::rolesmapping::{RoleMapping, RolesMapping};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AclDocuments {
    pub roles: Roles,
    pub roles_mapping: RolesMapping,
}

impl AclDocuments {
    pub fn new(roles: Roles, roles_mapping: RolesMapping) -> Self {
        Self {
            roles,
            roles_mapping,
        }
    }

    /// Upsert the generated role and mapping for `principal`, replacing any
    /// previous entry under the same role name. Returns the role name.
    pub fn add_user(&mut self, principal: &Principal, expires: i64) -> String {
        let name = role_name(&principal.username);
        self.roles
            .insert(name.clone(), Role::for_principal(principal, expires));
        self.roles_mapping
            .insert(name.clone(), RoleMapping::for_principal(principal, expires));
        name
    }

    /// Remove `role_name` from both documents. True if either held it.
    pub fn remove(&mut self, role_name: &str) -> bool {
        let role = self.roles.remove(role_name).is_some();
        let mapping = self.roles_mapping.remove(role_name).is_some();
        role || mapping
    }

    /// Latest expiry recorded for `role_name` in either document.
    pub fn expires_of(&self, role_name: &str) -> Option<i64> {
        let role = self.roles.get(role_name).map(|r| r.expires_in_millis);
        let mapping = self
            .roles_mapping
            .get(role_name)
            .map(|m| m.expires_in_millis);
        role.max(mapping)
    }

    /// Entries whose non-zero expiry lies strictly before `now_millis`, in
    /// either document. Entries with a zero expiry never expire.
    pub fn expired_role_names(&self, now_millis: i64) -> Vec<String> {
        let expired = |expires: i64| expires != 0 && expires < now_millis;

        let mut names = BTreeSet::new();
        for (name, role) in self.roles.iter() {
            if expired(role.expires_in_millis) {
                names.insert(name.clone());
            }
        }
        for (name, mapping) in self.roles_mapping.iter() {
            if expired(mapping.expires_in_millis) {
                names.insert(name.clone());
            }
        }
        names.into_iter().collect()
    }
}
