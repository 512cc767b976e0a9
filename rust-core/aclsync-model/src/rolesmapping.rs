// SPDX-License-Identifier: PMPL-1.0-or-later
//! The Search Guard `rolesmapping` document: which users and groups hold
//! each role.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{AclDocument, DocKind};
use crate::principal::Principal;

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleMapping {
    #[serde(rename = "expires", default, skip_serializing_if = "is_zero")]
    pub expires_in_millis: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    /// Fields owned by other tooling (`backendroles`, `hosts`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RoleMapping {
    /// Maps exactly this principal's username, with its groups copied verbatim.
    pub fn for_principal(principal: &Principal, expires: i64) -> Self {
        Self {
            expires_in_millis: expires,
            users: vec![principal.username.clone()],
            groups: principal.groups.clone(),
            extra: BTreeMap::new(),
        }
    }
}

/// roleName -> RoleMapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolesMapping {
    entries: BTreeMap<String, RoleMapping>,
}

impl RolesMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_name: &str) -> Option<&RoleMapping> {
        self.entries.get(role_name)
    }

    pub fn insert(
        &mut self,
        role_name: impl Into<String>,
        mapping: RoleMapping,
    ) -> Option<RoleMapping> {
        self.entries.insert(role_name.into(), mapping)
    }

    pub fn remove(&mut self, role_name: &str) -> Option<RoleMapping> {
        self.entries.remove(role_name)
    }

    pub fn contains(&self, role_name: &str) -> bool {
        self.entries.contains_key(role_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RoleMapping)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, RoleMapping)> for RolesMapping {
    fn from_iter<T: IntoIterator<Item = (String, RoleMapping)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl AclDocument for RolesMapping {
    const KIND: DocKind = DocKind::RolesMapping;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_for_principal() {
        let principal = Principal::new("CN=jdoe,OU=DL IT,OU=User Accounts,DC=example,DC=com")
            .with_groups(["myspecialgroup"]);
        let mapping = RoleMapping::for_principal(&principal, 15);
        assert_eq!(mapping.users, vec![principal.username.clone()]);
        assert_eq!(mapping.groups, vec!["myspecialgroup"]);
        assert_eq!(mapping.expires_in_millis, 15);
    }

    #[test]
    fn test_empty_groups_are_omitted() {
        let mut mapping = RolesMapping::new();
        mapping.insert(
            "gen_user_994a33f6a157ba4a286395f81a4333db1e6cefb6",
            RoleMapping::for_principal(&Principal::new("user2.bar@email.com"), 15),
        );
        let json = String::from_utf8(mapping.encode_for_transport().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"gen_user_994a33f6a157ba4a286395f81a4333db1e6cefb6":{"expires":15,"users":["user2.bar@email.com"]}}"#
        );

        let audit: serde_yaml::Value =
            serde_yaml::from_str(&mapping.encode_for_audit().unwrap()).unwrap();
        let entry = &audit["gen_user_994a33f6a157ba4a286395f81a4333db1e6cefb6"];
        assert_eq!(entry["users"][0].as_str(), Some("user2.bar@email.com"));
        assert!(entry.get("groups").is_none());
    }

    #[test]
    fn test_audit_layout_matches_sg_roles_mapping() {
        let jdoe = Principal::new("CN=jdoe,OU=DL IT,OU=User Accounts,DC=example,DC=com")
            .with_groups(["myspecialgroup"]);
        let user2 = Principal::new("user2.bar@email.com");
        let mut mapping = RolesMapping::new();
        for principal in [&jdoe, &user2] {
            mapping.insert(
                crate::naming::role_name(&principal.username),
                RoleMapping::for_principal(principal, 15),
            );
        }

        let expected = r#"
gen_user_4c54bf89fe913f39fc22d76309f80cdc6192928f:
  expires: 15
  users: ['CN=jdoe,OU=DL IT,OU=User Accounts,DC=example,DC=com']
  groups: [myspecialgroup]
gen_user_994a33f6a157ba4a286395f81a4333db1e6cefb6:
  expires: 15
  users: [user2.bar@email.com]
"#;
        let actual: serde_yaml::Value =
            serde_yaml::from_str(&mapping.encode_for_audit().unwrap()).unwrap();
        let expected: serde_yaml::Value = serde_yaml::from_str(expected).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_audit_encoding_keeps_null_foreign_fields() {
        let mapping =
            RolesMapping::decode(br#"{"sg_all":{"users":["a"],"backendroles":null}}"#).unwrap();
        let audit: serde_yaml::Value =
            serde_yaml::from_str(&mapping.encode_for_audit().unwrap()).unwrap();
        assert!(audit["sg_all"]["backendroles"].is_null());
        assert_eq!(audit["sg_all"]["users"][0].as_str(), Some("a"));
    }

    #[test]
    fn test_backend_roles_survive_round_trip() {
        let payload = br#"{"sg_all_access":{"backendroles":["admin"],"users":["root"]}}"#;
        let mapping = RolesMapping::decode(payload).unwrap();
        let entry = mapping.get("sg_all_access").unwrap();
        assert_eq!(entry.users, vec!["root"]);
        assert!(entry.groups.is_empty());

        let encoded: serde_json::Value =
            serde_json::from_slice(&mapping.encode_for_transport().unwrap()).unwrap();
        assert_eq!(encoded["sg_all_access"]["backendroles"][0], "admin");
    }

    #[test]
    fn test_missing_fields_decode_to_empty() {
        let mapping = RolesMapping::decode(br#"{"r":{}}"#).unwrap();
        assert_eq!(mapping.get("r"), Some(&RoleMapping::default()));
    }
}
