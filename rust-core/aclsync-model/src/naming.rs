// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! Identity-derived names for generated roles and index patterns.
//!
//! Every name here is a pure function of its input. The same username always
//! yields the same role name, so re-synchronizing a user overwrites its own
//! entry instead of adding a new one.
//!
//! Search Guard treats `.` in an index-pattern key as a path separator, so
//! derived index names are escaped with [`escape_index_name`] before they are
//! used as keys.

use sha1::{Digest, Sha1};

use crate::principal::Project;

/// Prefix of every role generated for a user.
pub const ROLE_PREFIX: &str = "gen_user_";

pub const CLUSTER_MONITOR_KIBANA: &str = "CLUSTER_MONITOR_KIBANA";
pub const USER_CLUSTER_OPERATIONS: &str = "USER_CLUSTER_OPERATIONS";
pub const INDEX_KIBANA: &str = "INDEX_KIBANA";
pub const INDEX_PROJECT: &str = "INDEX_PROJECT";

/// Document type key granting access to every document type of an index.
pub const ALL_DOC_TYPES: &str = "*";

/// Lowercase hex SHA-1 of the raw username bytes. No normalization.
pub fn username_hash(username: &str) -> String {
    hex::encode(Sha1::digest(username.as_bytes()))
}

/// `gen_user_<sha1(username)>`
pub fn role_name(username: &str) -> String {
    format!("{ROLE_PREFIX}{}", username_hash(username))
}

/// The user's personal Kibana index, unescaped.
pub fn kibana_index_name(username: &str) -> String {
    format!(".kibana.{}", username_hash(username))
}

/// Index pattern covering every index of a project, unescaped.
pub fn project_index_name(project: &Project) -> String {
    format!("project.{}.{}.*", project.name, project.uid)
}

/// Replace every `.` with `?`. No other character is touched.
pub fn escape_index_name(name: &str) -> String {
    name.replace('.', "?")
}

/// True for role names this crate generates.
pub fn is_generated_role(role_name: &str) -> bool {
    role_name.starts_with(ROLE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_hash_known_vectors() {
        assert_eq!(username_hash(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(username_hash("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_role_name_format() {
        let name = role_name("abc");
        assert_eq!(name, "gen_user_a9993e364706816aba3e25717850c26c9cd0d89d");
        assert!(is_generated_role(&name));
        assert!(!is_generated_role("sg_kibana_server"));
    }

    #[test]
    fn test_role_name_is_case_sensitive() {
        assert_ne!(role_name("Alice"), role_name("alice"));
    }

    #[test]
    fn test_kibana_index_escaping() {
        let escaped = escape_index_name(&kibana_index_name("abc"));
        assert_eq!(escaped, "?kibana?a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_project_index_escaping() {
        let p = Project::new("foo.bar", "123abc");
        assert_eq!(project_index_name(&p), "project.foo.bar.123abc.*");
        assert_eq!(escape_index_name(&project_index_name(&p)), "project?foo?bar?123abc?*");
    }

    #[test]
    fn test_escape_leaves_other_characters() {
        assert_eq!(escape_index_name("a-b_c*?/d"), "a-b_c*?/d");
        assert_eq!(escape_index_name("..."), "???");
    }

    #[test]
    fn test_missing_project_fields_still_produce_pattern() {
        let p = Project::new("", "");
        assert_eq!(escape_index_name(&project_index_name(&p)), "project????*");
    }
}
