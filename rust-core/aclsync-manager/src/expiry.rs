// SPDX-License-Identifier: PMPL-1.0-or-later
//! Expiry pass over a loaded corpus.
//!
//! Generated entries carry an absolute expiry in epoch milliseconds. The
//! pass runs after the corpus is loaded and before the caller's entry is
//! computed, so a freshly written entry is never pruned by its own cycle.

use std::fmt;
use std::str::FromStr;

use aclsync_model::AclDocuments;
use serde::{Deserialize, Serialize};

/// What to do with entries whose expiry has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Leave stale entries in place until the same user syncs again.
    #[default]
    Lazy,
    /// Remove every expired entry from both documents.
    Prune,
}

impl fmt::Display for ExpiryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryPolicy::Lazy => f.write_str("lazy"),
            ExpiryPolicy::Prune => f.write_str("prune"),
        }
    }
}

impl FromStr for ExpiryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(ExpiryPolicy::Lazy),
            "prune" => Ok(ExpiryPolicy::Prune),
            other => Err(format!("unknown expiry policy '{other}'")),
        }
    }
}

/// Apply `policy` to `docs` at `now_millis`. Returns the removed role names.
pub fn apply_expiry(policy: ExpiryPolicy, docs: &mut AclDocuments, now_millis: i64) -> Vec<String> {
    match policy {
        ExpiryPolicy::Lazy => Vec::new(),
        ExpiryPolicy::Prune => {
            let expired = docs.expired_role_names(now_millis);
            for name in &expired {
                docs.remove(name);
            }
            expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclsync_model::{Principal, Role, Roles};

    fn corpus() -> AclDocuments {
        let mut docs = AclDocuments::default();
        docs.add_user(&Principal::new("stale"), 100);
        docs.add_user(&Principal::new("fresh"), 10_000);
        // Hand-written roles with no expiry are never touched.
        docs.roles.insert("sg_all_access", Role::default());
        docs
    }

    #[test]
    fn test_lazy_keeps_everything() {
        let mut docs = corpus();
        let before = docs.clone();
        assert!(apply_expiry(ExpiryPolicy::Lazy, &mut docs, 5_000).is_empty());
        assert_eq!(docs, before);
    }

    #[test]
    fn test_prune_removes_only_expired() {
        let mut docs = corpus();
        let removed = apply_expiry(ExpiryPolicy::Prune, &mut docs, 5_000);

        let stale = aclsync_model::naming::role_name("stale");
        let fresh = aclsync_model::naming::role_name("fresh");
        assert_eq!(removed, vec![stale.clone()]);
        assert!(!docs.roles.contains(&stale));
        assert!(!docs.roles_mapping.contains(&stale));
        assert!(docs.roles.contains(&fresh));
        assert!(docs.roles.contains("sg_all_access"));
    }

    #[test]
    fn test_prune_boundary_is_exclusive() {
        let mut docs = AclDocuments::new(Roles::new(), Default::default());
        docs.add_user(&Principal::new("edge"), 5_000);
        assert!(apply_expiry(ExpiryPolicy::Prune, &mut docs, 5_000).is_empty());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("prune".parse::<ExpiryPolicy>(), Ok(ExpiryPolicy::Prune));
        assert_eq!(" Lazy ".parse::<ExpiryPolicy>(), Ok(ExpiryPolicy::Lazy));
        assert!("never".parse::<ExpiryPolicy>().is_err());
        assert_eq!(ExpiryPolicy::default().to_string(), "lazy");
    }
}
