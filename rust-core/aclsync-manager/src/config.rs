// SPDX-License-Identifier: PMPL-1.0-or-later
//! ACLSync configuration.
//!
//! Configuration is explicit and immutable once built. [`ExtensionConfig`]
//! gathers every section the request handler needs and can be read from
//! `ACLSYNC_*` environment variables.

use std::collections::BTreeSet;
use std::path::PathBuf;

use aclsync_identity::config::SERVICE_HOST_ENV;
use aclsync_identity::IdentityConfig;
use aclsync_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expiry::ExpiryPolicy;

/// Members of this group are never given generated entries.
pub const DEFAULT_INFRA_GROUP: &str = "system:cluster-admins";

/// Lifetime of a generated entry: two minutes.
pub const DEFAULT_PERMISSION_EXPIRATION_MILLIS: i64 = 120_000;

pub const ENV_INFRA_GROUP: &str = "ACLSYNC_INFRA_GROUP";
pub const ENV_PERMISSION_EXPIRATION_MILLIS: &str = "ACLSYNC_PERMISSION_EXPIRATION_MILLIS";
pub const ENV_EXPIRY_POLICY: &str = "ACLSYNC_EXPIRY_POLICY";
pub const ENV_STORE_URL: &str = "ACLSYNC_STORE_URL";
pub const ENV_STORE_CERT: &str = "ACLSYNC_STORE_CERT";
pub const ENV_STORE_KEY: &str = "ACLSYNC_STORE_KEY";
pub const ENV_STORE_CA: &str = "ACLSYNC_STORE_CA";
pub const ENV_STORE_INSECURE: &str = "ACLSYNC_STORE_INSECURE";
pub const ENV_BYPASS_USERS: &str = "ACLSYNC_BYPASS_USERS";

/// Settings for [`crate::DocumentManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Group whose members are exempt from synchronization.
    pub infra_group_name: String,
    /// Added to the current time to form a generated entry's expiry.
    pub permission_expiration_millis: i64,
    pub expiry_policy: ExpiryPolicy,
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.infra_group_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "infra_group_name must not be blank".to_string(),
            ));
        }
        if self.permission_expiration_millis <= 0 {
            return Err(ConfigError::Invalid(format!(
                "permission_expiration_millis must be positive, got {}",
                self.permission_expiration_millis
            )));
        }
        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            infra_group_name: DEFAULT_INFRA_GROUP.to_string(),
            permission_expiration_millis: DEFAULT_PERMISSION_EXPIRATION_MILLIS,
            expiry_policy: ExpiryPolicy::Lazy,
        }
    }
}

/// Everything the request handler needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub manager: ManagerConfig,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    /// Users for which all synchronization is skipped, e.g. log collectors.
    pub bypass_users: BTreeSet<String>,
}

impl ExtensionConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, starting from defaults.
    ///
    /// Unset and empty variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(group) = get(ENV_INFRA_GROUP) {
            config.manager.infra_group_name = group;
        }
        if let Some(raw) = get(ENV_PERMISSION_EXPIRATION_MILLIS) {
            config.manager.permission_expiration_millis =
                raw.trim().parse().map_err(|e| env_error(ENV_PERMISSION_EXPIRATION_MILLIS, e))?;
        }
        if let Some(raw) = get(ENV_EXPIRY_POLICY) {
            config.manager.expiry_policy =
                raw.parse().map_err(|e| env_error(ENV_EXPIRY_POLICY, e))?;
        }

        if let Some(url) = get(ENV_STORE_URL) {
            config.store.endpoint = url;
        }
        config.store.client_cert = get(ENV_STORE_CERT).map(PathBuf::from);
        config.store.client_key = get(ENV_STORE_KEY).map(PathBuf::from);
        if let Some(raw) = get(ENV_STORE_CA) {
            config.store.ca_bundle = split_list(&raw).map(PathBuf::from).collect();
        }
        if let Some(raw) = get(ENV_STORE_INSECURE) {
            config.store.insecure_skip_verify = parse_bool(&raw)
                .ok_or_else(|| env_error(ENV_STORE_INSECURE, format!("not a boolean: '{raw}'")))?;
        }

        if let Some(host) = get(SERVICE_HOST_ENV) {
            config.identity = IdentityConfig::for_host(&host);
        }

        if let Some(raw) = get(ENV_BYPASS_USERS) {
            config.bypass_users = split_list(&raw).map(str::to_string).collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.manager.validate()?;
        if self.store.client_cert.is_some() != self.store.client_key.is_some() {
            return Err(ConfigError::Invalid(
                "store client certificate and key must be set together".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_error(var: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Env {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExtensionConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.manager.infra_group_name, "system:cluster-admins");
        assert_eq!(config.manager.permission_expiration_millis, 120_000);
        assert_eq!(config.manager.expiry_policy, ExpiryPolicy::Lazy);
        assert_eq!(config.store.endpoint, "https://localhost:9200");
        assert_eq!(config.identity.api_url, "https://kubernetes.default.svc");
        assert!(config.bypass_users.is_empty());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = ExtensionConfig::from_lookup(lookup(&[
            (ENV_INFRA_GROUP, "ops"),
            (ENV_PERMISSION_EXPIRATION_MILLIS, "60000"),
            (ENV_EXPIRY_POLICY, "prune"),
            (ENV_STORE_URL, "https://es:9200"),
            (ENV_STORE_CERT, "/etc/proxy/cert"),
            (ENV_STORE_KEY, "/etc/proxy/key"),
            (ENV_STORE_CA, "/etc/proxy/ca, /etc/proxy/ca2"),
            (ENV_STORE_INSECURE, "true"),
            (SERVICE_HOST_ENV, "172.30.0.1"),
            (ENV_BYPASS_USERS, "system:serviceaccount:logging:fluentd,collector"),
        ]))
        .unwrap();

        assert_eq!(config.manager.infra_group_name, "ops");
        assert_eq!(config.manager.permission_expiration_millis, 60_000);
        assert_eq!(config.manager.expiry_policy, ExpiryPolicy::Prune);
        assert_eq!(config.store.endpoint, "https://es:9200");
        assert_eq!(config.store.client_cert, Some(PathBuf::from("/etc/proxy/cert")));
        assert_eq!(
            config.store.ca_bundle,
            vec![PathBuf::from("/etc/proxy/ca"), PathBuf::from("/etc/proxy/ca2")]
        );
        assert!(config.store.insecure_skip_verify);
        assert_eq!(config.identity.api_url, "https://172.30.0.1");
        assert!(config.bypass_users.contains("collector"));
        assert_eq!(config.bypass_users.len(), 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ExtensionConfig::from_lookup(lookup(&[(ENV_PERMISSION_EXPIRATION_MILLIS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { ref var, .. } if var == ENV_PERMISSION_EXPIRATION_MILLIS));

        let err = ExtensionConfig::from_lookup(lookup(&[(ENV_PERMISSION_EXPIRATION_MILLIS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ExtensionConfig::from_lookup(lookup(&[(ENV_STORE_CERT, "/etc/proxy/cert")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(ExtensionConfig::from_lookup(lookup(&[(ENV_STORE_INSECURE, "maybe")])).is_err());
    }

    #[test]
    fn test_blank_infra_group_is_invalid() {
        let config = ManagerConfig {
            infra_group_name: "  ".to_string(),
            ..ManagerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_manager_config() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{"expiry_policy":"prune"}"#).unwrap();
        assert_eq!(config.expiry_policy, ExpiryPolicy::Prune);
        assert_eq!(config.permission_expiration_millis, 120_000);
    }

    #[test]
    fn test_default_window_is_two_minutes() {
        assert_eq!(DEFAULT_PERMISSION_EXPIRATION_MILLIS, 2 * 60 * 1000);
        assert_eq!(
            ManagerConfig::default().permission_expiration_millis,
            DEFAULT_PERMISSION_EXPIRATION_MILLIS
        );
    }
}
