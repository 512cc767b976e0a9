// SPDX-License-Identifier: PMPL-1.0-or-later
//! Identity service configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// In-cluster API host used when `KUBERNETES_SERVICE_HOST` is unset.
pub const DEFAULT_API_HOST: &str = "kubernetes.default.svc";

/// Service account CA mounted into every pod.
pub const SERVICE_ACCOUNT_CA: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Environment variable overriding the API host.
pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Base URL of the cluster API server.
    pub api_url: String,
    /// PEM CA bundles trusted for the API server. When empty, the service
    /// account CA (if mounted) is trusted in addition to the built-in roots.
    /// When set, only these bundles are trusted.
    pub ca_bundle: Vec<PathBuf>,
    pub request_timeout_secs: u64,
}

impl IdentityConfig {
    /// Configuration for the API server at `host`.
    pub fn for_host(host: &str) -> Self {
        Self {
            api_url: format!("https://{host}"),
            ..Self::default()
        }
    }

    /// Defaults with the host taken from `KUBERNETES_SERVICE_HOST` if set.
    pub fn from_env() -> Self {
        match std::env::var(SERVICE_HOST_ENV) {
            Ok(host) if !host.is_empty() => Self::for_host(&host),
            _ => Self::default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_url: format!("https://{DEFAULT_API_HOST}"),
            ca_bundle: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}
