// SPDX-License-Identifier: PMPL-1.0-or-later
//! Store client configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Elasticsearch endpoint hosting the Search Guard index.
pub const DEFAULT_ENDPOINT: &str = "https://localhost:9200";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::SearchGuardClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the Elasticsearch cluster.
    pub endpoint: String,
    /// PEM client certificate presented to the cluster.
    pub client_cert: Option<PathBuf>,
    /// PEM private key for `client_cert`.
    pub client_key: Option<PathBuf>,
    /// Additional PEM CA bundles trusted for the cluster's certificate.
    pub ca_bundle: Vec<PathBuf>,
    /// Skip server certificate verification. Local development only.
    pub insecure_skip_verify: bool,
    pub request_timeout_secs: u64,
}

impl StoreConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client_cert: None,
            client_key: None,
            ca_bundle: Vec::new(),
            insecure_skip_verify: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
