// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OpenShift project listing.
//
// Lists the projects a user may see by calling the project API with the
// user's own access token, so the cluster's RBAC decides visibility.

use std::path::Path;
use std::time::Duration;

use aclsync_model::Project;
use aclsync_store::tls;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::{IdentityConfig, SERVICE_ACCOUNT_CA};
use crate::error::IdentityError;
use crate::resolver::{require_token, ProjectResolver};

/// Path of the project list on the API server.
pub const PROJECTS_PATH: &str = "/apis/project.openshift.io/v1/projects";

/// Client for the OpenShift project API.
///
/// Holds one connection pool; the user token is supplied per call.
#[derive(Debug, Clone)]
pub struct OpenShiftClient {
    projects_url: Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl OpenShiftClient {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let invalid = |reason: String| IdentityError::InvalidEndpoint {
            url: config.api_url.clone(),
            reason,
        };
        let base = Url::parse(&config.api_url).map_err(|e| invalid(e.to_string()))?;
        let projects_url = base.join(PROJECTS_PATH).map_err(|e| invalid(e.to_string()))?;

        tls::install_crypto_provider();
        let timeout = config.request_timeout();
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout);

        if config.ca_bundle.is_empty() {
            let default_ca = Path::new(SERVICE_ACCOUNT_CA);
            if default_ca.exists() {
                for cert in tls::load_ca_bundle(default_ca)? {
                    builder = builder.add_root_certificate(cert);
                }
            }
        } else {
            builder = builder.tls_built_in_root_certs(false);
            for path in &config.ca_bundle {
                for cert in tls::load_ca_bundle(path)? {
                    builder = builder.add_root_certificate(cert);
                }
            }
        }
        let http = builder.build().map_err(IdentityError::Network)?;

        Ok(Self {
            projects_url,
            http,
            timeout,
        })
    }

    pub fn projects_url(&self) -> &Url {
        &self.projects_url
    }

    fn transport_error(&self, err: reqwest::Error) -> IdentityError {
        if err.is_timeout() {
            IdentityError::Timeout(self.timeout.as_millis() as u64)
        } else {
            IdentityError::Network(err)
        }
    }
}

#[async_trait]
impl ProjectResolver for OpenShiftClient {
    async fn projects(&self, token: &str) -> Result<Vec<Project>, IdentityError> {
        require_token(token)?;
        debug!(url = %self.projects_url, "listing visible projects");

        let response = self
            .http
            .get(self.projects_url.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        trace!(status = status.as_u16(), %body, "project list response");

        if !status.is_success() {
            warn!(status = status.as_u16(), "project list rejected");
            return Err(IdentityError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(parse_project_list(&value))
    }
}

/// Read `items[*].metadata.{name,uid}` from a project list.
///
/// A missing or non-string field becomes an empty string and a missing
/// `items` array yields no projects.
pub fn parse_project_list(value: &Value) -> Vec<Project> {
    let Some(items) = value.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let field = |name: &str| {
                item.pointer(&format!("/metadata/{name}"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Project::new(field("name"), field("uid"))
        })
        .collect()
}
