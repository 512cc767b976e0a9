// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP document store talking to the Search Guard configuration index.
//
// Documents live at `<endpoint>/.searchguard/sg/<kind>`. Reads are plain
// GETs; writes PUT the whole enveloped document. The client authenticates
// with a TLS client certificate when one is configured.

use std::time::Duration;

use aclsync_model::DocKind;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, trace};

use crate::backend::DocumentStore;
use crate::config::StoreConfig;
use crate::error::{
    fetch_transport_error, write_transport_error, FetchError, StoreError, WriteError,
};
use crate::tls;

/// Index and type holding the Search Guard configuration documents.
pub const SEARCHGUARD_PATH: &str = ".searchguard/sg";

/// A [`DocumentStore`] backed by an Elasticsearch cluster running Search Guard.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SearchGuardClient {
    endpoint: Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl SearchGuardClient {
    /// Build a client from `config`, loading any configured TLS material.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| StoreError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(StoreError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        tls::install_crypto_provider();
        let timeout = config.request_timeout();
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.insecure_skip_verify);
        for path in &config.ca_bundle {
            for cert in tls::load_ca_bundle(path)? {
                builder = builder.add_root_certificate(cert);
            }
        }
        if let Some(identity) =
            tls::load_identity(config.client_cert.as_ref(), config.client_key.as_ref())?
        {
            builder = builder.identity(identity);
        }
        let http = builder.build().map_err(StoreError::Client)?;

        Ok(Self {
            endpoint,
            http,
            timeout,
        })
    }

    /// Full URL of the document `kind`.
    pub fn document_url(&self, kind: DocKind) -> String {
        format!(
            "{}/{SEARCHGUARD_PATH}/{kind}",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Pull a readable message out of an Elasticsearch error body.
///
/// Uses `error` when it is a string, `error.reason` when it is an object,
/// and the raw body otherwise.
pub fn extract_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| match value.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(error) => error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string),
        None => None,
    });
    message.unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl DocumentStore for SearchGuardClient {
    async fn get_envelope(&self, kind: DocKind) -> Result<Vec<u8>, FetchError> {
        let url = self.document_url(kind);
        debug!(%url, "fetching document");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| fetch_transport_error(e, self.timeout))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_transport_error(e, self.timeout))?;
        trace!(%url, status = status.as_u16(), len = body.len(), "fetch response");

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(FetchError::Status {
                status: status.as_u16(),
                message: extract_error_message(&String::from_utf8_lossy(&body)),
            })
        }
    }

    async fn put_envelope(&self, kind: DocKind, body: Vec<u8>) -> Result<(), WriteError> {
        let url = self.document_url(kind);
        debug!(%url, len = body.len(), "replacing document");

        let response = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| write_transport_error(e, self.timeout))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response
            .text()
            .await
            .map_err(|e| write_transport_error(e, self.timeout))?;
        trace!(%url, status = status.as_u16(), body = %text, "replace rejected");
        Err(WriteError::Status {
            status: status.as_u16(),
            message: extract_error_message(&text),
        })
    }

    fn name(&self) -> &str {
        "searchguard"
    }
}
