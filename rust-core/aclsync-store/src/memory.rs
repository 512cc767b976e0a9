// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory document store for ACLSync.
//
// Speaks the same envelope format as Search Guard: writes must carry the
// base64 payload under the document's kind key, and reads answer with an
// Elasticsearch-style `_source` wrapper. Intended for tests and local runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aclsync_model::{AclDocument, DocKind};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::backend::DocumentStore;
use crate::error::{FetchError, WriteError};

/// base64 of `{}`, the transport form of an empty document.
const EMPTY_PAYLOAD: &str = "e30=";

/// An in-memory store holding the base64 payload of each document.
///
/// Clones share state, so a test can keep a handle while a manager owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    /// kind -> base64 payload
    docs: Arc<RwLock<BTreeMap<DocKind, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    /// Delay applied to every call, to widen race windows in tests.
    latency: Option<Duration>,
}

impl InMemoryDocumentStore {
    /// An empty store. Reads of an unseeded document return 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding an empty `roles` and `rolesmapping` document.
    pub async fn with_empty_documents() -> Self {
        let store = Self::new();
        store.seed_raw(DocKind::Roles, EMPTY_PAYLOAD).await;
        store.seed_raw(DocKind::RolesMapping, EMPTY_PAYLOAD).await;
        store
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Store `doc` directly, bypassing failure injection and latency.
    pub async fn seed<D: AclDocument>(&self, doc: &D) -> Result<(), WriteError> {
        let body = crate::envelope::encode_document(doc)?;
        self.store_envelope(doc.kind(), &body).await
    }

    /// Decode the current document of type `D`, if present and valid.
    pub async fn snapshot<D: AclDocument>(&self) -> Option<D> {
        let encoded = self.docs.read().await.get(&D::KIND).cloned()?;
        crate::envelope::decode_document(&read_response(D::KIND, &encoded)).ok()
    }

    /// Store a raw base64 payload, e.g. to plant a corrupt document.
    pub async fn seed_raw(&self, kind: DocKind, encoded: impl Into<String>) {
        self.docs.write().await.insert(kind, encoded.into());
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn store_envelope(&self, kind: DocKind, body: &[u8]) -> Result<(), WriteError> {
        let encoded = take_payload(kind, body).map_err(|message| WriteError::Status {
            status: 400,
            message,
        })?;
        self.docs.write().await.insert(kind, encoded);
        Ok(())
    }
}

fn read_response(kind: DocKind, encoded: &str) -> Vec<u8> {
    let body = json!({
        "_index": ".searchguard",
        "_type": "sg",
        "_id": kind.as_str(),
        "found": true,
        "_source": { kind.as_str(): encoded },
    });
    body.to_string().into_bytes()
}

fn take_payload(kind: DocKind, body: &[u8]) -> Result<String, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    value
        .get(kind.as_str())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("envelope has no {kind} payload"))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_envelope(&self, kind: DocKind) -> Result<Vec<u8>, FetchError> {
        self.delay().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("reads disabled".to_string()));
        }
        let docs = self.docs.read().await;
        match docs.get(&kind) {
            Some(encoded) => Ok(read_response(kind, encoded)),
            None => Err(FetchError::Status {
                status: 404,
                message: format!("document {kind} not found"),
            }),
        }
    }

    async fn put_envelope(&self, kind: DocKind, body: Vec<u8>) -> Result<(), WriteError> {
        self.delay().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WriteError::Unavailable("writes disabled".to_string()));
        }
        self.store_envelope(kind, &body).await
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
