// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metrics-collecting wrapper for ACLSync document stores.
//
// Wraps any `DocumentStore` and counts fetches, replacements, failures and
// bytes moved. The manager's tests use it to assert which store calls a
// sync cycle made, e.g. that an exempt user causes none.

use std::sync::Arc;
use std::time::Instant;

use aclsync_model::DocKind;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::DocumentStore;
use crate::error::{FetchError, WriteError};

/// Accumulated statistics for a document store.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Number of document reads attempted.
    pub fetch_count: u64,
    /// Number of document replacements attempted.
    pub replace_count: u64,
    /// Reads that returned an error.
    pub fetch_failures: u64,
    /// Replacements that returned an error.
    pub replace_failures: u64,
    /// Cumulative wall-clock latency of all reads, in milliseconds.
    pub fetch_latency_sum_ms: f64,
    /// Cumulative wall-clock latency of all replacements, in milliseconds.
    pub replace_latency_sum_ms: f64,
    /// Total response bytes of successful reads.
    pub total_bytes_read: u64,
    /// Total request bytes of successful replacements.
    pub total_bytes_written: u64,
}

impl StoreStats {
    /// Total calls made against the wrapped store.
    pub fn total_calls(&self) -> u64 {
        self.fetch_count + self.replace_count
    }
}

/// A document store wrapper that collects operation metrics.
///
/// Clones share the same statistics and the same inner store handle.
///
/// # Example
///
/// ```rust
/// use aclsync_store::{DocumentStore, InMemoryDocumentStore, MetricsStore};
///
/// # tokio_test::block_on(async {
/// let metered = MetricsStore::new(InMemoryDocumentStore::with_empty_documents().await);
///
/// let roles = metered.fetch_roles().await.unwrap();
/// metered.replace_roles(&roles).await.unwrap();
///
/// let stats = metered.stats().await;
/// assert_eq!(stats.fetch_count, 1);
/// assert_eq!(stats.replace_count, 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MetricsStore<S: DocumentStore> {
    inner: S,
    stats: Arc<RwLock<StoreStats>>,
}

impl<S: DocumentStore> MetricsStore<S> {
    /// Wrap `inner` with metrics collection.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: Arc::new(RwLock::new(StoreStats::default())),
        }
    }

    /// Return a snapshot of the current statistics.
    pub async fn stats(&self) -> StoreStats {
        self.stats.read().await.clone()
    }

    /// Reset all statistics to zero.
    pub async fn reset_stats(&self) {
        let mut s = self.stats.write().await;
        *s = StoreStats::default();
    }

    /// Return a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for MetricsStore<S> {
    async fn get_envelope(&self, kind: DocKind) -> Result<Vec<u8>, FetchError> {
        let start = Instant::now();
        let result = self.inner.get_envelope(kind).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut s = self.stats.write().await;
        s.fetch_count += 1;
        s.fetch_latency_sum_ms += elapsed_ms;
        match result {
            Ok(ref body) => s.total_bytes_read += body.len() as u64,
            Err(_) => s.fetch_failures += 1,
        }

        result
    }

    async fn put_envelope(&self, kind: DocKind, body: Vec<u8>) -> Result<(), WriteError> {
        let len = body.len() as u64;
        let start = Instant::now();
        let result = self.inner.put_envelope(kind, body).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut s = self.stats.write().await;
        s.replace_count += 1;
        s.replace_latency_sum_ms += elapsed_ms;
        if result.is_ok() {
            s.total_bytes_written += len;
        } else {
            s.replace_failures += 1;
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
