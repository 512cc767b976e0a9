// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ACLSync document store client.
//
// Reads and replaces the Search Guard `roles` and `rolesmapping` documents.
// Every store implements the `DocumentStore` trait, so the manager can run
// against a live cluster, the in-memory store, or a metered wrapper of
// either.
//
// Modules:
// - [`backend`] -- The `DocumentStore` trait and typed fetch/replace helpers.
// - [`envelope`] -- Base64 payload wrapping used by Search Guard.
// - [`http`] -- `SearchGuardClient`, the reqwest-based store.
// - [`memory`] -- `InMemoryDocumentStore` for tests and local runs.
// - [`metrics`] -- `MetricsStore` call counting wrapper.
// - [`tls`] -- Certificate and key loading.

pub mod backend;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod memory;
pub mod metrics;
pub mod tls;

pub use backend::DocumentStore;
pub use config::StoreConfig;
pub use error::{FetchError, StoreError, TlsError, WriteError};
pub use http::SearchGuardClient;
pub use memory::InMemoryDocumentStore;
pub use metrics::{MetricsStore, StoreStats};
