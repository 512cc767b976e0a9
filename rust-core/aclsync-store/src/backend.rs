// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core document store trait for ACLSync.
//
// A store only has to move raw envelopes for a document kind. Decoding and
// encoding of the typed documents is shared by every implementation through
// the provided methods.

use std::sync::Arc;

use aclsync_model::{AclDocument, DocKind, Roles, RolesMapping};
use async_trait::async_trait;

use crate::envelope;
use crate::error::{FetchError, WriteError};

/// A remote holder of the two Search Guard documents.
///
/// Document addresses are fixed per [`DocKind`]. Writes are full-document
/// replacements; a store offers no conditional or partial update.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the raw response body for `kind`.
    async fn get_envelope(&self, kind: DocKind) -> Result<Vec<u8>, FetchError>;

    /// Replace the document `kind` with an already enveloped `body`.
    async fn put_envelope(&self, kind: DocKind, body: Vec<u8>) -> Result<(), WriteError>;

    /// A human-readable name for this store, used in logging.
    fn name(&self) -> &str;

    async fn fetch_roles(&self) -> Result<Roles, FetchError> {
        fetch_document(self).await
    }

    async fn fetch_roles_mapping(&self) -> Result<RolesMapping, FetchError> {
        fetch_document(self).await
    }

    async fn replace_roles(&self, roles: &Roles) -> Result<(), WriteError> {
        replace_document(self, roles).await
    }

    async fn replace_roles_mapping(&self, mapping: &RolesMapping) -> Result<(), WriteError> {
        replace_document(self, mapping).await
    }
}

/// Fetch and decode the document of type `D`.
pub async fn fetch_document<D, S>(store: &S) -> Result<D, FetchError>
where
    D: AclDocument,
    S: DocumentStore + ?Sized,
{
    let body = store.get_envelope(D::KIND).await?;
    envelope::decode_document(&body)
}

/// Encode `doc` and replace the stored document of its kind.
pub async fn replace_document<D, S>(store: &S, doc: &D) -> Result<(), WriteError>
where
    D: AclDocument,
    S: DocumentStore + ?Sized,
{
    let body = envelope::encode_document(doc)?;
    store.put_envelope(doc.kind(), body).await
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn get_envelope(&self, kind: DocKind) -> Result<Vec<u8>, FetchError> {
        (**self).get_envelope(kind).await
    }

    async fn put_envelope(&self, kind: DocKind, body: Vec<u8>) -> Result<(), WriteError> {
        (**self).put_envelope(kind, body).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
