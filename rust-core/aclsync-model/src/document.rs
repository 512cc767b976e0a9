// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! The capability shared by both ACL documents.
//!
//! Store clients are written once against [`AclDocument`] instead of once per
//! document type: the trait supplies the document's kind (which doubles as its
//! store address and envelope key) and its two encodings.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeError, EncodeError};

/// Which of the two Search Guard documents a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocKind {
    Roles,
    RolesMapping,
}

impl DocKind {
    /// Name used both as the document id in the store and as the envelope key.
    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Roles => "roles",
            DocKind::RolesMapping => "rolesmapping",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A serializable ACL document.
pub trait AclDocument: Serialize + DeserializeOwned + Send + Sync {
    const KIND: DocKind;

    fn kind(&self) -> DocKind {
        Self::KIND
    }

    /// Decode a transport payload. Malformed input is rejected whole.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Compact JSON, as embedded (base64-wrapped) in the store envelope.
    fn encode_for_transport(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// YAML rendering in the layout of Search Guard's `sg_roles.yml` and
    /// `sg_roles_mapping.yml`, for audit and export.
    fn encode_for_audit(&self) -> Result<String, EncodeError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
