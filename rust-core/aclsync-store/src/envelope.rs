// SPDX-License-Identifier: PMPL-1.0-or-later
//! The store's document envelope.
//!
//! Search Guard keeps each configuration document base64-encoded inside an
//! Elasticsearch document. Reads return `{"_source": {"<kind>": "<base64>"}}`;
//! writes send `{"<kind>": "<base64>"}`.

use aclsync_model::{AclDocument, DocKind};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::{FetchError, WriteError};

/// Where the payload of `kind` lives in a read response.
pub fn payload_path(kind: DocKind) -> String {
    format!("_source.{kind}")
}

/// Extract and base64-decode the payload of `kind` from a read response.
pub fn unwrap_payload(body: &[u8], kind: DocKind) -> Result<Vec<u8>, FetchError> {
    let value: Value = serde_json::from_slice(body).map_err(FetchError::Envelope)?;
    let encoded = value
        .get("_source")
        .and_then(|source| source.get(kind.as_str()))
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::MissingPayload {
            path: payload_path(kind),
        })?;
    Ok(STANDARD.decode(encoded)?)
}

/// Base64-encode `payload` and wrap it under the `kind` key.
pub fn wrap_payload(kind: DocKind, payload: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let mut envelope = Map::new();
    envelope.insert(kind.as_str().to_string(), Value::String(STANDARD.encode(payload)));
    serde_json::to_vec(&Value::Object(envelope))
}

/// Full read path: envelope, base64, document.
pub fn decode_document<D: AclDocument>(body: &[u8]) -> Result<D, FetchError> {
    let payload = unwrap_payload(body, D::KIND)?;
    Ok(D::decode(&payload)?)
}

/// Full write path: document, base64, envelope.
pub fn encode_document<D: AclDocument>(doc: &D) -> Result<Vec<u8>, WriteError> {
    let payload = doc.encode_for_transport()?;
    wrap_payload(doc.kind(), &payload).map_err(WriteError::Envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclsync_model::{Principal, Roles, RolesMapping};

    fn read_response(kind: DocKind, encoded: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "_index": ".searchguard",
            "_id": kind.as_str(),
            "found": true,
            "_source": { kind.as_str(): encoded },
        }))
        .unwrap()
    }

    #[test]
    fn test_wrap_uses_kind_key() {
        let body = wrap_payload(DocKind::RolesMapping, b"{}").unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "rolesmapping": "e30=" }));
    }

    #[test]
    fn test_unwrap_decodes_base64() {
        let body = read_response(DocKind::Roles, "e30=");
        assert_eq!(unwrap_payload(&body, DocKind::Roles).unwrap(), b"{}");
    }

    #[test]
    fn test_unwrap_looks_up_own_kind() {
        // A roles payload must not be accepted as rolesmapping.
        let body = read_response(DocKind::Roles, "e30=");
        let err = unwrap_payload(&body, DocKind::RolesMapping).unwrap_err();
        assert!(matches!(err, FetchError::MissingPayload { ref path } if path == "_source.rolesmapping"));
    }

    #[test]
    fn test_unwrap_rejects_bad_envelope() {
        assert!(matches!(
            unwrap_payload(b"not json", DocKind::Roles),
            Err(FetchError::Envelope(_))
        ));
        assert!(matches!(
            unwrap_payload(br#"{"_source":{"roles":42}}"#, DocKind::Roles),
            Err(FetchError::MissingPayload { .. })
        ));
        assert!(matches!(
            unwrap_payload(&read_response(DocKind::Roles, "***"), DocKind::Roles),
            Err(FetchError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_document() {
        // base64("[]")
        let body = read_response(DocKind::Roles, "W10=");
        assert!(matches!(
            decode_document::<Roles>(&body),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_document_survives_envelope() {
        let mut mapping = RolesMapping::new();
        mapping.insert(
            "gen_user_x",
            aclsync_model::RoleMapping::for_principal(&Principal::new("alice"), 9),
        );

        let written: Value = serde_json::from_slice(&encode_document(&mapping).unwrap()).unwrap();
        let encoded = written["rolesmapping"].as_str().unwrap();
        let body = read_response(DocKind::RolesMapping, encoded);

        assert_eq!(decode_document::<RolesMapping>(&body).unwrap(), mapping);
    }
}
