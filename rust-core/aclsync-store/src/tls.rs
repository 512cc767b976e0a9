// SPDX-License-Identifier: PMPL-1.0-or-later
//! TLS material loading shared by the ACLSync HTTP clients.
//!
//! The workspace builds reqwest against rustls without a bundled crypto
//! provider, so [`install_crypto_provider`] must run before any client is
//! built. It is idempotent.

use std::path::{Path, PathBuf};

use reqwest::{Certificate, Identity};

use crate::error::TlsError;

/// Install the ring provider as the process default, if none is installed.
pub fn install_crypto_provider() {
    // Fails only when a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

fn read(path: &Path) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path).map_err(|source| TlsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every certificate in a PEM bundle.
pub fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, TlsError> {
    let pem = read(path)?;
    Certificate::from_pem_bundle(&pem).map_err(|source| TlsError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a client identity from a PEM certificate and PEM private key.
///
/// Returns `Ok(None)` when neither is configured.
pub fn load_identity(
    cert: Option<&PathBuf>,
    key: Option<&PathBuf>,
) -> Result<Option<Identity>, TlsError> {
    match (cert, key) {
        (None, None) => Ok(None),
        (Some(cert), Some(key)) => {
            let mut pem = read(cert)?;
            pem.push(b'\n');
            pem.extend(read(key)?);
            Identity::from_pem(&pem)
                .map(Some)
                .map_err(|source| TlsError::Invalid {
                    path: cert.clone(),
                    source,
                })
        }
        _ => Err(TlsError::IncompleteIdentity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_identity_configured() {
        assert!(load_identity(None, None).unwrap().is_none());
    }

    #[test]
    fn test_cert_without_key_is_rejected() {
        let cert = PathBuf::from("/nonexistent/client.crt");
        assert!(matches!(
            load_identity(Some(&cert), None),
            Err(TlsError::IncompleteIdentity)
        ));
    }

    #[test]
    fn test_missing_bundle_reports_path() {
        let err = load_ca_bundle(Path::new("/nonexistent/ca.crt")).unwrap_err();
        match err {
            TlsError::Read { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/ca.crt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_install_is_idempotent() {
        install_crypto_provider();
        install_crypto_provider();
    }
}
