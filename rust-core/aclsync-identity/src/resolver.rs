// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Project resolution seam.
//
// The request handler only needs "which projects can this token see". The
// OpenShift client answers that against a cluster; the static resolver
// answers it from a table for tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aclsync_model::Project;
use async_trait::async_trait;

use crate::error::IdentityError;

/// Lists the projects visible to the bearer of an access token.
#[async_trait]
pub trait ProjectResolver: Send + Sync {
    /// Projects visible to `token`. A blank token is a
    /// [`IdentityError::Precondition`] and must not reach the network.
    async fn projects(&self, token: &str) -> Result<Vec<Project>, IdentityError>;
}

#[async_trait]
impl<R: ProjectResolver + ?Sized> ProjectResolver for Arc<R> {
    async fn projects(&self, token: &str) -> Result<Vec<Project>, IdentityError> {
        (**self).projects(token).await
    }
}

pub(crate) fn require_token(token: &str) -> Result<(), IdentityError> {
    if token.trim().is_empty() {
        return Err(IdentityError::Precondition(
            "cannot query the identity service with a blank user token".to_string(),
        ));
    }
    Ok(())
}

/// A resolver backed by a fixed token table.
///
/// Unknown tokens are rejected with a 401 status. Clones share the call
/// counter.
#[derive(Debug, Clone, Default)]
pub struct StaticProjectResolver {
    tokens: HashMap<String, Vec<Project>>,
    calls: Arc<AtomicUsize>,
}

impl StaticProjectResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, projects: Vec<Project>) -> Self {
        self.tokens.insert(token.into(), projects);
        self
    }

    /// Number of lookups attempted, including rejected ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectResolver for StaticProjectResolver {
    async fn projects(&self, token: &str) -> Result<Vec<Project>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        require_token(token)?;
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Status {
                status: 401,
                message: "Unauthorized".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_token() {
        let resolver = StaticProjectResolver::new()
            .with_token("t1", vec![Project::new("xyz", "123abc")]);
        let projects = resolver.projects("t1").await.unwrap();
        assert_eq!(projects, vec![Project::new("xyz", "123abc")]);
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let resolver = StaticProjectResolver::new();
        let err = resolver.projects("nope").await.unwrap_err();
        assert!(matches!(err, IdentityError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_blank_token_is_precondition() {
        let resolver = StaticProjectResolver::new().with_token(" ", Vec::new());
        for token in ["", " ", "\t\n"] {
            assert!(matches!(
                resolver.projects(token).await,
                Err(IdentityError::Precondition(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_arc_delegates() {
        let resolver: Arc<dyn ProjectResolver> =
            Arc::new(StaticProjectResolver::new().with_token("t", Vec::new()));
        assert!(resolver.projects("t").await.unwrap().is_empty());
    }
}
