// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request handler for the logging proxy.
//
// The proxy authenticates users upstream and forwards their identity in
// `X-Forwarded-*` headers. For every request the handler resolves the
// user's visible projects with the forwarded token and synchronizes the
// user's generated ACL entry before the request continues.

use std::collections::BTreeSet;
use std::sync::Arc;

use aclsync_identity::ProjectResolver;
use aclsync_model::Principal;
use aclsync_store::DocumentStore;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::HandlerError;
use crate::manager::{DocumentManager, SyncOutcome};

pub const HEADER_USER: &str = "x-forwarded-user";
pub const HEADER_ACCESS_TOKEN: &str = "x-forwarded-access-token";
pub const HEADER_GROUPS: &str = "x-forwarded-groups";

/// What [`AccessControlExtension::process`] did for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The user is on the bypass list; nothing was resolved or written.
    Bypassed,
    Processed(SyncOutcome),
}

/// Resolves a request's principal and keeps its ACL entry current.
pub struct AccessControlExtension<S: DocumentStore, R: ProjectResolver> {
    manager: DocumentManager<S>,
    resolver: R,
    bypass_users: BTreeSet<String>,
}

impl<S: DocumentStore, R: ProjectResolver> AccessControlExtension<S, R> {
    pub fn new(manager: DocumentManager<S>, resolver: R) -> Self {
        Self {
            manager,
            resolver,
            bypass_users: BTreeSet::new(),
        }
    }

    pub fn with_bypass_users<I, U>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.bypass_users = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn manager(&self) -> &DocumentManager<S> {
        &self.manager
    }

    pub fn is_bypassed(&self, username: &str) -> bool {
        self.bypass_users.contains(username)
    }

    /// Resolve the caller's projects and synchronize its ACL entry.
    ///
    /// A request without a usable username is rejected before the bypass
    /// check, so it never reaches the resolver or the store.
    pub async fn process(&self, headers: &HeaderMap) -> Result<ProcessOutcome, HandlerError> {
        let principal = principal_from_headers(headers)?;
        if self.is_bypassed(&principal.username) {
            trace!(user = %principal.username, "bypassed user");
            return Ok(ProcessOutcome::Bypassed);
        }

        // A missing token is left to the resolver, which rejects it as blank.
        let token = header_str(headers, HEADER_ACCESS_TOKEN)?.unwrap_or_default();
        let projects = self.resolver.projects(token).await?;
        let principal = principal.with_projects(projects);
        debug!(
            user = %principal.username,
            projects = principal.projects.len(),
            "resolved principal"
        );

        let outcome = self.manager.sync_acl(&principal).await?;
        Ok(ProcessOutcome::Processed(outcome))
    }
}

// Header values are decoded as UTF-8 rather than visible ASCII: usernames
// and group names are hashed and copied byte for byte.
fn decode_header<'a>(
    header: &'static str,
    value: &'a HeaderValue,
) -> Result<&'a str, HandlerError> {
    std::str::from_utf8(value.as_bytes()).map_err(|e| HandlerError::Header {
        header,
        reason: format!("not valid UTF-8: {e}"),
    })
}

fn header_str<'a>(
    headers: &'a HeaderMap,
    header: &'static str,
) -> Result<Option<&'a str>, HandlerError> {
    headers
        .get(header)
        .map(|v| decode_header(header, v))
        .transpose()
}

/// Build a principal from the forwarded identity headers.
///
/// The username is required and must be non-blank. Every
/// `X-Forwarded-Groups` value becomes one group, verbatim and in header
/// order. Projects are left empty for the resolver to fill.
pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, HandlerError> {
    let username = match header_str(headers, HEADER_USER)? {
        Some(name) if !name.trim().is_empty() => name,
        Some(_) => {
            return Err(HandlerError::Header {
                header: HEADER_USER,
                reason: "blank".to_string(),
            })
        }
        None => {
            return Err(HandlerError::Header {
                header: HEADER_USER,
                reason: "missing".to_string(),
            })
        }
    };
    let groups = headers
        .get_all(HEADER_GROUPS)
        .iter()
        .map(|v| decode_header(HEADER_GROUPS, v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Principal::new(username).with_groups(groups))
}

/// Error body returned when synchronization blocks a request.
#[derive(Debug, Serialize)]
struct SyncFailure {
    error: String,
    code: u16,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::Header { .. } => StatusCode::UNAUTHORIZED,
            HandlerError::Identity(err) if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(SyncFailure {
                error: self.to_string(),
                code: status.as_u16(),
            }),
        )
            .into_response()
    }
}

/// Axum middleware that synchronizes the caller's ACL entry before the
/// request is forwarded. A failed synchronization fails the request.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{*path}", any(proxy))
///     .layer(middleware::from_fn_with_state(extension, sync_access_middleware));
/// ```
pub async fn sync_access_middleware<S, R>(
    State(extension): State<Arc<AccessControlExtension<S, R>>>,
    request: Request,
    next: Next,
) -> Response
where
    S: DocumentStore + 'static,
    R: ProjectResolver + 'static,
{
    let headers = request.headers().clone();
    match extension.process(&headers).await {
        Ok(outcome) => {
            trace!(?outcome, "access synchronized");
            next.run(request).await
        }
        Err(err) => {
            warn!(error = %err, "rejecting request");
            err.into_response()
        }
    }
}
