// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ACLSync Document Model
//
// Typed representation of the two Search Guard authorization documents
// (`roles` and `rolesmapping`), the identity-derived naming policy used to
// generate per-user entries, and the request-scoped `Principal`.
//
// # Modules
//
// - [`document`] -- The `AclDocument` capability shared by both documents.
// - [`roles`] -- The permission-set document.
// - [`rolesmapping`] -- The principal-to-role mapping document.
// - [`corpus`] -- The pair of documents loaded, merged and stored together.
// - [`naming`] -- Role and index names derived from a username.
// - [`principal`] -- The caller of a request and the projects it may view.
// - [`error`] -- Decode and encode failures.
//
// # Example
//
// ```rust
// use aclsync_model::{AclDocument, AclDocuments, Principal, Project, Roles};
//
// let principal = Principal::new("alice").with_projects(vec![Project::new("web", "42")]);
// let mut docs = AclDocuments::default();
// let role_name = docs.add_user(&principal, 1_000);
//
// let bytes = docs.roles.encode_for_transport().unwrap();
// let decoded = Roles::decode(&bytes).unwrap();
// assert!(decoded.get(&role_name).is_some());
// ```

pub mod corpus;
pub mod document;
pub mod error;
pub mod naming;
pub mod principal;
pub mod roles;
pub mod rolesmapping;

pub use corpus::AclDocuments;
pub use document::{AclDocument, DocKind};
pub use error::{DecodeError, EncodeError};
pub use principal::{Principal, Project};
pub use roles::{DocumentPermissions, IndexPermissions, Role, Roles};
pub use rolesmapping::{RoleMapping, RolesMapping};
