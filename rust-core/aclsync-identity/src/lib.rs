// SPDX-License-Identifier: PMPL-1.0-or-later
//! ACLSync identity resolution.
//!
//! Turns a user's access token into the list of projects that user may
//! see, via the OpenShift project API or a static table.

pub mod config;
pub mod error;
pub mod openshift;
pub mod resolver;

pub use config::IdentityConfig;
pub use error::IdentityError;
pub use openshift::{parse_project_list, OpenShiftClient};
pub use resolver::{ProjectResolver, StaticProjectResolver};
