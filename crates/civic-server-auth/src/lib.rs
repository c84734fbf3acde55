// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity and authorization for the civic issue tracker.
//!
//! This crate owns every "is this actor allowed" question the server asks:
//!
//! - [`types`]: ID newtypes and the ordered [`RoleTier`] enumeration
//! - [`user`]: persisted [`User`] records and their profile projections
//! - [`actor`]: the per-request [`Actor`] and the role resolver
//! - [`abac`]: the declarative rule table, the ownership resolver and the
//!   permission evaluator
//! - [`middleware`]: bearer extraction and the per-request [`AuthContext`]
//! - [`access_token`]: opaque token hashing and the [`TokenVerifier`] seam
//! - [`password`]: argon2 password hashing
//!
//! Nothing here touches the database directly. Ownership lookups go through
//! the [`OwnershipStore`] trait, which the store crate implements.

pub mod abac;
pub mod access_token;
pub mod actor;
pub mod error;
pub mod middleware;
pub mod password;
pub mod types;
pub mod user;

mod argon2_config;

pub use abac::{
	rule_for, Action, Decision, DenyReason, Ownership, OwnershipLookupError, OwnershipResolver,
	OwnershipStore, PermissionEvaluator, ResourceDescriptor, ResourceKind, ResourceScope, Rule,
};
pub use access_token::{TokenVerifier, ACCESS_TOKEN_PREFIX};
pub use actor::{resolve_role, Actor};
pub use error::AuthError;
pub use middleware::{AuthContext, CurrentUser};
pub use types::{CategoryId, CommentId, IssueId, LikeId, ProgressId, RoleTier, TokenId, UserId};
pub use user::{PublicProfile, User, UserProfile};
