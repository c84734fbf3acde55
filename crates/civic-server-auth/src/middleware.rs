// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped authentication state.
//!
//! This module provides:
//! - [`CurrentUser`] - authenticated user context extracted from requests
//! - [`AuthContext`] - auth state for request processing, including a failed
//!   credential check
//! - [`extract_bearer_token`] - reads `Authorization: Bearer <token>`
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Bearer → TokenVerifier → AuthContext
//!               │                  │
//!               │                  └── Err(AuthError) → AuthContext::failed
//!               └── absent → AuthContext::unauthenticated
//! ```
//!
//! A presented-but-bad token is remembered as a failure rather than silently
//! downgraded to anonymous, so even public endpoints reject it.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::actor::Actor;
use crate::error::AuthError;
use crate::types::TokenId;
use crate::user::User;

/// The currently authenticated user, extracted from request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	pub user: User,
	/// Token the request was authenticated with, if known.
	pub token_id: Option<TokenId>,
}

impl CurrentUser {
	pub fn from_access_token(user: User, token_id: TokenId) -> Self {
		Self {
			user,
			token_id: Some(token_id),
		}
	}

	pub fn actor(&self) -> Actor {
		Actor::from_user(&self.user)
	}
}

/// Authentication context for request processing.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub current_user: Option<CurrentUser>,
	/// Set when credentials were presented but rejected.
	pub failure: Option<AuthError>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self::default()
	}

	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			current_user: Some(current_user),
			failure: None,
		}
	}

	pub fn failed(error: AuthError) -> Self {
		Self {
			current_user: None,
			failure: Some(error),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}

	pub fn user(&self) -> Option<&CurrentUser> {
		self.current_user.as_ref()
	}

	/// Resolves the actor for this request.
	///
	/// Fails only when credentials were presented and rejected; an absent
	/// credential yields the anonymous actor.
	pub fn actor(&self) -> Result<Actor, AuthError> {
		if let Some(failure) = &self.failure {
			return Err(failure.clone());
		}
		Ok(match &self.current_user {
			Some(current) => current.actor(),
			None => Actor::anonymous(),
		})
	}

	/// Returns the current user or the reason there is none.
	pub fn require_user(&self) -> Result<&CurrentUser, AuthError> {
		if let Some(failure) = &self.failure {
			return Err(failure.clone());
		}
		self
			.current_user
			.as_ref()
			.ok_or(AuthError::MissingCredentials)
	}
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`. Any other scheme is
/// treated as no credentials at all.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}
