// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authentication.
//!
//! [`auth_layer`] runs before routing reaches a handler. It resolves the
//! bearer token (if any) into an [`AuthContext`] request extension, which
//! handlers read back through the [`Caller`] extractor. It never rejects on
//! its own; the gateway decides what a missing or failed credential means.

use std::convert::Infallible;
use std::ops::Deref;

use async_trait::async_trait;
use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::Response,
};
use chrono::Utc;
use civic_server_auth::{
	access_token::{hash_token, is_access_token},
	middleware::extract_bearer_token,
	AuthContext, AuthError, CurrentUser, TokenVerifier,
};
use civic_server_db::{TokenRepository, UserRepository};

use crate::api::AppState;

/// Verifies opaque tokens against the token and user tables.
#[derive(Clone)]
pub struct DbTokenVerifier {
	tokens: TokenRepository,
	users: UserRepository,
}

impl DbTokenVerifier {
	pub fn new(tokens: TokenRepository, users: UserRepository) -> Self {
		Self { tokens, users }
	}
}

#[async_trait]
impl TokenVerifier for DbTokenVerifier {
	#[tracing::instrument(skip_all)]
	async fn verify(&self, token: &str) -> Result<CurrentUser, AuthError> {
		if !is_access_token(token) {
			return Err(AuthError::InvalidToken);
		}

		let record = self
			.tokens
			.get_token_by_hash(&hash_token(token))
			.await
			.map_err(|e| AuthError::Lookup(e.to_string()))?
			.ok_or(AuthError::InvalidToken)?;

		if record.is_expired(Utc::now()) {
			return Err(AuthError::ExpiredToken);
		}

		let user = self
			.users
			.get_user_by_id(&record.user_id)
			.await
			.map_err(|e| AuthError::Lookup(e.to_string()))?
			.ok_or(AuthError::InvalidToken)?;

		if !user.is_active {
			return Err(AuthError::InactiveUser);
		}

		tracing::debug!(user_id = %user.id, token_id = %record.id, "token verified");
		Ok(CurrentUser::from_access_token(user, record.id))
	}
}

/// Attaches an [`AuthContext`] to every request.
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let context = match extract_bearer_token(request.headers()) {
		None => AuthContext::unauthenticated(),
		Some(token) => match state.token_verifier.verify(&token).await {
			Ok(current_user) => AuthContext::authenticated(current_user),
			Err(error) => {
				tracing::debug!(code = error.code(), "bearer token rejected");
				AuthContext::failed(error)
			}
		},
	};

	request.extensions_mut().insert(context);
	next.run(request).await
}

/// The request's [`AuthContext`], or an unauthenticated one if the auth
/// layer did not run.
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

impl Deref for Caller {
	type Target = AuthContext;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<S> FromRequestParts<S> for Caller
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(Caller(
			parts
				.extensions
				.get::<AuthContext>()
				.cloned()
				.unwrap_or_default(),
		))
	}
}
