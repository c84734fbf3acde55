// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration and token verification.

use axum::{
	extract::{rejection::JsonRejection, State},
	response::Response,
	Json,
};
use civic_server_auth::{password::hash_password, Action, Actor, ResourceKind, User, UserProfile};
use serde::Deserialize;

use super::actor_id;
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};
use crate::validation::{
	is_valid_email, optional_phone, optional_text, password_violations, sanitize_email,
	ValidationErrors, EMAIL_INVALID, EMAIL_TAKEN, FIELD_BLANK, FIELD_REQUIRED, MAX_NAME_LEN,
};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
	pub email: Option<String>,
	pub password: Option<String>,
	pub full_name: Option<String>,
	pub phone_number: Option<String>,
	pub address: Option<String>,
}

/// Register a new account.
///
/// # Errors
/// - 400: field violations, including an e-mail that is already registered
/// - 409: a concurrent registration claimed the e-mail first
#[tracing::instrument(skip_all)]
pub async fn signup(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::Create, ResourceKind::UserProfile),
			|_| register(state, payload),
		)
		.await
}

async fn register(
	state: AppState,
	payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Outcome<UserProfile> {
	let Json(body) = payload?;
	let mut errors = ValidationErrors::new();

	let email = match body.email.as_deref().map(sanitize_email) {
		None => {
			errors.add("email", FIELD_REQUIRED);
			None
		}
		Some(email) if email.is_empty() => {
			errors.add("email", FIELD_BLANK);
			None
		}
		Some(email) if !is_valid_email(&email) => {
			errors.add("email", EMAIL_INVALID);
			None
		}
		Some(email) => Some(email),
	};

	match body.password.as_deref() {
		None => errors.add("password", FIELD_REQUIRED),
		Some(password) => {
			for violation in password_violations(password) {
				errors.add("password", violation);
			}
		}
	}

	let full_name = optional_text(&mut errors, "full_name", body.full_name.as_deref(), MAX_NAME_LEN);
	let phone_number = optional_phone(&mut errors, body.phone_number.as_deref()).flatten();

	if let Some(email) = &email {
		if state.user_repo.email_exists(email).await? {
			errors.add("email", EMAIL_TAKEN);
		}
	}
	errors.into_result()?;

	let (Some(email), Some(password)) = (email, body.password) else {
		return Err(ApiError::internal("validated signup is missing email or password"));
	};

	let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
		.await
		.map_err(ApiError::internal)?
		.map_err(ApiError::internal)?;

	let mut user = User::new(email, full_name.unwrap_or_default());
	user.phone_number = phone_number;
	user.address = body.address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());
	state.user_repo.create_user(&user, &password_hash).await?;

	tracing::info!(user_id = %user.id, "user registered");
	Ok(Reply::created(user.profile()))
}

/// Confirms that the presented token is usable.
#[tracing::instrument(skip_all)]
pub async fn verify(State(state): State<AppState>, caller: Caller) -> Response {
	state
		.gateway
		.dispatch(
			&caller,
			Target::collection(Action::Read, ResourceKind::UserProfile),
			confirm,
		)
		.await
}

async fn confirm(actor: Actor) -> Outcome<()> {
	actor_id(&actor)?;
	Ok(Reply::ok(()))
}
