// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile handlers.
//!
//! The owner sees the full [`UserProfile`]; everyone else gets the
//! [`PublicProfile`] projection.

use std::collections::BTreeMap;

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	response::Response,
	Json,
};
use civic_server_auth::{
	Action, Actor, PublicProfile, ResourceKind, ResourceScope, UserId, UserProfile,
};
use civic_server_db::ProfileUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{actor_id, instance_of, path_id};
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};
use crate::validation::{
	optional_phone, optional_text, sanitize_email, ValidationErrors, EMAIL_IMMUTABLE,
	FIELD_NOT_UPDATABLE, MAX_NAME_LEN,
};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProfileView {
	Full(UserProfile),
	Public(PublicProfile),
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
	pub email: Option<String>,
	pub full_name: Option<String>,
	pub phone_number: Option<String>,
	pub address: Option<String>,
	#[serde(flatten)]
	pub other: BTreeMap<String, Value>,
}

/// The caller's own profile scope; anonymous callers address the collection
/// and are turned away by the rule table.
fn own_scope(caller: &Caller) -> ResourceScope {
	caller
		.user()
		.map(|current| ResourceScope::Instance(current.user.id.into_inner()))
		.unwrap_or(ResourceScope::Collection)
}

#[tracing::instrument(skip_all)]
pub async fn get_me(State(state): State<AppState>, caller: Caller) -> Response {
	let target = Target::new(Action::Read, ResourceKind::UserProfile, own_scope(&caller));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| load_own(state, actor))
		.await
}

async fn load_own(state: AppState, actor: Actor) -> Outcome<UserProfile> {
	let id = actor_id(&actor)?;
	let user = state
		.user_repo
		.get_user_by_id(&id)
		.await?
		.ok_or_else(|| ApiError::not_found("user"))?;
	Ok(Reply::ok(user.profile()))
}

#[tracing::instrument(skip_all)]
pub async fn update_me(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Response {
	let target = Target::new(Action::Update, ResourceKind::UserProfile, own_scope(&caller));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| update_own(state, actor, payload))
		.await
}

async fn update_own(
	state: AppState,
	actor: Actor,
	payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Outcome<UserProfile> {
	let Json(body) = payload?;
	let id = actor_id(&actor)?;
	let current = state
		.user_repo
		.get_user_by_id(&id)
		.await?
		.ok_or_else(|| ApiError::not_found("user"))?;

	let mut errors = ValidationErrors::new();
	if let Some(email) = body.email.as_deref() {
		if sanitize_email(email) != current.email {
			errors.add("email", EMAIL_IMMUTABLE);
		}
	}
	for field in body.other.keys() {
		errors.add(field, FIELD_NOT_UPDATABLE);
	}
	let full_name = optional_text(&mut errors, "full_name", body.full_name.as_deref(), MAX_NAME_LEN);
	let phone_number = optional_phone(&mut errors, body.phone_number.as_deref());
	errors.into_result()?;

	let update = ProfileUpdate {
		full_name,
		phone_number,
		address: body.address,
	};
	let user = state
		.user_repo
		.update_profile(&id, &update)
		.await?
		.ok_or_else(|| ApiError::not_found("user"))?;

	tracing::info!(user_id = %user.id, "profile updated");
	Ok(Reply::ok(user.profile()))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_user(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<UserId>(&id, "user");
	let target = Target::resolving(Action::Read, ResourceKind::UserProfile, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| load_profile(state, actor, id))
		.await
}

async fn load_profile(
	state: AppState,
	actor: Actor,
	id: Result<UserId, ApiError>,
) -> Outcome<ProfileView> {
	let user = state
		.user_repo
		.get_user_by_id(&id?)
		.await?
		.ok_or_else(|| ApiError::not_found("user"))?;

	let view = if actor.is(user.id) {
		ProfileView::Full(user.profile())
	} else {
		ProfileView::Public(user.public_profile())
	};
	Ok(Reply::ok(view))
}
