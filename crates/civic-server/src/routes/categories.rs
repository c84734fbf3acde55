// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Category handlers. Anyone may read; only admins may write.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	response::Response,
	Json,
};
use civic_server_auth::{Action, CategoryId, ResourceKind};
use civic_server_db::CategoryRecord;
use serde::Deserialize;

use super::{instance_of, path_id};
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};
use crate::validation::{
	optional_text, required_text, ValidationErrors, CATEGORY_NAME_TAKEN, MAX_CATEGORY_NAME_LEN,
};

const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
	pub name: Option<String>,
	pub description: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn list_categories(State(state): State<AppState>, caller: Caller) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::List, ResourceKind::Category),
			|_| list(state),
		)
		.await
}

async fn list(state: AppState) -> Outcome<Vec<CategoryRecord>> {
	Ok(Reply::ok(state.category_repo.list_categories().await?))
}

#[tracing::instrument(skip_all)]
pub async fn create_category(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::Create, ResourceKind::Category),
			|_| create(state, payload),
		)
		.await
}

async fn create(
	state: AppState,
	payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Outcome<CategoryRecord> {
	let Json(body) = payload?;
	let mut errors = ValidationErrors::new();
	let name = required_text(&mut errors, "name", body.name.as_deref(), MAX_CATEGORY_NAME_LEN);
	let description = optional_text(
		&mut errors,
		"description",
		body.description.as_deref(),
		MAX_DESCRIPTION_LEN,
	);
	if let Some(name) = &name {
		if state.category_repo.name_taken(name, None).await? {
			errors.add("name", CATEGORY_NAME_TAKEN);
		}
	}
	errors.into_result()?;

	let Some(name) = name else {
		return Err(ApiError::internal("validated category is missing a name"));
	};
	let category = state
		.category_repo
		.create_category(&name, description.as_deref())
		.await?;

	tracing::info!(category_id = %category.id, "category created");
	Ok(Reply::created(category))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_category(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<CategoryId>(&id, "category");
	let target = Target::resolving(Action::Read, ResourceKind::Category, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| load(state, id)).await
}

async fn load(state: AppState, id: Result<CategoryId, ApiError>) -> Outcome<CategoryRecord> {
	let category = state
		.category_repo
		.get_category(&id?)
		.await?
		.ok_or_else(|| ApiError::not_found("category"))?;
	Ok(Reply::ok(category))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_category(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
	payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Response {
	let id = path_id::<CategoryId>(&id, "category");
	let target = Target::resolving(Action::Update, ResourceKind::Category, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |_| update(state, id, payload))
		.await
}

async fn update(
	state: AppState,
	id: Result<CategoryId, ApiError>,
	payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Outcome<CategoryRecord> {
	let id = id?;
	let Json(body) = payload?;
	let mut errors = ValidationErrors::new();
	let name = optional_text(&mut errors, "name", body.name.as_deref(), MAX_CATEGORY_NAME_LEN);
	let description = optional_text(
		&mut errors,
		"description",
		body.description.as_deref(),
		MAX_DESCRIPTION_LEN,
	);
	if let Some(name) = &name {
		if state.category_repo.name_taken(name, Some(&id)).await? {
			errors.add("name", CATEGORY_NAME_TAKEN);
		}
	}
	errors.into_result()?;

	let category = state
		.category_repo
		.update_category(&id, name.as_deref(), description.as_deref())
		.await?
		.ok_or_else(|| ApiError::not_found("category"))?;
	Ok(Reply::ok(category))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_category(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<CategoryId>(&id, "category");
	let target = Target::resolving(Action::Delete, ResourceKind::Category, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| remove(state, id)).await
}

async fn remove(state: AppState, id: Result<CategoryId, ApiError>) -> Outcome<()> {
	let id = id?;
	if !state.category_repo.delete_category(&id).await? {
		return Err(ApiError::not_found("category"));
	}
	tracing::info!(category_id = %id, "category deleted");
	Ok(Reply::ok(()))
}
