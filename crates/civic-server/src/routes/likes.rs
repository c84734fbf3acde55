// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Like handlers. One like per user per issue.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	response::Response,
	Json,
};
use civic_server_auth::{Action, Actor, IssueId, LikeId, ResourceKind};
use civic_server_db::LikeRecord;
use serde::Deserialize;

use super::{actor_id, body_issue, children_of, instance_of, path_id};
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};

#[derive(Debug, Deserialize)]
pub struct CreateLikeRequest {
	pub issue_id: Option<String>,
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn list_for_issue(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<IssueId>(&id, "issue");
	let target = Target::resolving(Action::List, ResourceKind::Like, children_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| list(state, id)).await
}

async fn list(state: AppState, id: Result<IssueId, ApiError>) -> Outcome<Vec<LikeRecord>> {
	let id = id?;
	if state.issue_repo.get_issue(&id).await?.is_none() {
		return Err(ApiError::not_found("issue"));
	}
	Ok(Reply::ok(state.like_repo.list_for_issue(&id).await?))
}

/// Like an issue.
///
/// # Errors
/// - 404: the issue does not exist
/// - 409: the caller already likes it
#[tracing::instrument(skip_all)]
pub async fn create_like(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<CreateLikeRequest>, JsonRejection>,
) -> Response {
	let issue_id = body_issue(&payload, |body| body.issue_id.as_deref(), |_, _| {});
	let target = Target::resolving(Action::Create, ResourceKind::Like, children_of(&issue_id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| create(state, actor, issue_id))
		.await
}

async fn create(
	state: AppState,
	actor: Actor,
	issue_id: Result<IssueId, ApiError>,
) -> Outcome<LikeRecord> {
	let issue_id = issue_id?;
	let author = actor_id(&actor)?;
	let like = state.like_repo.create_like(&issue_id, &author).await?;

	tracing::info!(like_id = %like.id, issue_id = %issue_id, "issue liked");
	Ok(Reply::created(like))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_like(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<LikeId>(&id, "like");
	let target = Target::resolving(Action::Read, ResourceKind::Like, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| load(state, id)).await
}

async fn load(state: AppState, id: Result<LikeId, ApiError>) -> Outcome<LikeRecord> {
	let like = state
		.like_repo
		.get_like(&id?)
		.await?
		.ok_or_else(|| ApiError::not_found("like"))?;
	Ok(Reply::ok(like))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_like(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<LikeId>(&id, "like");
	let target = Target::resolving(Action::Delete, ResourceKind::Like, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| remove(state, id)).await
}

async fn remove(state: AppState, id: Result<LikeId, ApiError>) -> Outcome<()> {
	let id = id?;
	if !state.like_repo.delete_like(&id).await? {
		return Err(ApiError::not_found("like"));
	}
	tracing::info!(like_id = %id, "like removed");
	Ok(Reply::ok(()))
}
