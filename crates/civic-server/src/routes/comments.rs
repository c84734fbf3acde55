// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comment handlers. Only the author may edit; the author or an admin may
//! delete.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	response::Response,
	Json,
};
use civic_server_auth::{Action, Actor, CommentId, IssueId, ResourceKind, UserId};
use civic_server_db::CommentRecord;
use serde::Deserialize;

use super::{actor_id, authored_by, body_issue, children_of, instance_of, path_id};
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};
use crate::validation::{required_text, ValidationErrors};

const MAX_CONTENT_LEN: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
	pub issue_id: Option<String>,
	pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
	pub content: Option<String>,
}

fn required_content(content: Option<&str>) -> Result<String, ApiError> {
	let mut errors = ValidationErrors::new();
	let content = required_text(&mut errors, "content", content, MAX_CONTENT_LEN);
	errors.into_result()?;
	content.ok_or_else(|| ApiError::internal("validated comment is missing content"))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn list_for_issue(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<IssueId>(&id, "issue");
	let target = Target::resolving(Action::List, ResourceKind::Comment, children_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| list(state, id)).await
}

async fn list(state: AppState, id: Result<IssueId, ApiError>) -> Outcome<Vec<CommentRecord>> {
	let id = id?;
	if state.issue_repo.get_issue(&id).await?.is_none() {
		return Err(ApiError::not_found("issue"));
	}
	Ok(Reply::ok(state.comment_repo.list_for_issue(&id).await?))
}

/// The caller's own comments, newest first.
#[tracing::instrument(skip_all)]
pub async fn list_mine(State(state): State<AppState>, caller: Caller) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::List, ResourceKind::Comment),
			|actor| mine(state, actor),
		)
		.await
}

async fn mine(state: AppState, actor: Actor) -> Outcome<Vec<CommentRecord>> {
	let author = actor_id(&actor)?;
	Ok(Reply::ok(state.comment_repo.list_by_author(&author).await?))
}

/// Everything one user has written. Staff and admins only.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn list_by_author(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<UserId>(&id, "user");
	let target = Target::resolving(Action::List, ResourceKind::Comment, authored_by(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| written_by(state, id)).await
}

async fn written_by(state: AppState, id: Result<UserId, ApiError>) -> Outcome<Vec<CommentRecord>> {
	Ok(Reply::ok(state.comment_repo.list_by_author(&id?).await?))
}

#[tracing::instrument(skip_all)]
pub async fn create_comment(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Response {
	let issue_id = body_issue(
		&payload,
		|body| body.issue_id.as_deref(),
		|body, errors| {
			required_text(errors, "content", body.content.as_deref(), MAX_CONTENT_LEN);
		},
	);
	let target = Target::resolving(Action::Create, ResourceKind::Comment, children_of(&issue_id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| create(state, actor, issue_id, payload))
		.await
}

async fn create(
	state: AppState,
	actor: Actor,
	issue_id: Result<IssueId, ApiError>,
	payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Outcome<CommentRecord> {
	let issue_id = issue_id?;
	let Json(body) = payload?;
	let author = actor_id(&actor)?;
	let content = required_content(body.content.as_deref())?;

	if state.issue_repo.get_issue(&issue_id).await?.is_none() {
		return Err(ApiError::not_found("issue"));
	}
	let comment = state
		.comment_repo
		.create_comment(&issue_id, &author, &content)
		.await?;

	tracing::info!(comment_id = %comment.id, issue_id = %issue_id, "comment posted");
	Ok(Reply::created(comment))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_comment(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<CommentId>(&id, "comment");
	let target = Target::resolving(Action::Read, ResourceKind::Comment, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| load(state, id)).await
}

async fn load(state: AppState, id: Result<CommentId, ApiError>) -> Outcome<CommentRecord> {
	let comment = state
		.comment_repo
		.get_comment(&id?)
		.await?
		.ok_or_else(|| ApiError::not_found("comment"))?;
	Ok(Reply::ok(comment))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_comment(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
	payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Response {
	let id = path_id::<CommentId>(&id, "comment");
	let target = Target::resolving(Action::Update, ResourceKind::Comment, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |_| update(state, id, payload))
		.await
}

async fn update(
	state: AppState,
	id: Result<CommentId, ApiError>,
	payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Outcome<CommentRecord> {
	let id = id?;
	let Json(body) = payload?;
	let content = required_content(body.content.as_deref())?;

	let comment = state
		.comment_repo
		.update_content(&id, &content)
		.await?
		.ok_or_else(|| ApiError::not_found("comment"))?;
	Ok(Reply::ok(comment))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_comment(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<CommentId>(&id, "comment");
	let target = Target::resolving(Action::Delete, ResourceKind::Comment, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| remove(state, id)).await
}

async fn remove(state: AppState, id: Result<CommentId, ApiError>) -> Outcome<()> {
	let id = id?;
	if !state.comment_repo.delete_comment(&id).await? {
		return Err(ApiError::not_found("comment"));
	}
	tracing::info!(comment_id = %id, "comment deleted");
	Ok(Reply::ok(()))
}
