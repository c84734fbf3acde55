// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Progress entries. Recording one also moves the parent issue to the
//! entry's status. Entries are append-only.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	response::Response,
	Json,
};
use civic_server_auth::{Action, Actor, IssueId, ProgressId, ResourceKind};
use civic_server_db::ProgressRecord;
use serde::Deserialize;

use super::issues::required_status;
use super::{actor_id, body_issue, children_of, instance_of, path_id};
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};
use crate::validation::{optional_text, ValidationErrors};

const MAX_NOTES_LEN: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct CreateProgressRequest {
	pub issue_id: Option<String>,
	pub status: Option<String>,
	pub notes: Option<String>,
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn list_for_issue(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<IssueId>(&id, "issue");
	let target = Target::resolving(Action::List, ResourceKind::ProgressEntry, children_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| list(state, id)).await
}

async fn list(state: AppState, id: Result<IssueId, ApiError>) -> Outcome<Vec<ProgressRecord>> {
	let id = id?;
	if state.issue_repo.get_issue(&id).await?.is_none() {
		return Err(ApiError::not_found("issue"));
	}
	Ok(Reply::ok(state.progress_repo.list_for_issue(&id).await?))
}

/// Record progress on an issue.
///
/// Allowed for staff and for the issue's reporter.
#[tracing::instrument(skip_all)]
pub async fn create_progress(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<CreateProgressRequest>, JsonRejection>,
) -> Response {
	let issue_id = body_issue(
		&payload,
		|body| body.issue_id.as_deref(),
		|body, errors| {
			required_status(errors, "status", body.status.as_deref());
			optional_text(errors, "notes", body.notes.as_deref(), MAX_NOTES_LEN);
		},
	);
	let target = Target::resolving(
		Action::Create,
		ResourceKind::ProgressEntry,
		children_of(&issue_id),
	);
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| create(state, actor, issue_id, payload))
		.await
}

async fn create(
	state: AppState,
	actor: Actor,
	issue_id: Result<IssueId, ApiError>,
	payload: Result<Json<CreateProgressRequest>, JsonRejection>,
) -> Outcome<ProgressRecord> {
	let issue_id = issue_id?;
	let Json(body) = payload?;
	let updated_by = actor_id(&actor)?;

	let mut errors = ValidationErrors::new();
	let status = required_status(&mut errors, "status", body.status.as_deref());
	let notes = optional_text(&mut errors, "notes", body.notes.as_deref(), MAX_NOTES_LEN);
	errors.into_result()?;

	let Some(status) = status else {
		return Err(ApiError::internal("validated progress entry is missing a status"));
	};
	let entry = state
		.progress_repo
		.create_progress(&issue_id, status, notes.as_deref(), &updated_by)
		.await?;

	tracing::info!(progress_id = %entry.id, issue_id = %issue_id, status = %status, "progress recorded");
	Ok(Reply::created(entry))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_progress(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<ProgressId>(&id, "progress entry");
	let target = Target::resolving(Action::Read, ResourceKind::ProgressEntry, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| load(state, id)).await
}

async fn load(state: AppState, id: Result<ProgressId, ApiError>) -> Outcome<ProgressRecord> {
	let entry = state
		.progress_repo
		.get_progress(&id?)
		.await?
		.ok_or_else(|| ApiError::not_found("progress entry"))?;
	Ok(Reply::ok(entry))
}
