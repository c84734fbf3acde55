// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Issue handlers.
//!
//! Reporters own their issues. Staff may move any issue through its
//! statuses; deleting takes the reporter or an admin.

use std::collections::BTreeMap;

use axum::{
	extract::{
		rejection::{JsonRejection, QueryRejection},
		Path, Query, State,
	},
	response::Response,
	Json,
};
use civic_server_auth::{Action, Actor, CategoryId, IssueId, ResourceKind, UserId};
use civic_server_db::{IssueRecord, IssueStatus, NewIssue};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{actor_id, authored_by, instance_of, path_id, INVALID_UUID};
use crate::api::AppState;
use crate::auth_middleware::Caller;
use crate::error::ApiError;
use crate::gateway::{Outcome, Reply, Target};
use crate::validation::{
	optional_text, required_text, ValidationErrors, FIELD_NOT_UPDATABLE, FIELD_REQUIRED,
	MAX_TITLE_LEN,
};

const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_LOCATION_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct IssueListQuery {
	pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
	pub title: Option<String>,
	pub description: Option<String>,
	pub location: Option<String>,
	pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
	pub status: Option<String>,
	#[serde(flatten)]
	pub other: BTreeMap<String, Value>,
}

fn status_choices() -> String {
	IssueStatus::all()
		.iter()
		.map(IssueStatus::as_str)
		.collect::<Vec<_>>()
		.join(", ")
}

/// Reads a status field, recording a field error when it is missing or not
/// one of the known statuses.
pub(crate) fn required_status(
	errors: &mut ValidationErrors,
	field: &str,
	value: Option<&str>,
) -> Option<IssueStatus> {
	let Some(value) = value else {
		errors.add(field, FIELD_REQUIRED);
		return None;
	};
	let status = IssueStatus::parse(value.trim());
	if status.is_none() {
		errors.add(field, format!("\"{value}\" is not a valid choice."));
	}
	status
}

#[tracing::instrument(skip_all)]
pub async fn list_issues(
	State(state): State<AppState>,
	caller: Caller,
	query: Result<Query<IssueListQuery>, QueryRejection>,
) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::List, ResourceKind::Issue),
			|_| list(state, query),
		)
		.await
}

async fn list(
	state: AppState,
	query: Result<Query<IssueListQuery>, QueryRejection>,
) -> Outcome<Vec<IssueRecord>> {
	let Query(query) = query?;
	let status = match query.status.as_deref().map(str::trim) {
		None | Some("") => None,
		Some(raw) => Some(IssueStatus::parse(raw).ok_or_else(|| {
			ApiError::invalid_field(
				"status",
				format!("Invalid status. Valid choices are: {}", status_choices()),
			)
		})?),
	};
	Ok(Reply::ok(state.issue_repo.list_issues(status).await?))
}

/// Issues the caller reported.
#[tracing::instrument(skip_all)]
pub async fn list_mine(State(state): State<AppState>, caller: Caller) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::List, ResourceKind::Issue),
			|actor| mine(state, actor),
		)
		.await
}

async fn mine(state: AppState, actor: Actor) -> Outcome<Vec<IssueRecord>> {
	let reporter = actor_id(&actor)?;
	Ok(Reply::ok(state.issue_repo.list_reported_by(&reporter).await?))
}

/// Issues one user reported. Regular users may only ask about themselves.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn list_by_reporter(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<UserId>(&id, "user");
	let target = Target::resolving(Action::List, ResourceKind::Issue, authored_by(&id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |_| by_reporter(state, id))
		.await
}

async fn by_reporter(state: AppState, id: Result<UserId, ApiError>) -> Outcome<Vec<IssueRecord>> {
	Ok(Reply::ok(state.issue_repo.list_reported_by(&id?).await?))
}

/// Report a new issue. The caller becomes its reporter.
#[tracing::instrument(skip_all)]
pub async fn create_issue(
	State(state): State<AppState>,
	caller: Caller,
	payload: Result<Json<CreateIssueRequest>, JsonRejection>,
) -> Response {
	let gateway = state.gateway.clone();
	gateway
		.dispatch(
			&caller,
			Target::collection(Action::Create, ResourceKind::Issue),
			|actor| create(state, actor, payload),
		)
		.await
}

async fn create(
	state: AppState,
	actor: Actor,
	payload: Result<Json<CreateIssueRequest>, JsonRejection>,
) -> Outcome<IssueRecord> {
	let Json(body) = payload?;
	let reported_by = actor_id(&actor)?;
	let mut errors = ValidationErrors::new();

	let title = required_text(&mut errors, "title", body.title.as_deref(), MAX_TITLE_LEN);
	let description = required_text(
		&mut errors,
		"description",
		body.description.as_deref(),
		MAX_DESCRIPTION_LEN,
	);
	let location = optional_text(
		&mut errors,
		"location",
		body.location.as_deref(),
		MAX_LOCATION_LEN,
	);

	let mut category_id = None;
	if let Some(raw) = body.category_id.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
		match Uuid::parse_str(raw) {
			Err(_) => errors.add("category_id", INVALID_UUID),
			Ok(uuid) => {
				let id = CategoryId::new(uuid);
				if state.category_repo.get_category(&id).await?.is_some() {
					category_id = Some(id);
				} else {
					errors.add(
						"category_id",
						format!("Invalid pk \"{raw}\" - object does not exist."),
					);
				}
			}
		}
	}
	errors.into_result()?;

	let (Some(title), Some(description)) = (title, description) else {
		return Err(ApiError::internal("validated issue is missing title or description"));
	};
	let issue = state
		.issue_repo
		.create_issue(NewIssue {
			title,
			description,
			location,
			category_id,
			reported_by,
		})
		.await?;

	tracing::info!(issue_id = %issue.id, "issue reported");
	Ok(Reply::created(issue))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_issue(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<IssueId>(&id, "issue");
	let target = Target::resolving(Action::Read, ResourceKind::Issue, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| load(state, id)).await
}

async fn load(state: AppState, id: Result<IssueId, ApiError>) -> Outcome<IssueRecord> {
	let issue = state
		.issue_repo
		.get_issue(&id?)
		.await?
		.ok_or_else(|| ApiError::not_found("issue"))?;
	Ok(Reply::ok(issue))
}

/// Change an issue's status. No other field may be edited after reporting.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_issue(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
	payload: Result<Json<UpdateIssueRequest>, JsonRejection>,
) -> Response {
	let id = path_id::<IssueId>(&id, "issue");
	let target = Target::resolving(Action::Update, ResourceKind::Issue, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway
		.dispatch(&caller, target, |actor| update(state, actor, id, payload))
		.await
}

async fn update(
	state: AppState,
	actor: Actor,
	id: Result<IssueId, ApiError>,
	payload: Result<Json<UpdateIssueRequest>, JsonRejection>,
) -> Outcome<IssueRecord> {
	let id = id?;
	let Json(body) = payload?;
	let changed_by = actor_id(&actor)?;

	let mut errors = ValidationErrors::new();
	for field in body.other.keys() {
		errors.add(field, FIELD_NOT_UPDATABLE);
	}
	let status = required_status(&mut errors, "status", body.status.as_deref());
	errors.into_result()?;

	let Some(status) = status else {
		return Err(ApiError::internal("validated issue update is missing a status"));
	};
	let issue = state
		.issue_repo
		.update_status(&id, status, &changed_by)
		.await?
		.ok_or_else(|| ApiError::not_found("issue"))?;

	tracing::info!(issue_id = %issue.id, status = %issue.status, "issue status changed");
	Ok(Reply::ok(issue))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_issue(
	State(state): State<AppState>,
	caller: Caller,
	Path(id): Path<String>,
) -> Response {
	let id = path_id::<IssueId>(&id, "issue");
	let target = Target::resolving(Action::Delete, ResourceKind::Issue, instance_of(&id));
	let gateway = state.gateway.clone();
	gateway.dispatch(&caller, target, |_| remove(state, id)).await
}

async fn remove(state: AppState, id: Result<IssueId, ApiError>) -> Outcome<()> {
	let id = id?;
	if !state.issue_repo.delete_issue(&id).await? {
		return Err(ApiError::not_found("issue"));
	}
	tracing::info!(issue_id = %id, "issue deleted");
	Ok(Reply::ok(()))
}
