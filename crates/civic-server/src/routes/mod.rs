// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource kind.
//!
//! Every handler follows the same shape: work out the [`Target`] from the
//! path and body, then hand the gateway a closure that does the actual work.
//!
//! [`Target`]: crate::gateway::Target

pub mod auth;
pub mod categories;
pub mod comments;
pub mod issues;
pub mod likes;
pub mod progress;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use civic_server_auth::{Actor, AuthError, IssueId, ResourceScope, UserId};
use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::{parse_uuid, ValidationErrors, FIELD_REQUIRED};

pub(crate) const INVALID_UUID: &str = "Must be a valid UUID.";

/// Parses a path id into its typed form.
pub(crate) fn path_id<T: From<Uuid>>(raw: &str, what: &str) -> Result<T, ApiError> {
	parse_uuid(raw, what).map(T::from)
}

/// The instance scope for a parsed path id.
pub(crate) fn instance_of<T>(id: &Result<T, ApiError>) -> Result<ResourceScope, ApiError>
where
	T: Copy + Into<Uuid>,
{
	match id {
		Ok(id) => Ok(ResourceScope::Instance((*id).into())),
		Err(error) => Err(error.clone()),
	}
}

/// The scope for children of a parsed issue id.
pub(crate) fn children_of(issue_id: &Result<IssueId, ApiError>) -> Result<ResourceScope, ApiError> {
	match issue_id {
		Ok(id) => Ok(ResourceScope::ChildOf(*id)),
		Err(error) => Err(error.clone()),
	}
}

/// The scope for records authored by a parsed user id.
pub(crate) fn authored_by(user_id: &Result<UserId, ApiError>) -> Result<ResourceScope, ApiError> {
	match user_id {
		Ok(id) => Ok(ResourceScope::AuthoredBy(*id)),
		Err(error) => Err(error.clone()),
	}
}

/// The parent issue named by `issue_id` in a create body.
///
/// When the id is missing or malformed, `fields` records the body's other
/// violations so the error lists them alongside `issue_id`.
pub(crate) fn body_issue<T>(
	payload: &Result<Json<T>, JsonRejection>,
	issue_id: impl FnOnce(&T) -> Option<&str>,
	fields: impl FnOnce(&T, &mut ValidationErrors),
) -> Result<IssueId, ApiError> {
	let Json(body) = payload
		.as_ref()
		.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

	let mut errors = ValidationErrors::new();
	match issue_id(body).map(|raw| Uuid::parse_str(raw.trim())) {
		Some(Ok(id)) => return Ok(IssueId::new(id)),
		Some(Err(_)) => errors.add("issue_id", INVALID_UUID),
		None => errors.add("issue_id", FIELD_REQUIRED),
	}
	fields(body, &mut errors);
	Err(ApiError::validation(errors))
}

/// The id of an actor the gateway has already authenticated.
pub(crate) fn actor_id(actor: &Actor) -> Result<UserId, ApiError> {
	actor
		.user_id
		.ok_or_else(|| ApiError::from(AuthError::MissingCredentials))
}
