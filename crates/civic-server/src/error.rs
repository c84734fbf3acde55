// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error translation.
//!
//! Every failure a request can run into ends up as an [`ApiError`]: one of six
//! [`ErrorKind`]s, a short message and [`ErrorDetails`]. The `From` impls below
//! cover each source a handler can see, so handlers just use `?`.
//!
//! | Source                         | Kind                   |
//! |--------------------------------|------------------------|
//! | [`ValidationErrors`], bad JSON | `validation_error`     |
//! | [`AuthError`]                  | `authentication_error` |
//! | [`DenyReason`]                 | by reason              |
//! | `DbError::NotFound`            | `not_found`            |
//! | unique violation, `Conflict`   | `conflict`             |
//! | anything else                  | `internal_error`       |

use std::collections::BTreeMap;
use std::fmt;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use civic_server_auth::{AuthError, DenyReason, OwnershipLookupError};
use civic_server_db::DbError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationErrors;

/// The closed set of failure kinds a client can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	ValidationError,
	AuthenticationError,
	PermissionDenied,
	NotFound,
	Conflict,
	InternalError,
}

impl ErrorKind {
	pub fn all() -> &'static [ErrorKind] {
		&[
			ErrorKind::ValidationError,
			ErrorKind::AuthenticationError,
			ErrorKind::PermissionDenied,
			ErrorKind::NotFound,
			ErrorKind::Conflict,
			ErrorKind::InternalError,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::ValidationError => "validation_error",
			ErrorKind::AuthenticationError => "authentication_error",
			ErrorKind::PermissionDenied => "permission_denied",
			ErrorKind::NotFound => "not_found",
			ErrorKind::Conflict => "conflict",
			ErrorKind::InternalError => "internal_error",
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
			ErrorKind::AuthenticationError => StatusCode::UNAUTHORIZED,
			ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
			ErrorKind::NotFound => StatusCode::NOT_FOUND,
			ErrorKind::Conflict => StatusCode::CONFLICT,
			ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Classifies an error status produced outside the gateway (router
	/// rejections, unmatched methods).
	pub fn from_status(status: StatusCode) -> Self {
		match status {
			StatusCode::UNAUTHORIZED => ErrorKind::AuthenticationError,
			StatusCode::FORBIDDEN => ErrorKind::PermissionDenied,
			StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => ErrorKind::NotFound,
			StatusCode::CONFLICT => ErrorKind::Conflict,
			s if s.is_client_error() => ErrorKind::ValidationError,
			_ => ErrorKind::InternalError,
		}
	}

	/// Generic message used when nothing more specific is known.
	pub fn default_message(&self) -> &'static str {
		match self {
			ErrorKind::ValidationError => "Validation failed",
			ErrorKind::AuthenticationError => "Authentication failed",
			ErrorKind::PermissionDenied => "Permission denied",
			ErrorKind::NotFound => "Not found",
			ErrorKind::Conflict => "Conflict",
			ErrorKind::InternalError => "Internal server error",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The `error.details` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
	/// Field name to every violation for that field, in check order.
	Fields(BTreeMap<String, Vec<String>>),
	/// Fixed shape for authentication failures.
	Auth { detail: String, code: String },
	Text(String),
}

/// A translated failure, ready for the envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
	pub kind: ErrorKind,
	pub message: String,
	pub details: ErrorDetails,
	/// Set for `internal_error` only; matches the server-side log entry.
	pub correlation_id: Option<Uuid>,
}

impl ApiError {
	fn new(kind: ErrorKind, details: ErrorDetails) -> Self {
		Self {
			kind,
			message: kind.default_message().to_string(),
			details,
			correlation_id: None,
		}
	}

	pub fn validation(errors: ValidationErrors) -> Self {
		Self::new(
			ErrorKind::ValidationError,
			ErrorDetails::Fields(errors.into_fields()),
		)
	}

	/// A single violation on a single field.
	pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
		let mut errors = ValidationErrors::new();
		errors.add(field, message);
		Self::validation(errors)
	}

	/// A request-level validation failure that is not tied to one field.
	pub fn bad_request(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::ValidationError, ErrorDetails::Text(message.into()))
	}

	pub fn authentication(error: &AuthError) -> Self {
		Self::new(
			ErrorKind::AuthenticationError,
			ErrorDetails::Auth {
				detail: error.to_string(),
				code: error.code().to_string(),
			},
		)
	}

	pub fn permission_denied(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::PermissionDenied, ErrorDetails::Text(message.into()))
	}

	/// `subject` names what was looked up, e.g. `"issue"`.
	pub fn not_found(subject: &str) -> Self {
		Self::new(
			ErrorKind::NotFound,
			ErrorDetails::Text(format!("No {subject} matches the given query.")),
		)
	}

	pub fn conflict(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Conflict, ErrorDetails::Text(message.into()))
	}

	/// Logs `cause` under a fresh correlation id and returns an error that
	/// carries only that id.
	pub fn internal(cause: impl fmt::Display) -> Self {
		let correlation_id = Uuid::new_v4();
		tracing::error!(%correlation_id, error = %cause, "internal error");
		Self {
			kind: ErrorKind::InternalError,
			message: ErrorKind::InternalError.default_message().to_string(),
			details: ErrorDetails::Text(format!("Reference: {correlation_id}")),
			correlation_id: Some(correlation_id),
		}
	}

	/// An error for a status code that was produced without a translation.
	pub fn from_status(status: StatusCode) -> Self {
		match ErrorKind::from_status(status) {
			ErrorKind::InternalError => Self::internal(format!("unhandled response status {status}")),
			kind => Self::new(
				kind,
				ErrorDetails::Text(status.canonical_reason().unwrap_or("Error").to_string()),
			),
		}
	}

	pub fn status_code(&self) -> StatusCode {
		self.kind.status_code()
	}
}

impl From<ValidationErrors> for ApiError {
	fn from(errors: ValidationErrors) -> Self {
		Self::validation(errors)
	}
}

impl From<AuthError> for ApiError {
	fn from(error: AuthError) -> Self {
		if error.is_internal() {
			return Self::internal(error);
		}
		Self::authentication(&error)
	}
}

impl From<DenyReason> for ApiError {
	fn from(reason: DenyReason) -> Self {
		match reason {
			DenyReason::Unauthenticated => Self::authentication(&AuthError::MissingCredentials),
			DenyReason::ResourceMissing => Self::new(
				ErrorKind::NotFound,
				ErrorDetails::Text(reason.message().to_string()),
			),
			DenyReason::InsufficientRole | DenyReason::NotOwner | DenyReason::Unsupported => {
				Self::permission_denied(reason.message())
			}
		}
	}
}

impl From<OwnershipLookupError> for ApiError {
	fn from(error: OwnershipLookupError) -> Self {
		Self::internal(error)
	}
}

impl From<DbError> for ApiError {
	fn from(error: DbError) -> Self {
		match error {
			DbError::NotFound(subject) => Self::not_found(&subject),
			DbError::Conflict(message) => Self::conflict(message),
			DbError::UniqueViolation { field } => {
				Self::conflict(format!("A record with this {field} already exists."))
			}
			other => Self::internal(other),
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::bad_request(rejection.body_text())
	}
}

impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		Self::bad_request(rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::bad_request(rejection.body_text())
	}
}
