// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The outbound envelope.
//!
//! ```json
//! { "success": true,  "response": { ... }, "error": null }
//! { "success": false, "response": null,    "error": { "message": "...", "details": ... } }
//! ```
//!
//! Every response the server writes has this shape. Responses built here are
//! tagged with [`Enveloped`] so the outer normalization layer can tell them
//! apart from bodies axum produced on its own.

use axum::{
	body::Body,
	http::{header, HeaderValue, StatusCode},
	response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorDetails};

/// Response extension marking a body as already enveloped.
#[derive(Debug, Clone, Copy)]
pub struct Enveloped;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	pub message: String,
	pub details: ErrorDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub success: bool,
	pub response: Option<T>,
	pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
	pub fn success(payload: T) -> Self {
		Self {
			success: true,
			response: Some(payload),
			error: None,
		}
	}

	pub fn failure(message: impl Into<String>, details: ErrorDetails) -> Self {
		Self {
			success: false,
			response: None,
			error: Some(ErrorBody {
				message: message.into(),
				details,
			}),
		}
	}
}

impl<T: Serialize> Envelope<T> {
	/// Serializes the envelope with `status`.
	pub fn into_response_with(self, status: StatusCode) -> Response {
		match serde_json::to_vec(&self) {
			Ok(bytes) => json_response(status, bytes),
			Err(e) => {
				let error = ApiError::internal(format!("envelope serialization failed: {e}"));
				failure_response(&error)
			}
		}
	}
}

/// Wraps a successful payload.
pub fn success_response<T: Serialize>(status: StatusCode, payload: T) -> Response {
	Envelope::success(payload).into_response_with(status)
}

/// Wraps a translated error, with the status its kind maps to.
pub fn failure_response(error: &ApiError) -> Response {
	let envelope: Envelope<()> = Envelope::failure(error.message.clone(), error.details.clone());
	match serde_json::to_vec(&envelope) {
		Ok(bytes) => json_response(error.status_code(), bytes),
		Err(_) => json_response(
			StatusCode::INTERNAL_SERVER_ERROR,
			FALLBACK_BODY.as_bytes().to_vec(),
		),
	}
}

const FALLBACK_BODY: &str = r#"{"success":false,"response":null,"error":{"message":"Internal server error","details":"Reference: unavailable"}}"#;

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
	let mut response = Response::new(Body::from(bytes));
	*response.status_mut() = status;
	response.headers_mut().insert(
		header::CONTENT_TYPE,
		HeaderValue::from_static("application/json"),
	);
	response.extensions_mut().insert(Enveloped);
	response
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		failure_response(&self)
	}
}
