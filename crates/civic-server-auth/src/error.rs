// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Failure to establish who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
	#[error("Authentication credentials were not provided.")]
	MissingCredentials,

	#[error("Given token not valid for any token type")]
	InvalidToken,

	#[error("Token is expired")]
	ExpiredToken,

	#[error("User is inactive")]
	InactiveUser,

	/// The token store could not be consulted.
	#[error("token lookup failed: {0}")]
	Lookup(String),
}

impl AuthError {
	/// Stable machine-readable code carried in error details.
	pub fn code(&self) -> &'static str {
		match self {
			AuthError::MissingCredentials => "not_authenticated",
			AuthError::InvalidToken => "token_not_valid",
			AuthError::ExpiredToken => "token_expired",
			AuthError::InactiveUser => "user_inactive",
			AuthError::Lookup(_) => "lookup_failed",
		}
	}

	/// True when the failure is the server's fault rather than the caller's.
	pub fn is_internal(&self) -> bool {
		matches!(self, AuthError::Lookup(_))
	}
}
