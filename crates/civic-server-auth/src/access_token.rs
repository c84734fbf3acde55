// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opaque bearer tokens.
//!
//! Tokens are random strings prefixed with [`ACCESS_TOKEN_PREFIX`]. Only their
//! SHA-256 hash is ever persisted; the raw value is shown once to whoever
//! minted it. Verification lives behind [`TokenVerifier`] so the server does
//! not care where tokens come from.

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AuthError;
use crate::middleware::CurrentUser;

/// Prefix for civic access tokens.
pub const ACCESS_TOKEN_PREFIX: &str = "ct_";

/// Number of random bytes in a token body.
const TOKEN_BYTES: usize = 32;

/// Generate a new random access token.
pub fn generate_access_token() -> String {
	let mut bytes = [0u8; TOKEN_BYTES];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("{ACCESS_TOKEN_PREFIX}{}", hex::encode(bytes))
}

/// Hash a token for storage and lookup.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Check if a token has the civic access token shape.
pub fn is_access_token(token: &str) -> bool {
	token.starts_with(ACCESS_TOKEN_PREFIX)
}

/// Resolves a raw bearer token into the account it belongs to.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
	/// Returns the authenticated user, or the reason the token is unusable.
	async fn verify(&self, token: &str) -> Result<CurrentUser, AuthError>;
}
