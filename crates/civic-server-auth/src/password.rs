// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing for registration.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::argon2_config::argon2_instance;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

/// Hashes a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| PasswordHashError(e.to_string()))
}

/// Verifies a password against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordHashError> {
	let parsed = PasswordHash::new(hash).map_err(|e| PasswordHashError(e.to_string()))?;
	Ok(
		argon2_instance()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok(),
	)
}
