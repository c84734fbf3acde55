// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	/// A unique index rejected the write.
	#[error("Duplicate value for {field}")]
	UniqueViolation { field: String },

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Maps constraint failures on a write to their semantic errors.
///
/// Unique violations are reported against `field`; foreign key violations
/// mean the referenced `parent` does not exist.
pub(crate) fn map_write_error(e: sqlx::Error, field: &str, parent: &str) -> DbError {
	match e {
		sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
			DbError::UniqueViolation {
				field: field.to_string(),
			}
		}
		sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
			DbError::NotFound(parent.to_string())
		}
		_ => DbError::Sqlx(e),
	}
}
