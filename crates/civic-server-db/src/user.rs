// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.
//!
//! Emails are stored lowercased; lookups lowercase their input. The password
//! hash column is write-only from the application's point of view and never
//! leaves this module.

use chrono::{DateTime, Utc};
use civic_server_auth::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::{map_write_error, DbError};

const USER_COLUMNS: &str = "id, email, full_name, phone_number, address, is_active, is_staff, is_admin, created_at, updated_at";

/// Fields a user may change on their own profile. `None` leaves a field as is.
/// The phone number can also be cleared with `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
	pub full_name: Option<String>,
	pub phone_number: Option<Option<String>>,
	pub address: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new user.
	///
	/// # Errors
	/// `DbError::UniqueViolation { field: "email" }` if the email is taken.
	#[tracing::instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (
				id, email, password_hash, full_name, phone_number, address,
				is_active, is_staff, is_admin, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(user.email.to_lowercase())
		.bind(password_hash)
		.bind(&user.full_name)
		.bind(&user.phone_number)
		.bind(&user.address)
		.bind(user.is_active)
		.bind(user.is_staff)
		.bind(user.is_admin)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, "email", "user"))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
			.bind(email.to_lowercase())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	#[tracing::instrument(skip(self, email))]
	pub async fn email_exists(&self, email: &str) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT 1 FROM users WHERE email = ?")
			.bind(email.to_lowercase())
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.is_some())
	}

	/// Apply a profile update, returning the updated user.
	#[tracing::instrument(skip(self, update), fields(user_id = %id))]
	pub async fn update_profile(
		&self,
		id: &UserId,
		update: &ProfileUpdate,
	) -> Result<Option<User>, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE users SET
				full_name = COALESCE(?, full_name),
				phone_number = CASE WHEN ? THEN ? ELSE phone_number END,
				address = COALESCE(?, address),
				updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&update.full_name)
		.bind(update.phone_number.is_some())
		.bind(update.phone_number.clone().flatten())
		.bind(&update.address)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_user_by_id(id).await
	}

	/// Grant or revoke the staff/admin flags.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn set_roles(&self, id: &UserId, is_staff: bool, is_admin: bool) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE users SET is_staff = ?, is_admin = ?, updated_at = ? WHERE id = ?")
			.bind(is_staff)
			.bind(is_admin)
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn set_active(&self, id: &UserId, is_active: bool) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
			.bind(is_active)
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {column} UUID: {e}")))
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

fn parse_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(parse_uuid(&id, "user id")?),
		email: row.get("email"),
		full_name: row.get("full_name"),
		phone_number: row.get("phone_number"),
		address: row.get("address"),
		is_active: row.get("is_active"),
		is_staff: row.get("is_staff"),
		is_admin: row.get("is_admin"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
