// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access token repository. Only SHA-256 hashes are stored.

use chrono::{DateTime, Utc};
use civic_server_auth::{TokenId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{map_write_error, DbError};
use crate::user::{parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenRecord {
	pub id: TokenId,
	pub user_id: UserId,
	pub expires_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

impl AccessTokenRecord {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

#[derive(Clone)]
pub struct TokenRepository {
	pool: SqlitePool,
}

impl TokenRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, token_hash), fields(user_id = %user_id))]
	pub async fn create_token(
		&self,
		user_id: &UserId,
		token_hash: &str,
		expires_at: DateTime<Utc>,
	) -> Result<TokenId, DbError> {
		let id = TokenId::generate();
		sqlx::query(
			r#"
			INSERT INTO access_tokens (id, user_id, token_hash, expires_at, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(user_id.to_string())
		.bind(token_hash)
		.bind(expires_at.to_rfc3339())
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, "token", "user"))?;

		tracing::debug!(token_id = %id, "access token created");
		Ok(id)
	}

	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_token_by_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<AccessTokenRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, expires_at, created_at
			FROM access_tokens
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let id: String = row.get("id");
		let user_id: String = row.get("user_id");
		let expires_at: String = row.get("expires_at");
		let created_at: String = row.get("created_at");

		Ok(Some(AccessTokenRecord {
			id: TokenId::new(parse_uuid(&id, "token id")?),
			user_id: UserId::new(parse_uuid(&user_id, "user_id")?),
			expires_at: parse_timestamp(&expires_at, "expires_at")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
		}))
	}

	/// Remove tokens whose expiry has passed. Returns how many were removed.
	#[tracing::instrument(skip(self))]
	pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM access_tokens WHERE expires_at <= ?")
			.bind(now.to_rfc3339())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected())
	}
}
