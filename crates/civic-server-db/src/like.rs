// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Like repository. A user likes an issue at most once.

use chrono::{DateTime, Utc};
use civic_server_auth::{IssueId, LikeId, UserId};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{map_write_error, DbError};
use crate::user::{parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeRecord {
	pub id: LikeId,
	pub issue_id: IssueId,
	pub author_id: UserId,
	pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct LikeRepository {
	pool: SqlitePool,
}

impl LikeRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// # Errors
	/// - `DbError::Conflict` if the user already likes the issue
	/// - `DbError::NotFound` if the issue does not exist
	#[tracing::instrument(skip(self), fields(issue_id = %issue_id, author_id = %author_id))]
	pub async fn create_like(&self, issue_id: &IssueId, author_id: &UserId) -> Result<LikeRecord, DbError> {
		let record = LikeRecord {
			id: LikeId::generate(),
			issue_id: *issue_id,
			author_id: *author_id,
			created_at: Utc::now(),
		};

		sqlx::query("INSERT INTO likes (id, issue_id, author_id, created_at) VALUES (?, ?, ?, ?)")
			.bind(record.id.to_string())
			.bind(issue_id.to_string())
			.bind(author_id.to_string())
			.bind(record.created_at.to_rfc3339())
			.execute(&self.pool)
			.await
			.map_err(|e| match map_write_error(e, "issue_id", "issue") {
				DbError::UniqueViolation { .. } => {
					DbError::Conflict("You have already liked this issue.".to_string())
				}
				other => other,
			})?;

		tracing::debug!(like_id = %record.id, "like created");
		Ok(record)
	}

	#[tracing::instrument(skip(self), fields(issue_id = %issue_id))]
	pub async fn list_for_issue(&self, issue_id: &IssueId) -> Result<Vec<LikeRecord>, DbError> {
		let rows = sqlx::query(
			"SELECT id, issue_id, author_id, created_at FROM likes WHERE issue_id = ? ORDER BY created_at ASC",
		)
		.bind(issue_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_like_row).collect()
	}

	#[tracing::instrument(skip(self), fields(like_id = %id))]
	pub async fn get_like(&self, id: &LikeId) -> Result<Option<LikeRecord>, DbError> {
		let row = sqlx::query("SELECT id, issue_id, author_id, created_at FROM likes WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_like_row).transpose()
	}

	#[tracing::instrument(skip(self), fields(like_id = %id))]
	pub async fn delete_like(&self, id: &LikeId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM likes WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}

fn parse_like_row(row: &sqlx::sqlite::SqliteRow) -> Result<LikeRecord, DbError> {
	let id: String = row.get("id");
	let issue_id: String = row.get("issue_id");
	let author_id: String = row.get("author_id");
	let created_at: String = row.get("created_at");

	Ok(LikeRecord {
		id: LikeId::new(parse_uuid(&id, "like id")?),
		issue_id: IssueId::new(parse_uuid(&issue_id, "issue_id")?),
		author_id: UserId::new(parse_uuid(&author_id, "author_id")?),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
