// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use civic_server_auth::{CommentId, IssueId, UserId};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{map_write_error, DbError};
use crate::user::{parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
	pub id: CommentId,
	pub issue_id: IssueId,
	pub author_id: UserId,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

const COMMENT_COLUMNS: &str = "id, issue_id, author_id, content, created_at, updated_at";

#[derive(Clone)]
pub struct CommentRepository {
	pool: SqlitePool,
}

impl CommentRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// # Errors
	/// `DbError::NotFound` if the issue does not exist.
	#[tracing::instrument(skip(self, content), fields(issue_id = %issue_id, author_id = %author_id))]
	pub async fn create_comment(
		&self,
		issue_id: &IssueId,
		author_id: &UserId,
		content: &str,
	) -> Result<CommentRecord, DbError> {
		let now = Utc::now();
		let record = CommentRecord {
			id: CommentId::generate(),
			issue_id: *issue_id,
			author_id: *author_id,
			content: content.to_string(),
			created_at: now,
			updated_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO comments (id, issue_id, author_id, content, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(issue_id.to_string())
		.bind(author_id.to_string())
		.bind(&record.content)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, "id", "issue"))?;

		tracing::debug!(comment_id = %record.id, "comment created");
		Ok(record)
	}

	#[tracing::instrument(skip(self), fields(issue_id = %issue_id))]
	pub async fn list_for_issue(&self, issue_id: &IssueId) -> Result<Vec<CommentRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {COMMENT_COLUMNS} FROM comments WHERE issue_id = ? ORDER BY created_at ASC"
		))
		.bind(issue_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_comment_row).collect()
	}

	/// Comments one user wrote, newest first.
	#[tracing::instrument(skip(self), fields(user_id = %author))]
	pub async fn list_by_author(&self, author: &UserId) -> Result<Vec<CommentRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {COMMENT_COLUMNS} FROM comments WHERE author_id = ? ORDER BY created_at DESC"
		))
		.bind(author.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_comment_row).collect()
	}

	#[tracing::instrument(skip(self), fields(comment_id = %id))]
	pub async fn get_comment(&self, id: &CommentId) -> Result<Option<CommentRecord>, DbError> {
		let row = sqlx::query(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_comment_row).transpose()
	}

	#[tracing::instrument(skip(self, content), fields(comment_id = %id))]
	pub async fn update_content(
		&self,
		id: &CommentId,
		content: &str,
	) -> Result<Option<CommentRecord>, DbError> {
		let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
			.bind(content)
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_comment(id).await
	}

	#[tracing::instrument(skip(self), fields(comment_id = %id))]
	pub async fn delete_comment(&self, id: &CommentId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM comments WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}

fn parse_comment_row(row: &sqlx::sqlite::SqliteRow) -> Result<CommentRecord, DbError> {
	let id: String = row.get("id");
	let issue_id: String = row.get("issue_id");
	let author_id: String = row.get("author_id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(CommentRecord {
		id: CommentId::new(parse_uuid(&id, "comment id")?),
		issue_id: IssueId::new(parse_uuid(&issue_id, "issue_id")?),
		author_id: UserId::new(parse_uuid(&author_id, "author_id")?),
		content: row.get("content"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
