// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Progress entry repository.
//!
//! Entries are append-only. Recording one moves its issue to the entry's
//! status in the same transaction.

use chrono::{DateTime, Utc};
use civic_server_auth::{IssueId, ProgressId, UserId};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::issue::{apply_status, IssueStatus};
use crate::user::{parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
	pub id: ProgressId,
	pub issue_id: IssueId,
	pub status: IssueStatus,
	pub notes: Option<String>,
	pub updated_by: UserId,
	pub created_at: DateTime<Utc>,
}

const PROGRESS_COLUMNS: &str = "id, issue_id, status, notes, updated_by, created_at";

#[derive(Clone)]
pub struct ProgressRepository {
	pool: SqlitePool,
}

impl ProgressRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Record a progress entry and apply its status to the issue.
	///
	/// # Errors
	/// `DbError::NotFound` if the issue does not exist. Nothing is written.
	#[tracing::instrument(skip(self, notes), fields(issue_id = %issue_id, status = %status))]
	pub async fn create_progress(
		&self,
		issue_id: &IssueId,
		status: IssueStatus,
		notes: Option<&str>,
		updated_by: &UserId,
	) -> Result<ProgressRecord, DbError> {
		let record = ProgressRecord {
			id: ProgressId::generate(),
			issue_id: *issue_id,
			status,
			notes: notes.map(str::to_string),
			updated_by: *updated_by,
			created_at: Utc::now(),
		};

		let mut tx = self.pool.begin().await?;

		if !apply_status(&mut tx, issue_id, status, updated_by).await? {
			return Err(DbError::NotFound(format!("issue {issue_id}")));
		}

		sqlx::query(
			r#"
			INSERT INTO progress_entries (id, issue_id, status, notes, updated_by, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(issue_id.to_string())
		.bind(status.as_str())
		.bind(&record.notes)
		.bind(updated_by.to_string())
		.bind(record.created_at.to_rfc3339())
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::debug!(progress_id = %record.id, "progress recorded");
		Ok(record)
	}

	/// Entries for one issue, newest first.
	#[tracing::instrument(skip(self), fields(issue_id = %issue_id))]
	pub async fn list_for_issue(&self, issue_id: &IssueId) -> Result<Vec<ProgressRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {PROGRESS_COLUMNS} FROM progress_entries WHERE issue_id = ? ORDER BY created_at DESC"
		))
		.bind(issue_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_progress_row).collect()
	}

	#[tracing::instrument(skip(self), fields(progress_id = %id))]
	pub async fn get_progress(&self, id: &ProgressId) -> Result<Option<ProgressRecord>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {PROGRESS_COLUMNS} FROM progress_entries WHERE id = ?"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_progress_row).transpose()
	}
}

fn parse_progress_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressRecord, DbError> {
	let id: String = row.get("id");
	let issue_id: String = row.get("issue_id");
	let status: String = row.get("status");
	let updated_by: String = row.get("updated_by");
	let created_at: String = row.get("created_at");

	Ok(ProgressRecord {
		id: ProgressId::new(parse_uuid(&id, "progress id")?),
		issue_id: IssueId::new(parse_uuid(&issue_id, "issue_id")?),
		status: IssueStatus::parse(&status)
			.ok_or_else(|| DbError::Internal(format!("Invalid progress status: {status}")))?,
		notes: row.get("notes"),
		updated_by: UserId::new(parse_uuid(&updated_by, "updated_by")?),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
