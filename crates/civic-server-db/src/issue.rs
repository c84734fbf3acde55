// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Issue repository and the issue status lifecycle.

use chrono::{DateTime, Utc};
use civic_server_auth::{CategoryId, IssueId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row, SqliteConnection};

use crate::error::{map_write_error, DbError};
use crate::user::{parse_timestamp, parse_uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
	Open,
	InProgress,
	Resolved,
	Closed,
}

impl IssueStatus {
	pub fn all() -> &'static [IssueStatus] {
		&[
			IssueStatus::Open,
			IssueStatus::InProgress,
			IssueStatus::Resolved,
			IssueStatus::Closed,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			IssueStatus::Open => "open",
			IssueStatus::InProgress => "in_progress",
			IssueStatus::Resolved => "resolved",
			IssueStatus::Closed => "closed",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		Self::all().iter().copied().find(|s| s.as_str() == value)
	}
}

impl std::fmt::Display for IssueStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
	pub id: IssueId,
	pub title: String,
	pub description: String,
	pub location: Option<String>,
	pub status: IssueStatus,
	pub category_id: Option<CategoryId>,
	pub reported_by: UserId,
	pub resolved_by: Option<UserId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewIssue {
	pub title: String,
	pub description: String,
	pub location: Option<String>,
	pub category_id: Option<CategoryId>,
	pub reported_by: UserId,
}

const ISSUE_COLUMNS: &str = "id, title, description, location, status, category_id, reported_by, resolved_by, created_at, updated_at";

#[derive(Clone)]
pub struct IssueRepository {
	pool: SqlitePool,
}

impl IssueRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new open issue.
	///
	/// # Errors
	/// `DbError::NotFound` if `category_id` or the reporter does not exist.
	#[tracing::instrument(skip(self, new), fields(reported_by = %new.reported_by))]
	pub async fn create_issue(&self, new: NewIssue) -> Result<IssueRecord, DbError> {
		let now = Utc::now();
		let record = IssueRecord {
			id: IssueId::generate(),
			title: new.title,
			description: new.description,
			location: new.location,
			status: IssueStatus::Open,
			category_id: new.category_id,
			reported_by: new.reported_by,
			resolved_by: None,
			created_at: now,
			updated_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO issues (
				id, title, description, location, status, category_id,
				reported_by, resolved_by, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(&record.title)
		.bind(&record.description)
		.bind(&record.location)
		.bind(record.status.as_str())
		.bind(record.category_id.map(|id| id.to_string()))
		.bind(record.reported_by.to_string())
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, "id", "category"))?;

		tracing::debug!(issue_id = %record.id, "issue created");
		Ok(record)
	}

	/// List issues newest first, optionally filtered by status.
	#[tracing::instrument(skip(self))]
	pub async fn list_issues(&self, status: Option<IssueStatus>) -> Result<Vec<IssueRecord>, DbError> {
		let rows = match status {
			Some(status) => {
				sqlx::query(&format!(
					"SELECT {ISSUE_COLUMNS} FROM issues WHERE status = ? ORDER BY created_at DESC"
				))
				.bind(status.as_str())
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query(&format!(
					"SELECT {ISSUE_COLUMNS} FROM issues ORDER BY created_at DESC"
				))
				.fetch_all(&self.pool)
				.await?
			}
		};

		rows.iter().map(parse_issue_row).collect()
	}

	/// Issues one user reported, newest first.
	#[tracing::instrument(skip(self), fields(user_id = %reporter))]
	pub async fn list_reported_by(&self, reporter: &UserId) -> Result<Vec<IssueRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {ISSUE_COLUMNS} FROM issues WHERE reported_by = ? ORDER BY created_at DESC"
		))
		.bind(reporter.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_issue_row).collect()
	}

	#[tracing::instrument(skip(self), fields(issue_id = %id))]
	pub async fn get_issue(&self, id: &IssueId) -> Result<Option<IssueRecord>, DbError> {
		let row = sqlx::query(&format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_issue_row).transpose()
	}

	#[tracing::instrument(skip(self), fields(issue_id = %id))]
	pub async fn reporter_of(&self, id: &IssueId) -> Result<Option<UserId>, DbError> {
		let row = sqlx::query("SELECT reported_by FROM issues WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row
			.map(|row| {
				let reporter: String = row.get("reported_by");
				parse_uuid(&reporter, "reported_by").map(UserId::new)
			})
			.transpose()
	}

	/// Move an issue to `status`, returning the updated issue.
	#[tracing::instrument(skip(self), fields(issue_id = %id, status = %status, actor = %actor))]
	pub async fn update_status(
		&self,
		id: &IssueId,
		status: IssueStatus,
		actor: &UserId,
	) -> Result<Option<IssueRecord>, DbError> {
		let mut conn = self.pool.acquire().await?;
		let changed = apply_status(&mut conn, id, status, actor).await?;
		drop(conn);

		if !changed {
			return Ok(None);
		}
		self.get_issue(id).await
	}

	#[tracing::instrument(skip(self), fields(issue_id = %id))]
	pub async fn delete_issue(&self, id: &IssueId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM issues WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}

/// Writes a status change on an open connection or transaction.
///
/// Resolving records who resolved the issue; reopening clears it; other
/// transitions leave it untouched.
pub(crate) async fn apply_status(
	conn: &mut SqliteConnection,
	id: &IssueId,
	status: IssueStatus,
	actor: &UserId,
) -> Result<bool, DbError> {
	let resolved_by = match status {
		IssueStatus::Resolved => Some(actor.to_string()),
		_ => None,
	};

	let result = sqlx::query(
		r#"
		UPDATE issues SET
			status = ?1,
			resolved_by = CASE
				WHEN ?1 = 'resolved' THEN ?2
				WHEN ?1 = 'open' THEN NULL
				ELSE resolved_by
			END,
			updated_at = ?3
		WHERE id = ?4
		"#,
	)
	.bind(status.as_str())
	.bind(resolved_by)
	.bind(Utc::now().to_rfc3339())
	.bind(id.to_string())
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected() > 0)
}

fn parse_issue_row(row: &sqlx::sqlite::SqliteRow) -> Result<IssueRecord, DbError> {
	let id: String = row.get("id");
	let status: String = row.get("status");
	let category_id: Option<String> = row.get("category_id");
	let reported_by: String = row.get("reported_by");
	let resolved_by: Option<String> = row.get("resolved_by");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(IssueRecord {
		id: IssueId::new(parse_uuid(&id, "issue id")?),
		title: row.get("title"),
		description: row.get("description"),
		location: row.get("location"),
		status: IssueStatus::parse(&status)
			.ok_or_else(|| DbError::Internal(format!("Invalid issue status: {status}")))?,
		category_id: category_id
			.map(|s| parse_uuid(&s, "category_id").map(CategoryId::new))
			.transpose()?,
		reported_by: UserId::new(parse_uuid(&reported_by, "reported_by")?),
		resolved_by: resolved_by
			.map(|s| parse_uuid(&s, "resolved_by").map(UserId::new))
			.transpose()?,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
