// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Category repository. Names are unique without regard to case.

use chrono::{DateTime, Utc};
use civic_server_auth::CategoryId;
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{map_write_error, DbError};
use crate::user::{parse_timestamp, parse_uuid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
	pub id: CategoryId,
	pub name: String,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct CategoryRepository {
	pool: SqlitePool,
}

impl CategoryRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, description))]
	pub async fn create_category(
		&self,
		name: &str,
		description: Option<&str>,
	) -> Result<CategoryRecord, DbError> {
		let now = Utc::now();
		let record = CategoryRecord {
			id: CategoryId::generate(),
			name: name.to_string(),
			description: description.map(str::to_string),
			created_at: now,
			updated_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO categories (id, name, description, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(&record.name)
		.bind(&record.description)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, "name", "category"))?;

		tracing::debug!(category_id = %record.id, "category created");
		Ok(record)
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, DbError> {
		let rows = sqlx::query(
			"SELECT id, name, description, created_at, updated_at FROM categories ORDER BY name COLLATE NOCASE",
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_category_row).collect()
	}

	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn get_category(&self, id: &CategoryId) -> Result<Option<CategoryRecord>, DbError> {
		let row = sqlx::query(
			"SELECT id, name, description, created_at, updated_at FROM categories WHERE id = ?",
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_category_row).transpose()
	}

	/// True if another category already uses `name`, ignoring case.
	#[tracing::instrument(skip(self))]
	pub async fn name_taken(&self, name: &str, except: Option<&CategoryId>) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT id FROM categories WHERE name = ? COLLATE NOCASE AND id != ?")
			.bind(name)
			.bind(except.map(|id| id.to_string()).unwrap_or_default())
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.is_some())
	}

	#[tracing::instrument(skip(self, name, description), fields(category_id = %id))]
	pub async fn update_category(
		&self,
		id: &CategoryId,
		name: Option<&str>,
		description: Option<&str>,
	) -> Result<Option<CategoryRecord>, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE categories SET
				name = COALESCE(?, name),
				description = COALESCE(?, description),
				updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(name)
		.bind(description)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, "name", "category"))?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_category(id).await
	}

	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn delete_category(&self, id: &CategoryId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM categories WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}

fn parse_category_row(row: &sqlx::sqlite::SqliteRow) -> Result<CategoryRecord, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(CategoryRecord {
		id: CategoryId::new(parse_uuid(&id, "category id")?),
		name: row.get("name"),
		description: row.get("description"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
