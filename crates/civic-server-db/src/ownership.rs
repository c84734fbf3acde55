// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed owner lookups for the permission evaluator.

use async_trait::async_trait;
use civic_server_auth::{OwnershipLookupError, OwnershipStore, ResourceKind, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::user::parse_uuid;

#[derive(Clone)]
pub struct DbOwnershipStore {
	pool: SqlitePool,
}

impl DbOwnershipStore {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

fn owner_query(kind: ResourceKind) -> Option<&'static str> {
	match kind {
		ResourceKind::Issue => Some("SELECT reported_by AS owner FROM issues WHERE id = ?"),
		ResourceKind::ProgressEntry => {
			Some("SELECT updated_by AS owner FROM progress_entries WHERE id = ?")
		}
		ResourceKind::Comment => Some("SELECT author_id AS owner FROM comments WHERE id = ?"),
		ResourceKind::Like => Some("SELECT author_id AS owner FROM likes WHERE id = ?"),
		ResourceKind::UserProfile => Some("SELECT id AS owner FROM users WHERE id = ?"),
		ResourceKind::Category => None,
	}
}

#[async_trait]
impl OwnershipStore for DbOwnershipStore {
	#[tracing::instrument(skip(self), fields(kind = %kind, id = %id))]
	async fn owner_of(
		&self,
		kind: ResourceKind,
		id: Uuid,
	) -> Result<Option<UserId>, OwnershipLookupError> {
		let lookup_error = |message: String| OwnershipLookupError { kind, id, message };

		let Some(query) = owner_query(kind) else {
			return Err(lookup_error(format!("{kind} has no owner")));
		};

		let row = sqlx::query(query)
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await
			.map_err(|e| lookup_error(e.to_string()))?;

		row
			.map(|row| {
				let owner: String = row.get("owner");
				parse_uuid(&owner, "owner")
					.map(UserId::new)
					.map_err(|e| lookup_error(e.to_string()))
			})
			.transpose()
	}
}
