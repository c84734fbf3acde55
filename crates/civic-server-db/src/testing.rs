// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests that need a migrated in-memory store.

use civic_server_auth::User;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::pool::run_migrations;
use crate::user::UserRepository;

/// A single-connection in-memory pool with the full schema applied.
///
/// One connection only: every SQLite `:memory:` connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")
		.expect("valid in-memory url")
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	run_migrations(&pool).await.expect("Failed to migrate test pool");
	pool
}

/// Inserts a user with a throwaway password hash.
pub async fn insert_user(pool: &SqlitePool, user: &User) {
	UserRepository::new(pool.clone())
		.create_user(user, "$argon2id$test")
		.await
		.expect("Failed to insert test user");
}
