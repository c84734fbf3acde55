// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite resource store for the civic issue tracker.
//!
//! One repository per resource kind, each holding a cloned [`SqlitePool`].
//! Timestamps are stored as RFC 3339 strings and ids as UUID strings.
//! [`DbOwnershipStore`] answers the permission evaluator's owner lookups.
//!
//! [`SqlitePool`]: sqlx::sqlite::SqlitePool

pub mod category;
pub mod comment;
pub mod error;
pub mod issue;
pub mod like;
pub mod ownership;
pub mod pool;
pub mod progress;
pub mod testing;
pub mod token;
pub mod user;

pub use category::{CategoryRecord, CategoryRepository};
pub use comment::{CommentRecord, CommentRepository};
pub use error::{DbError, Result};
pub use issue::{IssueRecord, IssueRepository, IssueStatus, NewIssue};
pub use like::{LikeRecord, LikeRepository};
pub use ownership::DbOwnershipStore;
pub use pool::{create_pool, run_migrations};
pub use progress::{ProgressRecord, ProgressRepository};
pub use token::{AccessTokenRecord, TokenRepository};
pub use user::{ProfileUpdate, UserRepository};
