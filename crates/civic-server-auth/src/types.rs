// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for every resource kind
//!   ([`UserId`], [`IssueId`], [`CommentId`], ...) preventing accidental mixing
//! - **Role tiers**: a single ordered [`RoleTier`] replacing combinable
//!   `is_staff` / `is_admin` flags
//!
//! All ID types serialize transparently as UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user account.");
define_id_type!(IssueId, "Unique identifier for a reported issue.");
define_id_type!(ProgressId, "Unique identifier for a progress entry.");
define_id_type!(CommentId, "Unique identifier for a comment.");
define_id_type!(LikeId, "Unique identifier for a like.");
define_id_type!(CategoryId, "Unique identifier for an issue category.");
define_id_type!(TokenId, "Unique identifier for a stored access token.");

// =============================================================================
// Role Tiers
// =============================================================================

/// Capability tier of an actor.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Admin > Staff > Regular > Anonymous`. Rule checks compare one ordinal,
/// which makes "admin implies staff" hold by construction.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
	Anonymous,
	Regular,
	Staff,
	Admin,
}

impl RoleTier {
	/// Returns all tiers, lowest first.
	pub fn all() -> &'static [RoleTier] {
		&[
			RoleTier::Anonymous,
			RoleTier::Regular,
			RoleTier::Staff,
			RoleTier::Admin,
		]
	}

	/// Returns true if this tier has at least the capabilities of `required`.
	pub fn at_least(self, required: RoleTier) -> bool {
		self >= required
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			RoleTier::Anonymous => "anonymous",
			RoleTier::Regular => "regular",
			RoleTier::Staff => "staff",
			RoleTier::Admin => "admin",
		}
	}
}

impl fmt::Display for RoleTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
