// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The per-request actor and the role resolver.

use serde::Serialize;

use crate::types::{RoleTier, UserId};
use crate::user::User;

/// Identity context of one request. Derived once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Actor {
	pub user_id: Option<UserId>,
	pub role: RoleTier,
}

impl Actor {
	pub fn anonymous() -> Self {
		Self {
			user_id: None,
			role: RoleTier::Anonymous,
		}
	}

	pub fn from_user(user: &User) -> Self {
		Self {
			user_id: Some(user.id),
			role: resolve_role(Some(user)),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.user_id.is_some()
	}

	/// Returns true if this actor is the given user.
	pub fn is(&self, user_id: UserId) -> bool {
		self.user_id == Some(user_id)
	}

	pub fn is_admin(&self) -> bool {
		self.role == RoleTier::Admin
	}
}

/// Derives the highest applicable tier from an already-verified identity.
pub fn resolve_role(identity: Option<&User>) -> RoleTier {
	match identity {
		None => RoleTier::Anonymous,
		Some(user) => user.role(),
	}
}
