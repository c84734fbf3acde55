// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User accounts and their outbound projections.
//!
//! - [`User`] - persisted account with the legacy staff/admin flags
//! - [`UserProfile`] - full projection, shown to the account owner
//! - [`PublicProfile`] - minimal projection, shown to everyone else

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RoleTier, UserId};

/// A registered account.
///
/// `is_staff` and `is_admin` mirror the persisted columns. Authorization code
/// never reads them directly; it goes through [`User::role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub email: String,
	pub full_name: String,
	pub phone_number: Option<String>,
	pub address: Option<String>,
	pub is_active: bool,
	pub is_staff: bool,
	pub is_admin: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// Creates a new active regular user.
	pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			email: email.into(),
			full_name: full_name.into(),
			phone_number: None,
			address: None,
			is_active: true,
			is_staff: false,
			is_admin: false,
			created_at: now,
			updated_at: now,
		}
	}

	/// The highest tier this account qualifies for.
	pub fn role(&self) -> RoleTier {
		if self.is_admin {
			RoleTier::Admin
		} else if self.is_staff {
			RoleTier::Staff
		} else {
			RoleTier::Regular
		}
	}

	pub fn profile(&self) -> UserProfile {
		UserProfile {
			id: self.id,
			email: self.email.clone(),
			full_name: self.full_name.clone(),
			phone_number: self.phone_number.clone(),
			address: self.address.clone(),
			role: self.role(),
			date_joined: self.created_at,
		}
	}

	pub fn public_profile(&self) -> PublicProfile {
		PublicProfile {
			id: self.id,
			full_name: self.full_name.clone(),
			address: self.address.clone(),
		}
	}
}

/// Full profile projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	pub id: UserId,
	pub email: String,
	pub full_name: String,
	pub phone_number: Option<String>,
	pub address: Option<String>,
	pub role: RoleTier,
	pub date_joined: DateTime<Utc>,
}

/// Minimal profile projection for users other than the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
	pub id: UserId,
	pub full_name: String,
	pub address: Option<String>,
}
