// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership resolution.
//!
//! | Kind          | Owner                       |
//! |---------------|-----------------------------|
//! | Issue         | reporter                    |
//! | ProgressEntry | updater                     |
//! | Comment       | author                      |
//! | Like          | author                      |
//! | Category      | nobody                      |
//! | UserProfile   | the user themself           |
//!
//! Creation-time checks against a parent ([`ResourceScope::ChildOf`]) resolve
//! against the parent issue's reporter. A listing of one user's records
//! ([`ResourceScope::AuthoredBy`]) is owned by that user and needs no lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use super::types::{Ownership, ResourceDescriptor, ResourceKind, ResourceScope};
use crate::actor::Actor;
use crate::types::UserId;

/// The resource store could not answer an ownership query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ownership lookup for {kind} {id} failed: {message}")]
pub struct OwnershipLookupError {
	pub kind: ResourceKind,
	pub id: Uuid,
	pub message: String,
}

/// Point lookup of a resource's owner.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
	/// Returns the owner of `kind`/`id`, or `None` if no such instance exists.
	async fn owner_of(
		&self,
		kind: ResourceKind,
		id: Uuid,
	) -> Result<Option<UserId>, OwnershipLookupError>;
}

/// Decides whether an actor owns a resource.
#[derive(Clone)]
pub struct OwnershipResolver {
	store: Arc<dyn OwnershipStore>,
}

impl OwnershipResolver {
	pub fn new(store: Arc<dyn OwnershipStore>) -> Self {
		Self { store }
	}

	#[instrument(
		level = "debug",
		skip(self, actor),
		fields(kind = %descriptor.kind, scope = ?descriptor.scope)
	)]
	pub async fn resolve(
		&self,
		actor: &Actor,
		descriptor: &ResourceDescriptor,
	) -> Result<Ownership, OwnershipLookupError> {
		let Some(actor_id) = actor.user_id else {
			return Ok(Ownership::NotOwner);
		};

		let (kind, id) = match (descriptor.kind, descriptor.scope) {
			(_, ResourceScope::Collection) => return Ok(Ownership::NotOwner),
			(_, ResourceScope::AuthoredBy(author)) => {
				return Ok(if author == actor_id {
					Ownership::Owner
				} else {
					Ownership::NotOwner
				});
			}
			(ResourceKind::Category, _) => return Ok(Ownership::NotOwner),
			(ResourceKind::UserProfile, ResourceScope::Instance(id)) => {
				return Ok(if actor_id.into_inner() == id {
					Ownership::Owner
				} else {
					Ownership::NotOwner
				});
			}
			(_, ResourceScope::ChildOf(issue_id)) => (ResourceKind::Issue, issue_id.into_inner()),
			(kind, ResourceScope::Instance(id)) => (kind, id),
		};

		let ownership = match self.store.owner_of(kind, id).await? {
			None => Ownership::Missing,
			Some(owner) if owner == actor_id => Ownership::Owner,
			Some(_) => Ownership::NotOwner,
		};
		tracing::debug!(?ownership, "ownership resolved");
		Ok(ownership)
	}
}
