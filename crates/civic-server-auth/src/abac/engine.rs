// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission evaluation engine.
//!
//! [`PermissionEvaluator::evaluate`] runs in two phases:
//!
//! 1. **Rule lookup**: the `(action, kind)` pair selects one [`Rule`]
//! 2. **Ownership** (only if the rule still needs it after the tier check):
//!    a single point lookup through the [`OwnershipResolver`]
//!
//! Admins and other tier-satisfying actors never reach phase two.

use tracing::instrument;

use super::ownership::{OwnershipLookupError, OwnershipResolver};
use super::rules::rule_for_resource;
use super::types::{Action, Decision, ResourceDescriptor};
use crate::actor::Actor;

#[derive(Clone)]
pub struct PermissionEvaluator {
	ownership: OwnershipResolver,
}

impl PermissionEvaluator {
	pub fn new(ownership: OwnershipResolver) -> Self {
		Self { ownership }
	}

	/// Decides whether `actor` may perform `action` on `resource`.
	///
	/// Errors only when an ownership lookup was needed and the store failed.
	#[instrument(
		level = "debug",
		skip(self, actor, resource),
		fields(
			user_id = ?actor.user_id,
			role = %actor.role,
			action = ?action,
			kind = %resource.kind,
		)
	)]
	pub async fn evaluate(
		&self,
		actor: &Actor,
		action: Action,
		resource: &ResourceDescriptor,
	) -> Result<Decision, OwnershipLookupError> {
		let rule = rule_for_resource(action, resource);

		let ownership = if rule.needs_ownership(actor) {
			Some(self.ownership.resolve(actor, resource).await?)
		} else {
			None
		};

		let decision = rule.decide(actor, ownership);
		tracing::debug!(?rule, ?decision, "permission evaluated");
		Ok(decision)
	}
}
