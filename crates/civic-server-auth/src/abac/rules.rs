// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The declarative rule table.
//!
//! Every `(Action, ResourceKind)` pair maps to exactly one [`Rule`]. The
//! mapping is an exhaustive `match`, so adding a kind or an action without
//! deciding its rule is a compile error rather than an implicit allow.

use serde::Serialize;

use super::types::{
	Action, Decision, DenyReason, Ownership, ResourceDescriptor, ResourceKind, ResourceScope,
};
use crate::actor::Actor;
use crate::types::RoleTier;

/// How a single `(action, kind)` pair is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "tier")]
pub enum Rule {
	/// Anyone, including anonymous callers.
	Public,
	/// Any authenticated actor.
	Authenticated,
	/// Actors at or above the given tier.
	MinRole(RoleTier),
	/// The owner, or any actor at or above the given tier. The tier check
	/// runs first and skips the ownership lookup when it passes.
	OwnerOr(RoleTier),
	/// The owner only. No tier overrides this.
	OwnerOnly,
	/// The action is not offered for this kind.
	Unsupported,
}

/// Looks up the rule for an action on a kind.
pub fn rule_for(action: Action, kind: ResourceKind) -> Rule {
	use Action::*;
	use ResourceKind::*;

	match (kind, action) {
		(Issue, Create) => Rule::MinRole(RoleTier::Regular),
		(Issue, Read | List) => Rule::Authenticated,
		(Issue, Update) => Rule::OwnerOr(RoleTier::Staff),
		(Issue, Delete) => Rule::OwnerOr(RoleTier::Admin),

		(ProgressEntry, Create) => Rule::OwnerOr(RoleTier::Staff),
		(ProgressEntry, Read | List) => Rule::Authenticated,
		(ProgressEntry, Update | Delete) => Rule::Unsupported,

		(Comment, Create) => Rule::MinRole(RoleTier::Regular),
		(Comment, Read | List) => Rule::Authenticated,
		(Comment, Update) => Rule::OwnerOnly,
		(Comment, Delete) => Rule::OwnerOr(RoleTier::Admin),

		(Like, Create) => Rule::MinRole(RoleTier::Regular),
		(Like, Read | List) => Rule::Authenticated,
		(Like, Update) => Rule::Unsupported,
		(Like, Delete) => Rule::OwnerOnly,

		(Category, Read | List) => Rule::Public,
		(Category, Create | Update | Delete) => Rule::MinRole(RoleTier::Admin),

		(UserProfile, Create) => Rule::Public,
		(UserProfile, Read | List) => Rule::Authenticated,
		(UserProfile, Update) => Rule::OwnerOnly,
		(UserProfile, Delete) => Rule::Unsupported,
	}
}

/// Looks up the rule for an action on a concrete descriptor.
///
/// Listings narrowed to one author have their own rules; any other action on
/// an author scope is unsupported. Everything else follows [`rule_for`].
pub fn rule_for_resource(action: Action, resource: &ResourceDescriptor) -> Rule {
	match (resource.kind, action, resource.scope) {
		(ResourceKind::Issue, Action::List, ResourceScope::AuthoredBy(_)) => {
			Rule::OwnerOr(RoleTier::Staff)
		}
		(ResourceKind::Comment, Action::List, ResourceScope::AuthoredBy(_)) => {
			Rule::MinRole(RoleTier::Staff)
		}
		(_, _, ResourceScope::AuthoredBy(_)) => Rule::Unsupported,
		(kind, action, _) => rule_for(action, kind),
	}
}

impl Rule {
	/// True if deciding this rule for `actor` requires knowing ownership.
	pub fn needs_ownership(&self, actor: &Actor) -> bool {
		if !actor.is_authenticated() {
			return false;
		}
		match self {
			Rule::OwnerOr(tier) => !actor.role.at_least(*tier),
			Rule::OwnerOnly => true,
			Rule::Public | Rule::Authenticated | Rule::MinRole(_) | Rule::Unsupported => false,
		}
	}

	/// Decides the rule. `ownership` must be `Some` whenever
	/// [`Rule::needs_ownership`] returned true; a missing answer denies.
	pub fn decide(&self, actor: &Actor, ownership: Option<Ownership>) -> Decision {
		match self {
			Rule::Unsupported => Decision::Deny(DenyReason::Unsupported),
			Rule::Public => Decision::Allow,
			_ if !actor.is_authenticated() => Decision::Deny(DenyReason::Unauthenticated),
			Rule::Authenticated => Decision::Allow,
			Rule::MinRole(tier) => {
				if actor.role.at_least(*tier) {
					Decision::Allow
				} else {
					Decision::Deny(DenyReason::InsufficientRole)
				}
			}
			Rule::OwnerOr(tier) if actor.role.at_least(*tier) => Decision::Allow,
			Rule::OwnerOr(_) | Rule::OwnerOnly => match ownership {
				Some(Ownership::Owner) => Decision::Allow,
				Some(Ownership::Missing) => Decision::Deny(DenyReason::ResourceMissing),
				Some(Ownership::NotOwner) | None => Decision::Deny(DenyReason::NotOwner),
			},
		}
	}
}
