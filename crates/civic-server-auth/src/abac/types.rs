// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for permission evaluation.
//!
//! - [`Action`]: the operation being performed
//! - [`ResourceKind`]: which of the tracked resource families is targeted
//! - [`ResourceDescriptor`]: a kind plus the instance (or parent) it refers to
//! - [`Decision`]: the verdict, with a [`DenyReason`] on denial
//!
//! Descriptors carry identifiers only. Who owns the instance is looked up
//! lazily by the ownership resolver, and only when a rule needs it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CategoryId, CommentId, IssueId, LikeId, ProgressId, UserId};

/// Actions that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Create,
	Read,
	Update,
	Delete,
	List,
}

impl Action {
	pub fn all() -> &'static [Action] {
		&[
			Action::Create,
			Action::Read,
			Action::Update,
			Action::Delete,
			Action::List,
		]
	}

	/// True for actions that change stored state.
	pub fn is_mutation(self) -> bool {
		matches!(self, Action::Create | Action::Update | Action::Delete)
	}
}

/// Resource families subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	Issue,
	ProgressEntry,
	Comment,
	Like,
	Category,
	UserProfile,
}

impl ResourceKind {
	pub fn all() -> &'static [ResourceKind] {
		&[
			ResourceKind::Issue,
			ResourceKind::ProgressEntry,
			ResourceKind::Comment,
			ResourceKind::Like,
			ResourceKind::Category,
			ResourceKind::UserProfile,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ResourceKind::Issue => "issue",
			ResourceKind::ProgressEntry => "progress_entry",
			ResourceKind::Comment => "comment",
			ResourceKind::Like => "like",
			ResourceKind::Category => "category",
			ResourceKind::UserProfile => "user_profile",
		}
	}
}

impl std::fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What part of a resource family a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "id")]
pub enum ResourceScope {
	/// The family as a whole (list, or create with no parent).
	Collection,
	/// One existing instance.
	Instance(Uuid),
	/// A not-yet-created child of an issue; ownership follows the issue.
	ChildOf(IssueId),
	/// Every instance authored by one user. Only listings address this scope.
	AuthoredBy(UserId),
}

/// The target of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
	pub kind: ResourceKind,
	pub scope: ResourceScope,
}

impl ResourceDescriptor {
	pub fn collection(kind: ResourceKind) -> Self {
		Self {
			kind,
			scope: ResourceScope::Collection,
		}
	}

	pub fn instance(kind: ResourceKind, id: Uuid) -> Self {
		Self {
			kind,
			scope: ResourceScope::Instance(id),
		}
	}

	pub fn authored_by(kind: ResourceKind, user_id: UserId) -> Self {
		Self {
			kind,
			scope: ResourceScope::AuthoredBy(user_id),
		}
	}

	pub fn child_of_issue(kind: ResourceKind, issue_id: IssueId) -> Self {
		Self {
			kind,
			scope: ResourceScope::ChildOf(issue_id),
		}
	}

	pub fn issue(id: IssueId) -> Self {
		Self::instance(ResourceKind::Issue, id.into_inner())
	}

	pub fn progress_entry(id: ProgressId) -> Self {
		Self::instance(ResourceKind::ProgressEntry, id.into_inner())
	}

	pub fn comment(id: CommentId) -> Self {
		Self::instance(ResourceKind::Comment, id.into_inner())
	}

	pub fn like(id: LikeId) -> Self {
		Self::instance(ResourceKind::Like, id.into_inner())
	}

	pub fn category(id: CategoryId) -> Self {
		Self::instance(ResourceKind::Category, id.into_inner())
	}

	pub fn user_profile(id: UserId) -> Self {
		Self::instance(ResourceKind::UserProfile, id.into_inner())
	}
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
	/// No identity was presented for a rule that needs one.
	Unauthenticated,
	/// The actor's tier is below what the rule requires.
	InsufficientRole,
	/// The rule requires ownership and the actor is not the owner.
	NotOwner,
	/// The instance (or its parent issue) does not exist.
	ResourceMissing,
	/// The action is not offered for this kind at all.
	Unsupported,
}

impl DenyReason {
	pub fn code(&self) -> &'static str {
		match self {
			DenyReason::Unauthenticated => "not_authenticated",
			DenyReason::InsufficientRole => "insufficient_role",
			DenyReason::NotOwner => "not_owner",
			DenyReason::ResourceMissing => "resource_missing",
			DenyReason::Unsupported => "action_unsupported",
		}
	}

	pub fn message(&self) -> &'static str {
		match self {
			DenyReason::Unauthenticated => "Authentication credentials were not provided.",
			DenyReason::InsufficientRole => "You do not have permission to perform this action.",
			DenyReason::NotOwner => "You do not have permission to perform this action on a resource you do not own.",
			DenyReason::ResourceMissing => "Not found.",
			DenyReason::Unsupported => "This action is not supported for this resource.",
		}
	}
}

/// Result of permission evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
	Allow,
	Deny(DenyReason),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow)
	}

	pub fn deny_reason(&self) -> Option<DenyReason> {
		match self {
			Decision::Allow => None,
			Decision::Deny(reason) => Some(*reason),
		}
	}
}

/// Relation between an actor and a resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
	Owner,
	NotOwner,
	/// The instance, or the issue it hangs off, does not exist.
	Missing,
}
