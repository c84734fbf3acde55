// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role- and ownership-based access control.
//!
//! ```text
//! (Actor, Action, ResourceDescriptor)
//!        │
//!        ▼
//!   rule_for_resource(action, descriptor) ──► Rule
//!        │
//!        ├── tier satisfies rule ──────────────► Allow
//!        ├── rule needs ownership ─► OwnershipResolver ─► Owner / NotOwner / Missing
//!        └── otherwise ───────────────────────► Deny(reason)
//! ```

mod engine;
mod ownership;
mod rules;
mod types;

pub use engine::PermissionEvaluator;
pub use ownership::{OwnershipLookupError, OwnershipResolver, OwnershipStore};
pub use rules::{rule_for, rule_for_resource, Rule};
pub use types::{
	Action, Decision, DenyReason, Ownership, ResourceDescriptor, ResourceKind, ResourceScope,
};
