// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The dispatcher wrapped around every resource handler.
//!
//! ```text
//! Received ─► AuthResolved ─► PermissionChecked ─► HandlerExecuting ─► Translating ─► Responded
//!                 │                   │                                    ▲
//!                 └── auth failure ───┴── deny ────────────────────────────┘
//! ```
//!
//! A handler only runs once the evaluator has allowed the request. Whatever
//! happens afterwards, including a panic inside the handler, is translated
//! and enveloped before it leaves this module.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use axum::{http::StatusCode, response::Response};
use civic_server_auth::{
	rule_for, Action, Actor, AuthContext, Decision, PermissionEvaluator, ResourceDescriptor,
	ResourceKind, ResourceScope,
};
use futures::FutureExt;
use serde::Serialize;
use tracing::{field, Span};

use crate::envelope::{failure_response, success_response};
use crate::error::ApiError;

/// Per-request dispatcher states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Received,
	AuthResolved,
	PermissionChecked,
	HandlerExecuting,
	Translating,
	Responded,
}

/// A successful handler result and the status it should go out with.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
	pub status: StatusCode,
	pub payload: T,
}

impl<T> Reply<T> {
	pub fn ok(payload: T) -> Self {
		Self {
			status: StatusCode::OK,
			payload,
		}
	}

	pub fn created(payload: T) -> Self {
		Self {
			status: StatusCode::CREATED,
			payload,
		}
	}
}

/// What a handler hands back to the gateway.
pub type Outcome<T> = Result<Reply<T>, ApiError>;

/// What a request is trying to do.
#[derive(Debug, Clone)]
pub struct Target {
	pub action: Action,
	pub kind: ResourceKind,
	/// An `Err` here means the addressed resource could not be worked out
	/// from the request (a malformed id, an unreadable body).
	pub scope: Result<ResourceScope, ApiError>,
}

impl Target {
	pub fn new(action: Action, kind: ResourceKind, scope: ResourceScope) -> Self {
		Self {
			action,
			kind,
			scope: Ok(scope),
		}
	}

	pub fn collection(action: Action, kind: ResourceKind) -> Self {
		Self::new(action, kind, ResourceScope::Collection)
	}

	pub fn resolving(
		action: Action,
		kind: ResourceKind,
		scope: Result<ResourceScope, ApiError>,
	) -> Self {
		Self {
			action,
			kind,
			scope,
		}
	}
}

#[derive(Clone)]
pub struct Gateway {
	evaluator: PermissionEvaluator,
}

impl Gateway {
	pub fn new(evaluator: PermissionEvaluator) -> Self {
		Self { evaluator }
	}

	/// Runs `handler` for `target` if `auth` is allowed to, and envelopes the
	/// result either way.
	#[tracing::instrument(
		name = "gateway",
		skip_all,
		fields(
			action = ?target.action,
			resource_kind = %target.kind,
			user_id = field::Empty,
		)
	)]
	pub async fn dispatch<T, F, Fut>(&self, auth: &AuthContext, target: Target, handler: F) -> Response
	where
		T: Serialize,
		F: FnOnce(Actor) -> Fut,
		Fut: Future<Output = Outcome<T>>,
	{
		transition(Stage::Received);
		let outcome = self.run(auth, target, handler).await;

		transition(Stage::Translating);
		let response = match outcome {
			Ok(reply) => success_response(reply.status, reply.payload),
			Err(error) => {
				tracing::debug!(kind = %error.kind, "request failed");
				failure_response(&error)
			}
		};

		transition(Stage::Responded);
		response
	}

	async fn run<T, F, Fut>(&self, auth: &AuthContext, target: Target, handler: F) -> Outcome<T>
	where
		F: FnOnce(Actor) -> Fut,
		Fut: Future<Output = Outcome<T>>,
	{
		let actor = match auth.actor() {
			Ok(actor) => actor,
			Err(error) => {
				tracing::info!(code = error.code(), "authentication failed");
				return Err(error.into());
			}
		};
		if let Some(user_id) = actor.user_id {
			Span::current().record("user_id", field::display(user_id));
		}
		transition(Stage::AuthResolved);

		let scope = match target.scope {
			Ok(scope) => scope,
			Err(error) => {
				// Anonymous callers are told to authenticate before anything
				// about their input.
				if !actor.is_authenticated() {
					let decision = rule_for(target.action, target.kind).decide(&actor, None);
					if let Decision::Deny(reason) = decision {
						tracing::info!(reason = reason.code(), "request denied");
						return Err(reason.into());
					}
				}
				return Err(error);
			}
		};
		let resource = ResourceDescriptor {
			kind: target.kind,
			scope,
		};

		let decision = self
			.evaluator
			.evaluate(&actor, target.action, &resource)
			.await?;
		if let Decision::Deny(reason) = decision {
			tracing::info!(reason = reason.code(), "request denied");
			return Err(reason.into());
		}
		transition(Stage::PermissionChecked);

		transition(Stage::HandlerExecuting);
		match AssertUnwindSafe(handler(actor)).catch_unwind().await {
			Ok(outcome) => outcome,
			Err(panic) => Err(ApiError::internal(format!(
				"handler panicked: {}",
				panic_message(panic.as_ref())
			))),
		}
	}
}

fn transition(stage: Stage) {
	tracing::debug!(?stage, "gateway transition");
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> &str {
	if let Some(message) = panic.downcast_ref::<&str>() {
		message
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message
	} else {
		"non-string panic payload"
	}
}
