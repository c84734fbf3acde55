// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router assembly and shared state.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	response::{IntoResponse, Response},
	routing::{get, post},
	Router,
};
use civic_server_auth::{OwnershipResolver, PermissionEvaluator, TokenVerifier};
use civic_server_db::{
	CategoryRepository, CommentRepository, DbOwnershipStore, IssueRepository, LikeRepository,
	ProgressRepository, TokenRepository, UserRepository,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::auth_middleware::{auth_layer, DbTokenVerifier};
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::normalize::NormalizeLayer;
use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub user_repo: Arc<UserRepository>,
	pub category_repo: Arc<CategoryRepository>,
	pub issue_repo: Arc<IssueRepository>,
	pub progress_repo: Arc<ProgressRepository>,
	pub comment_repo: Arc<CommentRepository>,
	pub like_repo: Arc<LikeRepository>,
	pub token_verifier: Arc<dyn TokenVerifier>,
	pub gateway: Gateway,
}

/// Builds the state from a migrated pool.
pub fn create_app_state(pool: SqlitePool) -> AppState {
	let user_repo = UserRepository::new(pool.clone());
	let token_repo = TokenRepository::new(pool.clone());
	let ownership = OwnershipResolver::new(Arc::new(DbOwnershipStore::new(pool.clone())));

	AppState {
		token_verifier: Arc::new(DbTokenVerifier::new(token_repo, user_repo.clone())),
		user_repo: Arc::new(user_repo),
		category_repo: Arc::new(CategoryRepository::new(pool.clone())),
		issue_repo: Arc::new(IssueRepository::new(pool.clone())),
		progress_repo: Arc::new(ProgressRepository::new(pool.clone())),
		comment_repo: Arc::new(CommentRepository::new(pool.clone())),
		like_repo: Arc::new(LikeRepository::new(pool)),
		gateway: Gateway::new(PermissionEvaluator::new(ownership)),
	}
}

fn api_routes() -> Router<AppState> {
	Router::new()
		.route("/auth/signup", post(routes::auth::signup))
		.route("/auth/verify", get(routes::auth::verify))
		.route(
			"/users/me",
			get(routes::users::get_me).patch(routes::users::update_me),
		)
		.route("/users/{id}", get(routes::users::get_user))
		.route(
			"/categories",
			get(routes::categories::list_categories).post(routes::categories::create_category),
		)
		.route(
			"/categories/{id}",
			get(routes::categories::get_category)
				.patch(routes::categories::update_category)
				.delete(routes::categories::delete_category),
		)
		.route(
			"/issues",
			get(routes::issues::list_issues).post(routes::issues::create_issue),
		)
		.route(
			"/issues/{id}",
			get(routes::issues::get_issue)
				.patch(routes::issues::update_issue)
				.delete(routes::issues::delete_issue),
		)
		.route(
			"/issues/{id}/progress",
			get(routes::progress::list_for_issue),
		)
		.route(
			"/issues/{id}/comments",
			get(routes::comments::list_for_issue),
		)
		.route("/issues/{id}/likes", get(routes::likes::list_for_issue))
		.route("/issues/my", get(routes::issues::list_mine))
		.route("/issues/user/{id}", get(routes::issues::list_by_reporter))
		.route("/progress", post(routes::progress::create_progress))
		.route("/progress/{id}", get(routes::progress::get_progress))
		.route("/comments", post(routes::comments::create_comment))
		.route("/comments/mine", get(routes::comments::list_mine))
		.route("/comments/user/{id}", get(routes::comments::list_by_author))
		.route(
			"/comments/{id}",
			get(routes::comments::get_comment)
				.patch(routes::comments::update_comment)
				.delete(routes::comments::delete_comment),
		)
		.route("/likes", post(routes::likes::create_like))
		.route(
			"/likes/{id}",
			get(routes::likes::get_like).delete(routes::likes::delete_like),
		)
}

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.nest("/api", api_routes())
		.fallback(fallback)
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.layer(NormalizeLayer)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn fallback() -> Response {
	ApiError::not_found("route").into_response()
}
