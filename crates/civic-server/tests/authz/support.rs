// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::{Duration, Utc};
use civic_server_auth::{
	access_token::{generate_access_token, hash_token},
	User,
};
use civic_server_db::{
	CategoryRecord, CommentRecord, IssueRecord, IssueStatus, LikeRecord, NewIssue, ProgressRecord,
	TokenRepository,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use civic_server::api::{create_app_state, create_router, AppState};

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("authorization"),
			HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap(),
		)
	}
}

/// Four accounts, one per tier, plus one resource of every kind.
///
/// `reporter` owns the issue, the comment and the like. `staff` wrote the
/// progress entry. `other` owns nothing.
#[derive(Clone)]
pub struct Fixtures {
	pub reporter: TestUser,
	pub other: TestUser,
	pub staff: TestUser,
	pub admin: TestUser,
	pub category: CategoryRecord,
	pub issue: IssueRecord,
	pub progress: ProgressRecord,
	pub comment: CommentRecord,
	pub like: LikeRecord,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	pub pool: SqlitePool,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = civic_server_db::create_pool(&db_url).await.unwrap();
		civic_server_db::run_migrations(&pool).await.unwrap();

		let state = create_app_state(pool.clone());
		let fixtures = create_fixtures(&state, &pool).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			pool,
			_temp_dir: temp_dir,
		}
	}

	/// A fresh regular account with a valid token.
	pub async fn user(&self, email: &str) -> TestUser {
		create_test_user(&self.state, &self.pool, email, false, false).await
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// GET with a raw `Authorization` header value.
	pub async fn get_with_authorization(&self, path: &str, authorization: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header("authorization", authorization)
			.body(Body::empty())
			.unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Sends an arbitrary request, for malformed bodies and odd methods.
	pub async fn send(&self, request: Request<Body>) -> Response<Body> {
		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}
}

pub async fn body_json(response: Response<Body>) -> Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the envelope shape shared by every response.
pub fn assert_envelope(body: &Value) {
	let object = body.as_object().expect("envelope is an object");
	assert_eq!(object.len(), 3, "unexpected envelope keys: {body}");
	let success = body["success"].as_bool().expect("success is a bool");
	if success {
		assert!(body["error"].is_null(), "success with an error: {body}");
	} else {
		assert!(body["response"].is_null(), "failure with a response: {body}");
		assert!(body["error"]["message"].is_string(), "missing message: {body}");
		assert!(
			body["error"].as_object().unwrap().contains_key("details"),
			"missing details: {body}"
		);
	}
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		let status = response.status();
		let body = body_json(response).await;
		assert_envelope(&body);
		if status != case.expected_status {
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, status, body
			);
		}
	}
}

async fn create_fixtures(state: &AppState, pool: &SqlitePool) -> Fixtures {
	let reporter = create_test_user(state, pool, "reporter@civic.test", false, false).await;
	let other = create_test_user(state, pool, "other@civic.test", false, false).await;
	let staff = create_test_user(state, pool, "staff@civic.test", true, false).await;
	let admin = create_test_user(state, pool, "admin@civic.test", true, true).await;

	let category = state
		.category_repo
		.create_category("Roads", Some("Potholes and road damage"))
		.await
		.unwrap();

	let issue = state
		.issue_repo
		.create_issue(NewIssue {
			title: "Pothole on Main St".to_string(),
			description: "Large pothole near the bus stop".to_string(),
			location: Some("Main St & 3rd".to_string()),
			category_id: Some(category.id),
			reported_by: reporter.user.id,
		})
		.await
		.unwrap();

	let progress = state
		.progress_repo
		.create_progress(
			&issue.id,
			IssueStatus::InProgress,
			Some("Crew scheduled"),
			&staff.user.id,
		)
		.await
		.unwrap();

	let comment = state
		.comment_repo
		.create_comment(&issue.id, &reporter.user.id, "Still there this morning")
		.await
		.unwrap();

	let like = state
		.like_repo
		.create_like(&issue.id, &reporter.user.id)
		.await
		.unwrap();

	Fixtures {
		reporter,
		other,
		staff,
		admin,
		category,
		issue,
		progress,
		comment,
		like,
	}
}

async fn create_test_user(
	state: &AppState,
	pool: &SqlitePool,
	email: &str,
	is_staff: bool,
	is_admin: bool,
) -> TestUser {
	let mut user = User::new(email, "Test Resident");
	user.is_staff = is_staff;
	user.is_admin = is_admin;
	state
		.user_repo
		.create_user(&user, "$argon2id$test")
		.await
		.unwrap();

	let token = generate_access_token();
	TokenRepository::new(pool.clone())
		.create_token(&user.id, &hash_token(&token), Utc::now() + Duration::hours(1))
		.await
		.unwrap();

	TestUser { user, token }
}
