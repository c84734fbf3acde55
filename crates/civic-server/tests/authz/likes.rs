// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for like routes.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn likes_need_a_signed_in_user() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = [
		AuthzCase {
			name: "anonymous_list",
			method: Method::GET,
			path: format!("/api/issues/{}/likes", f.issue.id),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "anonymous_create",
			method: Method::POST,
			path: "/api/likes".to_string(),
			user: None,
			body: Some(json!({"issue_id": f.issue.id})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_get",
			method: Method::GET,
			path: format!("/api/likes/{}", f.like.id),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_user_create",
			method: Method::POST,
			path: "/api/likes".to_string(),
			user: Some(f.other.clone()),
			body: Some(json!({"issue_id": f.issue.id})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "missing_issue",
			method: Method::POST,
			path: "/api/likes".to_string(),
			user: Some(f.other.clone()),
			body: Some(json!({"issue_id": Uuid::new_v4()})),
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn liking_twice_is_a_conflict() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post("/api/likes", Some(&f.reporter), json!({"issue_id": f.issue.id}))
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);

	let body = body_json(response).await;
	assert_eq!(body["success"], false);
	assert_eq!(body["error"]["message"], "Conflict");
	assert_eq!(body["error"]["details"], "You have already liked this issue.");
}

#[tokio::test]
async fn only_the_author_removes_a_like() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/likes/{}", f.like.id);

	let cases = [
		AuthzCase {
			name: "other_user_delete",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_delete",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "author_delete",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "author_delete_again",
			method: Method::DELETE,
			path,
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn likes_are_listed_per_issue() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	app.post("/api/likes", Some(&f.other), json!({"issue_id": f.issue.id}))
		.await;

	let response = app
		.get(&format!("/api/issues/{}/likes", f.issue.id), Some(&f.staff))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["response"].as_array().unwrap().len(), 2);
}
