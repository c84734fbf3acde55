// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for comment routes.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn signed_in_users_read_and_post_comments() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = [
		AuthzCase {
			name: "anonymous_list",
			method: Method::GET,
			path: format!("/api/issues/{}/comments", f.issue.id),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_list",
			method: Method::GET,
			path: format!("/api/issues/{}/comments", f.issue.id),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_user_get",
			method: Method::GET,
			path: format!("/api/comments/{}", f.comment.id),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "anonymous_create",
			method: Method::POST,
			path: "/api/comments".to_string(),
			user: None,
			body: Some(json!({"issue_id": f.issue.id, "content": "Me too"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_create",
			method: Method::POST,
			path: "/api/comments".to_string(),
			user: Some(f.other.clone()),
			body: Some(json!({"issue_id": f.issue.id, "content": "Me too"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "create_on_missing_issue",
			method: Method::POST,
			path: "/api/comments".to_string(),
			user: Some(f.other.clone()),
			body: Some(json!({"issue_id": Uuid::new_v4(), "content": "Hello?"})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "list_on_missing_issue",
			method: Method::GET,
			path: format!("/api/issues/{}/comments", Uuid::new_v4()),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn only_the_author_edits_a_comment() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/comments/{}", f.comment.id);
	let edit = json!({"content": "Edited"});

	let cases = [
		AuthzCase {
			name: "other_user_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.other.clone()),
			body: Some(edit.clone()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.admin.clone()),
			body: Some(edit.clone()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "author_update",
			method: Method::PATCH,
			path,
			user: Some(f.reporter.clone()),
			body: Some(edit),
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn admin_may_delete_any_comment() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/comments/{}", f.comment.id);

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
			name: "staff_delete",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.staff.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_delete",
			method: Method::DELETE,
			path,
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn author_may_delete_own_comment() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.delete(&format!("/api/comments/{}", f.comment.id), Some(&f.reporter))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert!(app
		.state
		.comment_repo
		.get_comment(&f.comment.id)
		.await
		.unwrap()
		.is_none());
}

#[tokio::test]
async fn comment_author_comes_from_the_token() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			"/api/comments",
			Some(&f.other),
			json!({"issue_id": f.issue.id, "content": "  Seen it too  "}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(response).await;
	assert_eq!(body["response"]["author_id"], f.other.user.id.to_string());
	assert_eq!(body["response"]["content"], "Seen it too");
}

#[tokio::test]
async fn comment_body_needs_an_issue_id() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post("/api/comments", Some(&f.other), json!({"content": "Orphan"}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(body["error"]["details"]["issue_id"], json!(["This field is required."]));

	let response = app
		.post(
			"/api/comments",
			Some(&f.other),
			json!({"issue_id": "42", "content": "Orphan"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(body["error"]["details"]["issue_id"], json!(["Must be a valid UUID."]));
}

#[tokio::test]
async fn comments_by_user_are_for_staff() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let by_reporter = format!("/api/comments/user/{}", f.reporter.user.id);

	let cases = [
		AuthzCase {
			name: "anonymous_mine",
			method: Method::GET,
			path: "/api/comments/mine".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "regular_mine",
			method: Method::GET,
			path: "/api/comments/mine".to_string(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "author_by_user",
			method: Method::GET,
			path: by_reporter.clone(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_user_by_user",
			method: Method::GET,
			path: by_reporter.clone(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "staff_by_user",
			method: Method::GET,
			path: by_reporter.clone(),
			user: Some(f.staff.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_by_user",
			method: Method::GET,
			path: by_reporter.clone(),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "anonymous_by_user",
			method: Method::GET,
			path: by_reporter,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn mine_lists_only_my_comments() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(app.get("/api/comments/mine", Some(&f.reporter)).await).await;
	let comments = body["response"].as_array().unwrap();
	assert_eq!(comments.len(), 1);
	assert_eq!(comments[0]["id"], f.comment.id.to_string());

	let body = body_json(app.get("/api/comments/mine", Some(&f.other)).await).await;
	assert!(body["response"].as_array().unwrap().is_empty());

	let body = body_json(
		app.get(&format!("/api/comments/user/{}", f.reporter.user.id), Some(&f.staff))
			.await,
	)
	.await;
	assert_eq!(body["response"][0]["author_id"], f.reporter.user.id.to_string());
}

#[tokio::test]
async fn missing_issue_id_is_reported_with_the_other_fields() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post("/api/comments", Some(&f.other), json!({"content": "  "}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(
		body["error"]["details"],
		json!({
			"content": ["This field may not be blank."],
			"issue_id": ["This field is required."],
		})
	);
}
