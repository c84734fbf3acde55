// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for progress entry routes.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn progress_is_recorded_by_staff_or_the_reporter() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let entry = |status: &str| json!({"issue_id": f.issue.id, "status": status, "notes": "update"});

	let cases = [
		AuthzCase {
			name: "anonymous_create",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: None,
			body: Some(entry("resolved")),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_create",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: Some(f.other.clone()),
			body: Some(entry("resolved")),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "reporter_create",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: Some(f.reporter.clone()),
			body: Some(entry("closed")),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "staff_create",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: Some(f.staff.clone()),
			body: Some(entry("in_progress")),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin_create",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: Some(f.admin.clone()),
			body: Some(entry("resolved")),
			expected_status: StatusCode::CREATED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn progress_on_a_missing_issue_is_not_found() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let body = json!({"issue_id": Uuid::new_v4(), "status": "resolved"});

	let cases = [
		AuthzCase {
			name: "regular_missing_parent",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: Some(f.other.clone()),
			body: Some(body.clone()),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "staff_missing_parent",
			method: Method::POST,
			path: "/api/progress".to_string(),
			user: Some(f.staff.clone()),
			body: Some(body),
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn recording_progress_moves_the_issue() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			"/api/progress",
			Some(&f.staff),
			json!({"issue_id": f.issue.id, "status": "resolved", "notes": "Patched"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = body_json(response).await;
	assert_eq!(body["response"]["updated_by"], f.staff.user.id.to_string());

	let body = body_json(
		app.get(&format!("/api/issues/{}", f.issue.id), Some(&f.other))
			.await,
	)
	.await;
	assert_eq!(body["response"]["status"], "resolved");
	assert_eq!(body["response"]["resolved_by"], f.staff.user.id.to_string());

	let body = body_json(
		app.get(&format!("/api/issues/{}/progress", f.issue.id), Some(&f.other))
			.await,
	)
	.await;
	assert_eq!(body["response"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn progress_reads_need_a_signed_in_user() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = [
		AuthzCase {
			name: "anonymous_get",
			method: Method::GET,
			path: format!("/api/progress/{}", f.progress.id),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_get",
			method: Method::GET,
			path: format!("/api/progress/{}", f.progress.id),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_user_list",
			method: Method::GET,
			path: format!("/api/issues/{}/progress", f.issue.id),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unknown_entry",
			method: Method::GET,
			path: format!("/api/progress/{}", Uuid::new_v4()),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn progress_entries_are_append_only() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.delete(&format!("/api/progress/{}", f.progress.id), Some(&f.admin))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	let body = body_json(response).await;
	assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_status_is_a_field_error() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			"/api/progress",
			Some(&f.staff),
			json!({"issue_id": f.issue.id, "status": "fixed"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(
		body["error"]["details"]["status"],
		json!(["\"fixed\" is not a valid choice."])
	);
}
