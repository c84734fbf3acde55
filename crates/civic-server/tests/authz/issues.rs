// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for issue routes.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn issue_read_requires_authentication() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let issue_path = format!("/api/issues/{}", f.issue.id);

	let cases = [
		AuthzCase {
			name: "anonymous_list",
			method: Method::GET,
			path: "/api/issues".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "anonymous_get",
			method: Method::GET,
			path: issue_path.clone(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_list",
			method: Method::GET,
			path: "/api/issues".to_string(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_user_get",
			method: Method::GET,
			path: issue_path,
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unknown_issue",
			method: Method::GET,
			path: format!("/api/issues/{}", Uuid::new_v4()),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "malformed_id_signed_in",
			method: Method::GET,
			path: "/api/issues/not-a-uuid".to_string(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "malformed_id_anonymous",
			method: Method::GET,
			path: "/api/issues/not-a-uuid".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn any_signed_in_user_can_report() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let body = json!({
		"title": "Broken streetlight",
		"description": "Out since Tuesday",
		"category_id": f.category.id,
	});

	let cases = [
		AuthzCase {
			name: "anonymous_create",
			method: Method::POST,
			path: "/api/issues".to_string(),
			user: None,
			body: Some(body.clone()),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "regular_create",
			method: Method::POST,
			path: "/api/issues".to_string(),
			user: Some(f.other.clone()),
			body: Some(body.clone()),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin_create",
			method: Method::POST,
			path: "/api/issues".to_string(),
			user: Some(f.admin.clone()),
			body: Some(body),
			expected_status: StatusCode::CREATED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn reporter_is_recorded_from_the_token() {
	let app = TestApp::new().await;
	let other = &app.fixtures.other;

	let response = app
		.post(
			"/api/issues",
			Some(other),
			json!({"title": "Graffiti", "description": "On the library wall"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(response).await;
	assert_eq!(body["success"], true);
	assert_eq!(body["response"]["reported_by"], other.user.id.to_string());
	assert_eq!(body["response"]["status"], "open");
}

#[tokio::test]
async fn status_changes_take_the_reporter_or_staff() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/issues/{}", f.issue.id);

	let cases = [
		AuthzCase {
			name: "anonymous_update",
			method: Method::PATCH,
			path: path.clone(),
			user: None,
			body: Some(json!({"status": "resolved"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "other_user_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.other.clone()),
			body: Some(json!({"status": "resolved"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "reporter_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.reporter.clone()),
			body: Some(json!({"status": "closed"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "staff_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.staff.clone()),
			body: Some(json!({"status": "resolved"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_update",
			method: Method::PATCH,
			path,
			user: Some(f.admin.clone()),
			body: Some(json!({"status": "open"})),
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn resolving_records_who_resolved() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			&format!("/api/issues/{}", f.issue.id),
			Some(&f.staff),
			json!({"status": "resolved"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["response"]["status"], "resolved");
	assert_eq!(body["response"]["resolved_by"], f.staff.user.id.to_string());
}

#[tokio::test]
async fn denied_update_leaves_the_issue_untouched() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			&format!("/api/issues/{}", f.issue.id),
			Some(&f.other),
			json!({"status": "closed"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let issue = app.state.issue_repo.get_issue(&f.issue.id).await.unwrap().unwrap();
	assert_eq!(issue.status, f.progress.status);
}

#[tokio::test]
async fn delete_takes_the_reporter_or_an_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/issues/{}", f.issue.id);

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
			name: "reporter_delete",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_delete_after_gone",
			method: Method::DELETE,
			path,
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn admin_can_delete_any_issue() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.delete(&format!("/api/issues/{}", f.issue.id), Some(&f.admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["success"], true);
	assert!(body["response"].is_null());
	assert!(app.state.issue_repo.get_issue(&f.issue.id).await.unwrap().is_none());
}

#[tokio::test]
async fn regular_user_deleting_a_missing_issue_gets_not_found() {
	let app = TestApp::new().await;

	let response = app
		.delete(
			&format!("/api/issues/{}", Uuid::new_v4()),
			Some(&app.fixtures.other),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_status() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	app.post(
		"/api/issues",
		Some(&f.other),
		json!({"title": "Fallen tree", "description": "Blocking the path"}),
	)
	.await;

	let body = body_json(app.get("/api/issues?status=open", Some(&f.other)).await).await;
	let issues = body["response"].as_array().unwrap();
	assert_eq!(issues.len(), 1);
	assert_eq!(issues[0]["title"], "Fallen tree");

	let body = body_json(app.get("/api/issues", Some(&f.other)).await).await;
	assert_eq!(body["response"].as_array().unwrap().len(), 2);

	let response = app.get("/api/issues?status=done", Some(&f.other)).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(
		body["error"]["details"]["status"][0],
		"Invalid status. Valid choices are: open, in_progress, resolved, closed"
	);
}

#[tokio::test]
async fn reporter_listings_keep_to_their_owner() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let reporter_issues = format!("/api/issues/user/{}", f.reporter.user.id);

	let cases = [
		AuthzCase {
			name: "anonymous_my",
			method: Method::GET,
			path: "/api/issues/my".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "regular_my",
			method: Method::GET,
			path: "/api/issues/my".to_string(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "reporter_own_listing",
			method: Method::GET,
			path: reporter_issues.clone(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_user_listing",
			method: Method::GET,
			path: reporter_issues.clone(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "staff_listing",
			method: Method::GET,
			path: reporter_issues.clone(),
			user: Some(f.staff.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_listing",
			method: Method::GET,
			path: reporter_issues.clone(),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "anonymous_listing",
			method: Method::GET,
			path: reporter_issues,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "malformed_user_id",
			method: Method::GET,
			path: "/api/issues/user/42".to_string(),
			user: Some(f.staff.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn my_issues_are_the_ones_i_reported() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(app.get("/api/issues/my", Some(&f.reporter)).await).await;
	let issues = body["response"].as_array().unwrap();
	assert_eq!(issues.len(), 1);
	assert_eq!(issues[0]["id"], f.issue.id.to_string());

	let body = body_json(app.get("/api/issues/my", Some(&f.other)).await).await;
	assert!(body["response"].as_array().unwrap().is_empty());

	let body = body_json(
		app.get(&format!("/api/issues/user/{}", f.reporter.user.id), Some(&f.staff))
			.await,
	)
	.await;
	assert_eq!(body["response"][0]["reported_by"], f.reporter.user.id.to_string());
}
