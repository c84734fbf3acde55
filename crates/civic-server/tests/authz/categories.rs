// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for category routes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn categories_are_public_to_read() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = [
		AuthzCase {
			name: "anonymous_list",
			method: Method::GET,
			path: "/api/categories".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "anonymous_get",
			method: Method::GET,
			path: format!("/api/categories/{}", f.category.id),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "regular_list",
			method: Method::GET,
			path: "/api/categories".to_string(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn only_admins_manage_categories() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/categories/{}", f.category.id);

	let cases = [
		AuthzCase {
			name: "anonymous_create",
			method: Method::POST,
			path: "/api/categories".to_string(),
			user: None,
			body: Some(json!({"name": "Parks"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "regular_create",
			method: Method::POST,
			path: "/api/categories".to_string(),
			user: Some(f.reporter.clone()),
			body: Some(json!({"name": "Parks"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "staff_create",
			method: Method::POST,
			path: "/api/categories".to_string(),
			user: Some(f.staff.clone()),
			body: Some(json!({"name": "Parks"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_create",
			method: Method::POST,
			path: "/api/categories".to_string(),
			user: Some(f.admin.clone()),
			body: Some(json!({"name": "Parks"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "staff_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.staff.clone()),
			body: Some(json!({"description": "Streets"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_update",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.admin.clone()),
			body: Some(json!({"description": "Streets"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "regular_delete",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.reporter.clone()),
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
async fn category_names_are_unique_ignoring_case() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let response = app
		.post("/api/categories", Some(admin), json!({"name": "roads"}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = body_json(response).await;
	assert_eq!(body["success"], false);
	assert_eq!(
		body["error"]["details"]["name"],
		json!(["A category with this name already exists."])
	);
}

#[tokio::test]
async fn renaming_to_own_name_is_allowed() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			&format!("/api/categories/{}", f.category.id),
			Some(&f.admin),
			json!({"name": "Roads"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}
