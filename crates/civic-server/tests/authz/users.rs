// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for profile and auth routes.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn profiles_need_a_signed_in_user() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = [
		AuthzCase {
			name: "anonymous_me",
			method: Method::GET,
			path: "/api/users/me".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "anonymous_update_me",
			method: Method::PATCH,
			path: "/api/users/me".to_string(),
			user: None,
			body: Some(json!({"full_name": "Nobody"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "anonymous_other_profile",
			method: Method::GET,
			path: format!("/api/users/{}", f.reporter.user.id),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "regular_me",
			method: Method::GET,
			path: "/api/users/me".to_string(),
			user: Some(f.reporter.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "regular_other_profile",
			method: Method::GET,
			path: format!("/api/users/{}", f.reporter.user.id),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unknown_profile",
			method: Method::GET,
			path: format!("/api/users/{}", Uuid::new_v4()),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "verify_signed_in",
			method: Method::GET,
			path: "/api/auth/verify".to_string(),
			user: Some(f.other.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "verify_anonymous",
			method: Method::GET,
			path: "/api/auth/verify".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn others_see_the_public_projection() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(
		app.get(&format!("/api/users/{}", f.reporter.user.id), Some(&f.other))
			.await,
	)
	.await;
	let profile = body["response"].as_object().unwrap();
	assert_eq!(profile["id"], f.reporter.user.id.to_string());
	assert!(!profile.contains_key("email"));
	assert!(!profile.contains_key("phone_number"));

	let body = body_json(
		app.get(&format!("/api/users/{}", f.reporter.user.id), Some(&f.reporter))
			.await,
	)
	.await;
	assert_eq!(body["response"]["email"], "reporter@civic.test");
}

#[tokio::test]
async fn signup_is_open_to_anonymous_callers() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/auth/signup",
			None,
			json!({
				"email": "New.Resident@Civic.Test",
				"password": "correct horse",
				"full_name": "New Resident",
				"phone_number": "+15551234567",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(response).await;
	assert_eq!(body["success"], true);
	assert_eq!(body["response"]["email"], "new.resident@civic.test");
	assert!(!body["response"]
		.as_object()
		.unwrap()
		.contains_key("password_hash"));
}

#[tokio::test]
async fn profile_update_changes_own_fields() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			"/api/users/me",
			Some(&f.reporter),
			json!({"full_name": "Renamed Resident", "address": "12 Elm St"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["response"]["full_name"], "Renamed Resident");
	assert_eq!(body["response"]["address"], "12 Elm St");
}

#[tokio::test]
async fn inactive_accounts_are_turned_away() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	app.state
		.user_repo
		.set_active(&f.other.user.id, false)
		.await
		.unwrap();

	let response = app.get("/api/users/me", Some(&f.other)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	let body = body_json(response).await;
	assert_eq!(body["error"]["details"]["code"], "user_inactive");
}
