// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared validation utilities for API handlers.
//!
//! Checks collect into [`ValidationErrors`] rather than failing fast, so a
//! response lists every violation on every field at once.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::ApiError;

pub const FIELD_REQUIRED: &str = "This field is required.";
pub const FIELD_BLANK: &str = "This field may not be blank.";
pub const FIELD_NOT_UPDATABLE: &str = "This field cannot be updated.";
pub const EMAIL_INVALID: &str = "Enter a valid email address.";
pub const EMAIL_TAKEN: &str = "user with this email already exists.";
pub const EMAIL_IMMUTABLE: &str = "Email cannot be changed.";
pub const CATEGORY_NAME_TAKEN: &str = "A category with this name already exists.";

pub const PHONE_LENGTH: &str = "Phone number must be between 7-13 digits";
pub const PHONE_CHARSET: &str = "Phone number can only contain digits or a plus sign.";
pub const PHONE_PATTERN: &str = "Phone number must not contain consecutive special characters.";

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

static EMAIL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

static PHONE_LENGTH_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\+?\d{7,13}$").unwrap());
static PHONE_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+\d]+$").unwrap());
static PHONE_PATTERN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?\d+$").unwrap());

/// Field-level violations, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
	fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self
			.fields
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	pub fn extend(&mut self, field: &str, messages: impl IntoIterator<Item = &'static str>) {
		for message in messages {
			self.add(field, message);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.fields.get(field).map(Vec::as_slice)
	}

	pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
		self.fields
	}

	/// `Ok(())` if nothing was recorded.
	pub fn into_result(self) -> Result<(), ApiError> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(ApiError::validation(self))
		}
	}
}

/// Sanitize an email address by trimming whitespace and lowercasing.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
	EMAIL_REGEX.is_match(email)
}

/// Every phone number rule the value breaks, in a fixed order.
pub fn phone_number_violations(phone: &str) -> Vec<&'static str> {
	let mut violations = Vec::new();
	if !PHONE_LENGTH_REGEX.is_match(phone) {
		violations.push(PHONE_LENGTH);
	}
	if !PHONE_CHARSET_REGEX.is_match(phone) {
		violations.push(PHONE_CHARSET);
	}
	if !PHONE_PATTERN_REGEX.is_match(phone) {
		violations.push(PHONE_PATTERN);
	}
	violations
}

/// Checks an optional phone number. A blank value means "no phone number"
/// and yields `Some(None)`; absent yields `None`.
pub fn optional_phone(errors: &mut ValidationErrors, value: Option<&str>) -> Option<Option<String>> {
	let phone = value?.trim();
	if phone.is_empty() {
		return Some(None);
	}
	errors.extend("phone_number", phone_number_violations(phone));
	Some(Some(phone.to_string()))
}

pub fn password_violations(password: &str) -> Vec<String> {
	if password.chars().count() < MIN_PASSWORD_LEN {
		vec![format!(
			"Ensure this field has at least {MIN_PASSWORD_LEN} characters."
		)]
	} else {
		Vec::new()
	}
}

/// Checks a required text field, recording violations under `field`.
/// Returns the trimmed value when it is usable.
pub fn required_text(
	errors: &mut ValidationErrors,
	field: &str,
	value: Option<&str>,
	max_len: usize,
) -> Option<String> {
	let Some(value) = value else {
		errors.add(field, FIELD_REQUIRED);
		return None;
	};
	let trimmed = value.trim();
	if trimmed.is_empty() {
		errors.add(field, FIELD_BLANK);
		return None;
	}
	if trimmed.chars().count() > max_len {
		errors.add(field, max_len_message(max_len));
		return None;
	}
	Some(trimmed.to_string())
}

/// Like [`required_text`] but absent is fine.
pub fn optional_text(
	errors: &mut ValidationErrors,
	field: &str,
	value: Option<&str>,
	max_len: usize,
) -> Option<String> {
	let value = value?;
	required_text(errors, field, Some(value), max_len)
}

fn max_len_message(max_len: usize) -> String {
	format!("Ensure this field has no more than {max_len} characters.")
}

/// Parse a path segment as a UUID.
pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid, ApiError> {
	Uuid::parse_str(value).map_err(|_| ApiError::bad_request(format!("Invalid {what} id.")))
}
