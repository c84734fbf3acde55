// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod support;

mod categories;
mod comments;
mod issues;
mod likes;
mod progress;
mod users;
