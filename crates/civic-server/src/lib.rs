// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP gateway for the civic issue tracker.
//!
//! Every API request passes through the same pipeline: resolve the caller,
//! check the permission rule for the target, run the handler, and wrap the
//! result in the `{success, response, error}` envelope.

pub mod api;
pub mod auth_middleware;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod routes;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use civic_server_config::ServerConfig;
pub use envelope::Envelope;
pub use error::{ApiError, ErrorDetails, ErrorKind};
pub use gateway::{Gateway, Outcome, Reply, Stage, Target};
