// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outermost response normalization.
//!
//! [`NormalizeLayer`] sits around the whole router. Responses that already
//! carry [`Enveloped`] pass through untouched. Anything else with an error
//! status (axum's own method-not-allowed, extractor rejections, a layer that
//! bailed out) is replaced with an envelope for the matching error kind. A
//! panic while polling the inner service becomes an `internal_error`.

use std::{
	future::Future,
	panic::{catch_unwind, AssertUnwindSafe},
	pin::Pin,
	task::{Context, Poll},
};

use axum::{body::Body, http::Request, response::Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::envelope::{failure_response, Enveloped};
use crate::error::ApiError;
use crate::gateway::panic_message;

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeLayer;

impl<S> Layer<S> for NormalizeLayer {
	type Service = NormalizeService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		NormalizeService { inner }
	}
}

/// Service wrapper for [`NormalizeLayer`].
#[derive(Debug, Clone)]
pub struct NormalizeService<S> {
	inner: S,
}

impl<S> Service<Request<Body>> for NormalizeService<S>
where
	S: Service<Request<Body>, Response = Response>,
{
	type Response = Response;
	type Error = S::Error;
	type Future = NormalizeFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		NormalizeFuture {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Future for [`NormalizeService`].
	pub struct NormalizeFuture<F> {
		#[pin]
		fut: F,
	}
}

impl<F, E> Future for NormalizeFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let fut = self.project().fut;
		match catch_unwind(AssertUnwindSafe(|| fut.poll(cx))) {
			Ok(Poll::Pending) => Poll::Pending,
			Ok(Poll::Ready(Ok(response))) => Poll::Ready(Ok(normalize(response))),
			Ok(Poll::Ready(Err(e))) => Poll::Ready(Err(e)),
			Err(panic) => {
				let error =
					ApiError::internal(format!("request panicked: {}", panic_message(panic.as_ref())));
				Poll::Ready(Ok(failure_response(&error)))
			}
		}
	}
}

/// Envelopes a response that did not come through the gateway.
pub fn normalize(response: Response) -> Response {
	if response.extensions().get::<Enveloped>().is_some() {
		return response;
	}
	let status = response.status();
	if !(status.is_client_error() || status.is_server_error()) {
		return response;
	}
	tracing::debug!(%status, "enveloping bare error response");
	failure_response(&ApiError::from_status(status))
}
