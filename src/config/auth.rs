use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};

use crate::utils::error::AppError;

/// Shared-secret request header
const X_TOKEN: &str = "x-token";

/// Rejects any request whose `X-Token` header does not exactly match the
/// configured service secret. Rejected requests never reach the inner
/// service, so no database work happens for them.
#[derive(Clone)]
pub struct AuthTokenLayer {
    token: Arc<str>,
}

impl AuthTokenLayer {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl<S> Layer<S> for AuthTokenLayer {
    type Service = AuthTokenService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthTokenService {
            inner,
            token: self.token.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthTokenService<S> {
    inner: S,
    token: Arc<str>,
}

impl<S> Service<Request<Body>> for AuthTokenService<S>
where
    S: Service<Request<Body>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = AuthTokenFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let presented = request
            .headers()
            .get(X_TOKEN)
            .and_then(|value| value.to_str().ok());

        if presented == Some(self.token.as_ref()) {
            AuthTokenFuture::Forward {
                future: self.inner.call(request),
            }
        } else {
            AuthTokenFuture::Reject
        }
    }
}

#[pin_project::pin_project(project = AuthTokenFutureProj)]
pub enum AuthTokenFuture<F> {
    Forward {
        #[pin]
        future: F,
    },
    Reject,
}

impl<F, E> std::future::Future for AuthTokenFuture<F>
where
    F: std::future::Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            AuthTokenFutureProj::Forward { future } => future.poll(cx),
            AuthTokenFutureProj::Reject => {
                Poll::Ready(Ok(AppError::Unauthorized.into_response()))
            }
        }
    }
}
