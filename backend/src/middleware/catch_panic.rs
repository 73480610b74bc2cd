//! Converts handler panics into the generic 500 envelope.
//!
//! Without this actix drops the connection when a handler panics, so the
//! client sees a transport failure instead of a response.

use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::Error as DomainError;

/// Panic guard middleware.
///
/// A panic surfaces as an internal domain error, which the server renders as
/// the redacted 500 envelope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use chat_backend::middleware::CatchPanic;
///
/// let app = App::new().wrap(CatchPanic);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CatchPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicMiddleware { service }))
    }
}

/// Service wrapper produced by [`CatchPanic`].
pub struct CatchPanicMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        let fut = AssertUnwindSafe(self.service.call(req)).catch_unwind();
        Box::pin(async move {
            fut.await.unwrap_or_else(|_| {
                error!(%path, "handler panicked");
                Err(DomainError::internal(format!("handler panicked on {path}")).into())
            })
        })
    }
}
