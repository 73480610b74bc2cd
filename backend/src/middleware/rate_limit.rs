//! Per-client request rate limiting.
//!
//! Clients are keyed by peer IP. Each client may send `max_requests` within a
//! `window`; the allowance refills gradually (GCRA) rather than resetting at
//! window boundaries. Rejected requests receive a 429 envelope and a
//! `Retry-After` header in whole seconds.

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::warn;

use crate::domain::Error as DomainError;

/// Message sent with every 429 response.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// Tracked clients above which idle entries are purged.
const MAX_TRACKED_CLIENTS: usize = 10_000;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Allowance granted to each client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    window: Duration,
    max_requests: NonZeroU32,
}

impl RateLimitPolicy {
    /// `max_requests` per `window`.
    pub fn new(window: Duration, max_requests: NonZeroU32) -> Self {
        Self {
            window,
            max_requests,
        }
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Requests allowed per window.
    pub fn max_requests(&self) -> NonZeroU32 {
        self.max_requests
    }

    fn quota(self) -> Quota {
        let replenish = self.window / self.max_requests.get();
        Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(self.max_requests))
            .allow_burst(self.max_requests)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(15 * 60), NonZeroU32::MIN.saturating_add(99))
    }
}

/// Rate limiting middleware; clones share the same client counters.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use chat_backend::middleware::RateLimit;
/// use chat_backend::middleware::rate_limit::RateLimitPolicy;
///
/// let app = App::new().wrap(RateLimit::new(RateLimitPolicy::default()));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
}

impl RateLimit {
    /// Limiter enforcing `policy`.
    pub fn new(policy: RateLimitPolicy) -> Self {
        let clock = DefaultClock::default();
        let limiter = RateLimiter::new(policy.quota(), DefaultKeyedStateStore::default(), &clock);
        Self {
            limiter: Arc::new(limiter),
            clock,
        }
    }

    /// Record a request from `client`; on rejection return the wait before
    /// the next request is allowed.
    fn check(&self, client: IpAddr) -> Result<(), Duration> {
        if self.limiter.len() > MAX_TRACKED_CLIENTS {
            self.limiter.retain_recent();
        }
        self.limiter
            .check_key(&client)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

fn client_key(req: &ServiceRequest) -> IpAddr {
    req.peer_addr()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |addr| addr.ip())
}

fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limit: self.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(&req);
        match self.limit.check(client) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(wait) => {
                warn!(%client, path = req.path(), "rate limit exceeded");
                Box::pin(async move {
                    let mut response = DomainError::rate_limited(RATE_LIMITED_MESSAGE).error_response();
                    response.headers_mut().insert(
                        header::RETRY_AFTER,
                        HeaderValue::from(retry_after_secs(wait)),
                    );
                    Ok(req.into_response(response).map_into_right_body())
                })
            }
        }
    }
}
