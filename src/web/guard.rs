//! Per-request authentication guard.
//!
//! The guard runs the whole request-time pipeline:
//!
//! ```text
//! invocation context
//!   ↓ extract_request()
//! RequestHandle
//!   ↓ SessionResolver::resolve()     (session + user attached here)
//! Option<Session>
//!   ↓ AccessGate::evaluate()
//! allow / 401 / 403
//! ```

use std::sync::Arc;

use crate::error::Error;
use crate::gate::{AccessGate, AllowReason, Decision};
use crate::logging::RequestLog;
use crate::policy::RoutePolicy;
use crate::provider::AuthProvider;
use crate::resolver::SessionResolver;

use super::adapter::extract_request;
use super::RequestContext;

/// Gates route invocations on the resolved session.
///
/// # Examples
///
/// ```ignore
/// let guard = AuthGuard::new(provider);
///
/// let mut ctx = HttpContext::new(RequestHandle::http(headers));
/// match guard.can_activate(&mut ctx, &RoutePolicy::required()).await {
///     Ok(_) => handler(ctx.request().session()),
///     Err(Error::Violation(v)) => respond(v.status(), v.body()),
///     Err(other) => return Err(other),
/// }
/// ```
pub struct AuthGuard<P: ?Sized> {
    resolver: SessionResolver<P>,
}

impl<P: AuthProvider + ?Sized> AuthGuard<P> {
    /// Creates a guard backed by `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            resolver: SessionResolver::new(provider),
        }
    }

    /// Decides whether the invocation in `ctx` may proceed under `policy`.
    ///
    /// The resolved session and user are attached to the request before the
    /// policy is applied, so they stay visible to downstream consumers
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `Error::Violation` with a 401 or 403 violation when access is denied
    /// - `Error::Provider` when session resolution fails
    pub async fn can_activate<C>(&self, ctx: &mut C, policy: &RoutePolicy) -> Result<AllowReason, Error>
    where
        C: RequestContext + ?Sized,
    {
        let transport = ctx.transport();
        let operation = ctx.operation().unwrap_or("-").to_owned();
        let request = extract_request(ctx);
        let session = self.resolver.resolve(request).await?;

        let log = RequestLog::new(request.request_id());
        match AccessGate::evaluate(session.as_deref(), policy) {
            Decision::Allow(reason) => {
                log.debug(format_args!(
                    "access allowed ({:?}) over {} to {} for {:?}",
                    reason,
                    transport,
                    operation,
                    policy.access()
                ));
                Ok(reason)
            }
            Decision::Deny(violation) => {
                log.debug(format_args!(
                    "access denied over {} to {}: {} {}",
                    transport,
                    operation,
                    violation.code(),
                    violation.message
                ));
                Err(violation.into())
            }
        }
    }
}

impl<P: ?Sized> Clone for AuthGuard<P> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}
