//! Web framework integration surface.
//!
//! This module is the boundary between host transports and the gate. It
//! handles:
//! - Mapping invocation contexts (HTTP routes, GraphQL resolvers) onto a
//!   transport-agnostic [`RequestHandle`](crate::RequestHandle)
//! - Running the per-request guard: session resolution, then policy
//!   evaluation
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: adapters describe shapes, not a
//!    particular server. Hosts wrap their own request types.
//!
//! 2. **Resolve Before Deciding**: the session is attached to the request
//!    before any policy runs, so it is observable even on public routes.
//!
//! 3. **Denials Are Values**: a 401/403 is a [`Violation`](crate::Violation)
//!    the host turns into a response; it never aborts the process.
//!
//! # Example Flow
//!
//! ```ignore
//! let guard = AuthGuard::new(provider);
//! let policy = scope.policy("GET /admin/stats").unwrap();
//!
//! let mut ctx = HttpContext::new(RequestHandle::http(headers));
//! guard.can_activate(&mut ctx, policy).await?;
//!
//! let session = ctx.request().session();
//! ```

mod adapter;
mod extract;
mod guard;

pub use adapter::{extract_request, GraphQlContext, HttpContext, InvocationContext, ResolverContext};
pub use extract::{RequestContext, TransportKind};
pub use guard::AuthGuard;
