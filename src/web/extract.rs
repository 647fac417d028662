//! Extraction boundary traits for transport integration.
//!
//! Each transport the host serves (plain HTTP, GraphQL resolvers, ...)
//! hands the gate a different invocation context. This module defines the
//! single abstraction the gate needs from all of them: access to the
//! per-request [`RequestHandle`].

use std::fmt;

use crate::request::RequestHandle;

/// The transport an invocation arrived over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// A plain HTTP request
    Http,
    /// A GraphQL resolver invocation
    GraphQl,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Http => write!(f, "http"),
            TransportKind::GraphQl => write!(f, "graphql"),
        }
    }
}

/// A framework invocation context the gate can authenticate.
///
/// Implementations only map their own shape onto the request handle; they
/// never authenticate or authorize.
///
/// # Examples
///
/// ```
/// use session_gate::web::{RequestContext, TransportKind};
/// use session_gate::RequestHandle;
///
/// // A job runner that authenticates queued work like HTTP requests
/// struct QueuedJob {
///     request: RequestHandle,
/// }
///
/// impl RequestContext for QueuedJob {
///     fn transport(&self) -> TransportKind {
///         TransportKind::Http
///     }
///
///     fn request(&self) -> &RequestHandle {
///         &self.request
///     }
///
///     fn request_mut(&mut self) -> &mut RequestHandle {
///         &mut self.request
///     }
/// }
/// ```
pub trait RequestContext {
    /// The transport this context belongs to.
    fn transport(&self) -> TransportKind;

    /// Name of the invoked operation, when the transport has one (a GraphQL
    /// field name). Used to label log events.
    fn operation(&self) -> Option<&str> {
        None
    }

    /// The per-request handle.
    fn request(&self) -> &RequestHandle;

    /// The per-request handle, for attaching the session.
    fn request_mut(&mut self) -> &mut RequestHandle;
}
