//! Transport adapters mapping invocation contexts onto request handles.

use crate::request::RequestHandle;

use super::{RequestContext, TransportKind};

/// Invocation context of a plain HTTP route.
#[derive(Debug)]
pub struct HttpContext {
    request: RequestHandle,
}

impl HttpContext {
    /// Wraps the request handle of an HTTP route invocation.
    pub fn new(request: RequestHandle) -> Self {
        Self { request }
    }

    /// Unwraps the request handle.
    pub fn into_request(self) -> RequestHandle {
        self.request
    }
}

impl RequestContext for HttpContext {
    fn transport(&self) -> TransportKind {
        TransportKind::Http
    }

    fn request(&self) -> &RequestHandle {
        &self.request
    }

    fn request_mut(&mut self) -> &mut RequestHandle {
        &mut self.request
    }
}

/// Invocation context of a GraphQL resolver.
///
/// The per-request handle travels inside the shared execution context as
/// `req`.
#[derive(Debug)]
pub struct GraphQlContext {
    /// Name of the field being resolved
    pub field_name: String,
    /// Shared execution context
    pub context: ResolverContext,
}

/// Execution context shared by all resolvers of one GraphQL request.
#[derive(Debug)]
pub struct ResolverContext {
    /// The underlying request
    pub req: RequestHandle,
}

impl GraphQlContext {
    /// Creates a resolver context for `field_name` over `req`.
    pub fn new(field_name: impl Into<String>, req: RequestHandle) -> Self {
        Self {
            field_name: field_name.into(),
            context: ResolverContext { req },
        }
    }
}

impl RequestContext for GraphQlContext {
    fn transport(&self) -> TransportKind {
        TransportKind::GraphQl
    }

    fn operation(&self) -> Option<&str> {
        Some(&self.field_name)
    }

    fn request(&self) -> &RequestHandle {
        &self.context.req
    }

    fn request_mut(&mut self) -> &mut RequestHandle {
        &mut self.context.req
    }
}

/// Any supported invocation context, tagged by transport.
#[derive(Debug)]
pub enum InvocationContext {
    /// Plain HTTP
    Http(HttpContext),
    /// GraphQL resolver
    GraphQl(GraphQlContext),
}

impl RequestContext for InvocationContext {
    fn transport(&self) -> TransportKind {
        match self {
            InvocationContext::Http(ctx) => ctx.transport(),
            InvocationContext::GraphQl(ctx) => ctx.transport(),
        }
    }

    fn operation(&self) -> Option<&str> {
        match self {
            InvocationContext::Http(ctx) => ctx.operation(),
            InvocationContext::GraphQl(ctx) => ctx.operation(),
        }
    }

    fn request(&self) -> &RequestHandle {
        match self {
            InvocationContext::Http(ctx) => ctx.request(),
            InvocationContext::GraphQl(ctx) => ctx.request(),
        }
    }

    fn request_mut(&mut self) -> &mut RequestHandle {
        match self {
            InvocationContext::Http(ctx) => ctx.request_mut(),
            InvocationContext::GraphQl(ctx) => ctx.request_mut(),
        }
    }
}

impl From<HttpContext> for InvocationContext {
    fn from(ctx: HttpContext) -> Self {
        InvocationContext::Http(ctx)
    }
}

impl From<GraphQlContext> for InvocationContext {
    fn from(ctx: GraphQlContext) -> Self {
        InvocationContext::GraphQl(ctx)
    }
}

/// Extracts the transport-agnostic request handle from `ctx`.
pub fn extract_request<C: RequestContext + ?Sized>(ctx: &mut C) -> &mut RequestHandle {
    ctx.request_mut()
}
