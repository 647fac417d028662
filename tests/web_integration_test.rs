//! Guard behavior across transports and scoped route declarations.

use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderMap;
use session_gate::web::{
    extract_request, AuthGuard, GraphQlContext, HttpContext, InvocationContext, RequestContext,
    TransportKind,
};
use session_gate::{
    Access, AllowReason, Error, Handshake, PolicyLayer, ProviderError, ProviderOptions, RawHeaders,
    RequestHandle, Role, RouteScope, Session, User, ViolationKind,
};

/// Accepts `cookie: session=<user>:<role>` and fails on `cookie: session=boom`.
struct CookieProvider {
    options: ProviderOptions,
}

#[async_trait]
impl session_gate::AuthProvider for CookieProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, ProviderError> {
        let Some(cookie) = headers.get("cookie").and_then(|v| v.to_str().ok()) else {
            return Ok(None);
        };
        let Some(value) = cookie.strip_prefix("session=") else {
            return Ok(None);
        };
        if value == "boom" {
            return Err(ProviderError::new("session store unavailable"));
        }
        let (id, role) = value.split_once(':').unwrap_or((value, ""));
        let mut user = User::new(id);
        if !role.is_empty() {
            user.role = Some(Role::Multiple(role.split(',').map(str::to_owned).collect()));
        }
        Ok(Some(Session::new(user)))
    }

    fn options(&self) -> &ProviderOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ProviderOptions {
        &mut self.options
    }
}

fn guard() -> AuthGuard<CookieProvider> {
    AuthGuard::new(Arc::new(CookieProvider {
        options: ProviderOptions::default(),
    }))
}

fn cookie(value: &str) -> RawHeaders {
    [("Cookie", format!("session={value}"))].into_iter().collect()
}

fn admin_scope() -> RouteScope {
    RouteScope::new(PolicyLayer::new().roles(["admin"]))
        .route("GET /admin/stats", PolicyLayer::new())
        .route("GET /admin/health", PolicyLayer::new().public())
        .route("GET /admin/me", PolicyLayer::new().optional().roles(["admin", "support"]))
}

#[tokio::test]
async fn scoped_roles_apply_to_undecorated_routes() {
    let scope = admin_scope();
    let policy = scope.policy("GET /admin/stats").unwrap();

    let mut user = HttpContext::new(RequestHandle::http(cookie("u1:user")));
    let err = guard().can_activate(&mut user, policy).await.unwrap_err();
    assert_eq!(err.as_violation().unwrap().kind, ViolationKind::Forbidden);

    let mut admin = HttpContext::new(RequestHandle::http(cookie("u2:user,admin")));
    let reason = guard().can_activate(&mut admin, policy).await.unwrap();
    assert_eq!(reason, AllowReason::RoleGranted);
}

#[tokio::test]
async fn public_route_in_role_scope_ignores_roles() {
    let scope = admin_scope();
    let policy = scope.policy("GET /admin/health").unwrap();
    assert_eq!(policy.access(), Access::Public);

    let mut anonymous = HttpContext::new(RequestHandle::detached());
    assert_eq!(
        guard().can_activate(&mut anonymous, policy).await.unwrap(),
        AllowReason::Public
    );
}

#[tokio::test]
async fn optional_route_still_checks_roles_of_present_sessions() {
    let scope = admin_scope();
    let policy = scope.policy("GET /admin/me").unwrap();

    let mut anonymous = HttpContext::new(RequestHandle::detached());
    assert_eq!(
        guard().can_activate(&mut anonymous, policy).await.unwrap(),
        AllowReason::Anonymous
    );

    let mut user = HttpContext::new(RequestHandle::http(cookie("u1:user")));
    let err = guard().can_activate(&mut user, policy).await.unwrap_err();
    assert_eq!(err.as_violation().unwrap().kind, ViolationKind::Forbidden);

    let mut support = HttpContext::new(RequestHandle::http(cookie("u3:support")));
    assert!(guard().can_activate(&mut support, policy).await.is_ok());
}

#[tokio::test]
async fn graphql_subscription_reads_handshake_headers() {
    let scope = admin_scope();
    let req = RequestHandle::socket(Handshake {
        headers: cookie("u2:admin"),
    });
    let mut ctx: InvocationContext = GraphQlContext::new("statsUpdated", req).into();

    assert_eq!(ctx.transport(), TransportKind::GraphQl);
    guard()
        .can_activate(&mut ctx, scope.policy("GET /admin/stats").unwrap())
        .await
        .unwrap();
    assert_eq!(extract_request(&mut ctx).user().unwrap().id, "u2");
}

#[tokio::test]
async fn provider_failure_propagates_and_clears_the_session() {
    let mut ctx = HttpContext::new(RequestHandle::http(cookie("boom")));
    ctx.request_mut()
        .set_session(Some(Arc::new(Session::new(User::new("stale")))));

    let err = guard()
        .can_activate(&mut ctx, &session_gate::RoutePolicy::public())
        .await
        .unwrap_err();

    match err {
        Error::Provider(e) => assert_eq!(e.message(), "session store unavailable"),
        other => panic!("expected provider error, got {other:?}"),
    }
    assert!(ctx.request().session().is_none());
}

#[tokio::test]
async fn request_id_header_is_carried_through() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("session_gate=debug")
        .with_test_writer()
        .try_init();

    let mut headers = cookie("u1:user");
    headers.append("X-Request-Id", "req-42");
    let mut ctx = HttpContext::new(RequestHandle::http(headers));

    guard()
        .can_activate(&mut ctx, &session_gate::RoutePolicy::required())
        .await
        .unwrap();
    assert_eq!(ctx.request().request_id(), "req-42");
}

#[tokio::test]
async fn concurrent_requests_see_their_own_sessions() {
    let guard = guard();
    let policy = session_gate::RoutePolicy::required();

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let guard = guard.clone();
            let policy = policy.clone();
            tokio::spawn(async move {
                let mut ctx = HttpContext::new(RequestHandle::http(cookie(&format!("u{i}:user"))));
                guard.can_activate(&mut ctx, &policy).await.unwrap();
                ctx.into_request().user().map(|u| u.id.clone())
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap(), Some(format!("u{i}")));
    }
}
