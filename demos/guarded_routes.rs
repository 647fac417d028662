//! Guarded routes demonstration.
//!
//! This example wires a toy provider into an `AuthModule` and pushes a few
//! requests through the guard:
//! 1. Declare a route scope with a role requirement
//! 2. Resolve the caller's session from the `authorization` header
//! 3. Allow, or turn the violation into a status code and JSON body
//!
//! Run with: `cargo run --example guarded_routes`

use async_trait::async_trait;
use http::HeaderMap;
use session_gate::hooks::HookRegistry;
use session_gate::web::{HttpContext, RequestContext};
use session_gate::{
    AuthModule, AuthModuleOptions, AuthProvider, Error, PolicyLayer, ProviderError,
    ProviderOptions, RawHeaders, RequestHandle, Role, RouteScope, Session, User,
};

/// Treats `Bearer <id>:<role>` as a valid session.
struct TokenProvider {
    options: ProviderOptions,
}

#[async_trait]
impl AuthProvider for TokenProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, ProviderError> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        Ok(token.and_then(|t| t.split_once(':')).map(|(id, role)| {
            Session::new(User::new(id).with_role(Role::from(role)))
        }))
    }

    fn options(&self) -> &ProviderOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ProviderOptions {
        &mut self.options
    }
}

fn request(auth: Option<&str>) -> HttpContext {
    let headers: RawHeaders = auth
        .map(|a| ("authorization", a.to_string()))
        .into_iter()
        .collect();
    HttpContext::new(RequestHandle::http(headers))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("session_gate=debug")
        .init();

    let provider = TokenProvider {
        options: ProviderOptions {
            base_path: Some("/auth/".to_string()),
            ..Default::default()
        },
    };
    let module = AuthModule::init(provider, AuthModuleOptions::default(), &HookRegistry::new())?;
    println!("provider mounted on {}", module.mount_pattern());

    let scope = RouteScope::new(PolicyLayer::new().roles(["admin"]))
        .route("GET /admin/stats", PolicyLayer::new())
        .route("GET /admin/health", PolicyLayer::new().public());

    let calls = [
        ("GET /admin/health", None),
        ("GET /admin/stats", None),
        ("GET /admin/stats", Some("Bearer u1:user")),
        ("GET /admin/stats", Some("Bearer u2:admin")),
    ];

    let guard = module.guard();
    for (route, auth) in calls {
        let Some(policy) = scope.policy(route) else {
            continue;
        };
        let mut ctx = request(auth);
        match guard.can_activate(&mut ctx, policy).await {
            Ok(reason) => {
                let who = ctx.request().user().map_or("anonymous", |u| u.id.as_str());
                println!("{route} as {who}: 200 ({reason:?})");
            }
            Err(Error::Violation(v)) => {
                println!("{route}: {} {}", v.status(), serde_json::to_string(&v.body())?);
            }
            Err(other) => return Err(other.into()),
        }
    }

    Ok(())
}
