//! End-to-end flows through an in-memory provider: hook installation at
//! startup, provider operations running the composed chains, and guarded
//! routes reading the sessions those operations created.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use serde_json::json;
use session_gate::hooks::{
    ApiError, Hook, HookContext, HookError, HookHandler, HookRegistry, ProviderHooks, Returned,
    Timing,
};
use session_gate::web::{AuthGuard, HttpContext, RequestContext};
use session_gate::{
    AuthModule, AuthModuleOptions, AuthProvider, Error, ProviderError, ProviderOptions, RawHeaders,
    RequestHandle, Role, RoutePolicy, Session, User, ViolationKind,
};

#[derive(Default)]
struct MemoryProvider {
    options: ProviderOptions,
    sessions: Mutex<HashMap<String, User>>,
}

impl MemoryProvider {
    /// Runs the sign-up operation through the installed hook chains and
    /// returns the new session token.
    async fn sign_up(&self, email: &str, role: Option<&str>) -> Result<String, HookError> {
        let hooks = self.options.hooks.clone().unwrap_or_default();
        let mut ctx = HookContext::new("/sign-up/email");
        hooks.run(Timing::Before, &mut ctx).await?;

        let token = format!("tok-{email}");
        let mut user = User::new(format!("user-{email}"));
        user.email = Some(email.to_owned());
        user.role = role.map(Role::from);
        self.sessions.lock().unwrap().insert(token.clone(), user);

        ctx.returned = Some(Returned::Value(json!({ "token": token })));
        hooks.run(Timing::After, &mut ctx).await?;
        Ok(token)
    }

    /// An operation that reports failure by returning an error value.
    async fn sign_in_rejected(&self) -> Result<(), HookError> {
        let hooks = self.options.hooks.clone().unwrap_or_default();
        let mut ctx = HookContext::new("/sign-in/email");
        hooks.run(Timing::Before, &mut ctx).await?;
        ctx.returned = Some(Returned::Error(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password",
        )));
        hooks.run(Timing::After, &mut ctx).await
    }
}

#[async_trait]
impl AuthProvider for MemoryProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, ProviderError> {
        let Some(value) = headers.get("authorization") else {
            return Ok(None);
        };
        let value = value
            .to_str()
            .map_err(|_| ProviderError::new("malformed authorization header"))?;
        let Some(token) = value.strip_prefix("Bearer ") else {
            return Ok(None);
        };
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(token).cloned().map(Session::new))
    }

    fn options(&self) -> &ProviderOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ProviderOptions {
        &mut self.options
    }
}

#[derive(Clone, Default)]
struct Counter(Arc<AtomicUsize>);

impl Counter {
    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Hook for Counter {
    async fn call(&self, _: &mut HookContext) -> Result<(), HookError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Reject;

#[async_trait]
impl Hook for Reject {
    async fn call(&self, _: &mut HookContext) -> Result<(), HookError> {
        Err(ApiError::new(StatusCode::BAD_REQUEST, "sign-ups are closed").into())
    }
}

fn bearer(token: &str) -> HttpContext {
    let headers: RawHeaders = [("authorization", format!("Bearer {token}"))]
        .into_iter()
        .collect();
    HttpContext::new(RequestHandle::http(headers))
}

fn init(provider: MemoryProvider, registry: &HookRegistry) -> AuthModule<MemoryProvider> {
    AuthModule::init(provider, AuthModuleOptions::default(), registry).unwrap()
}

#[tokio::test]
async fn sign_up_hooks_run_once_each() {
    let before = Counter::default();
    let after = Counter::default();
    let registry: HookRegistry = [HookHandler::container("SignUpHooks")
        .before("/sign-up/email", before.clone())
        .unwrap()
        .after("/sign-up/email", after.clone())
        .unwrap()]
    .into_iter()
    .collect();

    let module = init(MemoryProvider::default(), &registry);
    module.service().api().sign_up("ada@example.com", None).await.unwrap();

    assert_eq!(before.get(), 1);
    assert_eq!(after.get(), 1);
}

#[tokio::test]
async fn hooks_for_other_operations_stay_silent() {
    let before = Counter::default();
    let registry: HookRegistry = [HookHandler::container("SignInHooks")
        .before("/sign-in/email", before.clone())
        .unwrap()]
    .into_iter()
    .collect();

    let module = init(MemoryProvider::default(), &registry);
    module.service().api().sign_up("ada@example.com", None).await.unwrap();

    assert_eq!(before.get(), 0);
}

#[tokio::test]
async fn plain_handlers_contribute_no_hooks() {
    let before = Counter::default();
    let registry: HookRegistry = [HookHandler::plain("Mailer")
        .before("/sign-up/email", before.clone())
        .unwrap()]
    .into_iter()
    .collect();

    let module = init(MemoryProvider::default(), &registry);
    module.service().api().sign_up("ada@example.com", None).await.unwrap();

    assert_eq!(before.get(), 0);
}

#[tokio::test]
async fn before_hook_error_aborts_the_operation() {
    let registry: HookRegistry = [HookHandler::container("Gatekeeper")
        .before("/sign-up/email", Reject)
        .unwrap()]
    .into_iter()
    .collect();

    let module = init(MemoryProvider::default(), &registry);
    let provider = module.service().instance();

    let err = provider.sign_up("ada@example.com", None).await.unwrap_err();
    assert!(matches!(err, HookError::Api(ref e) if e.status == StatusCode::BAD_REQUEST));
    assert!(provider.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn existing_provider_hook_is_preserved() {
    let native = Counter::default();
    let discovered = Counter::default();

    let mut provider = MemoryProvider::default();
    provider.options.hooks = Some(ProviderHooks {
        before: Some(Arc::new(native.clone())),
        after: None,
    });

    let registry: HookRegistry = [HookHandler::container("Extra")
        .before_all(discovered.clone())]
    .into_iter()
    .collect();

    let module = init(provider, &registry);
    module.service().api().sign_up("ada@example.com", None).await.unwrap();

    assert_eq!(native.get(), 1);
    assert_eq!(discovered.get(), 1);
}

#[tokio::test]
async fn returned_api_errors_are_raised_after_the_operation() {
    let module = init(MemoryProvider::default(), &HookRegistry::new());

    let err = module.service().api().sign_in_rejected().await.unwrap_err();
    let api = match err {
        HookError::Api(api) => api,
        other => panic!("expected an API error, got {other:?}"),
    };

    let body = serde_json::to_value(api.to_response()).unwrap();
    assert_eq!(
        body,
        json!({ "statusCode": 401, "message": "Invalid email or password" })
    );
}

#[tokio::test]
async fn signed_up_user_passes_a_protected_route() {
    let module = init(MemoryProvider::default(), &HookRegistry::new());
    let token = module.service().api().sign_up("ada@example.com", None).await.unwrap();

    let guard = module.guard();
    let mut ctx = bearer(&token);
    guard.can_activate(&mut ctx, &RoutePolicy::required()).await.unwrap();

    let user = ctx.request().user().unwrap();
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn role_gated_route_rejects_plain_users() {
    let module = init(MemoryProvider::default(), &HookRegistry::new());
    let token = module.service().api().sign_up("ada@example.com", Some("user")).await.unwrap();

    let policy = RoutePolicy::required().with_roles(["admin"]);
    let err = module
        .guard()
        .can_activate(&mut bearer(&token), &policy)
        .await
        .unwrap_err();

    let violation = err.as_violation().unwrap();
    assert_eq!(violation.kind, ViolationKind::Forbidden);
    assert_eq!(violation.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        serde_json::to_value(violation.body()).unwrap(),
        json!({ "code": "FORBIDDEN", "message": "Insufficient permissions" })
    );
}

#[tokio::test]
async fn unknown_token_is_unauthorized_on_protected_routes() {
    let module = init(MemoryProvider::default(), &HookRegistry::new());
    let err = module
        .guard()
        .can_activate(&mut bearer("forged"), &RoutePolicy::required())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Violation(ref v) if v.kind == ViolationKind::Unauthorized));
}

#[tokio::test]
async fn guards_from_one_module_share_the_provider() {
    let module = init(MemoryProvider::default(), &HookRegistry::new());
    let token = module.service().api().sign_up("ada@example.com", Some("admin")).await.unwrap();

    let guards: Vec<AuthGuard<MemoryProvider>> = (0..3).map(|_| module.guard()).collect();
    let policy = RoutePolicy::required().with_roles(["admin"]);
    for guard in &guards {
        assert!(guard.can_activate(&mut bearer(&token), &policy).await.is_ok());
    }
}
