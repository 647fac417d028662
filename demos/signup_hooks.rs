//! Lifecycle hook demonstration.
//!
//! This example registers hook handlers, lets `AuthModule` compose them onto
//! the provider, and runs a sign-up operation through the chains:
//! 1. A provider-native before-hook that was configured up front
//! 2. A discovered before-hook scoped to `/sign-up/email`
//! 3. A discovered after-hook that reads the operation's result
//!
//! Run with: `cargo run --example signup_hooks`

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use serde_json::json;
use session_gate::hooks::{
    ApiError, Hook, HookContext, HookError, HookHandler, HookRegistry, ProviderHooks, Returned,
    Timing,
};
use session_gate::{
    AuthModule, AuthModuleOptions, AuthProvider, ProviderError, ProviderOptions, Session,
};
use std::sync::Arc;

struct DemoProvider {
    options: ProviderOptions,
}

impl DemoProvider {
    async fn run(&self, path: &str, outcome: Returned) -> Result<(), HookError> {
        let hooks = self.options.hooks.clone().unwrap_or_default();
        let mut ctx = HookContext::new(path);
        hooks.run(Timing::Before, &mut ctx).await?;
        ctx.returned = Some(outcome);
        hooks.run(Timing::After, &mut ctx).await
    }
}

#[async_trait]
impl AuthProvider for DemoProvider {
    async fn get_session(&self, _: &HeaderMap) -> Result<Option<Session>, ProviderError> {
        Ok(None)
    }

    fn options(&self) -> &ProviderOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ProviderOptions {
        &mut self.options
    }
}

/// Prints a label whenever it runs.
struct Announce(&'static str);

#[async_trait]
impl Hook for Announce {
    async fn call(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        println!("  [{}] {}", self.0, ctx.path());
        Ok(())
    }
}

/// Prints the operation's result.
struct Welcome;

#[async_trait]
impl Hook for Welcome {
    async fn call(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        if let Some(Returned::Value(body)) = &ctx.returned {
            println!("  [welcome] new account {}", body["email"]);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("session_gate=debug")
        .init();

    let provider = DemoProvider {
        options: ProviderOptions {
            hooks: Some(ProviderHooks {
                before: Some(Arc::new(Announce("native"))),
                after: None,
            }),
            ..Default::default()
        },
    };

    let mut registry = HookRegistry::new();
    registry.register(
        HookHandler::container("SignUpHooks")
            .before("/sign-up/email", Announce("sign-up"))?
            .after("/sign-up/email", Welcome)?,
    );
    registry.register(HookHandler::container("Audit").after_all(Announce("audit")));

    let module = AuthModule::init(provider, AuthModuleOptions::default(), &registry)?;
    let provider = module.service().instance();

    println!("POST /sign-up/email");
    provider
        .run("/sign-up/email", Returned::Value(json!({ "email": "ada@example.com" })))
        .await?;

    println!("POST /sign-in/email");
    let rejected = Returned::Error(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid password"));
    if let Err(HookError::Api(err)) = provider.run("/sign-in/email", rejected).await {
        println!("  -> {}", serde_json::to_string(&err.to_response())?);
    }

    Ok(())
}
