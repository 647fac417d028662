//! Startup wiring: hook installation, mount path and CORS derivation.

use std::sync::Arc;

use crate::config::{mount_pattern, normalize_base_path, AuthModuleOptions, CorsPolicy};
use crate::error::Error;
use crate::hooks::{ApiErrorHook, HookComposer, HookRegistration, HookRegistry, HookTarget, Timing};
use crate::provider::AuthProvider;
use crate::web::AuthGuard;

/// An initialized integration of one provider into the host.
///
/// Built once at startup. Hook slots are final once `init` returns; from
/// then on the provider is shared read-only.
pub struct AuthModule<P> {
    provider: Arc<P>,
    options: AuthModuleOptions,
    base_path: String,
    cors: Option<CorsPolicy>,
}

impl<P: AuthProvider> AuthModule<P> {
    /// Initializes the module.
    ///
    /// Discovers hooks from every container handler in `registry`, composes
    /// them on top of whatever hooks the provider already carries, and
    /// appends [`ApiErrorHook`] to the after-chain unless the exception
    /// filter is disabled.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the provider's trusted origins cannot be
    /// turned into CORS settings.
    pub fn init(mut provider: P, options: AuthModuleOptions, registry: &HookRegistry) -> Result<Self, Error> {
        let cors = options.cors_policy(provider.options().trusted_origins.as_ref())?;

        let mut composer: HookComposer = registry.discover().collect();
        if !options.disable_exception_filter {
            composer.push(HookRegistration {
                timing: Timing::After,
                target: HookTarget::All,
                hook: Arc::new(ApiErrorHook),
                source: "ApiErrorHook#0".to_owned(),
            });
        }
        composer.install(&mut provider.options_mut().hooks);

        let base_path = normalize_base_path(provider.options().base_path.as_deref());
        tracing::info!(
            mount = %mount_pattern(&base_path),
            handlers = registry.len(),
            before_hooks = composer.entries(Timing::Before).len(),
            after_hooks = composer.entries(Timing::After).len(),
            "auth module initialized"
        );

        Ok(Self {
            provider: Arc::new(provider),
            options,
            base_path,
            cors,
        })
    }

    /// A request guard backed by this module's provider.
    pub fn guard(&self) -> AuthGuard<P> {
        AuthGuard::new(Arc::clone(&self.provider))
    }

    /// Handle for application code that needs the provider directly.
    pub fn service(&self) -> AuthService<P> {
        AuthService {
            provider: Arc::clone(&self.provider),
        }
    }

    /// Normalized base path of the provider's routes.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Route pattern the provider handler is mounted on.
    pub fn mount_pattern(&self) -> String {
        mount_pattern(&self.base_path)
    }

    /// CORS settings derived from the provider's trusted origins.
    pub fn cors(&self) -> Option<&CorsPolicy> {
        self.cors.as_ref()
    }

    /// The options the module was initialized with.
    pub fn options(&self) -> &AuthModuleOptions {
        &self.options
    }

    /// Whether the host should parse the body of a request to `path`.
    ///
    /// Provider routes read the raw body themselves, so body parsing is
    /// skipped for them unless that behavior was disabled.
    pub fn should_parse_body(&self, path: &str) -> bool {
        if self.options.disable_body_parser {
            return true;
        }
        !is_under(path, &self.base_path)
    }
}

fn is_under(path: &str, base: &str) -> bool {
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Shared access to the provider instance.
pub struct AuthService<P> {
    provider: Arc<P>,
}

impl<P> AuthService<P> {
    /// The provider's API surface.
    pub fn api(&self) -> &P {
        &self.provider
    }

    /// The provider instance itself, for plugin-specific functionality.
    pub fn instance(&self) -> Arc<P> {
        Arc::clone(&self.provider)
    }
}

impl<P> Clone for AuthService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}
