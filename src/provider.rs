//! The external authentication provider, as seen by the gate.
//!
//! The provider issues and validates sessions and owns its hook slots. The
//! gate consumes it only through [`AuthProvider`].

use async_trait::async_trait;
use http::HeaderMap;

use crate::config::TrustedOrigins;
use crate::error::ProviderError;
use crate::hooks::ProviderHooks;
use crate::session::Session;

/// Configuration the provider exposes to the gate.
///
/// `base_path` and `trusted_origins` are read-only inputs to the mount and
/// CORS wiring. `hooks` is the provider's lifecycle hook object; `None`
/// until something registers a hook.
#[derive(Debug, Default)]
pub struct ProviderOptions {
    /// Path prefix the provider's operations are served under
    pub base_path: Option<String>,
    /// Origins allowed to call the provider cross-site
    pub trusted_origins: Option<TrustedOrigins>,
    /// Lifecycle hook slots
    pub hooks: Option<ProviderHooks>,
}

/// Session-issuing authentication provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves the session carried by `headers`.
    ///
    /// `Ok(None)` means the headers carry no valid session.
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, ProviderError>;

    /// Provider configuration.
    fn options(&self) -> &ProviderOptions;

    /// Mutable provider configuration, used once at startup to install hooks.
    fn options_mut(&mut self) -> &mut ProviderOptions;
}
