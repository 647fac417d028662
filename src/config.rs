//! Module configuration and mount/CORS derivation.

use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, Method};
use serde::Deserialize;

/// Path prefix used when the provider does not configure one.
pub const DEFAULT_BASE_PATH: &str = "/api/auth";

/// Configuration errors, raised once at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Trusted origins computed per request cannot drive static CORS settings
    #[error(
        "function-based trusted origins are not supported; use a static origin list or disable trusted-origins CORS"
    )]
    DynamicTrustedOrigins,

    /// The options document could not be parsed
    #[error("invalid module options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Switches controlling how the module wires itself into the host.
///
/// # Examples
///
/// ```
/// use session_gate::AuthModuleOptions;
///
/// let options = AuthModuleOptions::from_json_str(r#"{ "disableBodyParser": true }"#).unwrap();
/// assert!(options.disable_body_parser);
/// assert!(!options.disable_exception_filter);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthModuleOptions {
    /// Do not install the hook that raises provider API errors
    pub disable_exception_filter: bool,
    /// Do not derive CORS settings from the provider's trusted origins
    pub disable_trusted_origins_cors: bool,
    /// Leave request bodies to the host's body parser
    pub disable_body_parser: bool,
}

impl AuthModuleOptions {
    /// Parses options from a JSON document; missing keys default to `false`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or wrongly typed keys.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Derives the CORS policy for the provider's routes.
    ///
    /// Returns `Ok(None)` when CORS is disabled or no origins are configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DynamicTrustedOrigins` when the origins are
    /// computed per request and CORS is not disabled.
    pub fn cors_policy(
        &self,
        origins: Option<&TrustedOrigins>,
    ) -> Result<Option<CorsPolicy>, ConfigError> {
        if self.disable_trusted_origins_cors {
            return Ok(None);
        }
        match origins {
            None => Ok(None),
            Some(TrustedOrigins::List(list)) => Ok(Some(CorsPolicy {
                origins: list.clone(),
                methods: vec![Method::GET, Method::POST, Method::PUT, Method::DELETE],
                credentials: true,
            })),
            Some(TrustedOrigins::Dynamic(_)) => Err(ConfigError::DynamicTrustedOrigins),
        }
    }
}

/// Resolves per-request origins from request headers.
pub type OriginResolver = Arc<dyn Fn(&HeaderMap) -> Vec<String> + Send + Sync>;

/// Origins the provider accepts cross-site requests from.
#[derive(Clone)]
pub enum TrustedOrigins {
    /// A fixed list
    List(Vec<String>),
    /// Computed per request
    Dynamic(OriginResolver),
}

impl fmt::Debug for TrustedOrigins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustedOrigins::List(list) => f.debug_tuple("List").field(list).finish(),
            TrustedOrigins::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// CORS settings for the provider's routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    /// Allowed origins
    pub origins: Vec<String>,
    /// Allowed methods
    pub methods: Vec<Method>,
    /// Whether credentials are allowed
    pub credentials: bool,
}

/// Normalizes the provider's base path.
///
/// Falls back to [`DEFAULT_BASE_PATH`], adds a missing leading `/` and drops
/// one trailing `/`.
pub fn normalize_base_path(base_path: Option<&str>) -> String {
    let mut path = base_path.unwrap_or(DEFAULT_BASE_PATH).to_owned();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if path.ends_with('/') {
        path.pop();
    }
    path
}

/// Route pattern the provider handler is mounted on.
pub fn mount_pattern(base_path: &str) -> String {
    format!("{}/*path", base_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_defaults() {
        assert_eq!(normalize_base_path(None), "/api/auth");
    }

    #[test]
    fn base_path_gains_leading_slash() {
        assert_eq!(normalize_base_path(Some("auth")), "/auth");
    }

    #[test]
    fn base_path_loses_trailing_slash() {
        assert_eq!(normalize_base_path(Some("/v1/auth/")), "/v1/auth");
        assert_eq!(normalize_base_path(Some("v1/auth/")), "/v1/auth");
    }

    #[test]
    fn mount_pattern_appends_wildcard() {
        assert_eq!(mount_pattern("/api/auth"), "/api/auth/*path");
    }

    #[test]
    fn options_default_to_false() {
        let options = AuthModuleOptions::from_json_str("{}").unwrap();
        assert_eq!(options, AuthModuleOptions::default());
    }

    #[test]
    fn options_reject_wrong_types() {
        let err = AuthModuleOptions::from_json_str(r#"{ "disableBodyParser": "yes" }"#);
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn static_origins_enable_cors() {
        let origins = TrustedOrigins::List(vec!["https://app.example.com".into()]);
        let cors = AuthModuleOptions::default()
            .cors_policy(Some(&origins))
            .unwrap()
            .unwrap();

        assert_eq!(cors.origins, vec!["https://app.example.com"]);
        assert_eq!(cors.methods.len(), 4);
        assert!(cors.credentials);
    }

    #[test]
    fn dynamic_origins_are_rejected() {
        let origins = TrustedOrigins::Dynamic(Arc::new(|_: &HeaderMap| Vec::<String>::new()));
        let result = AuthModuleOptions::default().cors_policy(Some(&origins));
        assert!(matches!(result, Err(ConfigError::DynamicTrustedOrigins)));
    }

    #[test]
    fn disabled_cors_ignores_dynamic_origins() {
        let origins = TrustedOrigins::Dynamic(Arc::new(|_: &HeaderMap| Vec::<String>::new()));
        let options = AuthModuleOptions {
            disable_trusted_origins_cors: true,
            ..Default::default()
        };
        assert!(options.cors_policy(Some(&origins)).unwrap().is_none());
    }

    #[test]
    fn no_origins_no_cors() {
        assert!(AuthModuleOptions::default().cors_policy(None).unwrap().is_none());
    }
}
