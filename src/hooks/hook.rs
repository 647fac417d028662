//! Core hook types and traits.

use std::fmt;

use async_trait::async_trait;
use http::HeaderMap;

use crate::error::ProviderError;
use crate::hooks::api_error::ApiError;

/// When a hook runs relative to the provider operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    /// Before the operation's handler runs
    Before,
    /// After the operation's handler produced its result
    After,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Before => write!(f, "before"),
            Timing::After => write!(f, "after"),
        }
    }
}

/// Identifier of a provider operation, e.g. `/sign-up/email`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationPath(String);

impl OperationPath {
    /// Validates an operation path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperationPath` unless `path` starts with `/`.
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidOperationPath> {
        let path = path.into();
        if path.starts_with('/') {
            Ok(Self(path))
        } else {
            Err(InvalidOperationPath(path))
        }
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An operation path that does not start with `/`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operation path must start with '/': {0:?}")]
pub struct InvalidOperationPath(pub String);

/// Which operations a hook applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookTarget {
    /// Exactly one operation
    Path(OperationPath),
    /// Every operation
    All,
}

impl HookTarget {
    /// Returns true if the hook should run for `path`.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            HookTarget::Path(target) => target.as_str() == path,
            HookTarget::All => true,
        }
    }
}

impl fmt::Display for HookTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookTarget::Path(path) => path.fmt(f),
            HookTarget::All => f.write_str("*"),
        }
    }
}

/// What the provider operation produced, visible to after-hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    /// A successful response body
    Value(serde_json::Value),
    /// An error the provider chose to return instead of raising
    Error(ApiError),
}

/// Per-operation execution context.
///
/// One context is created per provider operation and passed by mutable
/// reference through every hook of a chain, so later hooks observe what
/// earlier ones changed.
#[derive(Debug)]
pub struct HookContext {
    path: String,
    /// Headers of the request that triggered the operation
    pub headers: HeaderMap,
    /// The operation's result; `None` in before-hooks
    pub returned: Option<Returned>,
}

impl HookContext {
    /// Creates a context for the operation at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: HeaderMap::new(),
            returned: None,
        }
    }

    /// Attaches request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// The operation being executed.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Hook execution errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HookError {
    /// A provider API error raised from within the chain
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A provider call made by the hook failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The hook failed for its own reasons
    #[error("Hook '{hook}' failed: {reason}")]
    Failed {
        /// Name of the failing hook
        hook: String,
        /// What went wrong
        reason: String,
    },
}

/// A handler invoked before or after a provider operation.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Runs the hook.
    ///
    /// Errors propagate to the provider's operation pipeline unchanged.
    async fn call(&self, ctx: &mut HookContext) -> Result<(), HookError>;
}
