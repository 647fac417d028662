use std::fmt;

use http::StatusCode;
use serde::Serialize;

use crate::config::ConfigError;
use crate::hooks::HookError;

/// Errors that can occur while gating a request or running provider hooks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The route policy denied the request
    #[error("Policy violation: {0}")]
    Violation(#[from] Violation),
    /// The authentication provider failed; surfaced unchanged
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// A composed lifecycle hook failed
    #[error(transparent)]
    Hook(#[from] HookError),
    /// Module configuration was rejected at startup
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns the violation if this error is a policy denial.
    pub fn as_violation(&self) -> Option<&Violation> {
        match self {
            Error::Violation(v) => Some(v),
            _ => None,
        }
    }
}

/// Opaque failure reported by the external authentication provider.
///
/// The gate never inspects or retries these; they are handed back to the
/// caller exactly as the provider produced them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    /// Creates a provider error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the provider's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A denied access decision.
///
/// The `(status, code, message)` triple is the contract callers translate
/// into a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Violation {
    /// The kind of denial
    pub kind: ViolationKind,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No session was present on a route that requires one.
    pub fn unauthorized() -> Self {
        Self::new(ViolationKind::Unauthorized, "Unauthorized")
    }

    /// A session was present but carries none of the required roles.
    pub fn forbidden() -> Self {
        Self::new(ViolationKind::Forbidden, "Insufficient permissions")
    }

    /// HTTP status equivalent of this denial.
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Machine-readable code (`UNAUTHORIZED` or `FORBIDDEN`).
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Response body for this denial.
    pub fn body(&self) -> ViolationBody<'_> {
        ViolationBody {
            code: self.code(),
            message: &self.message,
        }
    }
}

/// Serializable `{ code, message }` body of a denial.
#[derive(Debug, Serialize)]
pub struct ViolationBody<'a> {
    /// Machine-readable code
    pub code: &'static str,
    /// Human-readable message
    pub message: &'a str,
}

/// The kind of access denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// No session where one is required (401)
    Unauthorized,
    /// Session present but role requirements not met (403)
    Forbidden,
}

impl ViolationKind {
    /// HTTP status equivalent.
    pub fn status(self) -> StatusCode {
        match self {
            ViolationKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ViolationKind::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ViolationKind::Unauthorized => "UNAUTHORIZED",
            ViolationKind::Forbidden => "FORBIDDEN",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthorized => write!(f, "Unauthorized"),
            ViolationKind::Forbidden => write!(f, "Forbidden"),
        }
    }
}
