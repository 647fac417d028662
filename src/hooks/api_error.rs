//! Provider API errors and their translation into responses.
//!
//! The provider reports operation failures by leaving an [`ApiError`] in the
//! context's returned slot rather than raising it. [`ApiErrorHook`] turns
//! that into a raised error so the host framework's error handling sees it,
//! and [`ApiError::to_response`] produces the body the host sends back.

use async_trait::async_trait;
use http::StatusCode;
use serde::Serialize;

use super::hook::{Hook, HookContext, HookError, Returned};

/// An error produced by a provider operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {}", .message.as_deref().unwrap_or("provider error"))]
pub struct ApiError {
    /// HTTP status the provider assigned
    pub status: StatusCode,
    /// Message from the provider's error body
    pub message: Option<String>,
}

impl ApiError {
    /// Creates an API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// Response body for this error.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status_code: self.status.as_u16(),
            message: self.message.clone(),
        }
    }
}

/// `{ statusCode, message }` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Numeric HTTP status
    pub status_code: u16,
    /// Provider message, if any
    pub message: Option<String>,
}

/// After-hook that raises an [`ApiError`] left in the returned slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiErrorHook;

#[async_trait]
impl Hook for ApiErrorHook {
    async fn call(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        if let Some(Returned::Error(err)) = &ctx.returned {
            tracing::debug!(path = ctx.path(), status = %err.status, "raising provider API error");
            return Err(HookError::Api(err.clone()));
        }
        Ok(())
    }
}
