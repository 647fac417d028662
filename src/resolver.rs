use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::Error;
use crate::logging::RequestLog;
use crate::provider::AuthProvider;
use crate::request::{RawHeaders, RequestHandle};
use crate::session::Session;

/// Resolves the session of a request through the provider.
///
/// Makes exactly one provider call per request and records the outcome on
/// the request handle before any policy is applied, so the session and user
/// are visible to every later consumer, public routes included.
pub struct SessionResolver<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: AuthProvider + ?Sized> SessionResolver<P> {
    /// Creates a resolver backed by `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Resolves the session for `request` and attaches it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Provider` unchanged when the provider fails; the
    /// request's session slot is cleared in that case.
    pub async fn resolve(&self, request: &mut RequestHandle) -> Result<Option<Arc<Session>>, Error> {
        let headers = to_header_map(request.header_source(), RequestLog::new(request.request_id()));

        let session = match self.provider.get_session(&headers).await {
            Ok(session) => session.map(Arc::new),
            Err(err) => {
                request.set_session(None);
                return Err(err.into());
            }
        };

        request.set_session(session.clone());
        RequestLog::new(request.request_id()).debug(format_args!(
            "session resolved: user={:?}",
            request.user().map(|u| u.id.as_str())
        ));

        Ok(session)
    }
}

impl<P: ?Sized> Clone for SessionResolver<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

/// Converts framework headers into the provider's header format.
///
/// Repeated names are appended; pairs that are not valid HTTP headers are
/// skipped.
pub fn to_header_map(raw: &RawHeaders, log: RequestLog<'_>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(raw.len());
    for (name, value) in raw.iter() {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .ok()
            .zip(HeaderValue::from_str(value).ok());
        match parsed {
            Some((name, value)) => {
                map.append(name, value);
            }
            None => log.warn(format_args!("skipping malformed header '{}'", name)),
        }
    }
    map
}
