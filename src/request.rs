use std::fmt;
use std::sync::Arc;

use crate::secret::Secret;
use crate::session::{Session, User};

/// Header carrying a caller-supplied request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const CREDENTIAL_HEADERS: [&str; 3] = ["authorization", "cookie", "set-cookie"];

static EMPTY_HEADERS: RawHeaders = RawHeaders(Vec::new());

/// Header pairs as a framework hands them over.
///
/// Names keep their original casing and may repeat; lookups are
/// case-insensitive.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawHeaders(Vec<(String, String)>);

impl RawHeaders {
    /// An empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header, keeping earlier values with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of header pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for RawHeaders
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

impl fmt::Debug for RawHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.iter() {
            if CREDENTIAL_HEADERS
                .iter()
                .any(|c| name.eq_ignore_ascii_case(c))
            {
                map.entry(&name, &Secret::new(value));
            } else {
                map.entry(&name, &value);
            }
        }
        map.finish()
    }
}

/// Headers presented when a socket connection was opened.
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    /// Handshake headers
    pub headers: RawHeaders,
}

/// Transport-agnostic view of one incoming request.
///
/// Carries the request's header source and the request-scoped
/// session slot. A handle lives for exactly one request and is never
/// shared across requests.
///
/// # Examples
///
/// ```
/// use session_gate::{RawHeaders, RequestHandle};
///
/// let headers: RawHeaders = [("X-Request-Id", "req-42")].into_iter().collect();
/// let handle = RequestHandle::http(headers);
///
/// assert_eq!(handle.request_id(), "req-42");
/// assert!(handle.session().is_none());
/// ```
#[derive(Debug)]
pub struct RequestHandle {
    request_id: String,
    headers: Option<RawHeaders>,
    handshake: Option<Handshake>,
    session: Option<Arc<Session>>,
}

impl RequestHandle {
    /// A request arriving over HTTP.
    pub fn http(headers: RawHeaders) -> Self {
        Self::from_parts(Some(headers), None)
    }

    /// A request arriving over a socket, identified by its handshake.
    pub fn socket(handshake: Handshake) -> Self {
        Self::from_parts(None, Some(handshake))
    }

    /// A request with no header source at all.
    pub fn detached() -> Self {
        Self::from_parts(None, None)
    }

    fn from_parts(headers: Option<RawHeaders>, handshake: Option<Handshake>) -> Self {
        let mut handle = Self {
            request_id: String::new(),
            headers,
            handshake,
            session: None,
        };
        handle.request_id = handle
            .header_source()
            .get(REQUEST_ID_HEADER)
            .map(str::to_owned)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        handle
    }

    /// Request identifier used to correlate log events.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The headers to authenticate with.
    ///
    /// HTTP headers when present, else the socket handshake headers, else
    /// an empty list.
    pub fn header_source(&self) -> &RawHeaders {
        self.headers
            .as_ref()
            .or_else(|| self.handshake.as_ref().map(|h| &h.headers))
            .unwrap_or(&EMPTY_HEADERS)
    }

    /// The session resolved for this request, if any.
    pub fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    /// The user of the resolved session, if any.
    pub fn user(&self) -> Option<&User> {
        self.session.as_deref().map(|s| &s.user)
    }

    /// Attaches the resolved session; the user slot follows it.
    pub fn set_session(&mut self, session: Option<Arc<Session>>) {
        self.session = session;
    }
}
