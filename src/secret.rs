use std::fmt;

use serde::{Deserialize, Deserializer};

/// A wrapper that keeps credential material out of logs.
///
/// Session tokens and credential headers pass through the gate on every
/// request. `Secret<T>` makes sure `Debug` and `Display` never print them;
/// the value is reachable only through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use session_gate::Secret;
///
/// let token = Secret::new("st_abc123".to_string());
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "st_abc123");
/// ```
// Do NOT derive Clone, Copy, or Default: the value must not be duplicated carelessly.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Secret::new)
    }
}
