//! Session records returned by the authentication provider.
//!
//! The provider owns issuance and validation; the gate only reads the
//! `user` sub-record and its role claim.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::policy::RequiredRoles;
use crate::secret::Secret;

/// A resolved session.
///
/// Absence of a session is always `None` at the call site, never an empty
/// record.
#[derive(Debug, Deserialize)]
pub struct Session {
    /// Provider-side session record
    pub session: SessionRecord,
    /// The authenticated user
    pub user: User,
}

impl Session {
    /// Builds a session for `user` with a fresh record id.
    pub fn new(user: User) -> Self {
        Self {
            session: SessionRecord {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user.id.clone(),
                token: None,
                expires_at: None,
            },
            user,
        }
    }
}

/// Provider-side bookkeeping for a session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Session identifier
    pub id: String,
    /// Identifier of the owning user
    pub user_id: String,
    /// Bearer token, redacted in all formatted output
    #[serde(default)]
    pub token: Option<Secret<String>>,
    /// Expiry as reported by the provider
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// The user attached to a session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    /// User identifier
    pub id: String,
    /// Email address, if the provider exposes it
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Role claim, normalized at deserialization time
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Option<Role>,
    /// Any other fields the provider attached (plugins add their own)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Creates a user with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            name: None,
            role: None,
            extra: Map::new(),
        }
    }

    /// Sets the role claim.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// A user's role claim.
///
/// Providers report either a single role string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// One role
    Single(String),
    /// An ordered collection of roles
    Multiple(Vec<String>),
}

impl Role {
    /// Normalizes a raw JSON role claim.
    ///
    /// Strings become [`Role::Single`], arrays keep their string elements as
    /// [`Role::Multiple`]. Every other shape yields `None`, which never
    /// satisfies a role requirement.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Role::Single(s.clone())),
            Value::Array(items) => Some(Role::Multiple(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Returns true if any held role is in `required`.
    pub fn satisfies(&self, required: &RequiredRoles) -> bool {
        match self {
            Role::Single(role) => required.contains(role),
            Role::Multiple(roles) => roles.iter().any(|r| required.contains(r)),
        }
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Role::Single(role.to_owned())
    }
}

impl<const N: usize> From<[&str; N]> for Role {
    fn from(roles: [&str; N]) -> Self {
        Role::Multiple(roles.iter().map(|r| (*r).to_owned()).collect())
    }
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(Role::from_value(&raw))
}
