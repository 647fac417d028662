use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

/// How a route treats the presence of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// No session required; role requirements are ignored as well
    Public,
    /// A missing session is allowed; a present one must still meet role requirements
    Optional,
    /// A session is required
    #[default]
    Required,
}

/// A non-empty set of roles, any one of which grants access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRoles(BTreeSet<String>);

impl RequiredRoles {
    /// Builds a role requirement.
    ///
    /// Returns `None` for an empty input, which means "no role restriction".
    pub fn new<I, S>(roles: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    /// Returns true if `role` is one of the required roles.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// Iterates the required roles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// The effective access policy of a route.
///
/// Immutable once the route is registered.
///
/// # Examples
///
/// ```
/// use session_gate::{Access, RoutePolicy};
///
/// let policy = RoutePolicy::required().with_roles(["admin"]);
/// assert_eq!(policy.access(), Access::Required);
/// assert!(policy.roles().is_some());
///
/// // An empty role list leaves the route unrestricted
/// assert!(RoutePolicy::required().with_roles(Vec::<String>::new()).roles().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutePolicy {
    access: Access,
    roles: Option<RequiredRoles>,
}

impl RoutePolicy {
    /// A route open to everyone.
    pub fn public() -> Self {
        Self {
            access: Access::Public,
            roles: None,
        }
    }

    /// A route where the session is optional.
    pub fn optional() -> Self {
        Self {
            access: Access::Optional,
            roles: None,
        }
    }

    /// A route that requires a session.
    pub fn required() -> Self {
        Self::default()
    }

    /// Restricts the route to the given roles.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = RequiredRoles::new(roles);
        self
    }

    /// Resolves the effective policy of a route declared inside a scope.
    ///
    /// Each field is taken from the route when set there, else from the
    /// scope, else the default (`Required`, no roles). A role list declared
    /// empty counts as set: it lifts any role restriction of the scope.
    pub fn resolve(route: &PolicyLayer, scope: &PolicyLayer) -> Self {
        Self {
            access: route.access.or(scope.access).unwrap_or_default(),
            roles: route.roles.clone().or_else(|| scope.roles.clone()).flatten(),
        }
    }

    /// The access mode.
    pub fn access(&self) -> Access {
        self.access
    }

    /// The role requirement, if any.
    pub fn roles(&self) -> Option<&RequiredRoles> {
        self.roles.as_ref()
    }
}

/// Policy metadata declared at one level (a route or its enclosing scope).
///
/// Unset fields inherit from the enclosing level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyLayer {
    access: Option<Access>,
    // None inherits; Some(None) is an explicit "no role restriction".
    roles: Option<Option<RequiredRoles>>,
}

impl PolicyLayer {
    /// An empty layer that inherits everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the level as public.
    pub fn public(mut self) -> Self {
        self.access = Some(Access::Public);
        self
    }

    /// Marks the level as optionally authenticated.
    pub fn optional(mut self) -> Self {
        self.access = Some(Access::Optional);
        self
    }

    /// Marks the level as requiring a session.
    pub fn required(mut self) -> Self {
        self.access = Some(Access::Required);
        self
    }

    /// Declares required roles at this level.
    ///
    /// An empty list is still a declaration: it overrides the enclosing
    /// level with "no role restriction".
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(RequiredRoles::new(roles));
        self
    }
}

/// A group of routes sharing scope-level policy metadata.
///
/// Each route's policy is resolved against the scope once, when the route
/// is registered.
///
/// # Examples
///
/// ```
/// use session_gate::{Access, PolicyLayer, RouteScope};
///
/// let scope = RouteScope::new(PolicyLayer::new().roles(["admin"]))
///     .route("GET /admin/stats", PolicyLayer::new())
///     .route("GET /admin/health", PolicyLayer::new().public());
///
/// assert!(scope.policy("GET /admin/stats").unwrap().roles().is_some());
/// assert_eq!(scope.policy("GET /admin/health").unwrap().access(), Access::Public);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteScope {
    layer: PolicyLayer,
    routes: HashMap<String, RoutePolicy>,
}

impl RouteScope {
    /// Creates a scope with the given metadata.
    pub fn new(layer: PolicyLayer) -> Self {
        Self {
            layer,
            routes: HashMap::new(),
        }
    }

    /// Registers a route, resolving its policy against the scope.
    ///
    /// A policy is fixed once registered: a second registration of the same
    /// route is ignored with a warning.
    pub fn route(mut self, route: impl Into<String>, layer: PolicyLayer) -> Self {
        match self.routes.entry(route.into()) {
            Entry::Occupied(existing) => {
                tracing::warn!(route = %existing.key(), "route already registered; keeping first policy");
            }
            Entry::Vacant(slot) => {
                slot.insert(RoutePolicy::resolve(&layer, &self.layer));
            }
        }
        self
    }

    /// The resolved policy of a registered route.
    pub fn policy(&self, route: &str) -> Option<&RoutePolicy> {
        self.routes.get(route)
    }
}
