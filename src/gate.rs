use crate::{
    error::Violation,
    policy::{Access, RoutePolicy},
    session::Session,
};

/// Why a request was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// The route is public
    Public,
    /// The route is optional and no session was presented
    Anonymous,
    /// A session was present and the route has no role restriction
    Authenticated,
    /// A session was present and holds one of the required roles
    RoleGranted,
}

/// Outcome of evaluating a route policy against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request through
    Allow(AllowReason),
    /// Reject the request
    Deny(Violation),
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    /// Converts the decision into a `Result`, surfacing the violation on deny.
    pub fn into_result(self) -> Result<AllowReason, Violation> {
        match self {
            Decision::Allow(reason) => Ok(reason),
            Decision::Deny(violation) => Err(violation),
        }
    }
}

/// The access-decision engine.
///
/// `AccessGate` is a pure function of `(session, policy)`: it holds no state,
/// performs no I/O and always returns the same decision for the same inputs.
///
/// Rules are evaluated in a fixed order and the first match wins:
///
/// 1. `Public` routes allow unconditionally, role requirements included.
/// 2. `Optional` routes allow when no session is present.
/// 3. Any remaining route without a session is denied as unauthorized.
/// 4. Routes without a role requirement allow.
/// 5. Otherwise the user's role claim must intersect the required roles,
///    or the request is denied as forbidden.
///
/// # Examples
///
/// ```
/// use session_gate::{AccessGate, Decision, RoutePolicy, Session, User, ViolationKind};
///
/// let session = Session::new(User::new("u1").with_role("user".into()));
///
/// let decision = AccessGate::evaluate(Some(&session), &RoutePolicy::required().with_roles(["admin"]));
/// match decision {
///     Decision::Deny(v) => assert_eq!(v.kind, ViolationKind::Forbidden),
///     Decision::Allow(_) => unreachable!(),
/// }
///
/// assert!(AccessGate::evaluate(None, &RoutePolicy::public()).is_allowed());
/// ```
pub struct AccessGate;

impl AccessGate {
    /// Evaluates `policy` against the resolved `session`.
    pub fn evaluate(session: Option<&Session>, policy: &RoutePolicy) -> Decision {
        match Self::check(session, policy) {
            Ok(reason) => Decision::Allow(reason),
            Err(violation) => Decision::Deny(violation),
        }
    }

    fn check(session: Option<&Session>, policy: &RoutePolicy) -> Result<AllowReason, Violation> {
        if policy.access() == Access::Public {
            return Ok(AllowReason::Public);
        }

        let session = match (session, policy.access()) {
            (Some(session), _) => session,
            (None, Access::Optional) => return Ok(AllowReason::Anonymous),
            (None, _) => return Err(Violation::unauthorized()),
        };

        let Some(required) = policy.roles() else {
            return Ok(AllowReason::Authenticated);
        };

        let has_role = session
            .user
            .role
            .as_ref()
            .is_some_and(|role| role.satisfies(required));

        if has_role {
            Ok(AllowReason::RoleGranted)
        } else {
            Err(Violation::forbidden())
        }
    }
}
