//! Route-level session gating and composable provider lifecycle hooks.
//!
//! This crate integrates an external authentication provider into a request
//! pipeline through two mechanisms:
//! - **Access gating**: every invocation resolves the caller's session once,
//!   attaches it to the request, and is then allowed or denied according to
//!   the route's declared policy
//! - **Hook composition**: lifecycle hooks declared on registered handlers
//!   are discovered at startup and chained onto the provider's before/after
//!   slots without displacing hooks the provider already carries
//!
//! # Core Types
//!
//! - [`AuthModule`]: Startup wiring; produces guards and the provider service
//! - [`AuthGuard`](web::AuthGuard): Per-request resolve-then-evaluate pipeline
//! - [`AccessGate`]: Pure policy decision over an optional [`Session`]
//! - [`RoutePolicy`]: Effective per-route access mode and role requirement
//! - [`HookRegistry`](hooks::HookRegistry): Handlers scanned for hook methods
//! - [`Secret<T>`]: Wrapper that redacts sensitive values in logs/output
//!
//! # Examples
//!
//! ```
//! use session_gate::{AccessGate, Decision, RoutePolicy, Session, User, Role, ViolationKind};
//!
//! let admin = Session::new(User::new("u1").with_role(Role::from("admin")));
//! let policy = RoutePolicy::required().with_roles(["admin"]);
//! assert!(AccessGate::evaluate(Some(&admin), &policy).is_allowed());
//!
//! match AccessGate::evaluate(None, &policy) {
//!     Decision::Deny(v) => assert_eq!(v.kind, ViolationKind::Unauthorized),
//!     Decision::Allow(_) => unreachable!(),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gate;
pub mod hooks;
mod logging;
mod module;
mod policy;
mod provider;
mod request;
mod resolver;
mod secret;
mod session;
pub mod web;

pub use config::{
    mount_pattern, normalize_base_path, AuthModuleOptions, ConfigError, CorsPolicy, OriginResolver,
    TrustedOrigins, DEFAULT_BASE_PATH,
};
pub use error::{Error, ProviderError, Violation, ViolationBody, ViolationKind};
pub use gate::{AccessGate, AllowReason, Decision};
pub use logging::RequestLog;
pub use module::{AuthModule, AuthService};
pub use policy::{Access, PolicyLayer, RequiredRoles, RoutePolicy, RouteScope};
pub use provider::{AuthProvider, ProviderOptions};
pub use request::{Handshake, RawHeaders, RequestHandle, REQUEST_ID_HEADER};
pub use resolver::{to_header_map, SessionResolver};
pub use secret::Secret;
pub use session::{Role, Session, SessionRecord, User};
