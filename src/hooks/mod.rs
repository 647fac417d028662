//! Provider lifecycle hooks.
//!
//! Handlers register hooks that run before or after a named provider
//! operation (e.g. `/sign-up/email`). Registration is explicit:
//!
//! - [`HookHandler`] describes one handler instance and its marked methods
//! - [`HookRegistry`] discovers the marked methods of every container handler
//! - [`HookComposer`] folds them into one callable per timing and installs it
//!   into the provider's [`ProviderHooks`]
//!
//! Every link of a composed chain awaits the links registered before it,
//! whatever the operation path, then runs its own hook if the path matches.
//! Links never run concurrently, and errors propagate unchanged.

pub mod api_error;
mod composer;
mod hook;
mod registry;
mod slots;

pub use api_error::{ApiError, ApiErrorHook, ErrorResponse};
pub use composer::HookComposer;
pub use hook::{
    Hook, HookContext, HookError, HookTarget, InvalidOperationPath, OperationPath, Returned, Timing,
};
pub use registry::{HookHandler, HookRegistration, HookRegistry};
pub use slots::ProviderHooks;
