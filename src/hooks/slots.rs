use std::fmt;
use std::sync::Arc;

use crate::hooks::hook::{Hook, HookContext, HookError, Timing};

/// The provider's lifecycle hook object: one callable per timing.
///
/// Owned by the provider. Filled in by [`HookComposer::install`] at startup
/// and only read afterwards.
///
/// [`HookComposer::install`]: crate::hooks::HookComposer::install
#[derive(Clone, Default)]
pub struct ProviderHooks {
    /// Hook run before each operation
    pub before: Option<Arc<dyn Hook>>,
    /// Hook run after each operation
    pub after: Option<Arc<dyn Hook>>,
}

impl ProviderHooks {
    /// The hook installed for `timing`, if any.
    pub fn slot(&self, timing: Timing) -> Option<&Arc<dyn Hook>> {
        match timing {
            Timing::Before => self.before.as_ref(),
            Timing::After => self.after.as_ref(),
        }
    }

    /// Runs the hook installed for `timing`; a no-op when the slot is empty.
    pub async fn run(&self, timing: Timing, ctx: &mut HookContext) -> Result<(), HookError> {
        match self.slot(timing) {
            Some(hook) => hook.call(ctx).await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ProviderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}
