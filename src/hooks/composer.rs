//! Composition of registered hooks into provider hook slots.
//!
//! Each timing keeps an ordered list of registrations. Composition folds the
//! list into one right-nested callable: entry `n` wraps the chain built from
//! entries `0..n` (plus whatever hook the provider already had), awaits it,
//! and then runs its own hook when the operation path matches.

use std::sync::Arc;

use async_trait::async_trait;

use crate::hooks::hook::{Hook, HookContext, HookError, HookTarget, Timing};
use crate::hooks::registry::HookRegistration;
use crate::hooks::slots::ProviderHooks;

/// One link of a composed chain.
struct ComposedHook {
    previous: Option<Arc<dyn Hook>>,
    target: HookTarget,
    handler: Arc<dyn Hook>,
    source: String,
}

#[async_trait]
impl Hook for ComposedHook {
    async fn call(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        // Earlier links run for every operation, matching or not.
        if let Some(previous) = &self.previous {
            previous.call(ctx).await?;
        }

        if self.target.matches(ctx.path()) {
            tracing::debug!(hook = %self.source, path = ctx.path(), "running hook");
            self.handler.call(ctx).await?;
        }

        Ok(())
    }
}

/// Ordered hook registrations per timing.
///
/// Registrations are composed once, at startup, before any request is
/// served. The resulting slots are never mutated while requests run.
#[derive(Debug, Default)]
pub struct HookComposer {
    before: Vec<HookRegistration>,
    after: Vec<HookRegistration>,
}

impl HookComposer {
    /// Create an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a registration to its timing's list.
    pub fn push(&mut self, registration: HookRegistration) {
        match registration.timing {
            Timing::Before => self.before.push(registration),
            Timing::After => self.after.push(registration),
        }
    }

    /// Registrations for `timing`, in composition order.
    pub fn entries(&self, timing: Timing) -> &[HookRegistration] {
        match timing {
            Timing::Before => &self.before,
            Timing::After => &self.after,
        }
    }

    /// Builds the composed hook for `timing` on top of `base`.
    ///
    /// `base` always runs first. Returns `base` unchanged when nothing is
    /// registered for `timing`.
    pub fn compose(&self, timing: Timing, base: Option<Arc<dyn Hook>>) -> Option<Arc<dyn Hook>> {
        self.entries(timing)
            .iter()
            .fold(base, |previous, entry| {
                Some(Arc::new(ComposedHook {
                    previous,
                    target: entry.target.clone(),
                    handler: Arc::clone(&entry.hook),
                    source: entry.source.clone(),
                }) as Arc<dyn Hook>)
            })
    }

    /// Installs the composed chains into the provider's hook object.
    ///
    /// A missing hook object is created empty; an existing one is extended,
    /// never replaced, so hooks the provider was configured with keep
    /// running first.
    pub fn install(&self, slots: &mut Option<ProviderHooks>) {
        let hooks = slots.get_or_insert_with(ProviderHooks::default);
        hooks.before = self.compose(Timing::Before, hooks.before.take());
        hooks.after = self.compose(Timing::After, hooks.after.take());
        tracing::debug!(
            before = self.before.len(),
            after = self.after.len(),
            "installed provider hooks"
        );
    }
}

impl Extend<HookRegistration> for HookComposer {
    fn extend<I: IntoIterator<Item = HookRegistration>>(&mut self, iter: I) {
        for registration in iter {
            self.push(registration);
        }
    }
}

impl FromIterator<HookRegistration> for HookComposer {
    fn from_iter<I: IntoIterator<Item = HookRegistration>>(iter: I) -> Self {
        let mut composer = Self::new();
        composer.extend(iter);
        composer
    }
}
