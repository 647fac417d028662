//! Handler registration and hook discovery.

use std::sync::Arc;

use crate::hooks::hook::{Hook, HookTarget, InvalidOperationPath, OperationPath, Timing};

/// A hook ready to be composed into a provider slot.
#[derive(Clone)]
pub struct HookRegistration {
    /// Slot the hook is composed into
    pub timing: Timing,
    /// Operations the hook applies to
    pub target: HookTarget,
    /// The hook itself
    pub hook: Arc<dyn Hook>,
    /// `handler#method` label used in logs
    pub source: String,
}

impl std::fmt::Debug for HookRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistration")
            .field("timing", &self.timing)
            .field("target", &self.target)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

struct HookMethod {
    marker: Option<(Timing, HookTarget)>,
    hook: Arc<dyn Hook>,
}

/// A registered handler instance and its methods.
///
/// Only handlers built with [`HookHandler::container`] are scanned for
/// hooks; [`HookHandler::plain`] handlers are services that happen to live
/// next to them and are skipped. Methods added with
/// [`unmarked`](HookHandler::unmarked) carry no timing and are skipped too.
///
/// # Examples
///
/// ```
/// use session_gate::hooks::{ApiErrorHook, HookHandler, HookRegistry};
///
/// let handler = HookHandler::container("AuditHooks")
///     .after("/sign-up/email", ApiErrorHook)
///     .unwrap()
///     .after_all(ApiErrorHook);
///
/// let mut registry = HookRegistry::new();
/// registry.register(handler);
/// registry.register(HookHandler::plain("Mailer"));
///
/// assert_eq!(registry.discover().count(), 2);
/// ```
pub struct HookHandler {
    name: String,
    container: bool,
    methods: Vec<HookMethod>,
}

impl HookHandler {
    /// A handler whose marked methods become hooks.
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container: true,
            methods: Vec::new(),
        }
    }

    /// A handler that is never scanned for hooks.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container: false,
            methods: Vec::new(),
        }
    }

    /// Adds a hook run before the operation at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperationPath` unless `path` starts with `/`.
    pub fn before<H: Hook + 'static>(self, path: &str, hook: H) -> Result<Self, InvalidOperationPath> {
        let target = HookTarget::Path(OperationPath::new(path)?);
        Ok(self.marked(Timing::Before, target, hook))
    }

    /// Adds a hook run after the operation at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperationPath` unless `path` starts with `/`.
    pub fn after<H: Hook + 'static>(self, path: &str, hook: H) -> Result<Self, InvalidOperationPath> {
        let target = HookTarget::Path(OperationPath::new(path)?);
        Ok(self.marked(Timing::After, target, hook))
    }

    /// Adds a hook run before every operation.
    pub fn before_all<H: Hook + 'static>(self, hook: H) -> Self {
        self.marked(Timing::Before, HookTarget::All, hook)
    }

    /// Adds a hook run after every operation.
    pub fn after_all<H: Hook + 'static>(self, hook: H) -> Self {
        self.marked(Timing::After, HookTarget::All, hook)
    }

    /// Adds a method without a timing marker.
    pub fn unmarked<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.methods.push(HookMethod {
            marker: None,
            hook: Arc::new(hook),
        });
        self
    }

    /// Adds a method with an explicit timing and target.
    pub fn marked<H: Hook + 'static>(mut self, timing: Timing, target: HookTarget, hook: H) -> Self {
        self.methods.push(HookMethod {
            marker: Some((timing, target)),
            hook: Arc::new(hook),
        });
        self
    }

    /// The handler's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the handler is scanned for hooks.
    pub fn is_container(&self) -> bool {
        self.container
    }
}

/// Registered handler instances, in registration order.
#[derive(Default)]
pub struct HookRegistry {
    handlers: Vec<HookHandler>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler instance.
    pub fn register(&mut self, handler: HookHandler) {
        self.handlers.push(handler);
    }

    /// Number of registered handlers, containers or not.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Lazily yields every marked method of every container handler.
    ///
    /// Order follows handler registration, then method order within a
    /// handler. Each call starts a fresh scan.
    pub fn discover(&self) -> impl Iterator<Item = HookRegistration> + '_ {
        self.handlers
            .iter()
            .filter(|handler| handler.is_container())
            .flat_map(|handler| {
                handler
                    .methods
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, method)| {
                        let (timing, target) = method.marker.as_ref()?;
                        Some(HookRegistration {
                            timing: *timing,
                            target: target.clone(),
                            hook: Arc::clone(&method.hook),
                            source: format!("{}#{}", handler.name(), index),
                        })
                    })
            })
    }
}

impl FromIterator<HookHandler> for HookRegistry {
    fn from_iter<I: IntoIterator<Item = HookHandler>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}
