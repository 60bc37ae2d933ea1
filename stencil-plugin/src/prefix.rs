//! Prefixed filter namespaces
//!
//! A plugin's filters are exposed to templates as `<prefix>_<name>` so that
//! several plugins can share one environment. The namespace never exposes
//! the original names. Each call is routed back to the original module
//! through a [`FilterHook`].

use crate::context::ContextId;
use crate::{FilterCall, FilterHook, FilterMeta, FilterModule, Plugin, RenderContext, TracingHook};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stencil_core::{Result, StencilError, Value};
use tracing::debug;

/// Check that a prefix can be glued in front of a template identifier
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let mut chars = prefix.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StencilError::invalid_prefix(prefix))
    }
}

pub(crate) fn prefixed_name(prefix: &str, name: &str) -> String {
    format!("{}_{}", prefix, name)
}

/// Per-prefix object standing between templates and a plugin's modules
///
/// Remembers the render context that last called through it.
pub struct Passthrough {
    prefix: String,
    modules: Vec<Arc<dyn FilterModule>>,
    context: AtomicU64,
}

impl Passthrough {
    fn new(prefix: &str, modules: Vec<Arc<dyn FilterModule>>) -> Self {
        Self {
            prefix: prefix.to_string(),
            modules,
            context: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Underlying filter modules, in plugin order
    pub fn modules(&self) -> &[Arc<dyn FilterModule>] {
        &self.modules
    }

    /// Underlying module by name
    pub fn module(&self, name: &str) -> Option<&Arc<dyn FilterModule>> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// The render context of the most recent call
    pub fn context_id(&self) -> Option<ContextId> {
        match self.context.load(Ordering::Acquire) {
            0 => None,
            id => Some(ContextId(id)),
        }
    }

    fn bind(&self, ctx: &RenderContext) {
        self.context.store(ctx.id().0, Ordering::Release);
    }
}

impl std::fmt::Debug for Passthrough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let modules: Vec<&str> = self.modules.iter().map(|m| m.name()).collect();
        f.debug_struct("Passthrough")
            .field("prefix", &self.prefix)
            .field("modules", &modules)
            .field("context", &self.context_id())
            .finish()
    }
}

struct Route {
    module: usize,
    original: String,
}

/// Generated namespace exposing a plugin's filters under a prefix
pub struct PrefixedFilterModule {
    name: String,
    passthrough: Passthrough,
    routes: BTreeMap<String, Route>,
    metas: Vec<FilterMeta>,
    hook: Arc<dyn FilterHook>,
}

impl PrefixedFilterModule {
    pub fn with_hook(mut self, hook: Arc<dyn FilterHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn prefix(&self) -> &str {
        self.passthrough.prefix()
    }

    /// Whether `name` is one of the exposed (prefixed) names
    pub fn has_filter(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    /// Original name behind an exposed name
    pub fn original_name(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(|r| r.original.as_str())
    }
}

impl FilterModule for PrefixedFilterModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn filters(&self) -> Vec<FilterMeta> {
        self.metas.clone()
    }

    fn call(&self, filter: &str, input: &Value, args: &[Value], call: &FilterCall<'_>) -> Result<Value> {
        let route = self.routes.get(filter)
            .ok_or_else(|| StencilError::unknown_filter(filter))?;
        let module = &self.passthrough.modules[route.module];
        let ctx = call.context();

        self.passthrough.bind(ctx);
        let inner = FilterCall::through(ctx, &self.passthrough);
        let mut run = || module.call(&route.original, input, args, &inner);
        self.hook.filter_method_called(self.passthrough.prefix(), &route.original, ctx, &mut run)
    }

    fn passthrough(&self) -> Option<&Passthrough> {
        Some(&self.passthrough)
    }
}

impl std::fmt::Debug for PrefixedFilterModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedFilterModule")
            .field("name", &self.name)
            .field("filters", &self.filter_names())
            .finish()
    }
}

/// Build the prefixed namespace for every filter module of `plugin`
pub fn prefixed_filter_module<P: Plugin + ?Sized>(plugin: &P, prefix: &str) -> Result<PrefixedFilterModule> {
    validate_prefix(prefix)?;

    let modules = plugin.filter_modules();
    let mut routes = BTreeMap::new();
    let mut metas = Vec::new();

    for (slot, module) in modules.iter().enumerate() {
        for meta in module.filters() {
            let exposed = prefixed_name(prefix, &meta.name);
            if routes.contains_key(&exposed) {
                return Err(StencilError::duplicate_name(&exposed)
                    .with_suggestion(format!(
                        "Two filter modules of plugin '{}' define '{}'",
                        plugin.meta().id, meta.name
                    )));
            }
            metas.push(meta.renamed(exposed.clone()));
            routes.insert(exposed, Route { module: slot, original: meta.name.to_string() });
        }
    }

    let name = format!("{}[{}]", plugin.meta().id, prefix);
    debug!(namespace = %name, filters = routes.len(), "prefixed filter namespace built");

    Ok(PrefixedFilterModule {
        name,
        passthrough: Passthrough::new(prefix, modules),
        routes,
        metas,
        hook: Arc::new(TracingHook),
    })
}
