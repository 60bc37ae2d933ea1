//! Hooks around prefixed filter calls and tag renders

use crate::RenderContext;
use stencil_core::{Result, Value};
use tracing::trace;

/// Wraps every call made through a prefixed filter namespace
pub trait FilterHook: Send + Sync {
    /// `method` is the original, unprefixed filter name. Implementations must
    /// run `call` to produce the filter's result.
    fn filter_method_called(
        &self,
        prefix: &str,
        method: &str,
        ctx: &RenderContext,
        call: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        let _ = (prefix, method, ctx);
        call()
    }
}

/// Wraps every render of a prefixed tag
pub trait TagHook: Send + Sync {
    /// `render` runs the normal render when `enabled`, the disabled fallback
    /// otherwise.
    fn rendering_tag(
        &self,
        prefix: &str,
        enabled: bool,
        tag: &str,
        ctx: &mut RenderContext,
        render: &mut dyn FnMut(&mut RenderContext) -> Result<String>,
    ) -> Result<String> {
        let _ = (prefix, enabled, tag);
        render(ctx)
    }
}

/// Default hook: logs at trace level and passes through
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl FilterHook for TracingHook {
    fn filter_method_called(
        &self,
        prefix: &str,
        method: &str,
        _ctx: &RenderContext,
        call: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        trace!(prefix, method, "prefixed filter called");
        call()
    }
}

impl TagHook for TracingHook {
    fn rendering_tag(
        &self,
        prefix: &str,
        enabled: bool,
        tag: &str,
        ctx: &mut RenderContext,
        render: &mut dyn FnMut(&mut RenderContext) -> Result<String>,
    ) -> Result<String> {
        trace!(prefix, tag, enabled, "rendering prefixed tag");
        render(ctx)
    }
}
