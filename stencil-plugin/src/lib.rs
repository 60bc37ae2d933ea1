//! Stencil Plugin System
//!
//! Provides the extension points of the template engine:
//! - Filter modules (named functions applied in `{{ value | filter }}`)
//! - Tags (custom `{% tag %}` constructs, inline or block)
//! - Plugins (bundles of filter modules and tags)
//!
//! and the namespacing shim that exposes a plugin's filters and tags under a
//! prefix, so several plugins can live in one environment.

mod traits;
mod registers;
mod context;
mod strainer;
mod hooks;
mod prefix;
mod tags;

pub use traits::{
    FilterModule, FilterMeta, ArgMeta,
    Tag, TagMeta, TagKind, Renderable,
    Plugin, PluginMeta,
};
pub use registers::{Registers, EnabledTags};
pub use context::{RenderContext, ContextId, FilterCall};
pub use strainer::Strainer;
pub use hooks::{FilterHook, TagHook, TracingHook};
pub use prefix::{PrefixedFilterModule, Passthrough, prefixed_filter_module, validate_prefix};
pub use tags::{PrefixedTag, prefixed_tags};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FilterModule, FilterMeta, ArgMeta,
        Tag, TagMeta, TagKind, Renderable,
        Plugin, PluginMeta, FilterCall, RenderContext, EnabledTags,
    };
    pub use stencil_core::prelude::*;
}
