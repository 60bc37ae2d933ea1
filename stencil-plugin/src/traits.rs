//! Plugin traits

use crate::{FilterCall, PrefixedFilterModule, PrefixedTag, RenderContext};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use stencil_core::{Result, Value};

/// Metadata about a filter argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: true }
    }
}

/// Metadata for a single filter
#[derive(Debug, Clone, Serialize)]
pub struct FilterMeta {
    pub name: Cow<'static, str>,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub examples: &'static [&'static str],
}

impl FilterMeta {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        args: &'static [ArgMeta],
        examples: &'static [&'static str],
    ) -> Self {
        Self { name: Cow::Borrowed(name), description, usage, args, examples }
    }

    /// Same filter exposed under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            ..self.clone()
        }
    }
}

/// A set of named filter functions
///
/// A module answers only for the names it lists in [`FilterModule::filters`].
pub trait FilterModule: Send + Sync {
    fn name(&self) -> &str;
    fn filters(&self) -> Vec<FilterMeta>;
    fn call(&self, filter: &str, input: &Value, args: &[Value], call: &FilterCall<'_>) -> Result<Value>;

    /// Per-prefix passthrough object, for namespaced modules
    fn passthrough(&self) -> Option<&crate::Passthrough> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// `{% name markup %}`
    Inline,
    /// `{% name markup %}body{% endname %}`
    Block,
}

/// Metadata for a tag definition
#[derive(Debug, Clone, Serialize)]
pub struct TagMeta {
    pub name: Cow<'static, str>,
    pub kind: TagKind,
    pub description: &'static str,
}

/// A parsed, renderable piece of a template
pub trait Renderable: Send + Sync {
    fn render(&self, ctx: &mut RenderContext) -> Result<String>;

    /// Output used when the owning tag is switched off
    fn render_disabled(&self, _ctx: &mut RenderContext) -> Result<String> {
        Ok(String::new())
    }
}

/// Tag definition: turns markup (and a block body) into a [`Renderable`]
pub trait Tag: Send + Sync {
    fn meta(&self) -> TagMeta;
    fn parse(&self, markup: &str, body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>>;
}

/// Metadata for a plugin
#[derive(Debug, Clone, Serialize)]
pub struct PluginMeta {
    pub id: &'static str,
    pub description: &'static str,
}

/// A bundle of filter modules and tags
pub trait Plugin: Send + Sync {
    fn meta(&self) -> PluginMeta;

    fn filter_modules(&self) -> Vec<Arc<dyn FilterModule>> {
        Vec::new()
    }

    fn tags(&self) -> Vec<Arc<dyn Tag>> {
        Vec::new()
    }

    /// All filters of this plugin, exposed as `<prefix>_<name>`
    fn prefixed_filter_module(&self, prefix: &str) -> Result<PrefixedFilterModule> {
        crate::prefix::prefixed_filter_module(self, prefix)
    }

    /// All tags of this plugin, keyed by `<prefix>_<name>`
    fn prefixed_tags(&self, prefix: &str) -> Result<BTreeMap<String, PrefixedTag>> {
        crate::tags::prefixed_tags(self, prefix)
    }
}
