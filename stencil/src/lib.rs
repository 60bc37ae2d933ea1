//! Stencil - Liquid-style templates with prefixed plugins

mod ast;
mod builtins;
mod lexer;
mod parser;
mod render;

pub use lexer::LexError;

use render::Block;

pub use stencil_core::{Value, StencilError, Result};
pub use stencil_plugin::{
    EnabledTags, FilterModule, Plugin, RenderContext, Renderable, Registers, Strainer, Tag,
};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Names a plugin was registered under
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub plugin: String,
    pub prefix: String,
    pub filters: Vec<String>,
    pub tags: Vec<String>,
}

/// Parsed template
pub struct Template {
    root: Block,
}

impl Template {
    pub fn render(&self, ctx: &mut RenderContext) -> Result<String> {
        self.root.render(ctx)
    }
}

/// Template environment: the tags and filters templates can use
pub struct Stencil {
    tags: HashMap<String, Arc<dyn Tag>>,
    strainer: Arc<Strainer>,
    prefixes: BTreeSet<String>,
}

impl Stencil {
    pub fn new() -> Self {
        let mut stencil = Self {
            tags: HashMap::new(),
            strainer: Arc::new(Strainer::new()),
            prefixes: BTreeSet::new(),
        };
        stencil.register_tag("comment", Arc::new(builtins::Comment));
        stencil
    }

    pub fn with_standard_filters() -> Self {
        let mut stencil = Self::new();
        stencil.strainer = Arc::new(stencil_std::standard_strainer());
        stencil
    }

    /// Register a tag, returning the one it replaces
    pub fn register_tag(&mut self, name: impl Into<String>, tag: Arc<dyn Tag>) -> Option<Arc<dyn Tag>> {
        let name = name.into();
        let replaced = self.tags.insert(name.clone(), tag);
        if replaced.is_some() {
            debug!(tag = %name, "tag replaced");
        } else {
            debug!(tag = %name, "tag registered");
        }
        replaced
    }

    pub fn register_filters(&mut self, module: Arc<dyn FilterModule>) {
        Arc::make_mut(&mut self.strainer).extend(module);
    }

    /// Register a plugin's filters and tags under `prefix`
    ///
    /// A prefix can be used once per environment. Prefixed names that clash
    /// with already registered filters or tags are rejected.
    pub fn register_plugin(&mut self, plugin: &dyn Plugin, prefix: &str) -> Result<Registration> {
        let namespace = plugin.prefixed_filter_module(prefix)?;
        let tags = plugin.prefixed_tags(prefix)?;

        if self.prefixes.contains(prefix) {
            return Err(StencilError::duplicate_name(prefix)
                .with_suggestion(format!("Prefix '{}' is already in use; pick another", prefix)));
        }
        let filters: Vec<String> = namespace.filter_names().into_iter().map(String::from).collect();
        let clash = filters.iter()
            .find(|name| self.strainer.contains(name))
            .or_else(|| tags.keys().find(|name| self.tags.contains_key(*name)));
        if let Some(name) = clash {
            return Err(StencilError::duplicate_name(name)
                .with_suggestion(format!("'{}' is already registered", name)));
        }
        self.prefixes.insert(prefix.to_string());

        if !filters.is_empty() {
            self.register_filters(Arc::new(namespace));
        }

        let tag_names: Vec<String> = tags.keys().cloned().collect();
        for (name, tag) in tags {
            self.register_tag(name, Arc::new(tag));
        }

        let registration = Registration {
            plugin: plugin.meta().id.to_string(),
            prefix: prefix.to_string(),
            filters,
            tags: tag_names,
        };
        debug!(plugin = %registration.plugin, prefix, "plugin registered");
        Ok(registration)
    }

    pub fn parse(&self, source: &str) -> Result<Template> {
        let nodes = parser::parse(source, &self.tags)?;
        Ok(Template { root: Block::new(nodes) })
    }

    /// Fresh render context wired to this environment's filters
    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.strainer.clone())
    }

    /// Parse and render in one go. No prefixed tag is enabled.
    pub fn render(&self, source: &str, variables: &BTreeMap<String, Value>) -> Result<String> {
        let template = self.parse(source)?;
        let mut ctx = self.context().with_variables(variables.clone());
        template.render(&mut ctx)
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.strainer.names()
    }

    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Filter and tag metadata
    pub fn describe(&self) -> serde_json::Value {
        let mut tags: Vec<_> = self.tags.iter()
            .map(|(name, tag)| {
                let mut meta = tag.meta();
                meta.name = name.clone().into();
                meta
            })
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        serde_json::json!({
            "filters": self.strainer.list_filters(),
            "tags": tags,
        })
    }
}

impl std::fmt::Debug for Stencil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stencil")
            .field("prefixes", &self.prefixes)
            .field("tags", &self.tag_names())
            .field("filters", &self.filter_names())
            .finish()
    }
}

impl Default for Stencil {
    fn default() -> Self {
        Self::with_standard_filters()
    }
}

#[macro_export]
macro_rules! vars {
    {} => { std::collections::BTreeMap::new() };
    { $($key:ident : $value:expr),* $(,)? } => {{
        let mut map = std::collections::BTreeMap::new();
        $(
            map.insert(stringify!($key).to_string(), $crate::Value::from($value));
        )*
        map
    }};
}
