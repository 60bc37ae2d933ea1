//! Filter dispatch table

use crate::{FilterCall, FilterMeta, FilterModule, Passthrough, RenderContext};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use stencil_core::{Result, StencilError, Value};
use tracing::debug;

/// Maps every exposed filter name to the module that answers for it
#[derive(Clone, Default)]
pub struct Strainer {
    modules: Vec<Arc<dyn FilterModule>>,
    index: BTreeMap<String, usize>,
}

impl Strainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module<M: FilterModule + 'static>(mut self, module: M) -> Self {
        self.extend(Arc::new(module));
        self
    }

    /// Mix in every filter name the module exposes. Later modules shadow
    /// earlier ones.
    pub fn extend(&mut self, module: Arc<dyn FilterModule>) {
        let slot = self.modules.len();
        for meta in module.filters() {
            if let Some(prev) = self.index.insert(meta.name.to_string(), slot) {
                debug!(
                    filter = %meta.name,
                    shadowed = self.modules[prev].name(),
                    by = module.name(),
                    "filter shadowed"
                );
            }
        }
        debug!(module = module.name(), "filter module mixed in");
        self.modules.push(module);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Exposed filter names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    pub fn meta(&self, name: &str) -> Option<FilterMeta> {
        let module = &self.modules[*self.index.get(name)?];
        module.filters().into_iter().find(|m| m.name == name)
    }

    pub fn list_filters(&self) -> Vec<FilterMeta> {
        self.index.keys().filter_map(|name| self.meta(name)).collect()
    }

    /// Passthrough object of the namespace mixed in under `prefix`
    pub fn passthrough(&self, prefix: &str) -> Option<&Passthrough> {
        self.modules
            .iter()
            .rev()
            .filter_map(|m| m.passthrough())
            .find(|p| p.prefix() == prefix)
    }

    /// One passthrough per prefix, sorted by prefix. A prefix mixed in
    /// twice reports the later namespace.
    pub fn passthroughs(&self) -> Vec<&Passthrough> {
        let by_prefix: BTreeMap<&str, &Passthrough> = self.modules
            .iter()
            .filter_map(|m| m.passthrough())
            .map(|p| (p.prefix(), p))
            .collect();
        by_prefix.into_values().collect()
    }

    pub fn invoke(&self, name: &str, input: &Value, args: &[Value], ctx: &RenderContext) -> Result<Value> {
        match self.index.get(name) {
            Some(&slot) => self.modules[slot].call(name, input, args, &FilterCall::new(ctx)),
            None => {
                let similar = self.find_similar_filters(name);
                let mut err = StencilError::unknown_filter(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!("Similar: {}", suggestions.join(", ")));
                }
                Err(err)
            }
        }
    }

    /// Filter names similar to the given name (for error suggestions)
    fn find_similar_filters(&self, name: &str) -> Vec<String> {
        let mut matches: Vec<(String, usize)> = self.index.keys()
            .filter_map(|candidate| {
                let score = Self::similarity_score(name, candidate);
                if score > 0 {
                    Some((candidate.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        // A prefixed variant of the query ranks highest
        if candidate.ends_with(&format!("_{}", query)) {
            score += 100;
        } else if candidate.starts_with(query) {
            score += 80;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Only worth ranking when the names share a stem
        if score > 0 {
            let query_chars: HashSet<char> = query.chars().collect();
            let candidate_chars: HashSet<char> = candidate.chars().collect();
            score += query_chars.intersection(&candidate_chars).count() * 2;
        }

        score
    }
}
