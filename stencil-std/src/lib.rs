//! Stencil Standard Library

pub mod filters;
pub mod plugins;
mod helpers;

use std::sync::Arc;
use stencil_plugin::{Plugin, Strainer};
use tracing::debug;

/// Load the standard filters into a strainer
pub fn load_standard_filters(strainer: Strainer) -> Strainer {
    strainer.with_module(filters::StandardFilters)
}

/// Strainer holding only the standard filters
pub fn standard_strainer() -> Strainer {
    load_standard_filters(Strainer::new())
}

/// Every bundled plugin
pub fn standard_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(plugins::UrlPlugin), Arc::new(plugins::MarkupPlugin)]
}

/// Bundled plugin by id
pub fn find_plugin(id: &str) -> Option<Arc<dyn Plugin>> {
    let found = standard_plugins().into_iter().find(|p| p.meta().id == id);
    if found.is_none() {
        debug!(id, "no bundled plugin with this id");
    }
    found
}
