//! URL plugin: scheme helpers split across two filter modules

use stencil_plugin::prelude::*;
use std::sync::Arc;

pub struct UrlPlugin;

impl Plugin for UrlPlugin {
    fn meta(&self) -> PluginMeta {
        PluginMeta {
            id: "url",
            description: "Add and remove URL schemes",
        }
    }

    fn filter_modules(&self) -> Vec<Arc<dyn FilterModule>> {
        vec![Arc::new(Links), Arc::new(Schemes)]
    }
}

pub struct Links;

static LINKS: [FilterMeta; 1] = [FilterMeta::new(
    "add_http",
    "Prefix `http://` unless already present",
    "{{ url | add_http }}",
    &[],
    &["{{ \"example.com\" | add_http }} → http://example.com"],
)];

impl FilterModule for Links {
    fn name(&self) -> &str {
        "links"
    }

    fn filters(&self) -> Vec<FilterMeta> {
        LINKS.to_vec()
    }

    fn call(&self, filter: &str, input: &Value, _args: &[Value], _call: &FilterCall<'_>) -> Result<Value> {
        match filter {
            "add_http" => {
                let url = input.to_string();
                if url.starts_with("http://") {
                    Ok(Value::Text(url))
                } else {
                    Ok(Value::Text(format!("http://{}", url)))
                }
            }
            other => Err(StencilError::unknown_filter(other)),
        }
    }
}

pub struct Schemes;

static SCHEMES: [FilterMeta; 1] = [FilterMeta::new(
    "remove_http",
    "Drop a leading `http://` or `https://`",
    "{{ url | remove_http }}",
    &[],
    &["{{ \"http://example.com\" | remove_http }} → example.com"],
)];

impl FilterModule for Schemes {
    fn name(&self) -> &str {
        "schemes"
    }

    fn filters(&self) -> Vec<FilterMeta> {
        SCHEMES.to_vec()
    }

    fn call(&self, filter: &str, input: &Value, _args: &[Value], _call: &FilterCall<'_>) -> Result<Value> {
        match filter {
            "remove_http" => {
                let url = input.to_string();
                let stripped = url
                    .strip_prefix("http://")
                    .or_else(|| url.strip_prefix("https://"))
                    .unwrap_or(&url);
                Ok(Value::Text(stripped.to_string()))
            }
            other => Err(StencilError::unknown_filter(other)),
        }
    }
}
