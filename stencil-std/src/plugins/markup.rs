//! Markup plugin: paragraph and line-break tags plus a newline filter

use stencil_plugin::prelude::*;
use std::borrow::Cow;
use std::sync::Arc;

pub struct MarkupPlugin;

impl Plugin for MarkupPlugin {
    fn meta(&self) -> PluginMeta {
        PluginMeta {
            id: "markup",
            description: "HTML paragraph and line-break helpers",
        }
    }

    fn filter_modules(&self) -> Vec<Arc<dyn FilterModule>> {
        vec![Arc::new(TextFilters)]
    }

    fn tags(&self) -> Vec<Arc<dyn Tag>> {
        vec![Arc::new(Paragraph), Arc::new(Newline)]
    }
}

pub struct TextFilters;

static TEXT_FILTERS: [FilterMeta; 1] = [FilterMeta::new(
    "add_newline",
    "Append a line feed",
    "{{ text | add_newline }}",
    &[],
    &[],
)];

impl FilterModule for TextFilters {
    fn name(&self) -> &str {
        "text"
    }

    fn filters(&self) -> Vec<FilterMeta> {
        TEXT_FILTERS.to_vec()
    }

    fn call(&self, filter: &str, input: &Value, _args: &[Value], _call: &FilterCall<'_>) -> Result<Value> {
        match filter {
            "add_newline" => Ok(Value::Text(format!("{}\n", input))),
            other => Err(StencilError::unknown_filter(other)),
        }
    }
}

/// `{% paragraph ["class"] %}body{% endparagraph %}` → `<p>body</p>`
///
/// When disabled, only the body is rendered.
pub struct Paragraph;

impl Tag for Paragraph {
    fn meta(&self) -> TagMeta {
        TagMeta {
            name: Cow::Borrowed("paragraph"),
            kind: TagKind::Block,
            description: "Wrap the body in <p>, with an optional quoted class",
        }
    }

    fn parse(&self, markup: &str, body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>> {
        let body = body.ok_or_else(|| StencilError::parse_error("paragraph is a block tag"))?;
        let class = parse_class(markup)?;
        Ok(Box::new(ParagraphNode { class, body }))
    }
}

fn parse_class(markup: &str) -> Result<Option<String>> {
    let markup = markup.trim();
    if markup.is_empty() {
        return Ok(None);
    }
    let quoted = markup.len() >= 2
        && ((markup.starts_with('"') && markup.ends_with('"'))
            || (markup.starts_with('\'') && markup.ends_with('\'')));
    if quoted {
        Ok(Some(markup[1..markup.len() - 1].to_string()))
    } else {
        Err(StencilError::parse_error(format!("paragraph expects a quoted class, got '{}'", markup)))
    }
}

struct ParagraphNode {
    class: Option<String>,
    body: Box<dyn Renderable>,
}

impl Renderable for ParagraphNode {
    fn render(&self, ctx: &mut RenderContext) -> Result<String> {
        let body = self.body.render(ctx)?;
        Ok(match &self.class {
            Some(class) => format!("<p class=\"{}\">{}</p>", class, body),
            None => format!("<p>{}</p>", body),
        })
    }

    fn render_disabled(&self, ctx: &mut RenderContext) -> Result<String> {
        self.body.render(ctx)
    }
}

/// `{% newline %}` → `<br />`
pub struct Newline;

impl Tag for Newline {
    fn meta(&self) -> TagMeta {
        TagMeta {
            name: Cow::Borrowed("newline"),
            kind: TagKind::Inline,
            description: "HTML line break",
        }
    }

    fn parse(&self, markup: &str, _body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>> {
        if !markup.trim().is_empty() {
            return Err(StencilError::parse_error("newline takes no arguments"));
        }
        Ok(Box::new(LineBreak))
    }
}

struct LineBreak;

impl Renderable for LineBreak {
    fn render(&self, _ctx: &mut RenderContext) -> Result<String> {
        Ok("<br />".to_string())
    }
}
