//! Tags every environment knows

use std::borrow::Cow;
use stencil_core::Result;
use stencil_plugin::{RenderContext, Renderable, Tag, TagKind, TagMeta};

/// `{% comment %}...{% endcomment %}` renders nothing
pub struct Comment;

struct Nothing;

impl Renderable for Nothing {
    fn render(&self, _ctx: &mut RenderContext) -> Result<String> {
        Ok(String::new())
    }
}

impl Tag for Comment {
    fn meta(&self) -> TagMeta {
        TagMeta {
            name: Cow::Borrowed("comment"),
            kind: TagKind::Block,
            description: "Template comment, never rendered",
        }
    }

    fn parse(&self, _markup: &str, _body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>> {
        Ok(Box::new(Nothing))
    }
}
