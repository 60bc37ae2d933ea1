//! Prefixed tags
//!
//! Each plugin tag gets a wrapper registered as `<prefix>_<tag>`. The
//! wrapper's nodes check the [`EnabledTags`](crate::EnabledTags) register on
//! every render and fall back to `render_disabled` when the tag is off.

use crate::prefix::{prefixed_name, validate_prefix};
use crate::{Plugin, RenderContext, Renderable, Tag, TagHook, TagMeta, TracingHook};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use stencil_core::{Result, StencilError};
use tracing::debug;

/// A plugin tag exposed under a prefixed name
#[derive(Clone)]
pub struct PrefixedTag {
    prefix: String,
    name: String,
    original: Arc<dyn Tag>,
    hook: Arc<dyn TagHook>,
}

impl PrefixedTag {
    pub fn new(prefix: &str, original: Arc<dyn Tag>) -> Result<Self> {
        validate_prefix(prefix)?;
        let name = prefixed_name(prefix, &original.meta().name);
        Ok(Self {
            prefix: prefix.to_string(),
            name,
            original,
            hook: Arc::new(TracingHook),
        })
    }

    pub fn with_hook(mut self, hook: Arc<dyn TagHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registered name, `<prefix>_<tag>`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped tag definition
    pub fn original(&self) -> &Arc<dyn Tag> {
        &self.original
    }

    /// Whether this tag wraps exactly `tag`
    pub fn derives_from(&self, tag: &Arc<dyn Tag>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.original), Arc::as_ptr(tag))
    }
}

impl Tag for PrefixedTag {
    fn meta(&self) -> TagMeta {
        let original = self.original.meta();
        TagMeta {
            name: Cow::Owned(self.name.clone()),
            ..original
        }
    }

    fn parse(&self, markup: &str, body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>> {
        let inner = self.original.parse(markup, body).map_err(|e| {
            let tagged = e.location.as_ref().is_some_and(|l| l.tag.is_some());
            if tagged { e } else { e.in_tag(&self.name) }
        })?;
        Ok(Box::new(GatedNode {
            prefix: self.prefix.clone(),
            name: self.name.clone(),
            inner,
            hook: self.hook.clone(),
        }))
    }
}

impl std::fmt::Debug for PrefixedTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedTag")
            .field("name", &self.name)
            .field("kind", &self.original.meta().kind)
            .finish()
    }
}

/// Parsed prefixed tag; renders only when enabled in the context
struct GatedNode {
    prefix: String,
    name: String,
    inner: Box<dyn Renderable>,
    hook: Arc<dyn TagHook>,
}

impl Renderable for GatedNode {
    fn render(&self, ctx: &mut RenderContext) -> Result<String> {
        let enabled = ctx.enabled_tags().is_some_and(|tags| tags.is_enabled(&self.name));
        let inner = &self.inner;
        let mut render = |ctx: &mut RenderContext| {
            if enabled {
                inner.render(ctx)
            } else {
                inner.render_disabled(ctx)
            }
        };
        self.hook.rendering_tag(&self.prefix, enabled, &self.name, ctx, &mut render)
    }

    fn render_disabled(&self, ctx: &mut RenderContext) -> Result<String> {
        self.inner.render_disabled(ctx)
    }
}

/// Wrap every tag of `plugin`, keyed by prefixed name
pub fn prefixed_tags<P: Plugin + ?Sized>(plugin: &P, prefix: &str) -> Result<BTreeMap<String, PrefixedTag>> {
    validate_prefix(prefix)?;

    let mut tags = BTreeMap::new();
    for tag in plugin.tags() {
        let prefixed = PrefixedTag::new(prefix, tag)?;
        if tags.contains_key(prefixed.name()) {
            return Err(StencilError::duplicate_name(prefixed.name()));
        }
        tags.insert(prefixed.name().to_string(), prefixed);
    }

    debug!(plugin = plugin.meta().id, prefix, tags = tags.len(), "prefixed tags built");
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnabledTags, PluginMeta, TagKind};
    use std::collections::HashMap;

    struct Text(String);

    impl Renderable for Text {
        fn render(&self, _ctx: &mut RenderContext) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct Paragraph;

    struct ParagraphNode {
        body: Box<dyn Renderable>,
    }

    impl Renderable for ParagraphNode {
        fn render(&self, ctx: &mut RenderContext) -> Result<String> {
            Ok(format!("<p>{}</p>", self.body.render(ctx)?))
        }

        fn render_disabled(&self, ctx: &mut RenderContext) -> Result<String> {
            self.body.render(ctx)
        }
    }

    impl Tag for Paragraph {
        fn meta(&self) -> TagMeta {
            TagMeta { name: Cow::Borrowed("paragraph"), kind: TagKind::Block, description: "" }
        }

        fn parse(&self, _markup: &str, body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>> {
            let body = body.ok_or_else(|| StencilError::parse_error("paragraph needs a body"))?;
            Ok(Box::new(ParagraphNode { body }))
        }
    }

    struct Newline;

    impl Tag for Newline {
        fn meta(&self) -> TagMeta {
            TagMeta { name: Cow::Borrowed("newline"), kind: TagKind::Inline, description: "" }
        }

        fn parse(&self, _markup: &str, _body: Option<Box<dyn Renderable>>) -> Result<Box<dyn Renderable>> {
            Ok(Box::new(Text("<br />".to_string())))
        }
    }

    struct WithTags {
        paragraph: Arc<dyn Tag>,
        newline: Arc<dyn Tag>,
    }

    impl WithTags {
        fn new() -> Self {
            Self { paragraph: Arc::new(Paragraph), newline: Arc::new(Newline) }
        }
    }

    impl Plugin for WithTags {
        fn meta(&self) -> PluginMeta {
            PluginMeta { id: "with_tags", description: "" }
        }

        fn tags(&self) -> Vec<Arc<dyn Tag>> {
            vec![self.paragraph.clone(), self.newline.clone()]
        }
    }

    fn parse_both(tags: &BTreeMap<String, PrefixedTag>) -> (Box<dyn Renderable>, Box<dyn Renderable>) {
        let p = tags["prefix_paragraph"]
            .parse("", Some(Box::new(Text("Some Text".to_string()))))
            .unwrap();
        let n = tags["prefix_newline"].parse("", None).unwrap();
        (p, n)
    }

    #[test]
    fn test_prefixed_names_wrap_originals() {
        let plugin = WithTags::new();
        let tags = plugin.prefixed_tags("prefix").unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags["prefix_paragraph"].derives_from(&plugin.paragraph));
        assert!(tags["prefix_newline"].derives_from(&plugin.newline));
        assert!(!tags["prefix_newline"].derives_from(&plugin.paragraph));
        assert_eq!(tags["prefix_paragraph"].meta().kind, TagKind::Block);
        assert_eq!(tags["prefix_paragraph"].meta().name, "prefix_paragraph");
    }

    #[test]
    fn test_renders_only_when_enabled() {
        let tags = WithTags::new().prefixed_tags("prefix").unwrap();
        let (p, n) = parse_both(&tags);
        let mut ctx = RenderContext::default();
        ctx.registers_mut().insert(EnabledTags::new());

        assert_eq!(p.render(&mut ctx).unwrap(), "Some Text");
        assert_eq!(n.render(&mut ctx).unwrap(), "");

        if let Some(enabled) = ctx.registers_mut().get_mut::<EnabledTags>() {
            enabled.enable("prefix_paragraph");
            enabled.enable("prefix_newline");
        }
        assert_eq!(p.render(&mut ctx).unwrap(), "<p>Some Text</p>");
        assert_eq!(n.render(&mut ctx).unwrap(), "<br />");
    }

    #[test]
    fn test_missing_register_means_disabled() {
        let tags = WithTags::new().prefixed_tags("prefix").unwrap();
        let (p, n) = parse_both(&tags);
        let mut ctx = RenderContext::default();
        assert_eq!(p.render(&mut ctx).unwrap(), "Some Text");
        assert_eq!(n.render(&mut ctx).unwrap(), "");
    }

    #[derive(Default)]
    struct Seen(HashMap<String, (String, bool)>);

    struct RecordingHook;

    impl TagHook for RecordingHook {
        fn rendering_tag(
            &self,
            prefix: &str,
            enabled: bool,
            tag: &str,
            ctx: &mut RenderContext,
            render: &mut dyn FnMut(&mut RenderContext) -> Result<String>,
        ) -> Result<String> {
            if let Some(seen) = ctx.registers_mut().get_mut::<Seen>() {
                seen.0.insert(tag.to_string(), (prefix.to_string(), enabled));
            }
            render(ctx)
        }
    }

    #[test]
    fn test_hook_sees_prefix_and_enabled_state() {
        let hook: Arc<dyn TagHook> = Arc::new(RecordingHook);
        let tags: BTreeMap<String, PrefixedTag> = WithTags::new()
            .prefixed_tags("prefix")
            .unwrap()
            .into_iter()
            .map(|(name, tag)| (name, tag.with_hook(hook.clone())))
            .collect();
        let (p, n) = parse_both(&tags);

        let mut ctx = RenderContext::default();
        ctx.registers_mut().insert(EnabledTags::from_names(["prefix_paragraph"]));
        ctx.registers_mut().insert(Seen::default());

        let out = format!("{}|{}", p.render(&mut ctx).unwrap(), n.render(&mut ctx).unwrap());
        assert_eq!(out, "<p>Some Text</p>|");

        let seen = ctx.registers_mut().remove::<Seen>().unwrap();
        assert_eq!(seen.0["prefix_paragraph"], ("prefix".to_string(), true));
        assert_eq!(seen.0["prefix_newline"], ("prefix".to_string(), false));
    }

    #[test]
    fn test_parse_errors_name_the_prefixed_tag() {
        let tags = WithTags::new().prefixed_tags("prefix").unwrap();
        let err = match tags["prefix_paragraph"].parse("", None) {
            Err(e) => e,
            Ok(_) => panic!("paragraph without body should not parse"),
        };
        assert_eq!(err.location.unwrap().tag.as_deref(), Some("prefix_paragraph"));
    }

    struct TwoParagraphs;

    impl Plugin for TwoParagraphs {
        fn meta(&self) -> PluginMeta {
            PluginMeta { id: "two_paragraphs", description: "" }
        }

        fn tags(&self) -> Vec<Arc<dyn Tag>> {
            vec![Arc::new(Paragraph), Arc::new(Paragraph)]
        }
    }

    #[test]
    fn test_duplicate_tag_names_rejected() {
        let err = TwoParagraphs.prefixed_tags("prefix").unwrap_err();
        assert_eq!(err.code, stencil_core::codes::DUPLICATE_NAME);
        assert!(err.message.contains("prefix_paragraph"));
    }

    #[test]
    fn test_rejects_bad_prefix() {
        assert!(WithTags::new().prefixed_tags("9lives").is_err());
    }
}
