//! Render Context

use crate::{EnabledTags, Passthrough, Registers, Strainer};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stencil_core::{Result, Value};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a render context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub(crate) u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Context passed through a render: variables, registers and filters
pub struct RenderContext {
    id: ContextId,
    pub variables: BTreeMap<String, Value>,
    registers: Registers,
    strainer: Arc<Strainer>,
}

impl RenderContext {
    pub fn new(strainer: Arc<Strainer>) -> Self {
        Self {
            id: ContextId::next(),
            variables: BTreeMap::new(),
            registers: Registers::new(),
            strainer,
        }
    }

    pub fn with_variables(mut self, vars: BTreeMap<String, Value>) -> Self {
        self.variables = vars;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_registers(mut self, registers: Registers) -> Self {
        self.registers = registers;
        self
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn strainer(&self) -> &Strainer {
        &self.strainer
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// The enabled prefixed tags, if the register is present
    pub fn enabled_tags(&self) -> Option<&EnabledTags> {
        self.registers.get::<EnabledTags>()
    }

    /// Resolve a dotted path such as `page.author.name`. Unknown names are `Nil`.
    pub fn lookup(&self, path: &str) -> Value {
        let mut parts = path.split('.');
        let root = match parts.next().and_then(|p| self.variables.get(p)) {
            Some(v) => v.clone(),
            None => return Value::Nil,
        };
        parts.fold(root, |current, part| current.get(part))
    }

    /// Apply a filter by its exposed name
    pub fn invoke_filter(&self, name: &str, input: &Value, args: &[Value]) -> Result<Value> {
        self.strainer.invoke(name, input, args, self)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Arc::new(Strainer::new()))
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("id", &self.id)
            .field("variables", &self.variables)
            .field("registers", &self.registers)
            .finish()
    }
}

/// What a filter function sees while it runs
///
/// Filters reached through a prefixed namespace also see the namespace's
/// [`Passthrough`].
#[derive(Clone, Copy)]
pub struct FilterCall<'a> {
    context: &'a RenderContext,
    passthrough: Option<&'a Passthrough>,
}

impl<'a> FilterCall<'a> {
    pub fn new(context: &'a RenderContext) -> Self {
        Self { context, passthrough: None }
    }

    pub fn through(context: &'a RenderContext, passthrough: &'a Passthrough) -> Self {
        Self { context, passthrough: Some(passthrough) }
    }

    pub fn context(&self) -> &'a RenderContext {
        self.context
    }

    pub fn passthrough(&self) -> Option<&'a Passthrough> {
        self.passthrough
    }

    /// Prefix of the namespace this call came through
    pub fn prefix(&self) -> Option<&'a str> {
        self.passthrough.map(|p| p.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_dotted_path() {
        let page = Value::from(serde_json::json!({ "author": { "name": "Ada" } }));
        let ctx = RenderContext::default().with_variable("page", page);
        assert_eq!(ctx.lookup("page.author.name"), Value::from("Ada"));
        assert!(ctx.lookup("page.title").is_nil());
        assert!(ctx.lookup("missing").is_nil());
    }

    #[test]
    fn test_contexts_have_distinct_ids() {
        let a = RenderContext::default();
        let b = RenderContext::default();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_enabled_tags_register() {
        let mut ctx = RenderContext::default();
        assert!(ctx.enabled_tags().is_none());
        ctx.registers_mut().insert(EnabledTags::from_names(["p_tag"]));
        assert!(ctx.enabled_tags().is_some_and(|t| t.is_enabled("p_tag")));
    }
}
