//! Abstract Syntax Tree

use stencil_core::Value;
use stencil_plugin::Renderable;

/// A parsed template fragment
pub enum Node {
    Text(String),
    Output(Output),
    Tag(TagNode),
}

/// `{{ expr | filter: args }}`
#[derive(Debug, Clone)]
pub struct Output {
    pub expr: Expr,
    pub filters: Vec<FilterApp>,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct FilterApp {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// Dotted path, e.g. `page.title`
    Variable(String),
}

/// A tag parsed by its definition
pub struct TagNode {
    pub name: String,
    pub line: usize,
    pub node: Box<dyn Renderable>,
}
