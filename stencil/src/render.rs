//! Node renderer

use crate::ast::{Expr, Node, Output};
use stencil_core::{Result, Value};
use stencil_plugin::{RenderContext, Renderable};

/// A sequence of nodes; the root of a template and the body of block tags
pub struct Block {
    nodes: Vec<Node>,
}

impl Block {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl Renderable for Block {
    fn render(&self, ctx: &mut RenderContext) -> Result<String> {
        let mut output = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Output(out) => output.push_str(&render_output(out, ctx)?),
                Node::Tag(tag) => {
                    let rendered = tag.node.render(ctx).map_err(|e| {
                        if e.line().is_some() { e } else { e.at_line(tag.line).in_tag(&tag.name) }
                    })?;
                    output.push_str(&rendered);
                }
            }
        }
        Ok(output)
    }
}

fn eval_expr(expr: &Expr, ctx: &RenderContext) -> Value {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Variable(path) => ctx.lookup(path),
    }
}

fn render_output(out: &Output, ctx: &RenderContext) -> Result<String> {
    let mut value = eval_expr(&out.expr, ctx);
    for filter in &out.filters {
        let args: Vec<Value> = filter.args.iter().map(|a| eval_expr(a, ctx)).collect();
        value = ctx.invoke_filter(&filter.name, &value, &args)
            .map_err(|e| if e.line().is_some() { e } else { e.at_line(out.line) })?;
    }
    Ok(value.to_string())
}
