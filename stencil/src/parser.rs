//! Template parser
//!
//! Turns tokens into nodes. Tags are resolved against the environment's tag
//! table; block tags consume everything up to their `end<name>` tag.

use crate::ast::{Expr, FilterApp, Node, Output, TagNode};
use crate::lexer::{tokenize, Spanned, Token};
use crate::render::Block;
use std::collections::HashMap;
use std::sync::Arc;
use stencil_core::{Result, StencilError, Value};
use stencil_plugin::{Tag, TagKind};

/// Parse template source to nodes
pub fn parse(source: &str, tags: &HashMap<String, Arc<dyn Tag>>) -> Result<Vec<Node>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0, tags };
    parser.parse_nodes(None)
}

struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    tags: &'a HashMap<String, Arc<dyn Tag>>,
}

impl Parser<'_> {
    /// Parse until the end of input, or until `{% end<open> %}` when inside a block
    fn parse_nodes(&mut self, open: Option<(&str, usize)>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        while self.pos < self.tokens.len() {
            let Spanned { token, line } = self.tokens[self.pos].clone();
            self.pos += 1;

            match token {
                Token::Text(text) => nodes.push(Node::Text(text)),
                Token::Output(content) => {
                    let output = parse_output(&content, line)
                        .map_err(|e| e.at_line(line))?;
                    nodes.push(Node::Output(output));
                }
                Token::Tag(content) => {
                    let (name, markup) = split_tag(&content);
                    if name.is_empty() {
                        return Err(StencilError::parse_error("empty tag").at_line(line));
                    }

                    if let Some(closed) = name.strip_prefix("end") {
                        if !self.tags.contains_key(name) {
                            return match open {
                                Some((open_name, _)) if open_name == closed => Ok(nodes),
                                _ => Err(StencilError::parse_error(format!("unexpected '{{% {} %}}'", name))
                                    .at_line(line)),
                            };
                        }
                    }

                    nodes.push(Node::Tag(self.parse_tag(name, markup, line)?));
                }
            }
        }

        match open {
            Some((open_name, open_line)) => Err(StencilError::unclosed_tag(open_name).at_line(open_line)),
            None => Ok(nodes),
        }
    }

    fn parse_tag(&mut self, name: &str, markup: &str, line: usize) -> Result<TagNode> {
        let tag = self.tags.get(name)
            .cloned()
            .ok_or_else(|| StencilError::unknown_tag(name).at_line(line))?;

        let parsed = match tag.meta().kind {
            TagKind::Inline => tag.parse(markup, None),
            TagKind::Block => {
                let body = self.parse_nodes(Some((name, line)))?;
                tag.parse(markup, Some(Box::new(Block::new(body))))
            }
        };

        let node = parsed.map_err(|e| if e.line().is_some() { e } else { e.at_line(line) })?;
        Ok(TagNode { name: name.to_string(), line, node })
    }
}

/// Split `name rest of markup` at the first whitespace
fn split_tag(content: &str) -> (&str, &str) {
    match content.find(char::is_whitespace) {
        Some(idx) => (&content[..idx], content[idx..].trim()),
        None => (content, ""),
    }
}

/// Split on `sep` outside of quoted strings
fn split_unquoted(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == sep => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn parse_output(content: &str, line: usize) -> Result<Output> {
    let mut segments = split_unquoted(content, '|').into_iter();
    let expr = parse_expr(segments.next().unwrap_or_default())?;

    let mut filters = Vec::new();
    for segment in segments {
        filters.push(parse_filter(segment)?);
    }

    Ok(Output { expr, filters, line })
}

fn parse_filter(segment: &str) -> Result<FilterApp> {
    let segment = segment.trim();
    let parts = split_unquoted(segment, ':');
    let (name, args) = match parts.as_slice() {
        [name] => (*name, Vec::new()),
        [name, args] => {
            let args = split_unquoted(args, ',')
                .into_iter()
                .map(parse_expr)
                .collect::<Result<Vec<_>>>()?;
            (*name, args)
        }
        _ => return Err(StencilError::parse_error(format!("malformed filter '{}'", segment))),
    };
    let name = name.trim();

    if !is_identifier(name) {
        return Err(StencilError::parse_error(format!("invalid filter name '{}'", name)));
    }
    Ok(FilterApp { name: name.to_string(), args })
}

fn parse_expr(text: &str) -> Result<Expr> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StencilError::parse_error("missing expression"));
    }

    let quoted = text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')));
    if quoted {
        return Ok(Expr::Literal(Value::Text(text[1..text.len() - 1].to_string())));
    }

    match text {
        "true" => return Ok(Expr::Literal(Value::Bool(true))),
        "false" => return Ok(Expr::Literal(Value::Bool(false))),
        "nil" | "null" => return Ok(Expr::Literal(Value::Nil)),
        _ => {}
    }

    if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Expr::Literal(Value::Int(n)));
        }
        if let Ok(x) = text.parse::<f64>() {
            return Ok(Expr::Literal(Value::Float(x)));
        }
        return Err(StencilError::parse_error(format!("invalid number '{}'", text)));
    }

    if text.split('.').all(is_identifier) {
        return Ok(Expr::Variable(text.to_string()));
    }

    Err(StencilError::parse_error(format!("invalid expression '{}'", text)))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '?')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_unquoted_respects_quotes() {
        assert_eq!(split_unquoted("a | 'b|c' | d", '|'), vec!["a ", " 'b|c' ", " d"]);
        assert_eq!(split_unquoted("\"x,y\", z", ','), vec!["\"x,y\"", " z"]);
    }

    #[test]
    fn test_parse_output_with_filters() {
        let out = parse_output("page.title | append: ' - ', site | upcase", 1).unwrap();
        assert_eq!(out.expr, Expr::Variable("page.title".into()));
        assert_eq!(out.filters.len(), 2);
        assert_eq!(out.filters[0].name, "append");
        assert_eq!(
            out.filters[0].args,
            vec![Expr::Literal(Value::from(" - ")), Expr::Variable("site".into())]
        );
        assert_eq!(out.filters[1].name, "upcase");
        assert!(out.filters[1].args.is_empty());
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_expr("42").unwrap(), Expr::Literal(Value::Int(42)));
        assert_eq!(parse_expr("-1.5").unwrap(), Expr::Literal(Value::Float(-1.5)));
        assert_eq!(parse_expr("nil").unwrap(), Expr::Literal(Value::Nil));
        assert_eq!(parse_expr("'it''s'").unwrap(), Expr::Literal(Value::from("it''s")));
        assert!(parse_expr("12abc").is_err());
        assert!(parse_expr("a..b").is_err());
        assert!(parse_expr("").is_err());
    }

    #[test]
    fn test_parse_filter_errors() {
        assert!(parse_output("x | ", 1).is_err());
        assert!(parse_output("x | 9lives", 1).is_err());
        assert!(parse_output("x | a: 1: 2", 1).is_err());
    }

    #[test]
    fn test_split_tag() {
        assert_eq!(split_tag("mk_paragraph 'lead'"), ("mk_paragraph", "'lead'"));
        assert_eq!(split_tag("endmk_paragraph"), ("endmk_paragraph", ""));
    }
}
