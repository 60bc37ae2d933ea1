//! Standard text and collection filters

use crate::helpers::{expect_args, arg_text, is_empty, require_text_arg};
use stencil_plugin::prelude::*;

pub struct StandardFilters;

static ONE_TEXT_ARG: [ArgMeta; 1] = [ArgMeta::required("text", "Text", "Text to attach")];
static DEFAULT_ARGS: [ArgMeta; 1] = [ArgMeta::required("fallback", "Any", "Value used when input is empty")];
static JOIN_ARGS: [ArgMeta; 1] = [ArgMeta::optional("separator", "Text", "Separator, a single space by default")];

static FILTERS: [FilterMeta; 9] = [
    FilterMeta::new("upcase", "Convert text to upper case", "{{ text | upcase }}", &[], &["{{ \"abc\" | upcase }} → ABC"]),
    FilterMeta::new("downcase", "Convert text to lower case", "{{ text | downcase }}", &[], &["{{ \"ABC\" | downcase }} → abc"]),
    FilterMeta::new("capitalize", "Upper-case the first character, lower-case the rest", "{{ text | capitalize }}", &[], &["{{ \"hELLO\" | capitalize }} → Hello"]),
    FilterMeta::new("append", "Append text", "{{ text | append: suffix }}", &ONE_TEXT_ARG, &["{{ \"a\" | append: \"b\" }} → ab"]),
    FilterMeta::new("prepend", "Prepend text", "{{ text | prepend: prefix }}", &ONE_TEXT_ARG, &["{{ \"b\" | prepend: \"a\" }} → ab"]),
    FilterMeta::new("strip", "Remove leading and trailing whitespace", "{{ text | strip }}", &[], &[]),
    FilterMeta::new("size", "Length of text, list or object", "{{ value | size }}", &[], &["{{ \"abc\" | size }} → 3"]),
    FilterMeta::new("default", "Fallback for nil, false or empty values", "{{ value | default: fallback }}", &DEFAULT_ARGS, &["{{ nil | default: \"none\" }} → none"]),
    FilterMeta::new("join", "Join list items", "{{ list | join: separator }}", &JOIN_ARGS, &[]),
];

impl FilterModule for StandardFilters {
    fn name(&self) -> &str {
        "standard"
    }

    fn filters(&self) -> Vec<FilterMeta> {
        FILTERS.to_vec()
    }

    fn call(&self, filter: &str, input: &Value, args: &[Value], _call: &FilterCall<'_>) -> Result<Value> {
        match filter {
            "upcase" => {
                expect_args(filter, args, 0, 0)?;
                Ok(Value::Text(input.to_string().to_uppercase()))
            }
            "downcase" => {
                expect_args(filter, args, 0, 0)?;
                Ok(Value::Text(input.to_string().to_lowercase()))
            }
            "capitalize" => {
                expect_args(filter, args, 0, 0)?;
                let text = input.to_string();
                let mut chars = text.chars();
                let out = match chars.next() {
                    Some(first) => {
                        let rest = chars.as_str().to_lowercase();
                        first.to_uppercase().chain(rest.chars()).collect()
                    }
                    None => String::new(),
                };
                Ok(Value::Text(out))
            }
            "append" => {
                expect_args(filter, args, 1, 1)?;
                let suffix = require_text_arg(args, 0, filter, "text")?;
                Ok(Value::Text(format!("{}{}", input, suffix)))
            }
            "prepend" => {
                expect_args(filter, args, 1, 1)?;
                let prefix = require_text_arg(args, 0, filter, "text")?;
                Ok(Value::Text(format!("{}{}", prefix, input)))
            }
            "strip" => {
                expect_args(filter, args, 0, 0)?;
                Ok(Value::Text(input.to_string().trim().to_string()))
            }
            "size" => {
                expect_args(filter, args, 0, 0)?;
                let size = match input {
                    Value::Text(s) => s.chars().count(),
                    Value::List(l) => l.len(),
                    Value::Object(o) => o.len(),
                    _ => 0,
                };
                Ok(Value::Int(size as i64))
            }
            "default" => {
                expect_args(filter, args, 1, 1)?;
                if is_empty(input) || input == &Value::Bool(false) {
                    Ok(args[0].clone())
                } else {
                    Ok(input.clone())
                }
            }
            "join" => {
                expect_args(filter, args, 0, 1)?;
                let separator = arg_text(args, 0).unwrap_or_else(|| " ".to_string());
                match input {
                    Value::List(items) => {
                        let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                        Ok(Value::Text(parts.join(&separator)))
                    }
                    other => Ok(Value::Text(other.to_string())),
                }
            }
            other => Err(StencilError::unknown_filter(other)),
        }
    }
}
