//! Template lexer
//!
//! Splits source into literal text, `{{ output }}` and `{% tag %}` tokens.

use stencil_core::StencilError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    /// Trimmed content between `{{` and `}}`
    Output(String),
    /// Trimmed content between `{%` and `%}`
    Tag(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    /// 1-based line where the token starts
    pub line: usize,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LexError {
    #[error("output opened on line {0} is never closed with }}}}")]
    UnterminatedOutput(usize),

    #[error("tag opened on line {0} is never closed with %}}")]
    UnterminatedTag(usize),
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedOutput(line) | LexError::UnterminatedTag(line) => *line,
        }
    }
}

impl From<LexError> for StencilError {
    fn from(err: LexError) -> Self {
        let line = err.line();
        StencilError::parse_error(err.to_string()).at_line(line)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;

    while !rest.is_empty() {
        let next_open = match (rest.find("{{"), rest.find("{%")) {
            (Some(o), Some(t)) => Some(o.min(t)),
            (o, t) => o.or(t),
        };

        let Some(start) = next_open else {
            tokens.push(Spanned { token: Token::Text(rest.to_string()), line });
            break;
        };

        if start > 0 {
            let text = &rest[..start];
            tokens.push(Spanned { token: Token::Text(text.to_string()), line });
            line += text.matches('\n').count();
        }

        let is_output = rest[start..].starts_with("{{");
        let close = if is_output { "}}" } else { "%}" };
        let inner_start = start + 2;
        let Some(len) = rest[inner_start..].find(close) else {
            return Err(if is_output {
                LexError::UnterminatedOutput(line)
            } else {
                LexError::UnterminatedTag(line)
            });
        };

        let inner = &rest[inner_start..inner_start + len];
        let content = inner.trim().to_string();
        tokens.push(Spanned {
            token: if is_output { Token::Output(content) } else { Token::Tag(content) },
            line,
        });
        line += inner.matches('\n').count();
        rest = &rest[inner_start + len + close.len()..];
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_text_only() {
        assert_eq!(kinds("plain"), vec![Token::Text("plain".into())]);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_mixed_tokens() {
        assert_eq!(
            kinds("a{{ x | upcase }}b{% p_tag 'c' %}"),
            vec![
                Token::Text("a".into()),
                Token::Output("x | upcase".into()),
                Token::Text("b".into()),
                Token::Tag("p_tag 'c'".into()),
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("one\ntwo {{ a }}\n{%\nt\n%}{{ b }}").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 2, 2, 3, 5]);
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(tokenize("x\n{{ a").unwrap_err(), LexError::UnterminatedOutput(2));
        assert_eq!(tokenize("{% t }}").unwrap_err(), LexError::UnterminatedTag(1));
        let err: StencilError = LexError::UnterminatedTag(4).into();
        assert_eq!(err.line(), Some(4));
    }
}
