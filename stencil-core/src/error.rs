//! Structured errors
//!
//! Errors carry a machine-readable code, a human-readable message and an
//! optional suggestion, so hosts can report template problems precisely.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNKNOWN_TAG: &str = "UNKNOWN_TAG";
    pub const UNCLOSED_TAG: &str = "UNCLOSED_TAG";
    pub const UNKNOWN_FILTER: &str = "UNKNOWN_FILTER";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INVALID_PREFIX: &str = "INVALID_PREFIX";
    pub const DUPLICATE_NAME: &str = "DUPLICATE_NAME";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Where in a template an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line number in the template source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Tag being parsed or rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Structured template error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StencilError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

pub type Result<T> = std::result::Result<T, StencilError>;

impl StencilError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            location: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set line
    pub fn at_line(mut self, line: usize) -> Self {
        let loc = self.location.get_or_insert_with(Location::default);
        loc.line = Some(line);
        self
    }

    /// Builder: set tag
    pub fn in_tag(mut self, tag: impl Into<String>) -> Self {
        let loc = self.location.get_or_insert_with(Location::default);
        loc.tag = Some(tag.into());
        self
    }

    /// Line number, if known
    pub fn line(&self) -> Option<usize> {
        self.location.as_ref().and_then(|l| l.line)
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Check tag and output syntax")
    }

    pub fn unknown_tag(name: &str) -> Self {
        Self::new(codes::UNKNOWN_TAG, format!("Unknown tag: {}", name))
            .with_suggestion(format!("Register '{}' or check the plugin prefix", name))
            .in_tag(name)
    }

    pub fn unclosed_tag(name: &str) -> Self {
        Self::new(codes::UNCLOSED_TAG, format!("Block tag '{}' was never closed", name))
            .with_suggestion(format!("Add {{% end{} %}}", name))
            .in_tag(name)
    }

    pub fn unknown_filter(name: &str) -> Self {
        Self::new(codes::UNKNOWN_FILTER, format!("Unknown filter: {}", name))
    }

    pub fn arg_count(filter: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{} expects {} arguments, got {}", filter, expected, got))
    }

    pub fn arg_type(filter: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{} argument '{}': expected {}, got {}", filter, arg, expected, got))
    }

    pub fn invalid_prefix(prefix: &str) -> Self {
        Self::new(codes::INVALID_PREFIX, format!("Invalid prefix: '{}'", prefix))
            .with_suggestion("Use letters, digits and underscores, not starting with a digit")
    }

    pub fn duplicate_name(name: &str) -> Self {
        Self::new(codes::DUPLICATE_NAME, format!("Name defined more than once: {}", name))
    }

    pub fn config_error(details: impl Into<String>) -> Self {
        Self::new(codes::CONFIG_ERROR, format!("Configuration error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for StencilError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(line) = self.line() {
            write!(f, " (line {})", line)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for StencilError {}

impl From<serde_json::Error> for StencilError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_error(err.to_string())
    }
}
