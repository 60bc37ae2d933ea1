//! Bundled plugins

mod url;
mod markup;

pub use url::{UrlPlugin, Links, Schemes};
pub use markup::{MarkupPlugin, TextFilters, Paragraph, Newline};
