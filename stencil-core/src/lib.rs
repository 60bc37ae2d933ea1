//! Stencil Core - Fundamental types
//!
//! This crate provides the core types used throughout Stencil:
//! - `Value`: Runtime values (text, numbers, lists, objects)
//! - `StencilError`: Structured errors with machine-readable codes

mod value;
mod error;

pub use value::Value;
pub use error::{StencilError, Location, Result, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, StencilError, Result};
    pub use crate::error::codes;
}
