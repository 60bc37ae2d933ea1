//! Built-in filter modules

mod standard;

pub use standard::StandardFilters;
