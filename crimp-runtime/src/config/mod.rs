//! Catalog loading and command-line overrides
//!
//! The tool catalog is TOML. A default catalog is compiled into the binary;
//! a file given on the command line replaces it.

pub mod catalog;
pub mod overrides;

pub use catalog::{Catalog, CatalogError, EMBEDDED_CATALOG};
pub use overrides::parse_overrides;
