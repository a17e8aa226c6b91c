//! Layer and element loading
//!
//! This module contains:
//! - Element file-name parsing (names, weights, trait values)
//! - Layer directories and their resolved options

/// Layer directories and resolved layer options
pub mod catalog;
/// Element file-name conventions
pub mod element;

pub use catalog::{Layer, LayerCatalog};
pub use element::Element;
