//! Generative edition builder: combines weighted image layers into unique editions
//!
//! Each phase draws one element per layer, rejects duplicate combinations,
//! assigns an edition number from a (possibly shuffled) pool and emits a
//! metadata record. A rarity report summarizes the finished collection.

#![forbid(unsafe_code)]

/// DNA sampling, uniqueness tracking, rendering seam and phase orchestration
pub mod algorithm;
/// Metadata assembly and rarity statistics
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Layer directories and element file-name conventions
pub mod layers;
/// Random selection, probability and colour utilities
pub mod math;

pub use io::error::{GenerationError, Result};
