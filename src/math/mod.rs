//! Mathematical utilities shared across the generator

/// Hex parsing and HSL conversion for backgrounds
pub mod color;
/// Percentages and goodness-of-fit statistics
pub mod probability;
/// Seeded weighted and uniform random selection
pub mod random;
