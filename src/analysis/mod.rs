//! Metadata assembly and rarity statistics over a finished collection

/// Per-edition metadata records and the bulk update pass
pub mod metadata;
/// Trait occurrence and rarity percentages
pub mod rarity;
