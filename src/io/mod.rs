//! Input/output: configuration, errors, rendering to disk, and the CLI

/// Command-line parsing and command dispatch
pub mod cli;
/// Generation constants and the typed configuration file
pub mod configuration;
/// Error types and result handling
pub mod error;
/// Layer compositing and image export
pub mod image;
/// Build directory layout and metadata files
pub mod output;
/// Progress display for generation runs
pub mod progress;
