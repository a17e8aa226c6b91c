/// DNA entries, serialization and admission keys
pub mod dna;
/// Phase orchestration, edition numbering and metadata collection
pub mod executor;
/// Rendering seam and the metadata-only renderer
pub mod render;
/// Weighted per-layer sampling with exclusion rules
pub mod sampler;
/// Admission of unique DNA against a duplicate-draw budget
pub mod uniqueness;
