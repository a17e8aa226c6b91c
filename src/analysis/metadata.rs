//! Per-edition metadata records and the bulk field-update pass

use crate::algorithm::dna::Dna;
use crate::io::configuration::GenerationConfig;
use crate::io::error::{GenerationError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One trait of an edition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Layer display name
    pub trait_type: String,
    /// Element display value
    pub value: String,
}

impl Attribute {
    /// Attribute from a trait type and value
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

/// What the renderer hands back for one edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Extension of the stored artifact (`png`, `gif`, ...)
    pub file_extension: String,
    /// Attributes in layer order
    pub attributes: Vec<Attribute>,
}

/// Metadata emitted for one edition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// `{prefix} #{edition}`
    pub name: String,
    /// Collection description
    pub description: String,
    /// `{base_uri}/{edition}.{ext}`
    pub image: String,
    /// SHA-256 hex digest of the serialized DNA
    pub dna: String,
    /// Edition number
    pub edition: usize,
    /// Configured extra fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Traits in layer order
    pub attributes: Vec<Attribute>,
}

impl MetadataRecord {
    /// Extension of the image reference, if it has one
    pub fn image_extension(&self) -> Option<&str> {
        self.image
            .rsplit_once('/')
            .map_or(self.image.as_str(), |(_, file)| file)
            .rsplit_once('.')
            .map(|(_, ext)| ext)
    }
}

/// Fields shared by every record of a collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataTemplate {
    /// Prefix of edition names
    pub name_prefix: String,
    /// Collection description
    pub description: String,
    /// Base of image references
    pub base_uri: String,
    /// Extra fields merged into every record
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MetadataTemplate {
    /// Template taken from a run configuration
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            name_prefix: config.name_prefix.clone(),
            description: config.description.clone(),
            base_uri: config.base_uri.clone(),
            extra: config.extra_metadata.clone(),
        }
    }

    /// Edition name
    pub fn name(&self, edition: usize) -> String {
        format!("{} #{edition}", self.name_prefix)
    }

    /// Image reference for an edition
    pub fn image(&self, edition: usize, extension: &str) -> String {
        format!(
            "{}/{edition}.{extension}",
            self.base_uri.trim_end_matches('/')
        )
    }

    /// Rewrite name, description and image reference of existing records
    ///
    /// The image extension of each record is kept.
    pub fn update(&self, records: &mut [MetadataRecord]) {
        for record in records {
            let extension = record.image_extension().unwrap_or("png").to_string();
            record.name = self.name(record.edition);
            record.description.clone_from(&self.description);
            record.image = self.image(record.edition, &extension);
        }
    }
}

/// Deterministic fingerprint of a serialized DNA
pub fn dna_fingerprint(raw_dna: &str) -> String {
    format!("{:x}", Sha256::digest(raw_dna.as_bytes()))
}

/// Build the record of an accepted DNA
///
/// # Errors
///
/// Returns `IntegrationMismatch` when the renderer produced a different
/// number of attributes than there are active layers
pub fn assemble(
    dna: &Dna,
    edition: usize,
    output: RenderOutput,
    active_layers: usize,
    template: &MetadataTemplate,
) -> Result<MetadataRecord> {
    if output.attributes.len() != active_layers {
        return Err(GenerationError::IntegrationMismatch {
            edition,
            expected: active_layers,
            actual: output.attributes.len(),
        });
    }

    Ok(MetadataRecord {
        name: template.name(edition),
        description: template.description.clone(),
        image: template.image(edition, &output.file_extension),
        dna: dna_fingerprint(&dna.to_string()),
        edition,
        extra: template.extra.clone(),
        attributes: output.attributes,
    })
}
