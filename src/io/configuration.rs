//! Generation constants and the typed configuration file

use crate::io::error::{GenerationError, Result, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Separator between per-layer tuples in a serialized DNA
pub const DNA_DELIMITER: char = '-';
/// Separator between element index and filename inside a DNA tuple
pub const DNA_INDEX_SEPARATOR: char = ':';
/// Annotation appended to the tuple of a layer that bypasses uniqueness
pub const BYPASS_DNA_MARKER: &str = "?bypassDNA=true";

/// Weight given to elements whose file name carries no parsable weight
pub const DEFAULT_RARITY_WEIGHT: u32 = 100;
/// Character separating an element name from its weight suffix
pub const DEFAULT_RARITY_DELIMITER: char = '#';
/// Consecutive duplicate draws tolerated before a run is abandoned
pub const DEFAULT_UNIQUE_DNA_TOLERANCE: usize = 10_000;

// Bounds the exclusion re-roll so a fully clashing layer cannot hang a run
/// Maximum re-rolls for one layer when its draw clashes with the exclusion table
pub const EXCLUSION_REROLL_LIMIT: usize = 1_000;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default canvas edge in pixels
pub const DEFAULT_CANVAS_SIZE: u32 = 1440;
/// Default lightness of generated pastel backgrounds
pub const DEFAULT_BACKGROUND_BRIGHTNESS: f32 = 0.8;

// Output layout
/// Directory holding one sub-directory per layer
pub const DEFAULT_LAYERS_DIR: &str = "layers";
/// Directory receiving images and metadata
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Aggregate metadata file written once a run completes
pub const METADATA_LIST_FILE: &str = "_metadata.json";
/// Rarity report written by the analyzer
pub const RARITY_CSV_FILE: &str = "rarity.csv";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// How a layer is combined with what is already on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Paint over the canvas
    #[default]
    SourceOver,
    /// Multiply channels
    Multiply,
    /// Inverse multiply of inverted channels
    Screen,
    /// Keep the darker channel
    Darken,
    /// Keep the lighter channel
    Lighten,
    /// Absolute channel difference
    Difference,
}

const fn default_opacity() -> f32 {
    1.0
}

/// Rendering options recognized for each layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerOptions {
    /// Trait type shown in metadata; the layer name when absent
    pub display_name: Option<String>,
    /// Compositing mode
    pub blend: BlendMode,
    /// Opacity in `0.0..=1.0`
    pub opacity: f32,
    /// Exclude this layer's choice from the uniqueness key
    pub bypass_dna: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            display_name: None,
            blend: BlendMode::SourceOver,
            opacity: default_opacity(),
            bypass_dna: false,
        }
    }
}

/// A layer reference inside a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Directory name under the layers directory
    pub name: String,
    /// Rendering options
    #[serde(default)]
    pub options: LayerOptions,
}

impl LayerConfig {
    /// Layer reference with default options
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: LayerOptions::default(),
        }
    }

    /// Same layer with a display name
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.options.display_name = Some(display_name.into());
        self
    }

    /// Same layer excluded from the uniqueness key
    #[must_use]
    pub const fn bypassing_dna(mut self) -> Self {
        self.options.bypass_dna = true;
        self
    }
}

/// One phase: grow the collection to a cumulative target with a layer set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfiguration {
    /// Cumulative edition count reached at the end of this phase
    pub grow_edition_size_to: usize,
    /// Layers in drawing order
    pub layers_order: Vec<LayerConfig>,
}

/// Canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Use smooth filtering when a layer has to be resized
    pub smoothing: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            smoothing: false,
        }
    }
}

/// Background painted before the first layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    /// Paint a background at all
    pub generate: bool,
    /// Lightness of generated pastel colours in `0.0..=1.0`
    pub brightness: f32,
    /// Use `default` instead of a random hue
    pub static_color: bool,
    /// Hex colour used when `static_color` is set
    pub default: String,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            generate: true,
            brightness: DEFAULT_BACKGROUND_BRIGHTNESS,
            static_color: false,
            default: "#000000".to_string(),
        }
    }
}

fn default_name_prefix() -> String {
    "Edition".to_string()
}

fn default_base_uri() -> String {
    "ipfs://NewUriToReplace".to_string()
}

const fn default_tolerance() -> usize {
    DEFAULT_UNIQUE_DNA_TOLERANCE
}

const fn default_rarity_delimiter() -> char {
    DEFAULT_RARITY_DELIMITER
}

/// Complete run configuration, usually read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Prefix of every edition name (`{prefix} #{edition}`)
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Description copied into every record
    #[serde(default)]
    pub description: String,
    /// Base of every image reference
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    /// Phases in ascending target order
    pub layer_configurations: Vec<LayerConfiguration>,
    /// Permute edition numbers before generation starts
    #[serde(default)]
    pub shuffle_layer_configurations: bool,
    /// Consecutive duplicate draws tolerated before aborting
    #[serde(default = "default_tolerance")]
    pub unique_dna_tolerance: usize,
    /// Separator between element name and weight in file names
    #[serde(default = "default_rarity_delimiter")]
    pub rarity_delimiter: char,
    /// Trigger filename mapped to the filename it may not appear with
    #[serde(default)]
    pub exclusions: BTreeMap<String, String>,
    /// Canvas settings
    #[serde(default)]
    pub format: Format,
    /// Background settings
    #[serde(default)]
    pub background: Background,
    /// Extra fields merged into every metadata record
    #[serde(default)]
    pub extra_metadata: serde_json::Map<String, serde_json::Value>,
}

impl GenerationConfig {
    /// Configuration with the given phases and every other field defaulted
    pub fn new(layer_configurations: Vec<LayerConfiguration>) -> Self {
        Self {
            name_prefix: default_name_prefix(),
            description: String::new(),
            base_uri: default_base_uri(),
            layer_configurations,
            shuffle_layer_configurations: false,
            unique_dna_tolerance: DEFAULT_UNIQUE_DNA_TOLERANCE,
            rarity_delimiter: DEFAULT_RARITY_DELIMITER,
            exclusions: BTreeMap::new(),
            format: Format::default(),
            background: Background::default(),
            extra_metadata: serde_json::Map::new(),
        }
    }

    /// Read and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON for
    /// this schema, or fails validation
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenerationError::FileSystem {
            path: path.to_path_buf(),
            operation: "read configuration",
            source: e,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| GenerationError::Serialization {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not match the schema or fails validation
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| GenerationError::Serialization {
                path: "<inline>".into(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Total number of editions across all phases
    pub fn total_supply(&self) -> usize {
        self.layer_configurations
            .last()
            .map_or(0, |phase| phase.grow_edition_size_to)
    }

    /// Check the invariants the generator relies on
    ///
    /// # Errors
    ///
    /// Returns an `InvalidParameter` error naming the first violated rule
    pub fn validate(&self) -> Result<()> {
        if self.layer_configurations.is_empty() {
            return Err(invalid_parameter(
                "layer_configurations",
                &"[]",
                &"at least one phase is required",
            ));
        }

        let mut previous = 0;
        for phase in &self.layer_configurations {
            if phase.layers_order.is_empty() {
                return Err(invalid_parameter(
                    "layers_order",
                    &"[]",
                    &format!(
                        "phase growing to {} has no layers",
                        phase.grow_edition_size_to
                    ),
                ));
            }
            if phase.grow_edition_size_to < previous {
                return Err(invalid_parameter(
                    "grow_edition_size_to",
                    &phase.grow_edition_size_to,
                    &format!("targets must not decrease (previous phase grows to {previous})"),
                ));
            }
            previous = phase.grow_edition_size_to;

            for layer in &phase.layers_order {
                let opacity = layer.options.opacity;
                if !(0.0..=1.0).contains(&opacity) {
                    return Err(invalid_parameter(
                        "opacity",
                        &opacity,
                        &format!("layer '{}' opacity must be within 0..=1", layer.name),
                    ));
                }
            }
        }

        if self.total_supply() == 0 {
            return Err(invalid_parameter(
                "grow_edition_size_to",
                &0,
                &"the final phase must produce at least one edition",
            ));
        }

        if self.unique_dna_tolerance == 0 {
            return Err(invalid_parameter(
                "unique_dna_tolerance",
                &0,
                &"at least one duplicate draw must be tolerated",
            ));
        }

        if !(0.0..=1.0).contains(&self.background.brightness) {
            return Err(invalid_parameter(
                "background.brightness",
                &self.background.brightness,
                &"must be within 0..=1",
            ));
        }

        Ok(())
    }
}
