//! Loads layer directories into ordered, weighted element lists

use crate::io::configuration::{BlendMode, LayerConfig, LayerConfiguration};
use crate::io::error::{GenerationError, Result, file_system};
use crate::layers::element::Element;
use std::path::{Path, PathBuf};

/// A named group of elements plus its rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Position within its phase's layer order
    pub id: usize,
    /// Directory name
    pub name: String,
    /// Trait type used in metadata
    pub display_name: String,
    /// Compositing mode
    pub blend: BlendMode,
    /// Opacity in `0.0..=1.0`
    pub opacity: f32,
    /// Whether this layer is left out of the uniqueness key
    pub bypass_dna: bool,
    /// Selectable elements in stable order
    pub elements: Vec<Element>,
}

impl Layer {
    /// Layer with default options whose display name is its name
    pub fn new(id: usize, name: impl Into<String>, elements: Vec<Element>) -> Self {
        let name = name.into();
        Self {
            id,
            display_name: name.clone(),
            name,
            blend: BlendMode::SourceOver,
            opacity: 1.0,
            bypass_dna: false,
            elements,
        }
    }

    /// Build a layer from bare file names
    ///
    /// Paths are synthesized under the layer name, so no directory is read.
    pub fn from_filenames(id: usize, name: &str, filenames: &[&str], delimiter: char) -> Self {
        let elements = filenames
            .iter()
            .enumerate()
            .map(|(index, filename)| {
                Element::from_filename(index, filename, Path::new(name).join(filename), delimiter)
            })
            .collect();
        Self::new(id, name, elements)
    }

    /// Element with the given id
    pub fn element(&self, id: usize) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Sum of all element weights
    pub fn total_weight(&self) -> u64 {
        self.elements.iter().map(|e| u64::from(e.weight)).sum()
    }
}

/// Reads element lists from `<layers_dir>/<layer name>/`
#[derive(Debug, Clone)]
pub struct LayerCatalog {
    layers_dir: PathBuf,
    rarity_delimiter: char,
}

impl LayerCatalog {
    /// Catalog rooted at a layers directory
    pub fn new(layers_dir: impl Into<PathBuf>, rarity_delimiter: char) -> Self {
        Self {
            layers_dir: layers_dir.into(),
            rarity_delimiter,
        }
    }

    /// Root directory of the catalog
    pub fn layers_dir(&self) -> &Path {
        &self.layers_dir
    }

    /// Load the elements of one layer
    ///
    /// Hidden files and sub-directories are skipped. File names are sorted so
    /// element ids are stable across loads.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer directory cannot be read
    pub fn load(&self, layer_name: &str) -> Result<Vec<Element>> {
        let dir = self.layers_dir.join(layer_name);
        let entries =
            std::fs::read_dir(&dir).map_err(|e| file_system(&dir, "read layer directory", e))?;

        let mut filenames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| file_system(&dir, "read layer entry", e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| file_system(entry.path(), "inspect layer entry", e))?
                .is_file();
            let filename = entry.file_name().to_string_lossy().to_string();
            if is_file && !filename.starts_with('.') {
                filenames.push(filename);
            }
        }
        filenames.sort();

        Ok(filenames
            .into_iter()
            .enumerate()
            .map(|(id, filename)| {
                let path = dir.join(&filename);
                Element::from_filename(id, &filename, path, self.rarity_delimiter)
            })
            .collect())
    }

    /// Load every layer of a phase with its options resolved
    ///
    /// # Errors
    ///
    /// Returns an error if a layer directory cannot be read or holds no elements
    pub fn setup(&self, layers_order: &[LayerConfig]) -> Result<Vec<Layer>> {
        layers_order
            .iter()
            .enumerate()
            .map(|(id, config)| {
                let elements = self.load(&config.name)?;
                if elements.is_empty() {
                    return Err(GenerationError::EmptyLayer {
                        layer: config.name.clone(),
                    });
                }
                Ok(Layer {
                    id,
                    name: config.name.clone(),
                    display_name: config
                        .options
                        .display_name
                        .clone()
                        .unwrap_or_else(|| config.name.clone()),
                    blend: config.options.blend,
                    opacity: config.options.opacity,
                    bypass_dna: config.options.bypass_dna,
                    elements,
                })
            })
            .collect()
    }

    /// Load the layers of every phase, in phase order
    ///
    /// # Errors
    ///
    /// Returns an error if any layer of any phase fails to load
    pub fn setup_all(&self, phases: &[LayerConfiguration]) -> Result<Vec<Layer>> {
        let mut layers = Vec::new();
        for phase in phases {
            layers.extend(self.setup(&phase.layers_order)?);
        }
        Ok(layers)
    }
}
