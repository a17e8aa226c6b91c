//! Selectable layer elements and their file-name conventions
//!
//! An element file is named `<name><delimiter><weight>.<ext>`, for example
//! `head_bed_time#65.png`. The weight suffix is optional; anything that does
//! not parse as an integer falls back to [`DEFAULT_RARITY_WEIGHT`].

use crate::io::configuration::DEFAULT_RARITY_WEIGHT;
use std::path::{Path, PathBuf};

/// One selectable asset within a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Zero-based position within the layer's sorted element list
    pub id: usize,
    /// File stem without the weight suffix
    pub name: String,
    /// Full file name, extension included
    pub filename: String,
    /// Location of the asset
    pub path: PathBuf,
    /// Rarity weight
    pub weight: u32,
}

impl Element {
    /// Build an element from its file name
    pub fn from_filename(id: usize, filename: &str, path: PathBuf, delimiter: char) -> Self {
        Self {
            id,
            name: element_name(filename, delimiter),
            filename: filename.to_string(),
            path,
            weight: rarity_weight(filename, delimiter),
        }
    }

    /// Lower-cased file extension, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Attribute value shown in metadata
    ///
    /// Drops everything up to the first underscore, turns the remaining
    /// underscores into spaces and title-cases each word, so `head_bed_time`
    /// becomes `Bed Time`. Names without an underscore are used whole.
    pub fn trait_value(&self) -> String {
        let raw = self
            .name
            .split_once('_')
            .map_or(self.name.as_str(), |(_, rest)| rest);
        title_case(&raw.replace('_', " "))
    }
}

fn file_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _)| stem)
}

/// Name portion of an element file name
pub fn element_name(filename: &str, delimiter: char) -> String {
    file_stem(filename)
        .split(delimiter)
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Weight encoded after the last delimiter, or the default weight
pub fn rarity_weight(filename: &str, delimiter: char) -> u32 {
    let stem = file_stem(filename);
    let suffix = stem.rsplit(delimiter).next().unwrap_or_default();
    if let Ok(weight) = suffix.trim().parse::<u32>() {
        return weight;
    }

    if stem.contains(delimiter) {
        log::warn!(
            "Malformed rarity weight in '{filename}', using {DEFAULT_RARITY_WEIGHT}"
        );
    } else {
        log::debug!("No rarity weight in '{filename}', using {DEFAULT_RARITY_WEIGHT}");
    }
    DEFAULT_RARITY_WEIGHT
}

fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
