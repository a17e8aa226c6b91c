//! DNA: the per-layer selection record of one edition
//!
//! A DNA is stored structurally, one [`DnaEntry`] per layer, and serialized as
//! `index:filename` tuples joined by [`DNA_DELIMITER`]. Tuples of layers that
//! bypass the uniqueness check carry [`BYPASS_DNA_MARKER`] in the serialized
//! form only; the entry itself keeps a plain flag.

use crate::io::configuration::{BYPASS_DNA_MARKER, DNA_DELIMITER, DNA_INDEX_SEPARATOR};
use crate::io::error::{Result, invalid_dna};
use crate::layers::{Element, Layer};
use std::fmt;

/// The choice made for one layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnaEntry {
    /// Element id within its layer
    pub index: usize,
    /// Element file name
    pub filename: String,
    /// Left out of the admission key
    pub bypassed: bool,
}

impl DnaEntry {
    /// Entry for an element of a layer
    pub fn for_element(layer: &Layer, element: &Element) -> Self {
        Self {
            index: element.id,
            filename: element.filename.clone(),
            bypassed: layer.bypass_dna,
        }
    }

    fn key_fragment(&self) -> String {
        format!("{}{DNA_INDEX_SEPARATOR}{}", self.index, self.filename)
    }
}

impl fmt::Display for DnaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_fragment())?;
        if self.bypassed {
            write!(f, "{BYPASS_DNA_MARKER}")?;
        }
        Ok(())
    }
}

/// An element resolved from a DNA together with its layer
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// Layer the element belongs to
    pub layer: &'a Layer,
    /// Selected element
    pub element: &'a Element,
}

/// Ordered layer choices of one candidate edition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Dna {
    entries: Vec<DnaEntry>,
}

impl Dna {
    /// DNA from entries in layer order
    pub const fn new(entries: Vec<DnaEntry>) -> Self {
        Self { entries }
    }

    /// Entries in layer order
    pub fn entries(&self) -> &[DnaEntry] {
        &self.entries
    }

    /// Number of layers covered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no layer has been chosen yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry uses the given file name
    pub fn contains_filename(&self, filename: &str) -> bool {
        self.entries.iter().any(|entry| entry.filename == filename)
    }

    /// Uniqueness projection: non-bypassed `index:filename` pairs in layer order
    pub fn admission_key(&self) -> String {
        self.entries
            .iter()
            .filter(|entry| !entry.bypassed)
            .map(DnaEntry::key_fragment)
            .collect::<Vec<_>>()
            .join(&DNA_DELIMITER.to_string())
    }

    /// Parse a serialized DNA
    ///
    /// A segment that does not begin with `<digits>:` belongs to the previous
    /// tuple, which keeps file names containing the delimiter intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or the first tuple has no index
    pub fn parse(text: &str) -> Result<Self> {
        let mut tuples: Vec<String> = Vec::new();
        for segment in text.split(DNA_DELIMITER) {
            match tuples.last_mut() {
                Some(previous) if !starts_with_index(segment) => {
                    previous.push(DNA_DELIMITER);
                    previous.push_str(segment);
                }
                _ => tuples.push(segment.to_string()),
            }
        }

        let entries = tuples
            .iter()
            .map(|tuple| parse_entry(text, tuple))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Resolve every entry back to its layer's element
    ///
    /// # Errors
    ///
    /// Returns an error if the layer count differs or an index is unknown
    pub fn resolve<'a>(&self, layers: &'a [Layer]) -> Result<Vec<Selection<'a>>> {
        if self.entries.len() != layers.len() {
            return Err(invalid_dna(
                self,
                &format!(
                    "{} entries for {} layers",
                    self.entries.len(),
                    layers.len()
                ),
            ));
        }

        self.entries
            .iter()
            .zip(layers)
            .map(|(entry, layer)| {
                layer
                    .element(entry.index)
                    .map(|element| Selection { layer, element })
                    .ok_or_else(|| {
                        invalid_dna(
                            self,
                            &format!("layer '{}' has no element {}", layer.name, entry.index),
                        )
                    })
            })
            .collect()
    }
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{DNA_DELIMITER}")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

fn starts_with_index(segment: &str) -> bool {
    segment.split_once(DNA_INDEX_SEPARATOR).is_some_and(|(index, _)| {
        !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
    })
}

fn parse_entry(dna: &str, tuple: &str) -> Result<DnaEntry> {
    let (index, rest) = tuple
        .split_once(DNA_INDEX_SEPARATOR)
        .ok_or_else(|| invalid_dna(&dna, &format!("tuple '{tuple}' has no index")))?;
    let index = index
        .parse::<usize>()
        .map_err(|e| invalid_dna(&dna, &format!("tuple '{tuple}': {e}")))?;

    // Options travel as a query string after the file name
    let (filename, bypassed) = match rest.split_once('?') {
        Some((filename, query)) => (
            filename,
            query
                .split('&')
                .any(|setting| setting == BYPASS_DNA_MARKER.trim_start_matches('?')),
        ),
        None => (rest, false),
    };

    Ok(DnaEntry {
        index,
        filename: filename.to_string(),
        bypassed,
    })
}
