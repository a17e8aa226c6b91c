//! The seam between generation and whatever turns a selection into an artifact

use crate::algorithm::dna::Selection;
use crate::analysis::metadata::{Attribute, RenderOutput};
use crate::io::error::Result;

/// Turns the selected elements of one edition into a stored artifact
///
/// Renderers are driven strictly one edition at a time through `&mut self`,
/// so an implementation may reuse a single drawing surface.
pub trait Renderer {
    /// Render and persist one edition
    ///
    /// # Errors
    ///
    /// Returns an error if an asset cannot be loaded or the artifact cannot be stored
    fn render(&mut self, edition: usize, selection: &[Selection<'_>]) -> Result<RenderOutput>;
}

/// Attributes observed for a selection, in layer order
pub fn observed_attributes(selection: &[Selection<'_>]) -> Vec<Attribute> {
    selection
        .iter()
        .map(|s| Attribute::new(s.layer.display_name.clone(), s.element.trait_value()))
        .collect()
}

/// Renderer that stores nothing and only reports attributes
#[derive(Debug, Clone, Default)]
pub struct AttributeRenderer {
    rendered: usize,
}

impl AttributeRenderer {
    /// Fresh renderer
    pub const fn new() -> Self {
        Self { rendered: 0 }
    }

    /// Editions rendered so far
    pub const fn rendered(&self) -> usize {
        self.rendered
    }
}

impl Renderer for AttributeRenderer {
    fn render(&mut self, _edition: usize, selection: &[Selection<'_>]) -> Result<RenderOutput> {
        self.rendered += 1;
        let file_extension = selection
            .first()
            .and_then(|s| s.element.extension())
            .unwrap_or_else(|| "png".to_string());
        Ok(RenderOutput {
            file_extension,
            attributes: observed_attributes(selection),
        })
    }
}
