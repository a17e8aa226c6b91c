//! Layer compositing onto a shared canvas and PNG export

use crate::algorithm::dna::Selection;
use crate::algorithm::render::{Renderer, observed_attributes};
use crate::analysis::metadata::RenderOutput;
use crate::io::configuration::{Background, BlendMode, Format};
use crate::io::error::{GenerationError, Result, file_system, invalid_parameter};
use crate::math::color::{hsl_to_rgba, parse_hex_color};
use crate::math::random::RandomSelector;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Renderer compositing every selected layer onto one reused canvas
///
/// The canvas is cleared at the start of each edition. Layer images are
/// decoded concurrently, then drawn in layer order.
pub struct ImageCompositor {
    canvas: RgbaImage,
    images_dir: PathBuf,
    format: Format,
    background: Background,
    static_background: Option<[u8; 4]>,
    random: RandomSelector,
}

impl ImageCompositor {
    /// Compositor writing `<images_dir>/<edition>.png`
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas has a zero dimension or the static
    /// background colour is not a hex colour
    pub fn new(
        images_dir: impl Into<PathBuf>,
        format: Format,
        background: Background,
        seed: u64,
    ) -> Result<Self> {
        if format.width == 0 || format.height == 0 {
            return Err(invalid_parameter(
                "format",
                &format!("{}x{}", format.width, format.height),
                &"canvas dimensions must be positive",
            ));
        }

        let static_background = if background.generate && background.static_color {
            Some(parse_hex_color(&background.default).ok_or_else(|| {
                invalid_parameter(
                    "background.default",
                    &background.default,
                    &"expected #rrggbb or #rrggbbaa",
                )
            })?)
        } else {
            None
        };

        Ok(Self {
            canvas: RgbaImage::new(format.width, format.height),
            images_dir: images_dir.into(),
            format,
            background,
            static_background,
            random: RandomSelector::new(seed),
        })
    }

    /// Canvas as left by the last render
    pub const fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn paint_background(&mut self) {
        let color = if self.background.generate {
            self.static_background.unwrap_or_else(|| {
                let hue = (self.random.unit() * 360.0) as f32;
                hsl_to_rgba(hue, 1.0, self.background.brightness)
            })
        } else {
            [0, 0, 0, 0]
        };

        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba(color);
        }
    }

    fn load_layers(&self, selection: &[Selection<'_>]) -> Result<Vec<RgbaImage>> {
        let format = self.format;
        selection
            .par_iter()
            .map(|s| load_layer_image(&s.element.path, format))
            .collect()
    }

    fn copy_animation(&self, edition: usize, source: &Path) -> Result<()> {
        ensure_dir(&self.images_dir)?;
        let destination = self.images_dir.join(format!("{edition}.gif"));
        std::fs::copy(source, &destination)
            .map_err(|e| file_system(&destination, "copy animated element", e))?;
        Ok(())
    }
}

impl Renderer for ImageCompositor {
    fn render(&mut self, edition: usize, selection: &[Selection<'_>]) -> Result<RenderOutput> {
        let attributes = observed_attributes(selection);

        // A one-of-one animation is stored as-is instead of flattened to PNG
        if let Some(first) = selection.first()
            && first.element.extension().as_deref() == Some("gif")
        {
            self.copy_animation(edition, &first.element.path)?;
            return Ok(RenderOutput {
                file_extension: "gif".to_string(),
                attributes,
            });
        }

        let images = self.load_layers(selection)?;

        self.paint_background();
        for (s, image) in selection.iter().zip(&images) {
            composite_layer(&mut self.canvas, image, s.layer.blend, s.layer.opacity);
        }

        ensure_dir(&self.images_dir)?;
        let output_path = self.images_dir.join(format!("{edition}.png"));
        self.canvas
            .save(&output_path)
            .map_err(|e| GenerationError::ImageExport {
                path: output_path,
                source: e,
            })?;

        Ok(RenderOutput {
            file_extension: "png".to_string(),
            attributes,
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| file_system(dir, "create directory", e))
}

fn load_layer_image(path: &Path, format: Format) -> Result<RgbaImage> {
    let image = image::open(path)
        .map_err(|e| GenerationError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();

    if image.dimensions() == (format.width, format.height) {
        return Ok(image);
    }

    let filter = if format.smoothing {
        FilterType::Triangle
    } else {
        FilterType::Nearest
    };
    Ok(image::imageops::resize(
        &image,
        format.width,
        format.height,
        filter,
    ))
}

/// Draw `layer` over `canvas` with a blend mode and opacity
///
/// Both images must share dimensions; extra pixels of the larger one are ignored.
pub fn composite_layer(canvas: &mut RgbaImage, layer: &RgbaImage, mode: BlendMode, opacity: f32) {
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        *dst = Rgba(blend_pixel(dst.0, src.0, mode, opacity));
    }
}

fn blend_channel(mode: BlendMode, backdrop: f32, source: f32) -> f32 {
    match mode {
        BlendMode::SourceOver => source,
        BlendMode::Multiply => backdrop * source,
        BlendMode::Screen => backdrop.mul_add(-source, backdrop + source),
        BlendMode::Darken => backdrop.min(source),
        BlendMode::Lighten => backdrop.max(source),
        BlendMode::Difference => (backdrop - source).abs(),
    }
}

/// Composite one source pixel over a backdrop pixel
///
/// Separable blend followed by source-over compositing with straight alpha.
pub fn blend_pixel(backdrop: [u8; 4], source: [u8; 4], mode: BlendMode, opacity: f32) -> [u8; 4] {
    let to_unit = |v: u8| f32::from(v) / 255.0;
    let alpha_s = to_unit(source[3]) * opacity.clamp(0.0, 1.0);
    let alpha_b = to_unit(backdrop[3]);
    let alpha_o = alpha_b.mul_add(1.0 - alpha_s, alpha_s);

    if alpha_o <= f32::EPSILON {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for (channel, slot) in out.iter_mut().take(3).enumerate() {
        let cs = source.get(channel).copied().map_or(0.0, to_unit);
        let cb = backdrop.get(channel).copied().map_or(0.0, to_unit);
        let mixed = blend_channel(mode, cb, cs);

        let composed = (alpha_s * (1.0 - alpha_b)).mul_add(
            cs,
            (alpha_s * alpha_b).mul_add(mixed, (1.0 - alpha_s) * alpha_b * cb),
        );
        *slot = (composed / alpha_o * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    if let Some(alpha) = out.get_mut(3) {
        *alpha = (alpha_o * 255.0).round() as u8;
    }
    out
}
