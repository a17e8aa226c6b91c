//! Tests for pixel blending, layer compositing and image export

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use layergen::GenerationError;
    use layergen::algorithm::dna::Selection;
    use layergen::algorithm::render::Renderer;
    use layergen::io::configuration::{Background, BlendMode, Format};
    use layergen::io::image::{ImageCompositor, blend_pixel, composite_layer};
    use layergen::layers::{Element, Layer};
    use std::path::Path;

    const FORMAT: Format = Format {
        width: 2,
        height: 2,
        smoothing: false,
    };

    fn no_background() -> Background {
        Background {
            generate: false,
            ..Background::default()
        }
    }

    fn solid(path: &Path, size: u32, color: [u8; 4]) {
        RgbaImage::from_pixel(size, size, Rgba(color))
            .save(path)
            .expect("write test image");
    }

    fn layer(id: usize, dir: &Path, filename: &str) -> Layer {
        let element = Element::from_filename(0, filename, dir.join(filename), '#');
        Layer::new(id, format!("layer{id}"), vec![element])
    }

    fn select(layers: &[Layer]) -> Vec<Selection<'_>> {
        layers
            .iter()
            .map(|layer| Selection {
                layer,
                element: layer.elements.first().expect("element"),
            })
            .collect()
    }

    // Tests an opaque source replaces the backdrop
    // Verified by swapping source and backdrop
    #[test]
    fn test_source_over_opaque() {
        let out = blend_pixel([0, 0, 255, 255], [255, 0, 0, 255], BlendMode::SourceOver, 1.0);

        assert_eq!(out, [255, 0, 0, 255]);
    }

    // Tests a transparent source or zero opacity keeps the backdrop
    // Verified by ignoring source alpha
    #[test]
    fn test_transparent_source_keeps_backdrop() {
        let backdrop = [10, 20, 30, 255];

        assert_eq!(
            blend_pixel(backdrop, [255, 255, 255, 0], BlendMode::SourceOver, 1.0),
            backdrop
        );
        assert_eq!(
            blend_pixel(backdrop, [255, 255, 255, 255], BlendMode::Screen, 0.0),
            backdrop
        );
        assert_eq!(
            blend_pixel([0, 0, 0, 0], [0, 0, 0, 0], BlendMode::Multiply, 1.0),
            [0, 0, 0, 0]
        );
    }

    // Tests separable blend modes on opaque pixels
    // Verified by mixing up darken and lighten
    #[test]
    fn test_blend_modes() {
        let backdrop = [200, 100, 0, 255];
        let source = [100, 200, 255, 255];

        assert_eq!(blend_pixel(backdrop, source, BlendMode::Darken, 1.0), [100, 100, 0, 255]);
        assert_eq!(blend_pixel(backdrop, source, BlendMode::Lighten, 1.0), [200, 200, 255, 255]);
        assert_eq!(blend_pixel(backdrop, source, BlendMode::Difference, 1.0), [100, 100, 255, 255]);
        assert_eq!(
            blend_pixel([255, 255, 255, 255], [255, 128, 0, 255], BlendMode::Multiply, 1.0),
            [255, 128, 0, 255]
        );
        assert_eq!(
            blend_pixel([0, 0, 0, 255], [255, 128, 0, 255], BlendMode::Screen, 1.0),
            [255, 128, 0, 255]
        );
    }

    // Tests half opacity mixes evenly over an opaque backdrop
    // Verified by applying opacity to the colour instead of alpha
    #[test]
    fn test_half_opacity() {
        let out = blend_pixel([0, 0, 0, 255], [255, 255, 255, 255], BlendMode::SourceOver, 0.5);

        assert_eq!(out, [128, 128, 128, 255]);
    }

    // Tests compositing touches every pixel
    // Verified by compositing only the first row
    #[test]
    fn test_composite_layer() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let layer = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));

        composite_layer(&mut canvas, &layer, BlendMode::SourceOver, 1.0);

        assert!(canvas.pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }

    // Tests invalid canvas and background settings are rejected
    // Verified by accepting zero-sized canvases
    #[test]
    fn test_compositor_validation() {
        let dir = tempfile::tempdir().expect("temp dir");
        let zero = Format {
            width: 0,
            ..FORMAT
        };
        let bad_color = Background {
            static_color: true,
            default: "not a colour".to_string(),
            ..Background::default()
        };

        assert!(matches!(
            ImageCompositor::new(dir.path(), zero, Background::default(), 1),
            Err(GenerationError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ImageCompositor::new(dir.path(), FORMAT, bad_color, 1),
            Err(GenerationError::InvalidParameter { .. })
        ));
    }

    // Tests layers are drawn in order, resized to the canvas and saved
    // Verified by drawing layers in reverse order
    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().expect("temp dir");
        let images = dir.path().join("images");
        solid(&dir.path().join("red.png"), 2, [255, 0, 0, 255]);
        solid(&dir.path().join("dot.png"), 1, [0, 0, 255, 255]);
        let layers = vec![layer(0, dir.path(), "red.png"), layer(1, dir.path(), "dot.png")];

        let mut compositor =
            ImageCompositor::new(&images, FORMAT, no_background(), 1).expect("valid settings");
        let output = compositor.render(4, &select(&layers)).expect("renders");

        assert_eq!(output.file_extension, "png");
        assert_eq!(output.attributes.len(), 2);
        let saved = image::open(images.join("4.png")).expect("saved image").to_rgba8();
        assert_eq!(saved.dimensions(), (2, 2));
        assert!(saved.pixels().all(|p| p.0 == [0, 0, 255, 255]));
        assert_eq!(compositor.canvas().dimensions(), (2, 2));
    }

    // Tests a static background is painted under transparent layers
    // Verified by skipping the background pass
    #[test]
    fn test_static_background() {
        let dir = tempfile::tempdir().expect("temp dir");
        solid(&dir.path().join("clear.png"), 2, [0, 0, 0, 0]);
        let layers = vec![layer(0, dir.path(), "clear.png")];
        let background = Background {
            static_color: true,
            default: "#336699".to_string(),
            ..Background::default()
        };

        let mut compositor =
            ImageCompositor::new(dir.path().join("images"), FORMAT, background, 1)
                .expect("valid settings");
        compositor.render(1, &select(&layers)).expect("renders");

        assert!(compositor.canvas().pixels().all(|p| p.0 == [0x33, 0x66, 0x99, 255]));
    }

    // Tests an animated first element is copied instead of composited
    // Verified by decoding the animation as a still layer
    #[test]
    fn test_gif_is_copied() {
        let dir = tempfile::tempdir().expect("temp dir");
        let images = dir.path().join("images");
        std::fs::write(dir.path().join("spin.gif"), b"GIF89a").expect("write gif");
        let layers = vec![layer(0, dir.path(), "spin.gif")];

        let mut compositor =
            ImageCompositor::new(&images, FORMAT, no_background(), 1).expect("valid settings");
        let output = compositor.render(2, &select(&layers)).expect("copies");

        assert_eq!(output.file_extension, "gif");
        assert_eq!(std::fs::read(images.join("2.gif")).expect("copied"), b"GIF89a");
    }

    // Tests an unreadable layer image is reported with its path
    // Verified by skipping layers that fail to load
    #[test]
    fn test_missing_layer_image() {
        let dir = tempfile::tempdir().expect("temp dir");
        let layers = vec![layer(0, dir.path(), "missing.png")];

        let mut compositor = ImageCompositor::new(dir.path().join("images"), FORMAT, no_background(), 1)
            .expect("valid settings");

        assert!(matches!(
            compositor.render(1, &select(&layers)),
            Err(GenerationError::ImageLoad { .. })
        ));
    }

    // Tests layers decoded in parallel are still composited in layer order
    // Verified by collecting decoded layers in completion order
    #[test]
    fn test_parallel_decoding_keeps_layer_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let layers: Vec<Layer> = (0..8u8)
            .map(|i| {
                let filename = format!("shade{i}.png");
                solid(&dir.path().join(&filename), 2, [i * 30, 0, 255 - i * 30, 255]);
                layer(usize::from(i), dir.path(), &filename)
            })
            .collect();

        let mut compositor = ImageCompositor::new(dir.path().join("images"), FORMAT, no_background(), 1)
            .expect("valid settings");
        let output = compositor.render(1, &select(&layers)).expect("renders");

        assert_eq!(output.attributes.len(), 8);
        assert!(compositor.canvas().pixels().all(|p| p.0 == [210, 0, 45, 255]));
    }

    // Tests one unreadable image among several fails the whole edition
    // Verified by dropping failed decodes from the parallel collect
    #[test]
    fn test_parallel_decoding_reports_missing_layer() {
        let dir = tempfile::tempdir().expect("temp dir");
        solid(&dir.path().join("red.png"), 2, [255, 0, 0, 255]);
        solid(&dir.path().join("blue.png"), 2, [0, 0, 255, 255]);
        let layers = vec![
            layer(0, dir.path(), "red.png"),
            layer(1, dir.path(), "gone.png"),
            layer(2, dir.path(), "blue.png"),
        ];

        let mut compositor = ImageCompositor::new(dir.path().join("images"), FORMAT, no_background(), 1)
            .expect("valid settings");

        assert!(matches!(
            compositor.render(1, &select(&layers)),
            Err(GenerationError::ImageLoad { path, .. }) if path.ends_with("gone.png")
        ));
        assert!(!dir.path().join("images").join("1.png").exists());
    }
}
