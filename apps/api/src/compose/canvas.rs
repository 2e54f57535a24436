//! Fixed-size RGBA drawing surface.

use ab_glyph::{point, Font, GlyphId, ScaleFont};
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, Rgba, RgbaImage};

use crate::compose::ComposeError;
use crate::fonts::{px_scale, FontSet};
use crate::layout::DrawCommand;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub struct Canvas {
    pixels: RgbaImage,
    fill: Rgba<u8>,
}

impl Canvas {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            fill: WHITE,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn set_fill(&mut self, color: Rgba<u8>) {
        self.fill = color;
    }

    /// Stretches `image` to exactly cover the surface. Aspect ratio is not kept.
    pub fn draw_background(&mut self, image: &DynamicImage) {
        let stretched = image
            .resize_exact(self.width(), self.height(), FilterType::Triangle)
            .to_rgba8();
        for (dst, src) in self.pixels.pixels_mut().zip(stretched.pixels()) {
            blend(dst, *src, 1.0);
        }
    }

    /// Draws one line with its baseline at `cmd.y`. A metrics-only font set draws nothing.
    pub fn fill_text(&mut self, fonts: &FontSet, cmd: &DrawCommand) {
        let Some((face, embolden)) = fonts.face_for(&cmd.font) else {
            return;
        };
        let size = cmd.font.size as f32;
        let scale = px_scale(face, size);
        let scaled = face.as_scaled(scale);

        // Synthetic bold is a second pass shifted right by the embolden offset.
        let offsets = [0.0, embolden];
        let passes = if embolden > 0.0 { 2 } else { 1 };
        for &offset in &offsets[..passes] {
            let mut caret = cmd.x + offset;
            let mut prev: Option<GlyphId> = None;
            for c in cmd.text.chars() {
                let id = scaled.glyph_id(c);
                if let Some(prev) = prev {
                    caret += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(scale, point(caret, cmd.y));
                caret += scaled.h_advance(id);
                prev = Some(id);

                let Some(outlined) = face.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                let (width, height) = (self.width() as i64, self.height() as i64);
                let color = self.fill;
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    if px >= 0 && py >= 0 && px < width && py < height {
                        let pixel = self.pixels.get_pixel_mut(px as u32, py as u32);
                        blend(pixel, color, coverage);
                    }
                });
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ComposeError> {
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                self.pixels.as_raw(),
                self.width(),
                self.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(ComposeError::Encoding)?;
        Ok(buf)
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Source-over blend of `src` at `coverage` (0..=1) onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let alpha = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for i in 0..3 {
        let s = src[i] as f32 * alpha;
        let d = dst[i] as f32 * dst_alpha * (1.0 - alpha);
        dst[i] = ((s + d) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FontDescriptor, FontWeight};
    use image::Rgb;

    fn line(text: &str, x: f32, y: f32, size: u32, weight: FontWeight) -> DrawCommand {
        DrawCommand {
            text: text.into(),
            x,
            y,
            font: FontDescriptor::new("Sans", size, weight),
        }
    }

    fn lit_pixels(canvas: &Canvas) -> Vec<(u32, u32)> {
        canvas
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] > 0)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert!(canvas.pixels().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_background_is_stretched_to_surface() {
        let mut canvas = Canvas::new(20, 10);
        let red = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(3, 7, Rgb([200, 10, 10])));
        canvas.draw_background(&red);
        assert!(canvas
            .pixels()
            .pixels()
            .all(|p| *p == Rgba([200, 10, 10, 255])));
    }

    #[test]
    fn test_blend_full_coverage_replaces_pixel() {
        let mut px = Rgba([0, 0, 0, 255]);
        blend(&mut px, WHITE, 1.0);
        assert_eq!(px, WHITE);
    }

    #[test]
    fn test_blend_half_coverage_mixes() {
        let mut px = Rgba([0, 0, 0, 255]);
        blend(&mut px, WHITE, 0.5);
        assert_eq!(px, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_blend_zero_coverage_is_noop() {
        let mut px = Rgba([10, 20, 30, 40]);
        blend(&mut px, WHITE, 0.0);
        assert_eq!(px, Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_metrics_only_fonts_draw_nothing() {
        let mut canvas = Canvas::new(50, 50);
        let fonts = FontSet::metrics_only(None);
        canvas.fill_text(&fonts, &line("Hello", 5.0, 30.0, 20, FontWeight::Normal));
        assert!(canvas.pixels().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_glyphs_are_drawn_above_the_baseline() {
        let mut canvas = Canvas::new(400, 120);
        let fonts = FontSet::bundled();
        canvas.fill_text(&fonts, &line("Hello", 10.0, 80.0, 48, FontWeight::Normal));

        let lit = lit_pixels(&canvas);
        assert!(!lit.is_empty());
        // "Hello" has no descenders: ink sits between cap height and the baseline.
        assert!(lit.iter().all(|&(x, y)| x >= 10 && (30..=81).contains(&y)));
        assert!(canvas
            .pixels()
            .pixels()
            .filter(|p| p[3] > 0)
            .all(|p| p[0] == 255 && p[1] == 255 && p[2] == 255));
    }

    #[test]
    fn test_synthetic_bold_inks_more_than_regular() {
        let dir = tempfile::tempdir().unwrap();
        let face = dir.path().join("Plain.ttf");
        std::fs::copy(crate::fonts::bundled_regular_face(), &face).unwrap();
        let fonts = FontSet::discover_from(&[face], &[], &[]);
        assert!(!fonts.has_bold_face());

        let mut regular = Canvas::new(400, 120);
        regular.fill_text(&fonts, &line("Hello", 10.0, 80.0, 48, FontWeight::Normal));
        let mut bold = Canvas::new(400, 120);
        bold.fill_text(&fonts, &line("Hello", 10.0, 80.0, 48, FontWeight::Bold));

        assert!(lit_pixels(&bold).len() > lit_pixels(&regular).len());
    }

    #[test]
    fn test_text_outside_surface_is_clipped() {
        let mut canvas = Canvas::new(40, 40);
        let fonts = FontSet::bundled();
        canvas.fill_text(&fonts, &line("Hello world", -20.0, 30.0, 48, FontWeight::Bold));
        assert!(!lit_pixels(&canvas).is_empty());
    }

    #[test]
    fn test_encode_png_roundtrips_dimensions() {
        let canvas = Canvas::new(12, 8);
        let bytes = canvas.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 8));
    }
}
