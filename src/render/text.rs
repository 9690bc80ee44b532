//! Single-line text rasterization for chart titles, labels and legends.
//!
//! Glyphs come from the bundled DejaVu Sans face. A line is rendered into a
//! small coverage pixmap first and then composited onto the chart, so glyph
//! boxes that overlap never darken each other.

use crate::common::RGBColor;
use crate::{Error, Result};
use ab_glyph::{Font, FontRef, Glyph, PxScale, ScaleFont, point};
use tiny_skia::{ColorU8, Pixmap, PixmapPaint, Transform};

static FONT_DATA: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/fonts/DejaVuSans.ttf"
));

/// Horizontal anchor of a line relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone)]
pub(crate) struct TextPainter {
    font: FontRef<'static>,
}

impl TextPainter {
    pub fn new() -> Result<Self> {
        let font = FontRef::try_from_slice(FONT_DATA)
            .map_err(|e| Error::Render(format!("bundled font is unreadable: {}", e)))?;
        Ok(Self { font })
    }

    /// Position the glyphs of `text` on a line whose top edge is `y = 0`.
    fn layout(&self, text: &str, size: f32) -> (Vec<Glyph>, f32) {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0;
        let mut previous = None;

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(caret, scaled.ascent())));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }
        (glyphs, caret)
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size).1
    }

    pub fn line_height(&self, size: f32) -> f32 {
        self.font.as_scaled(PxScale::from(size)).height()
    }

    /// Draw one line of text; `y` is the top of the line box.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        size: f32,
        x: f32,
        y: f32,
        align: Align,
        color: RGBColor,
    ) {
        let (glyphs, width) = self.layout(text, size);
        let outlines: Vec<_> = glyphs
            .into_iter()
            .filter_map(|glyph| self.font.outline_glyph(glyph))
            .collect();
        if outlines.is_empty() {
            return;
        }

        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for outline in &outlines {
            let bounds = outline.px_bounds();
            min_x = min_x.min(bounds.min.x);
            min_y = min_y.min(bounds.min.y);
            max_x = max_x.max(bounds.max.x);
            max_y = max_y.max(bounds.max.y);
        }
        let run_width = (max_x - min_x).ceil() as u32;
        let run_height = (max_y - min_y).ceil() as u32;
        let Some(mut run) = Pixmap::new(run_width, run_height) else {
            return;
        };

        let mut coverage = vec![0.0_f32; run_width as usize * run_height as usize];
        for outline in &outlines {
            let bounds = outline.px_bounds();
            let offset_x = (bounds.min.x - min_x).round() as u32;
            let offset_y = (bounds.min.y - min_y).round() as u32;
            outline.draw(|gx, gy, value| {
                let (px, py) = (offset_x + gx, offset_y + gy);
                if px < run_width && py < run_height {
                    let cell = &mut coverage[(py * run_width + px) as usize];
                    *cell = cell.max(value);
                }
            });
        }

        for (pixel, value) in run.pixels_mut().iter_mut().zip(&coverage) {
            let alpha = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
            *pixel = ColorU8::from_rgba(color.r, color.g, color.b, alpha).premultiply();
        }

        let left = match align {
            Align::Start => x,
            Align::Center => x - width / 2.0,
            Align::End => x - width,
        };
        pixmap.draw_pixmap(
            (left + min_x).round() as i32,
            (y + min_y).round() as i32,
            run.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}
