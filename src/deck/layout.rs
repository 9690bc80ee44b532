//! Slide geometry.
//!
//! Every rectangle is computed in EMU from a [`DeckLayout`]. The defaults
//! describe a 16:9 deck (10in x 5.625in) whose image slides reserve a 0.8in
//! title band above the picture and a dark band over the bottom third.

use crate::common::unit::{Emu, Length};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default canvas width, 10in.
pub const SLIDE_WIDTH: Emu = 9_144_000;
/// Default canvas height, 5.625in.
pub const SLIDE_HEIGHT: Emu = 5_143_500;

/// An axis-aligned rectangle in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: Emu,
    pub y: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    pub const fn new(x: Emu, y: Emu, width: Emu, height: Emu) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> Emu {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> Emu {
        self.y + self.height
    }

    /// Horizontal center, possibly half an EMU off.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }
}

/// A rectangle written with units in configuration, e.g. `x: 0.5in`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl BoxSpec {
    pub const fn inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Length::inches(x),
            y: Length::inches(y),
            width: Length::inches(width),
            height: Length::inches(height),
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x.to_emu(),
            self.y.to_emu(),
            self.width.to_emu(),
            self.height.to_emu(),
        )
    }
}

/// Slide size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: Length,
    pub height: Length,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Length::inches(10.0),
            height: Length::inches(5.625),
        }
    }
}

impl Canvas {
    pub fn width_emu(&self) -> Emu {
        self.width.to_emu()
    }

    pub fn height_emu(&self) -> Emu {
        self.height.to_emu()
    }

    pub fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.width_emu(), self.height_emu())
    }
}

/// Title slide boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleSlideParams {
    pub title: BoxSpec,
    pub subtitle: BoxSpec,
}

impl Default for TitleSlideParams {
    fn default() -> Self {
        Self {
            title: BoxSpec::inches(0.5, 1.0, 9.0, 1.5),
            subtitle: BoxSpec::inches(0.5, 2.5, 9.0, 1.0),
        }
    }
}

/// Image slide parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSlideParams {
    /// Space above the picture, also its top edge
    pub title_band: Length,
    /// Side margin used to fit the picture and the title box
    pub side_margin: Length,
    /// Top of the title box
    pub title_top: Length,
    pub title_height: Length,
    /// Factor applied to the fitted picture
    pub picture_scale: f64,
    /// Shift of the picture center to the left of the canvas center
    pub center_offset: Length,
    /// The bottom band covers `1 / band_divisor` of the canvas height
    pub band_divisor: u32,
}

impl Default for ImageSlideParams {
    fn default() -> Self {
        Self {
            title_band: Length::inches(0.8),
            side_margin: Length::inches(0.5),
            title_top: Length::inches(0.3),
            title_height: Length::inches(0.8),
            picture_scale: 0.92,
            center_offset: Length::inches(0.15),
            band_divisor: 3,
        }
    }
}

/// Complete deck geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckLayout {
    pub canvas: Canvas,
    pub title_slide: TitleSlideParams,
    pub image_slide: ImageSlideParams,
}

/// Rectangles of a title slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleSlideLayout {
    pub background: Rect,
    pub title: Rect,
    pub subtitle: Rect,
}

/// Rectangles of an image slide, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlideLayout {
    pub background: Rect,
    pub band: Rect,
    pub picture: Rect,
    pub title: Rect,
}

impl DeckLayout {
    /// Check that the geometry can produce slides.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.canvas.width_emu(), self.canvas.height_emu());
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidLayout(format!(
                "canvas must be positive, got {}x{} EMU",
                width, height
            )));
        }

        let params = &self.image_slide;
        if !(params.picture_scale > 0.0 && params.picture_scale.is_finite()) {
            return Err(Error::InvalidLayout(format!(
                "picture scale must be positive, got {}",
                params.picture_scale
            )));
        }
        if params.band_divisor == 0 {
            return Err(Error::InvalidLayout("band divisor must not be zero".to_string()));
        }
        if width - 2 * params.side_margin.to_emu() <= 0 {
            return Err(Error::InvalidLayout(format!(
                "side margin {} leaves no room on a {} EMU wide canvas",
                params.side_margin, width
            )));
        }
        if params.title_band.to_emu() >= height {
            return Err(Error::InvalidLayout(format!(
                "title band {} covers the whole canvas",
                params.title_band
            )));
        }

        Ok(())
    }

    pub fn title_slide(&self) -> TitleSlideLayout {
        TitleSlideLayout {
            background: self.canvas.full_rect(),
            title: self.title_slide.title.to_rect(),
            subtitle: self.title_slide.subtitle.to_rect(),
        }
    }

    /// Lay out an image slide for a picture of `px_width` x `px_height` pixels.
    pub fn image_slide(&self, px_width: u32, px_height: u32) -> Result<ImageSlideLayout> {
        let canvas_w = self.canvas.width_emu();
        let canvas_h = self.canvas.height_emu();
        let params = &self.image_slide;
        let side_margin = params.side_margin.to_emu();

        let band_h = canvas_h / params.band_divisor.max(1) as Emu;
        let band = Rect::new(0, canvas_h - band_h, canvas_w, band_h);

        let title = Rect::new(
            side_margin,
            params.title_top.to_emu(),
            canvas_w - 2 * side_margin,
            params.title_height.to_emu(),
        );

        Ok(ImageSlideLayout {
            background: self.canvas.full_rect(),
            band,
            picture: self.picture_rect(px_width, px_height)?,
            title,
        })
    }

    /// Fit, scale and center a picture below the title band.
    pub fn picture_rect(&self, px_width: u32, px_height: u32) -> Result<Rect> {
        if px_width == 0 || px_height == 0 {
            return Err(Error::InvalidLayout(format!(
                "image has zero size ({}x{} px)",
                px_width, px_height
            )));
        }

        let canvas_w = self.canvas.width_emu();
        let canvas_h = self.canvas.height_emu();
        let params = &self.image_slide;
        let top = params.title_band.to_emu();

        // Fit to the width between the side margins
        let fit_width = canvas_w - 2 * params.side_margin.to_emu();
        let fit_height =
            (px_height as f64 * fit_width as f64 / px_width as f64).round_ties_even() as Emu;

        let mut width = (fit_width as f64 * params.picture_scale) as Emu;
        let mut height = (fit_height as f64 * params.picture_scale) as Emu;

        let available = canvas_h - top;
        if available <= 0 {
            return Err(Error::InvalidLayout(format!(
                "title band leaves no room for the picture on a {} EMU tall canvas",
                canvas_h
            )));
        }
        if top + height > canvas_h {
            let shrunk_width = (width as i128 * available as i128 / height as i128) as Emu;
            debug!(
                from_width = width,
                from_height = height,
                to_width = shrunk_width,
                to_height = available,
                "picture overflows the canvas bottom, shrinking"
            );
            width = shrunk_width;
            height = available;
        }

        let left = ((canvas_w - width) as f64 / 2.0 - params.center_offset.to_emu() as f64) as Emu;
        Ok(Rect::new(left, top, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::inches;
    use proptest::prelude::*;

    #[test]
    fn test_default_canvas() {
        let layout = DeckLayout::default();
        assert_eq!(layout.canvas.full_rect(), Rect::new(0, 0, SLIDE_WIDTH, SLIDE_HEIGHT));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_title_slide_boxes() {
        let slide = DeckLayout::default().title_slide();
        assert_eq!(slide.title, Rect::new(457_200, 914_400, 8_229_600, 1_371_600));
        assert_eq!(slide.subtitle, Rect::new(457_200, 2_286_000, 8_229_600, 914_400));
    }

    #[test]
    fn test_image_slide_for_rendered_chart() {
        // 1400x788 at scale 2
        let slide = DeckLayout::default().image_slide(2800, 1576).unwrap();

        assert_eq!(slide.band, Rect::new(0, 3_429_000, SLIDE_WIDTH, 1_714_500));
        assert_eq!(slide.band.bottom(), SLIDE_HEIGHT);
        assert_eq!(slide.title, Rect::new(457_200, 274_320, 8_229_600, 731_520));
        assert_eq!(slide.picture, Rect::new(649_224, 731_520, 7_571_232, 4_261_521));
    }

    #[test]
    fn test_wide_picture() {
        let picture = DeckLayout::default().picture_rect(1600, 900).unwrap();
        assert_eq!(picture.height, 4_258_818);
    }

    #[test]
    fn test_tall_picture_is_shrunk_to_canvas_bottom() {
        let picture = DeckLayout::default().picture_rect(1000, 1000).unwrap();
        assert_eq!(picture, Rect::new(2_228_850, 731_520, 4_411_980, 4_411_980));
        assert_eq!(picture.bottom(), SLIDE_HEIGHT);
    }

    #[test]
    fn test_zero_size_image_rejected() {
        let layout = DeckLayout::default();
        assert!(matches!(layout.picture_rect(0, 10), Err(Error::InvalidLayout(_))));
        assert!(matches!(layout.image_slide(10, 0), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_validate_rejects_degenerate_geometry() {
        let mut layout = DeckLayout::default();
        layout.image_slide.picture_scale = 0.0;
        assert!(layout.validate().is_err());

        let mut layout = DeckLayout::default();
        layout.canvas.height = Length::inches(0.5);
        assert!(layout.validate().is_err());

        let mut layout = DeckLayout::default();
        layout.image_slide.band_divisor = 0;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_custom_canvas() {
        let mut layout = DeckLayout::default();
        layout.canvas.width = Length::inches(13.333);
        layout.canvas.height = Length::inches(7.5);

        let slide = layout.image_slide(2800, 1576).unwrap();
        assert_eq!(slide.band.height, inches(7.5) / 3);
        assert_eq!(slide.title.width, inches(13.333) - inches(1.0));
        assert_eq!(slide.picture.y, inches(0.8));
    }

    proptest! {
        #[test]
        fn prop_picture_invariants(px_w in 16u32..4000, px_h in 16u32..4000) {
            let layout = DeckLayout::default();
            let picture = layout.picture_rect(px_w, px_h).unwrap();

            prop_assert_eq!(picture.y, inches(0.8));
            prop_assert!(picture.bottom() <= SLIDE_HEIGHT);
            prop_assert!(picture.width > 0 && picture.height > 0);

            let expected = px_w as f64 / px_h as f64;
            let actual = picture.width as f64 / picture.height as f64;
            prop_assert!((actual - expected).abs() / expected < 1e-3);

            let target = SLIDE_WIDTH as f64 / 2.0 - inches(0.15) as f64;
            prop_assert!((picture.center_x() - target).abs() <= 1.0);
        }
    }
}
