//! Rendering chart figures to PNG images.
//!
//! Renderers implement [`FigureRenderer`]. The built-in [`RasterRenderer`]
//! (feature `raster`, on by default) draws with tiny-skia; other backends
//! can be plugged into the export pipeline through the same trait.

pub mod figure;
#[cfg(feature = "raster")]
pub mod raster;
pub mod temp;
#[cfg(feature = "raster")]
mod text;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub use figure::{ChartKind, Figure, Series, parse_column};
#[cfg(feature = "raster")]
pub use raster::RasterRenderer;
pub use temp::export_figures_to_temp_files;

/// Output size of a rendered figure.
///
/// The image is `width * scale` by `height * scale` pixels; line widths and
/// margins grow with `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 788,
            scale: 2.0,
        }
    }
}

impl RenderOptions {
    /// Pixel size of the output image.
    pub fn pixel_size(&self) -> Result<(u32, u32)> {
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(Error::Render(format!("invalid scale {}", self.scale)));
        }
        let width = (self.width as f32 * self.scale).round() as u32;
        let height = (self.height as f32 * self.scale).round() as u32;
        if width == 0 || height == 0 {
            return Err(Error::Render(format!(
                "output size {}x{} is empty",
                width, height
            )));
        }
        Ok((width, height))
    }
}

/// Turns a figure into an encoded PNG.
pub trait FigureRenderer {
    fn render_png(&self, figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>>;
}

impl<R: FigureRenderer + ?Sized> FigureRenderer for &R {
    fn render_png(&self, figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
        (**self).render_png(figure, options)
    }
}
