//! PowerPoint (.pptx) presentation writing.
//!
//! A presentation is built in memory with [`MutablePresentation`] and
//! serialized into a package holding one blank slide layout, one slide
//! master, the Office theme and one part per slide and embedded picture.
//!
//! ```rust,no_run
//! use chartdeck::common::RGBColor;
//! use chartdeck::ooxml::pptx::{MutablePresentation, ShapeFill, LineStyle};
//!
//! let mut pres = MutablePresentation::with_size(9_144_000, 5_143_500);
//! let slide = pres.add_slide();
//! let band = ShapeFill::solid(RGBColor::BLACK);
//! slide.add_rectangle(0, 0, 9_144_000, 1_714_500, band, LineStyle::None);
//! slide
//!     .add_text_box("Sales", 457_200, 274_320, 8_229_600, 731_520)
//!     .font_size(28.0)
//!     .bold(true);
//! pres.save("sales.pptx")?;
//! # Ok::<(), chartdeck::ooxml::OoxmlError>(())
//! ```

pub mod fill;
pub mod format;
pub mod template;
pub mod writer;

pub use fill::{GradientStop, LineStyle, ShapeFill};
pub use format::{ImageFormat, TextFormat};
pub use writer::{MutablePresentation, MutableShape, MutableSlide};
