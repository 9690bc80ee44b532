//! Chart deck construction.
//!
//! [`DeckExporter`] owns a presentation and adds the two kinds of slides a
//! chart deck is made of: a title slide with a gradient background and image
//! slides that center one chart below a title band. Geometry lives in
//! [`layout`], colors and fonts in [`theme`].
//!
//! ```rust,no_run
//! use chartdeck::deck::{DeckExporter, Theme};
//!
//! # fn main() -> chartdeck::Result<()> {
//! let mut deck = DeckExporter::new(Theme::default());
//! deck.add_title_slide("Performance", Some("Generated on March 05, 2024"));
//! deck.add_image_slide("chart_0.png", Some("Performance - Chart 1"))?;
//! std::fs::write("Performance.pptx", deck.save()?)?;
//! # Ok(())
//! # }
//! ```

mod exporter;
pub mod layout;
pub mod theme;

pub use exporter::DeckExporter;
pub use layout::{DeckLayout, ImageSlideParams, Rect, TitleSlideParams};
pub use theme::{Palette, Theme};
