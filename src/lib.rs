//! Chartdeck - render charts and assemble them into PowerPoint decks
//!
//! This library turns pre-computed chart figures into PNG images and places
//! them on the slides of a .pptx presentation.
//!
//! # Features
//!
//! - **PPTX writer**: Build presentations with rectangles, gradient fills,
//!   text boxes and pictures, and serialize them as Office Open XML packages
//! - **Deck layout**: Center and scale each chart below a title band on a
//!   16:9 canvas
//! - **Raster renderer**: Draw bar, line and area charts with tiny-skia
//!   (feature `raster`, enabled by default)
//! - **Export pipeline**: Render figures to temporary files, build the deck
//!   and clean up afterwards
//!
//! # Example - Exporting figures
//!
//! ```no_run
//! use chartdeck::config::ExportConfig;
//! use chartdeck::export::ExportPipeline;
//! use chartdeck::render::{ChartKind, Figure, RasterRenderer, Series};
//!
//! # fn main() -> chartdeck::Result<()> {
//! let revenue = Figure::new(ChartKind::Bar)
//!     .with_title("Revenue")
//!     .with_series(Series::new("2024", vec![3.1, 4.0, 2.7]));
//!
//! let pipeline = ExportPipeline::new(RasterRenderer::new(), ExportConfig::default());
//! let artifact = pipeline.run(&[vec![revenue]])?;
//! let path = artifact.write_to_dir(".")?;
//! println!("{} ({})", path.display(), artifact.mime);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Building a deck from images
//!
//! ```no_run
//! use chartdeck::deck::{DeckExporter, Theme};
//!
//! # fn main() -> chartdeck::Result<()> {
//! let mut deck = DeckExporter::new(Theme::default());
//! deck.add_title_slide("Performance", None);
//! deck.add_image_slide("sales.png", Some("Performance - Chart 1"))?;
//! std::fs::write("performance.pptx", deck.save()?)?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod deck;
pub mod export;
pub mod ooxml;
pub mod render;

// Re-export commonly used types
pub use common::{Error, Result};
pub use config::ExportConfig;
pub use deck::DeckExporter;
pub use export::{ExportArtifact, ExportPipeline};
