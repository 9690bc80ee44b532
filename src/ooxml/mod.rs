//! Office Open XML (OOXML) writer.
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): package structure (parts, relationships,
//!    content types) and the ZIP container
//! 2. **PresentationML** (`pptx`): slides, shapes and the fixed parts a
//!    PowerPoint deck needs
//!
//! # Example
//!
//! ```rust,no_run
//! use chartdeck::ooxml::pptx::{LineStyle, MutablePresentation, ShapeFill};
//! use chartdeck::common::RGBColor;
//!
//! let mut pres = MutablePresentation::new();
//! let slide = pres.add_slide();
//! slide.add_rectangle(
//!     0,
//!     0,
//!     9_144_000,
//!     5_143_500,
//!     ShapeFill::Solid(RGBColor::WHITE),
//!     LineStyle::None,
//! );
//! pres.save("deck.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
