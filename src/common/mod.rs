//! Common types, traits, and utilities shared across the crate.
//!
//! This module provides the unit conversions, colors, XML helpers and the
//! unified error type used by the package writer, the layout engine and the
//! export pipeline.

// Submodule declarations
pub mod error;
pub mod style;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use style::RGBColor;
pub use unit::Emu;
