//! Unified error types for chartdeck.
//!
//! This module provides a unified error type that encompasses errors from the
//! package writer, the chart renderer and the export pipeline, presenting a
//! consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
