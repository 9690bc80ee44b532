//! Rendering figures to temporary PNG files.

use super::{Figure, FigureRenderer, RenderOptions};
use crate::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Render every figure to its own temporary PNG file.
///
/// The result has one slot per figure, in order. A slot is `None` when that
/// figure failed to render; the remaining figures are still rendered. Files
/// are named `chart_{i}_XXXXXX.png` and created in `dir`, or in the system
/// temp directory when `dir` is `None`. They persist until deleted.
pub fn export_figures_to_temp_files<R: FigureRenderer + ?Sized>(
    figures: &[Figure],
    renderer: &R,
    options: &RenderOptions,
    dir: Option<&Path>,
) -> Vec<Option<PathBuf>> {
    figures
        .iter()
        .enumerate()
        .map(|(index, figure)| {
            match export_one(index, figure, renderer, options, dir) {
                Ok(path) => {
                    debug!(chart = index + 1, path = %path.display(), "chart exported");
                    Some(path)
                },
                Err(e) => {
                    error!(chart = index + 1, error = %e, "Failed to export chart {}", index + 1);
                    None
                },
            }
        })
        .collect()
}

fn export_one<R: FigureRenderer + ?Sized>(
    index: usize,
    figure: &Figure,
    renderer: &R,
    options: &RenderOptions,
    dir: Option<&Path>,
) -> Result<PathBuf> {
    let png = renderer.render_png(figure, options)?;

    let prefix = format!("chart_{}_", index);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".png");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(&png)?;
    file.flush()?;

    // Dropping a NamedTempFile deletes it; keep it for the deck step.
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}
