//! Chart export: render figures, build the deck, clean up.
//!
//! The flow has two steps. [`ExportPipeline::prepare`] renders every figure
//! to a temporary PNG, and [`ExportPipeline::generate`] turns the prepared
//! images into a deck and deletes them. [`ExportPipeline::run`] does both.

use crate::Result;
use crate::config::ExportConfig;
use crate::deck::{DeckExporter, DeckLayout, Theme};
use crate::render::{Figure, FigureRenderer, export_figures_to_temp_files};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// MIME type of a .pptx file.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Subtitle of the title slide, e.g. `Generated on March 05, 2024`.
pub fn generated_on(at: NaiveDateTime) -> String {
    format!("Generated on {}", at.format("%B %d, %Y"))
}

/// File name offered for download, e.g. `Performance_Charts_20240305_141500.pptx`.
pub fn download_file_name(page_name: &str, at: NaiveDateTime) -> String {
    format!("{}_Charts_{}.pptx", page_name, at.format("%Y%m%d_%H%M%S"))
}

/// Build a deck from chart images.
///
/// The deck opens with a title slide for `page_name`. Each slot holding an
/// existing file becomes an image slide titled `"{page_name} - Chart {i + 1}"`,
/// where `i` is the slot index, so failed charts leave gaps in the numbering.
pub fn create_ppt_from_images<P: AsRef<Path>>(
    image_paths: &[Option<P>],
    page_name: &str,
    theme: &Theme,
    layout: &DeckLayout,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>> {
    let mut deck = DeckExporter::with_params(theme.clone(), *layout)?;
    deck.set_document_title(page_name);
    deck.add_title_slide(page_name, Some(&generated_on(generated_at)));

    for (index, slot) in image_paths.iter().enumerate() {
        let Some(path) = slot else {
            continue;
        };
        let path: &Path = path.as_ref();
        if !path.exists() {
            warn!(chart = index + 1, path = %path.display(), "chart image missing, skipping");
            continue;
        }
        let title = format!("{} - Chart {}", page_name, index + 1);
        deck.add_image_slide(path, Some(&title))?;
    }

    let bytes = deck.save()?;
    info!(slides = deck.slide_count(), bytes = bytes.len(), "deck built");
    Ok(bytes)
}

/// Delete temporary chart images. Errors are logged and ignored.
pub fn cleanup_temp_files<P: AsRef<Path>>(paths: &[Option<P>]) {
    for path in paths.iter().flatten() {
        let path: &Path = path.as_ref();
        if !path.exists() {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "temp file removed"),
            Err(e) => debug!(path = %path.display(), error = %e, "could not remove temp file"),
        }
    }
}

/// Chart images rendered by [`ExportPipeline::prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCharts {
    /// One slot per figure; `None` where rendering failed
    pub paths: Vec<Option<PathBuf>>,
}

impl PreparedCharts {
    pub fn total(&self) -> usize {
        self.paths.len()
    }

    /// Number of charts that rendered.
    pub fn prepared(&self) -> usize {
        self.paths.iter().filter(|p| p.is_some()).count()
    }

    /// Delete the images without building a deck.
    pub fn discard(self) {
        cleanup_temp_files(&self.paths);
    }
}

/// A finished deck, ready to be saved or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub prepared: usize,
    pub total: usize,
}

impl ExportArtifact {
    /// Write the deck into `dir` under its file name.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "deck written");
        Ok(path)
    }
}

/// Renders figure columns and assembles them into a deck.
#[derive(Debug)]
pub struct ExportPipeline<R> {
    renderer: R,
    config: ExportConfig,
}

impl<R: FigureRenderer> ExportPipeline<R> {
    pub fn new(renderer: R, config: ExportConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render all figures, first column first, to temporary files.
    pub fn prepare(&self, columns: &[Vec<Figure>]) -> PreparedCharts {
        let figures: Vec<Figure> = columns.iter().flatten().cloned().collect();
        info!(total = figures.len(), "exporting charts to images");

        let paths = export_figures_to_temp_files(
            &figures,
            &self.renderer,
            &self.config.render,
            self.config.temp_dir.as_deref(),
        );
        let prepared = PreparedCharts { paths };
        info!("Prepared {}/{} charts", prepared.prepared(), prepared.total());
        prepared
    }

    /// Build the deck from prepared images, stamped with the current local time.
    pub fn generate(&self, prepared: PreparedCharts) -> Result<ExportArtifact> {
        self.generate_at(prepared, Local::now().naive_local())
    }

    /// Build the deck from prepared images.
    ///
    /// The images are deleted whether or not the deck could be built.
    pub fn generate_at(
        &self,
        prepared: PreparedCharts,
        at: NaiveDateTime,
    ) -> Result<ExportArtifact> {
        let result = create_ppt_from_images(
            &prepared.paths,
            &self.config.page_name,
            &self.config.theme,
            &self.config.layout,
            at,
        );
        cleanup_temp_files(&prepared.paths);

        let bytes = result?;
        Ok(ExportArtifact {
            file_name: download_file_name(&self.config.page_name, at),
            mime: PPTX_MIME,
            bytes,
            prepared: prepared.prepared(),
            total: prepared.total(),
        })
    }

    /// Prepare and generate in one step.
    pub fn run(&self, columns: &[Vec<Figure>]) -> Result<ExportArtifact> {
        let prepared = self.prepare(columns);
        if prepared.total() == 0 {
            warn!("no figures to export, the deck only has a title slide");
        }
        self.generate(prepared)
    }
}
