//! chartdeck CLI: render chart figures and assemble them into a .pptx deck.

use anyhow::{Context, bail};
use chartdeck::config::ExportConfig;
use chartdeck::export::{create_ppt_from_images, download_file_name};
use chartdeck::render::{Figure, parse_column};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "chartdeck",
    version = env!("CARGO_PKG_VERSION"),
    about = "Render charts into a PowerPoint deck"
)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, default_value = "chartdeck.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render figure files and build a deck from them
    Export {
        /// Deck title, overrides the configuration
        #[arg(short, long)]
        page_name: Option<String>,

        /// Output directory, overrides the configuration
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// JSON files, each holding one column of figures
        #[arg(required = true)]
        figures: Vec<PathBuf>,
    },
    /// Build a deck from existing images
    Images {
        #[arg(short, long)]
        page_name: Option<String>,

        /// Output file, `<page name>_Charts_<timestamp>.pptx` when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Print the default configuration
    DefaultConfig,
}

fn read_columns(paths: &[PathBuf]) -> anyhow::Result<Vec<Vec<Figure>>> {
    paths
        .iter()
        .map(|path| {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_column(&json).with_context(|| format!("parsing {}", path.display()))
        })
        .collect()
}

fn output_dir(out: Option<PathBuf>, config: &ExportConfig) -> PathBuf {
    out.or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(feature = "raster")]
fn export(
    config: ExportConfig,
    columns: &[Vec<Figure>],
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    use chartdeck::export::ExportPipeline;
    use chartdeck::render::RasterRenderer;

    let pipeline = ExportPipeline::new(RasterRenderer::new(), config);
    let artifact = pipeline.run(columns)?;
    info!(
        prepared = artifact.prepared,
        total = artifact.total,
        "Prepared {}/{} charts",
        artifact.prepared,
        artifact.total
    );
    Ok(artifact.write_to_dir(out_dir)?)
}

#[cfg(not(feature = "raster"))]
fn export(
    _config: ExportConfig,
    _columns: &[Vec<Figure>],
    _out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    bail!("chartdeck was built without the `raster` feature; use `chartdeck images` instead")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chartdeck=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Export {
            page_name,
            out,
            figures,
        } => {
            let mut config = ExportConfig::load(&cli.config)?;
            if let Some(page_name) = page_name {
                config.page_name = page_name;
            }
            let out_dir = output_dir(out, &config);
            let columns = read_columns(&figures)?;

            let path = export(config, &columns, &out_dir)?;
            println!("{}", path.display());
        },
        Command::Images {
            page_name,
            out,
            images,
        } => {
            let mut config = ExportConfig::load(&cli.config)?;
            if let Some(page_name) = page_name {
                config.page_name = page_name;
            }
            if let Some(missing) = images.iter().find(|p| !p.exists()) {
                bail!("image not found: {}", missing.display());
            }

            let now = Local::now().naive_local();
            let slots: Vec<Option<PathBuf>> = images.into_iter().map(Some).collect();
            let bytes = create_ppt_from_images(
                &slots,
                &config.page_name,
                &config.theme,
                &config.layout,
                now,
            )?;

            let path = match out {
                Some(path) => path,
                None => output_dir(None, &config).join(download_file_name(&config.page_name, now)),
            };
            std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), slides = slots.len() + 1, "deck written");
            println!("{}", path.display());
        },
        Command::DefaultConfig => {
            print!("{}", ExportConfig::default().to_yaml_string()?);
        },
    }

    Ok(())
}
