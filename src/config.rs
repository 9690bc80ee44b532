//! Export configuration.
//!
//! Every field has a default, so a configuration file only lists what it
//! changes:
//!
//! ```yaml
//! page_name: Sales
//! theme:
//!   font: Calibri
//!   colors:
//!     primary: "1F4E79"
//! render:
//!   scale: 1.0
//! layout:
//!   image_slide:
//!     title_band: 0.9in
//! ```

use crate::deck::{DeckLayout, Theme};
use crate::render::RenderOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Deck title and file name stem
    pub page_name: String,
    pub theme: Theme,
    pub render: RenderOptions,
    pub layout: DeckLayout,
    /// Directory for rendered chart images, the system temp dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    /// Directory the deck is written to, the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_name: "Performance".to_string(),
            theme: Theme::default(),
            render: RenderOptions::default(),
            layout: DeckLayout::default(),
            temp_dir: None,
            output_dir: None,
        }
    }
}

impl ExportConfig {
    /// Load the configuration at `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_yaml_str(&text).map_err(|e| match e {
                    Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
                    other => other,
                })?;
                info!(path = %path.display(), "configuration loaded");
                Ok(config)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "configuration file not found, using defaults");
                Ok(Self::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("invalid YAML: {}", e)))?;
        config.layout.validate()?;
        config.render.pixel_size()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration to YAML: {}", e)))
    }
}
