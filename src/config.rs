use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PluckError, PluckResult};

/// Runtime configuration. Defaults carry the page ranges the tool was
/// originally written around (a textbook unit on pages 60-70, rendered out to
/// page 80); every field can be overridden by a TOML file, `PAGEPLUCK_*`
/// environment variables, or command-line flags, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluckConfig {
    /// Source PDF to extract from
    pub source: Option<PathBuf>,
    pub text: TextConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// First page to extract (1-based, inclusive)
    pub first_page: u32,

    /// Last page to extract (1-based, inclusive; clamped to the document)
    pub last_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// First page to render (1-based, inclusive)
    pub first_page: u32,

    /// Last page to render (1-based, inclusive; clamped to the document)
    pub last_page: u32,

    /// Directory the PNG files are written to (created if absent)
    pub output_dir: PathBuf,

    /// Magnification factor applied to both axes when rasterizing
    pub scale: f32,

    /// Characters of first-page text printed as a preview
    pub preview_chars: usize,
}

impl Default for PluckConfig {
    fn default() -> Self {
        Self {
            source: None,
            text: TextConfig::default(),
            images: ImageConfig::default(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            first_page: 60,
            last_page: 70,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            first_page: 60,
            last_page: 80,
            output_dir: PathBuf::from("pages"),
            scale: 2.0,
            preview_chars: 800,
        }
    }
}

impl PluckConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Failed to read config file: {}", e))?;

        let config: PluckConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    /// Override fields from `PAGEPLUCK_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(source) = std::env::var("PAGEPLUCK_SOURCE") {
            self.source = Some(PathBuf::from(source));
        }

        if let Ok(output_dir) = std::env::var("PAGEPLUCK_OUTPUT_DIR") {
            self.images.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(scale) = std::env::var("PAGEPLUCK_SCALE") {
            if let Ok(value) = scale.parse::<f32>() {
                self.images.scale = value;
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        Ok(())
    }

    pub fn require_source(&self) -> PluckResult<&Path> {
        self.source.as_deref().ok_or_else(|| {
            PluckError::configuration(
                "no source PDF given; pass one on the command line, in the config file, \
                 or via PAGEPLUCK_SOURCE",
            )
        })
    }
}
