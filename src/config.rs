//! Gallery settings from `config.json`, overridden by command-line flags.

use crate::constants::{
    DEFAULT_MAX_RESIDENT_TEXTURES, DEFAULT_OVERSCAN_ROWS, DEFAULT_PREVIEW_COUNT,
    DEFAULT_THUMBNAIL_MAX_DIMENSION,
};
use crate::i18n::Lang;
use crate::reveal::RevealMode;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// JSON manifest or directory of photos.
    pub manifest: Option<PathBuf>,
    pub lang: Lang,
    pub preview_count: usize,
    /// Keep the preview layout until the viewport class or preview subset changes.
    pub stable_layout: bool,
    pub reveal_mode: RevealMode,
    pub overscan_rows: usize,
    pub thumbnail_max_dimension: u32,
    /// Decoded textures kept on the GPU; preview photos do not count against it.
    pub max_resident_textures: usize,
    pub prefer_webp: bool,
    /// Font covering 囍 and 福. Well-known system fonts are tried when unset.
    pub accent_font: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            lang: Lang::default(),
            preview_count: DEFAULT_PREVIEW_COUNT,
            stable_layout: true,
            reveal_mode: RevealMode::default(),
            overscan_rows: DEFAULT_OVERSCAN_ROWS,
            thumbnail_max_dimension: DEFAULT_THUMBNAIL_MAX_DIMENSION,
            max_resident_textures: DEFAULT_MAX_RESIDENT_TEXTURES,
            prefer_webp: true,
            accent_font: None,
        }
    }
}

impl GalleryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if it exists. A missing file gives the defaults silently; an
    /// unreadable or malformed one gives the defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Using config {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err}; falling back to defaults");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "vow-gallery", about = "Animated wedding photo gallery")]
pub struct Cli {
    /// Photo manifest (JSON list) or a directory of images.
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Config file to use instead of the per-user one.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub lang: Option<Lang>,

    #[arg(long)]
    pub preview_count: Option<usize>,

    #[arg(long, action = clap::ArgAction::Set)]
    pub stable_layout: Option<bool>,

    #[arg(long, value_enum)]
    pub reveal_mode: Option<RevealMode>,
}

impl Cli {
    /// Command-line values win over file values.
    pub fn apply(self, mut config: GalleryConfig) -> GalleryConfig {
        if let Some(manifest) = self.manifest {
            config.manifest = Some(manifest);
        }
        if let Some(lang) = self.lang {
            config.lang = lang;
        }
        if let Some(count) = self.preview_count {
            config.preview_count = count;
        }
        if let Some(stable) = self.stable_layout {
            config.stable_layout = stable;
        }
        if let Some(mode) = self.reveal_mode {
            config.reveal_mode = mode;
        }
        config
    }
}
