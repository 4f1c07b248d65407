use crate::config::types::{Config, SheetSettings, VideoExtensionTable};
use crate::tools::resolve_binary;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Video extensions embedded at compile time
const VIDEO_EXTENSIONS_JSON: &str = include_str!("../data/video_extensions.json");

impl SheetSettings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

impl Config {
    /// Resolves binaries and the embedded extension table, then validates.
    pub fn new(settings: &SheetSettings) -> Result<Self> {
        let video_extensions = load_embedded_video_extensions()?;
        let ffmpeg = settings
            .ffmpeg
            .clone()
            .unwrap_or_else(|| resolve_binary("ffmpeg"));
        let ffprobe = settings
            .ffprobe
            .clone()
            .unwrap_or_else(|| resolve_binary("ffprobe"));

        Self::from_settings(settings, ffmpeg, ffprobe, &video_extensions)
            .context("Invalid configuration")
    }
}

fn load_embedded_video_extensions() -> Result<VideoExtensionTable> {
    serde_json::from_str(VIDEO_EXTENSIONS_JSON).context("Failed to parse embedded video extensions")
}
