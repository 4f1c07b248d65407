use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_FRAME_COUNT: usize = 12;
pub const DEFAULT_FRAMES_PER_ROW: usize = 3;
pub const DEFAULT_FRAME_WIDTH: u32 = 854;

/// Settings file read from and written to the working directory
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoExtensionTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl VideoExtensionTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> VideoExtensions {
        VideoExtensions(
            self.video_file
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        )
    }
}

/// Lowercased `.ext` entries, built once per run and consulted for every
/// scanned file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoExtensions(HashSet<String>);

impl VideoExtensions {
    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// User-facing defaults, persisted as `settings.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub frames: usize,
    pub frames_per_row: usize,
    /// Tile width in pixels; 0 keeps the video's native width
    pub frame_width: u32,
    /// `None` means one less than the number of CPUs
    pub workers: Option<usize>,
    pub output_dir: PathBuf,
    /// Write sheets next to the videos instead of into `output_dir`
    pub in_place: bool,
    pub write_info: bool,
    pub skip_pipe: bool,
    pub skip_existing: bool,
    pub walk_directories: bool,
    pub temp_dir: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAME_COUNT,
            frames_per_row: DEFAULT_FRAMES_PER_ROW,
            frame_width: DEFAULT_FRAME_WIDTH,
            workers: None,
            output_dir: PathBuf::from("."),
            in_place: true,
            write_info: true,
            skip_pipe: true,
            skip_existing: false,
            walk_directories: true,
            temp_dir: None,
            ffmpeg: None,
            ffprobe: None,
        }
    }
}

/// Resolved, validated configuration shared read-only by every worker
#[derive(Debug, Clone)]
pub struct Config {
    pub frame_count: usize,
    pub frames_per_row: usize,
    pub frame_width: u32,
    pub workers: usize,
    pub output_dir: PathBuf,
    pub in_place: bool,
    pub write_info: bool,
    pub skip_pipe_formats: bool,
    pub skip_existing: bool,
    pub walk_directories: bool,
    pub temp_dir: PathBuf,
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub video_extensions: VideoExtensions,
}

impl Config {
    /// Builds a configuration from settings with already-resolved binaries.
    pub fn from_settings(
        settings: &SheetSettings,
        ffmpeg: PathBuf,
        ffprobe: PathBuf,
        video_extensions: &VideoExtensionTable,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            frame_count: settings.frames,
            frames_per_row: settings.frames_per_row,
            frame_width: settings.frame_width,
            workers: settings.workers.unwrap_or_else(default_worker_count),
            output_dir: settings.output_dir.clone(),
            in_place: settings.in_place,
            write_info: settings.write_info,
            skip_pipe_formats: settings.skip_pipe,
            skip_existing: settings.skip_existing,
            walk_directories: settings.walk_directories,
            temp_dir: settings
                .temp_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            ffmpeg,
            ffprobe,
            video_extensions: video_extensions.video_extensions_set(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::ZeroFrames);
        }
        if self.frames_per_row == 0 {
            return Err(ConfigError::ZeroFramesPerRow);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }

    /// Where an artifact for `source` goes: beside it in place mode, otherwise
    /// in the output directory. Named `{filename}.{extension}`.
    #[must_use]
    pub fn artifact_path(&self, source: &Path, filename: &str, extension: &str) -> PathBuf {
        let name = format!("{filename}.{extension}");
        if self.in_place {
            source.parent().unwrap_or(Path::new(".")).join(name)
        } else {
            self.output_dir.join(name)
        }
    }
}

/// Number of CPUs minus one, never less than one.
#[must_use]
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VideoExtensionTable {
        VideoExtensionTable {
            video_file: vec![".mp4".to_string(), ".MKV".to_string()],
        }
    }

    fn config_with(settings: &SheetSettings) -> Result<Config, ConfigError> {
        Config::from_settings(
            settings,
            PathBuf::from("ffmpeg"),
            PathBuf::from("ffprobe"),
            &table(),
        )
    }

    #[test]
    fn test_is_video_file_case_insensitive() {
        let table = table().video_extensions_set();
        assert!(table.is_video_file(Path::new("/a/movie.MP4")));
        assert!(table.is_video_file(Path::new("clip.mkv")));
        assert!(!table.is_video_file(Path::new("clip.mp4.json")));
        assert!(!table.is_video_file(Path::new("no_extension")));
    }

    #[test]
    fn test_config_holds_lowercased_extension_set() {
        let config = config_with(&SheetSettings::default()).unwrap();
        assert_eq!(config.video_extensions, table().video_extensions_set());
        assert!(config.video_extensions.is_video_file(Path::new("b.MkV")));
        assert!(!config.video_extensions.is_video_file(Path::new("b.avi")));
    }

    #[test]
    fn test_default_settings_match_classic_sheet() {
        let settings = SheetSettings::default();
        assert_eq!(settings.frames, 12);
        assert_eq!(settings.frames_per_row, 3);
        assert_eq!(settings.frame_width, 854);
        assert!(settings.in_place);
        assert!(settings.write_info);
        assert!(settings.skip_pipe);
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        let mut settings = SheetSettings::default();
        settings.frames = 0;
        assert_eq!(config_with(&settings).unwrap_err(), ConfigError::ZeroFrames);

        let mut settings = SheetSettings::default();
        settings.frames_per_row = 0;
        assert_eq!(
            config_with(&settings).unwrap_err(),
            ConfigError::ZeroFramesPerRow
        );

        let mut settings = SheetSettings::default();
        settings.workers = Some(0);
        assert_eq!(config_with(&settings).unwrap_err(), ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_default_worker_count_at_least_one() {
        assert!(default_worker_count() >= 1);
        let config = config_with(&SheetSettings::default()).unwrap();
        assert_eq!(config.workers, default_worker_count());
    }

    #[test]
    fn test_artifact_path_in_place() {
        let config = config_with(&SheetSettings::default()).unwrap();
        let path = config.artifact_path(Path::new("/videos/a/clip.mp4"), "clip.mp4", "png");
        assert_eq!(path, PathBuf::from("/videos/a/clip.mp4.png"));
    }

    #[test]
    fn test_artifact_path_output_dir() {
        let settings = SheetSettings {
            in_place: false,
            output_dir: PathBuf::from("/sheets"),
            ..SheetSettings::default()
        };
        let config = config_with(&settings).unwrap();
        let path = config.artifact_path(Path::new("/videos/a/clip.mp4"), "clip.mp4", "json");
        assert_eq!(path, PathBuf::from("/sheets/clip.mp4.json"));
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: SheetSettings = serde_json::from_str(r#"{"frames": 20}"#).unwrap();
        assert_eq!(settings.frames, 20);
        assert_eq!(settings.frames_per_row, 3);
    }
}
