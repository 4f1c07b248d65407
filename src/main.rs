use anyhow::{Result, bail};
use clap::Parser;
use console::{Term, style};
use dialoguer::Input;
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};
use video_contact_sheet::component::ContactSheetGenerator;
use video_contact_sheet::config::{Config, SETTINGS_FILE, SheetSettings, save_settings};
use video_contact_sheet::init;
use video_contact_sheet::signal::setup_shutdown_signal;
use video_contact_sheet::tools::validate_path_exists;

/// Generate contact sheets (a grid of evenly spaced frames) for video files
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Video files or directories to scan
    paths: Vec<PathBuf>,

    /// Frames sampled per video
    #[arg(short = 'n', long)]
    frames: Option<usize>,

    /// Tiles per row
    #[arg(long)]
    frames_per_row: Option<usize>,

    /// Tile width in pixels, 0 keeps the native width
    #[arg(short = 'w', long)]
    frame_width: Option<u32>,

    /// Concurrent videos [default: CPUs - 1]
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Write sheets into this directory instead of next to each video
    #[arg(short, long, conflicts_with = "in_place")]
    output_dir: Option<PathBuf>,

    /// Write sheets next to each video
    #[arg(long)]
    in_place: bool,

    /// Do not write the JSON info file
    #[arg(long)]
    no_info: bool,

    /// Also process pipe formats
    #[arg(long)]
    no_skip_pipe: bool,

    /// Skip videos whose sheet already exists
    #[arg(long)]
    skip_existing: bool,

    /// Do not descend into directories
    #[arg(long)]
    no_walk: bool,

    /// Directory for intermediate frame files
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long)]
    ffprobe: Option<PathBuf>,

    /// Store the effective options in settings.json
    #[arg(long)]
    save_settings: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    /// Command line values win over the settings file.
    fn apply_to(&self, settings: &mut SheetSettings) {
        if let Some(frames) = self.frames {
            settings.frames = frames;
        }
        if let Some(frames_per_row) = self.frames_per_row {
            settings.frames_per_row = frames_per_row;
        }
        if let Some(frame_width) = self.frame_width {
            settings.frame_width = frame_width;
        }
        if self.workers.is_some() {
            settings.workers = self.workers;
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir.clone_from(output_dir);
            settings.in_place = false;
        }
        if self.in_place {
            settings.in_place = true;
        }
        if self.no_info {
            settings.write_info = false;
        }
        if self.no_skip_pipe {
            settings.skip_pipe = false;
        }
        if self.skip_existing {
            settings.skip_existing = true;
        }
        if self.no_walk {
            settings.walk_directories = false;
        }
        if self.temp_dir.is_some() {
            settings.temp_dir.clone_from(&self.temp_dir);
        }
        if self.ffmpeg.is_some() {
            settings.ffmpeg.clone_from(&self.ffmpeg);
        }
        if self.ffprobe.is_some() {
            settings.ffprobe.clone_from(&self.ffprobe);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init::init(cli.log_level());
    let shutdown_signal = setup_shutdown_signal();

    let settings_path = Path::new(SETTINGS_FILE);
    let mut settings = SheetSettings::load(settings_path)?;
    cli.apply_to(&mut settings);

    if cli.save_settings {
        save_settings(&settings, settings_path)?;
        info!("Settings saved to {}", settings_path.display());
    }

    let config = Config::new(&settings)?;
    info!(
        "ffmpeg: {}, ffprobe: {}",
        config.ffmpeg.display(),
        config.ffprobe.display()
    );

    let inputs = if cli.paths.is_empty() {
        prompt_input_paths()?
    } else {
        cli.paths
    };

    let generator = ContactSheetGenerator::new(config, shutdown_signal);
    let result = generator.run(&inputs)?;

    if result.failed > 0 {
        println!(
            "{}",
            style(format!("{} videos failed, see the log for details", result.failed)).red()
        );
    }

    Ok(())
}

fn prompt_input_paths() -> Result<Vec<PathBuf>> {
    if !Term::stdout().is_term() {
        bail!("No input paths given");
    }

    let path: String = Input::new()
        .with_prompt("Video file or folder")
        .interact_text()?;
    let path = path.trim();
    if path.is_empty() {
        bail!("No input paths given");
    }

    let path = PathBuf::from(path);
    validate_path_exists(&path)?;
    Ok(vec![path])
}
