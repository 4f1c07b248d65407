use super::pipeline::VideoPipeline;
use super::text_renderer::RenderResources;
use super::thumbnail_extractor::{FfmpegDecoder, FrameDecoder};
use super::video::VideoTask;
use crate::config::Config;
use crate::tools::{
    DispatchSummary, Dispatcher, FfprobeProber, MetadataProbe, TaskOutcome,
    ensure_directory_exists, scan_video_files,
};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Contact sheet generation result
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationResult {
    pub total_videos: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Not run because of a shutdown request, whether still unqueued or
    /// already waiting in the queue
    pub cancelled: usize,
}

impl GenerationResult {
    fn from_summary(total_videos: usize, summary: DispatchSummary) -> Self {
        Self {
            total_videos,
            successful: summary.completed,
            failed: summary.failed,
            skipped: summary.skipped,
            cancelled: total_videos - summary.submitted + summary.cancelled,
        }
    }
}

/// Contact sheet generator
///
/// Discovers videos under the given paths and runs every one of them through
/// the probe, sample, compose pipeline on a bounded worker pool.
pub struct ContactSheetGenerator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ContactSheetGenerator {
    #[must_use]
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    /// Runs with the ffprobe and ffmpeg binaries from the configuration.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<GenerationResult> {
        let prober = FfprobeProber::new(self.config.ffprobe.clone());
        let decoder = FfmpegDecoder::new(self.config.ffmpeg.clone());
        self.run_with(inputs, &prober, &decoder)
    }

    pub fn run_with(
        &self,
        inputs: &[PathBuf],
        prober: &dyn MetadataProbe,
        decoder: &dyn FrameDecoder,
    ) -> Result<GenerationResult> {
        println!("{}", style("=== Video contact sheets ===").cyan().bold());

        ensure_directory_exists(&self.config.temp_dir)?;
        if !self.config.in_place {
            ensure_directory_exists(&self.config.output_dir)?;
        }

        println!("{}", style("Scanning for videos...").dim());
        let videos = scan_video_files(
            inputs,
            &self.config.video_extensions,
            self.config.walk_directories,
        );

        if videos.is_empty() {
            println!("{}", style("No video files found").yellow());
            return Ok(GenerationResult::default());
        }

        println!(
            "{}",
            style(format!(
                "Found {} videos, processing smallest first with {} workers",
                videos.len(),
                self.config.workers
            ))
            .green()
        );

        let resources = RenderResources::new().context("Failed to prepare text rendering")?;
        let pipeline = VideoPipeline::new(&self.config, prober, decoder, &resources);
        let progress_bar = create_progress_bar(videos.len());
        let dispatcher = Dispatcher::new(self.config.workers);

        let summary = dispatcher.run(
            |queue| {
                for video in &videos {
                    if self.shutdown_signal.load(Ordering::SeqCst) {
                        warn!(
                            "Shutdown requested, {} videos left unqueued",
                            videos.len() - queue.submitted()
                        );
                        break;
                    }
                    if !queue.submit(VideoTask::new(video.path.clone())) {
                        warn!(
                            "Worker pool gone, {} videos left unqueued",
                            videos.len() - queue.submitted()
                        );
                        break;
                    }
                }
            },
            |worker_id, task: VideoTask| {
                let outcome = if self.shutdown_signal.load(Ordering::SeqCst) {
                    debug!(
                        "[worker {worker_id}] {}: dropped after shutdown request",
                        task.filename()
                    );
                    TaskOutcome::Cancelled
                } else {
                    pipeline.run_task(worker_id, task)
                };
                if outcome == TaskOutcome::Failed {
                    progress_bar.set_message(style("last video failed").red().to_string());
                }
                progress_bar.inc(1);
                outcome
            },
        )?;

        for worker_id in 0..self.config.workers {
            remove_worker_temp_dir(&pipeline.worker_temp_dir(worker_id));
        }

        if self.shutdown_signal.load(Ordering::SeqCst) {
            progress_bar.abandon_with_message("Interrupted");
        } else {
            progress_bar.finish_with_message("Done");
        }

        let result = GenerationResult::from_summary(videos.len(), summary);
        print_summary(&result);
        Ok(result)
    }
}

fn remove_worker_temp_dir(path: &Path) {
    match fs::remove_dir(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot remove temp dir {}: {e}", path.display()),
    }
}

fn create_progress_bar(len: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        Ok(progress_style) => progress_bar.set_style(progress_style.progress_chars("#>-")),
        Err(e) => warn!("Invalid progress bar template: {e}"),
    }
    progress_bar.set_message("Generating...");
    progress_bar
}

fn print_summary(result: &GenerationResult) {
    println!();
    println!("{}", style("=== Summary ===").cyan().bold());
    println!("  Total:   {} videos", result.total_videos);
    println!("  Written: {}", style(result.successful).green());

    if result.skipped > 0 {
        println!("  Skipped: {}", style(result.skipped).yellow());
    }

    if result.failed > 0 {
        println!("  Failed:  {}", style(result.failed).red());
    }

    if result.cancelled > 0 {
        println!("  Not run: {}", style(result.cancelled).dim());
    }

    info!(
        "Contact sheets finished - written: {}, skipped: {}, failed: {}, not run: {}",
        result.successful, result.skipped, result.failed, result.cancelled
    );
}
