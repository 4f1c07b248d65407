use super::contact_sheet_merger::{SheetComposer, SheetLayout};
use super::text_renderer::RenderResources;
use super::thumbnail_extractor::{FrameDecoder, FrameSampler};
use super::video::{VideoDescriptor, VideoTask};
use crate::config::Config;
use crate::error::PipelineError;
use crate::tools::{MetadataProbe, TaskOutcome, calculate_file_hash};
use log::{debug, error, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PipeFormat,
    OutputExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PipeFormat => write!(f, "pipe format"),
            Self::OutputExists => write!(f, "sheet already exists"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Written(PathBuf),
    Skipped(SkipReason),
}

/// Everything one worker needs to turn a video into a sheet.
///
/// Borrowed pieces are shared across workers; the pipeline itself holds no
/// mutable state, so one instance serves the whole pool.
pub struct VideoPipeline<'a> {
    config: &'a Config,
    prober: &'a dyn MetadataProbe,
    sampler: FrameSampler<'a>,
    composer: SheetComposer<'a>,
}

impl<'a> VideoPipeline<'a> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        prober: &'a dyn MetadataProbe,
        decoder: &'a dyn FrameDecoder,
        resources: &'a RenderResources,
    ) -> Self {
        Self {
            config,
            prober,
            sampler: FrameSampler::new(decoder, config.frame_count, config.frame_width),
            composer: SheetComposer::new(
                resources,
                SheetLayout::new(config.frame_count, config.frames_per_row),
            ),
        }
    }

    /// Private scratch directory for one worker's frame files. Identical
    /// videos share a checksum, so workers must never share a directory.
    #[must_use]
    pub fn worker_temp_dir(&self, worker_id: usize) -> PathBuf {
        self.config.temp_dir.join(format!("worker-{worker_id}"))
    }

    /// Hashes and probes `path`.
    pub fn describe(&self, path: &Path) -> Result<VideoDescriptor, PipelineError> {
        let checksum = calculate_file_hash(path).map_err(PipelineError::Checksum)?;
        let probe = self.prober.probe(path)?;
        let descriptor = VideoDescriptor::from_probe(path, checksum, &probe)?;
        debug!(
            "{}: {:.3}s {}x{} {} [{}]",
            descriptor.filename,
            descriptor.duration,
            descriptor.width,
            descriptor.height,
            descriptor.codec,
            descriptor.checksum
        );
        Ok(descriptor)
    }

    /// Frame files go to `temp_dir`, which only this call may use.
    pub fn process(
        &self,
        task: VideoTask,
        temp_dir: &Path,
    ) -> Result<PipelineOutcome, PipelineError> {
        let filename = task.filename();
        let sheet_path = self.config.artifact_path(&task.path, &filename, "png");

        if self.config.skip_existing && sheet_path.exists() {
            return Ok(PipelineOutcome::Skipped(SkipReason::OutputExists));
        }

        let video = match task.descriptor {
            Some(descriptor) => descriptor,
            None => self.describe(&task.path)?,
        };

        if self.config.skip_pipe_formats && video.is_pipe_format() {
            return Ok(PipelineOutcome::Skipped(SkipReason::PipeFormat));
        }

        if self.config.write_info {
            let info_path = self.config.artifact_path(&video.location, &filename, "json");
            if let Err(e) = video.write_sidecar(&info_path) {
                warn!("{filename}: write failed for {}, {e}", info_path.display());
            }
        }

        let frames = self.sampler.sample(&video, temp_dir);
        if !frames.is_complete() {
            warn!(
                "{filename}: {} of {} frames sampled",
                frames.frames.len(),
                frames.expected
            );
        }

        let sheet = self.composer.compose(&video, &frames.frames)?;
        sheet.save(&sheet_path)?;

        Ok(PipelineOutcome::Written(sheet_path))
    }

    /// Runs one task to completion and logs the result. Never panics on a bad
    /// video; the failure stays with that video.
    pub fn run_task(&self, worker_id: usize, task: VideoTask) -> TaskOutcome {
        let filename = task.filename();
        debug!("[worker {worker_id}] {filename}: started");

        let temp_dir = self.worker_temp_dir(worker_id);
        let result = fs::create_dir_all(&temp_dir)
            .map_err(|source| PipelineError::TempDir {
                path: temp_dir.clone(),
                source,
            })
            .and_then(|()| self.process(task, &temp_dir));

        match result {
            Ok(PipelineOutcome::Written(path)) => {
                info!("{filename}: sheet written to {}", path.display());
                TaskOutcome::Completed
            }
            Ok(PipelineOutcome::Skipped(reason)) => {
                info!("{filename}: skipped, {reason}");
                TaskOutcome::Skipped
            }
            Err(e) => {
                error!("{filename}: {e}");
                TaskOutcome::Failed
            }
        }
    }
}
