use super::timestamp_selector::select_timestamps;
use super::video::VideoDescriptor;
use crate::error::SampleFailure;
use anyhow::{Context, Result};
use image::RgbaImage;
use log::{debug, error, warn};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One decoded still, held in memory.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub index: usize,
    pub timestamp: f64,
    pub image: RgbaImage,
}

/// Result of sampling one video: the frames that decoded, in index order, and
/// the indices that did not.
#[derive(Debug, Default)]
pub struct FrameSet {
    pub expected: usize,
    pub frames: Vec<SampledFrame>,
    pub failures: Vec<SampleFailure>,
}

impl FrameSet {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.frames.len() == self.expected
    }
}

/// Produces exactly one still image file for a given offset.
pub trait FrameDecoder: Sync {
    fn extract_frame(&self, input: &Path, offset: f64, width: u32, output: &Path) -> Result<()>;
}

/// Extracts stills with the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    binary: PathBuf,
}

impl FfmpegDecoder {
    #[must_use]
    pub const fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Input seek (`-ss` before `-i`), one frame, scaled to `width` keeping aspect.
    /// Paths are passed through untouched, so non-UTF-8 names survive.
    #[must_use]
    pub fn build_args(input: &Path, offset: f64, width: u32, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-ss"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(format!("{offset:.6}").into());
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.extend(
            ["-frames:v", "1", "-an", "-sn", "-vf"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(format!("scale={width}:-1").into());
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn extract_frame(&self, input: &Path, offset: f64, width: u32, output: &Path) -> Result<()> {
        let output_status = Command::new(&self.binary)
            .args(Self::build_args(input, offset, width, output))
            .output()
            .with_context(|| format!("failed to run {}", self.binary.display()))?;

        if !output_status.status.success() {
            let stderr = String::from_utf8_lossy(&output_status.stderr);
            anyhow::bail!("ffmpeg exited with {}: {}", output_status.status, stderr.trim());
        }

        if !output.exists() {
            anyhow::bail!("ffmpeg produced no file at {}", output.display());
        }

        Ok(())
    }
}

/// Samples a fixed number of evenly spaced frames from one video.
///
/// Frames are extracted one after another into `{checksum}-{index}.png` under
/// the caller's temp directory, loaded, and the file removed straight away.
/// Callers running in parallel must each pass their own directory.
pub struct FrameSampler<'a> {
    decoder: &'a dyn FrameDecoder,
    frame_count: usize,
    frame_width: u32,
}

impl<'a> FrameSampler<'a> {
    /// `frame_width` of 0 keeps each video's native width.
    #[must_use]
    pub fn new(decoder: &'a dyn FrameDecoder, frame_count: usize, frame_width: u32) -> Self {
        Self {
            decoder,
            frame_count,
            frame_width,
        }
    }

    pub fn sample(&self, video: &VideoDescriptor, temp_dir: &Path) -> FrameSet {
        let width = if self.frame_width == 0 {
            video.width
        } else {
            self.frame_width
        };

        let mut set = FrameSet {
            expected: self.frame_count,
            frames: Vec::with_capacity(self.frame_count),
            failures: Vec::new(),
        };

        for (index, timestamp) in select_timestamps(video.duration, self.frame_count)
            .into_iter()
            .enumerate()
        {
            let output = video.temp_frame_path(temp_dir, index);
            debug!(
                "{}: sampling frame {index} at {timestamp:.3}s -> {}",
                video.filename,
                output.display()
            );

            match self.sample_one(video, timestamp, width, &output) {
                Ok(image) => set.frames.push(SampledFrame {
                    index,
                    timestamp,
                    image,
                }),
                Err(e) => {
                    let failure = SampleFailure {
                        index,
                        timestamp,
                        reason: format!("{e:#}"),
                    };
                    error!("{}: sample failed, {failure}", video.filename);
                    set.failures.push(failure);
                }
            }
        }

        set
    }

    fn sample_one(
        &self,
        video: &VideoDescriptor,
        timestamp: f64,
        width: u32,
        output: &Path,
    ) -> Result<RgbaImage> {
        // a frame left over from a killed run must not pass for fresh output
        remove_temp_file(output);
        let loaded = self
            .decoder
            .extract_frame(&video.location, timestamp, width, output)
            .and_then(|()| load_frame(output));
        remove_temp_file(output);
        loaded
    }
}

fn load_frame(path: &Path) -> Result<RgbaImage> {
    let image =
        image::open(path).with_context(|| format!("cannot decode {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn remove_temp_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot remove temp frame {}: {e}", path.display()),
    }
}
