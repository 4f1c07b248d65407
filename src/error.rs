//! Error types
//!
//! Each stage of the per-video pipeline has its own error type so a failure can
//! be logged with the stage that produced it. None of them escape one video.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while asking ffprobe about a file. The video is skipped entirely.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run ffprobe `{binary}`: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ffprobe exited with {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no usable video stream")]
    NoVideoStream,

    #[error("video stream has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// One frame index that could not be sampled. Logged, never fatal on its own.
#[derive(Debug, Error)]
#[error("frame {index} at {timestamp:.3}s: {reason}")]
pub struct SampleFailure {
    pub index: usize,
    pub timestamp: f64,
    pub reason: String,
}

/// Failure while assembling or writing a contact sheet.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("missing frame {index}")]
    MissingFrame { index: usize },

    #[error("unexpected frame {index} (expected {expected} frames)")]
    UnexpectedFrame { index: usize, expected: usize },

    #[error(
        "frame {index} is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        index: usize,
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("no frames to compose")]
    Empty,

    #[error("failed to load embedded font")]
    Font,

    #[error("failed to encode contact sheet: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything that can stop one video's pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("checksum: {0}")]
    Checksum(#[source] io::Error),

    #[error("temp dir {path}: {source}")]
    TempDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("probe: {0}")]
    Probe(#[from] ProbeError),

    #[error("compose: {0}")]
    Compose(#[from] ComposeError),
}

/// Invalid resolved configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frame count must be greater than zero")]
    ZeroFrames,

    #[error("frames per row must be greater than zero")]
    ZeroFramesPerRow,

    #[error("worker count must be greater than zero")]
    ZeroWorkers,
}
