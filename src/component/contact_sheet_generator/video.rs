use crate::error::ProbeError;
use crate::tools::{Checksum, ProbeResult};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Container format substring that marks a non-seekable pipe source
const PIPE_FORMAT_MARKER: &str = "pipe";

/// One input video, fully described. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDescriptor {
    pub filename: String,
    pub location: PathBuf,
    pub checksum: Checksum,
    /// Seconds
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
    pub format_name: String,
    pub bit_rate: String,
}

impl VideoDescriptor {
    /// Selects the video stream from `probe` and fills in the descriptor.
    pub fn from_probe(
        path: &Path,
        checksum: Checksum,
        probe: &ProbeResult,
    ) -> Result<Self, ProbeError> {
        let stream = probe.video_stream().ok_or(ProbeError::NoVideoStream)?;
        if stream.width == 0 || stream.height == 0 {
            return Err(ProbeError::InvalidDimensions {
                width: stream.width,
                height: stream.height,
            });
        }

        Ok(Self {
            filename: display_filename(path),
            location: path.to_path_buf(),
            checksum,
            duration: probe.duration_seconds(),
            width: stream.width,
            height: stream.height,
            codec: stream.codec_name.clone(),
            format_name: probe.format.format_name.clone(),
            bit_rate: probe.format.bit_rate.clone(),
        })
    }

    #[must_use]
    pub fn is_pipe_format(&self) -> bool {
        self.format_name.contains(PIPE_FORMAT_MARKER)
    }

    /// `{temp_dir}/{checksum}-{index}.png`
    #[must_use]
    pub fn temp_frame_path(&self, temp_dir: &Path, index: usize) -> PathBuf {
        temp_dir.join(format!("{}-{index}.png", self.checksum.hex()))
    }

    pub fn write_sidecar(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

/// One unit of work for the dispatcher.
///
/// `descriptor` may be filled in ahead of time; otherwise the worker hashes and
/// probes `path` itself.
#[derive(Debug, Clone)]
pub struct VideoTask {
    pub path: PathBuf,
    pub descriptor: Option<VideoDescriptor>,
}

impl VideoTask {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            descriptor: None,
        }
    }

    #[must_use]
    pub fn with_descriptor(descriptor: VideoDescriptor) -> Self {
        Self {
            path: descriptor.location.clone(),
            descriptor: Some(descriptor),
        }
    }

    #[must_use]
    pub fn filename(&self) -> String {
        self.descriptor
            .as_ref()
            .map_or_else(|| display_filename(&self.path), |d| d.filename.clone())
    }
}

fn display_filename(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}
