use crate::error::ProbeError;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Frame rate ffprobe reports for streams that are not real video (cover art etc.)
const DEGENERATE_FRAME_RATE: &str = "0/0";

/// Raw ffprobe report: per-stream attributes and container fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeResult {
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
    #[serde(default)]
    pub format: FormatInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamInfo {
    pub index: u32,
    pub codec_type: String,
    pub codec_name: String,
    pub avg_frame_rate: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatInfo {
    pub duration: String,
    pub format_name: String,
    pub bit_rate: String,
    pub size: String,
}

impl ProbeResult {
    pub fn parse(json: &[u8]) -> Result<Self, ProbeError> {
        Ok(serde_json::from_slice(json)?)
    }

    /// First stream that is video and has a real frame rate.
    #[must_use]
    pub fn video_stream(&self) -> Option<&StreamInfo> {
        self.streams
            .iter()
            .find(|s| s.codec_type == "video" && s.avg_frame_rate != DEGENERATE_FRAME_RATE)
    }

    /// Container duration in seconds. Unparsable values degrade to zero.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.format
            .duration
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0)
    }
}

/// Source of container and stream metadata for a file.
pub trait MetadataProbe: Sync {
    fn probe(&self, path: &Path) -> Result<ProbeResult, ProbeError>;
}

/// Runs the ffprobe binary and parses its JSON report.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
}

impl FfprobeProber {
    #[must_use]
    pub const fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl MetadataProbe for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<ProbeResult, ProbeError> {
        debug!("ffprobe {}", path.display());

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_streams",
                "-show_format",
                "-print_format",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|source| ProbeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::NonZeroExit {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        ProbeResult::parse(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "mjpeg", "avg_frame_rate": "0/0", "width": 300, "height": 300},
            {"index": 1, "codec_type": "audio", "codec_name": "aac", "avg_frame_rate": "0/0"},
            {"index": 2, "codec_type": "video", "codec_name": "h264", "avg_frame_rate": "30000/1001", "width": 1920, "height": 1080}
        ],
        "format": {"duration": "3661.900000", "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "bit_rate": "5000000", "size": "123456"}
    }"#;

    #[test]
    fn test_selects_first_real_video_stream() {
        let probe = ProbeResult::parse(SAMPLE.as_bytes()).unwrap();
        let stream = probe.video_stream().unwrap();
        assert_eq!(stream.index, 2);
        assert_eq!(stream.codec_name, "h264");
        assert_eq!((stream.width, stream.height), (1920, 1080));
    }

    #[test]
    fn test_duration_parsing() {
        let probe = ProbeResult::parse(SAMPLE.as_bytes()).unwrap();
        assert!((probe.duration_seconds() - 3661.9).abs() < 1e-9);
        assert_eq!(probe.format.format_name, "mov,mp4,m4a,3gp,3g2,mj2");
    }

    #[test]
    fn test_unparsable_duration_degrades_to_zero() {
        let probe = ProbeResult::parse(br#"{"streams": [], "format": {"duration": "N/A"}}"#).unwrap();
        assert_eq!(probe.duration_seconds(), 0.0);

        let probe = ProbeResult::parse(br#"{"streams": []}"#).unwrap();
        assert_eq!(probe.duration_seconds(), 0.0);
    }

    #[test]
    fn test_no_video_stream() {
        let probe = ProbeResult::parse(
            br#"{"streams": [{"codec_type": "audio", "avg_frame_rate": "0/0"}], "format": {}}"#,
        )
        .unwrap();
        assert!(probe.video_stream().is_none());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            ProbeResult::parse(b"Invalid data found when processing input"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let prober = FfprobeProber::new(PathBuf::from("/nonexistent/ffprobe"));
        assert!(matches!(
            prober.probe(Path::new("video.mp4")),
            Err(ProbeError::Spawn { .. })
        ));
    }
}
