//! E2E tests against real ffmpeg and ffprobe
//!
//! Each test skips itself when the binaries are not on `PATH`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tempfile::tempdir;
use video_contact_sheet::component::contact_sheet_generator::{
    ContactSheetGenerator, FfmpegDecoder, FrameSampler, GUTTER_SIZE, HEADER_SIZE, RenderResources,
    VideoPipeline,
};
use video_contact_sheet::config::{Config, SheetSettings, VideoExtensionTable};
use video_contact_sheet::tools::FfprobeProber;

fn binaries_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|binary| {
        Command::new(binary)
            .arg("-version")
            .output()
            .is_ok_and(|output| output.status.success())
    })
}

/// Five seconds of the lavfi test pattern at 320x240.
fn make_test_video(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=5:size=320x240:rate=25",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success(), "failed to generate test video");
    path
}

fn config(output_dir: &Path, temp_dir: &Path, frame_width: u32) -> Config {
    let settings = SheetSettings {
        frames: 6,
        frames_per_row: 3,
        frame_width,
        workers: Some(2),
        in_place: false,
        output_dir: output_dir.to_path_buf(),
        temp_dir: Some(temp_dir.to_path_buf()),
        ..SheetSettings::default()
    };
    Config::from_settings(
        &settings,
        PathBuf::from("ffmpeg"),
        PathBuf::from("ffprobe"),
        &VideoExtensionTable {
            video_file: vec![".mp4".to_string()],
        },
    )
    .unwrap()
}

#[test]
fn test_real_video_contact_sheet() {
    if !binaries_available() {
        println!("Skipping: ffmpeg/ffprobe not available");
        return;
    }

    let videos = tempdir().unwrap();
    let sheets = tempdir().unwrap();
    let temp = tempdir().unwrap();
    make_test_video(videos.path(), "pattern.mp4");

    let generator = ContactSheetGenerator::new(
        config(sheets.path(), temp.path(), 160),
        Arc::new(AtomicBool::new(false)),
    );
    let result = generator.run(&[videos.path().to_path_buf()]).unwrap();

    assert_eq!(result.successful, 1, "{result:?}");

    let sheet = image::open(sheets.path().join("pattern.mp4.png"))
        .unwrap()
        .to_rgba8();
    // 320x240 scaled to width 160 keeps the 4:3 aspect
    assert_eq!(sheet.width(), 3 * 160 + 4 * GUTTER_SIZE);
    assert_eq!(sheet.height(), HEADER_SIZE + 2 * 120 + 3 * GUTTER_SIZE);

    let info: serde_json::Value =
        serde_json::from_slice(&fs::read(sheets.path().join("pattern.mp4.json")).unwrap())
            .unwrap();
    assert_eq!(info["width"], 320);
    assert_eq!(info["height"], 240);
    assert!((info["duration"].as_f64().unwrap() - 5.0).abs() < 0.5);

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_real_probe_and_native_width_sampling() {
    if !binaries_available() {
        println!("Skipping: ffmpeg/ffprobe not available");
        return;
    }

    let videos = tempdir().unwrap();
    let temp = tempdir().unwrap();
    let source = make_test_video(videos.path(), "native.mp4");
    let config = config(videos.path(), temp.path(), 0);

    let prober = FfprobeProber::new(config.ffprobe.clone());
    let decoder = FfmpegDecoder::new(config.ffmpeg.clone());
    let resources = RenderResources::new().unwrap();
    let descriptor = VideoPipeline::new(&config, &prober, &decoder, &resources)
        .describe(&source)
        .unwrap();
    assert_eq!((descriptor.width, descriptor.height), (320, 240));
    assert!(!descriptor.codec.is_empty());

    let sampler = FrameSampler::new(&decoder, 3, 0);
    let frames = sampler.sample(&descriptor, temp.path());

    assert!(frames.is_complete(), "{:?}", frames.failures);
    assert!(
        frames
            .frames
            .iter()
            .all(|frame| frame.image.dimensions() == (320, 240))
    );
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_real_probe_rejects_non_video() {
    if !binaries_available() {
        println!("Skipping: ffmpeg/ffprobe not available");
        return;
    }

    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.mp4");
    fs::write(&bogus, b"definitely not a video").unwrap();

    let config = config(dir.path(), dir.path(), 160);
    let prober = FfprobeProber::new(config.ffprobe.clone());
    let decoder = FfmpegDecoder::new(config.ffmpeg.clone());
    let resources = RenderResources::new().unwrap();

    assert!(
        VideoPipeline::new(&config, &prober, &decoder, &resources)
            .describe(&bogus)
            .is_err()
    );
}
