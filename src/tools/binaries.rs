use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

/// Directory checked for bundled ffmpeg/ffprobe builds
const BUNDLED_BIN_DIR: &str = "bin";

/// Prefers a bundled `bin/<name>` and falls back to looking `name` up on `PATH`.
#[must_use]
pub fn resolve_binary(name: &str) -> PathBuf {
    let bundled = bundled_binary_path(name);
    if bundled.is_file() {
        bundled
    } else {
        PathBuf::from(name)
    }
}

fn bundled_binary_path(name: &str) -> PathBuf {
    Path::new(BUNDLED_BIN_DIR).join(format!("{name}{EXE_SUFFIX}"))
}
