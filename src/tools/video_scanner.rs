use crate::config::VideoExtensions;
use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// Collects candidate videos from the given paths, smallest first.
///
/// Files named explicitly are always kept (except `.json` sidecars); directories
/// are walked recursively when `walk_directories` is set and filtered by
/// extension. Paths that do not exist are logged and ignored.
#[must_use]
pub fn scan_video_files(
    paths: &[PathBuf],
    extensions: &VideoExtensions,
    walk_directories: bool,
) -> Vec<VideoFileInfo> {
    let mut video_files = Vec::new();

    for path in paths {
        if path.is_file() {
            if !is_sidecar(path) {
                video_files.extend(file_info(path));
            }
        } else if path.is_dir() {
            if walk_directories {
                info!("Walking {}", path.display());
                video_files.extend(walk_directory(path, extensions));
            } else {
                warn!("Skipping directory {} (walking disabled)", path.display());
            }
        } else {
            warn!("Skipping {}: no such file or directory", path.display());
        }
    }

    video_files.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path)));
    video_files.dedup_by(|a, b| a.path == b.path);
    video_files
}

fn walk_directory(directory: &Path, extensions: &VideoExtensions) -> Vec<VideoFileInfo> {
    WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !is_sidecar(entry.path()) && extensions.is_video_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect()
}

fn file_info(path: &Path) -> Option<VideoFileInfo> {
    let metadata = path.metadata().ok()?;
    Some(VideoFileInfo {
        path: path.to_path_buf(),
        size: metadata.len(),
    })
}

fn is_sidecar(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
