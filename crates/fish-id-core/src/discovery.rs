//! Locating input videos and their output directories

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Recursively collect files under `root` whose extension is exactly
/// `extension` (case-sensitive, without the dot).
///
/// The result is sorted so runs visit videos in a stable order.
pub fn find_videos<P: AsRef<Path>>(root: P, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut videos = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == extension) {
                videos.push(path);
            }
        }
    }

    videos.sort();
    Ok(videos)
}

/// Output directory for a video: the name of its parent directory under
/// `output_root`.
pub fn output_dir_for(video_path: &Path, output_root: &Path) -> PathBuf {
    match video_path.parent().and_then(Path::file_name) {
        Some(parent) => output_root.join(parent),
        None => output_root.to_path_buf(),
    }
}
