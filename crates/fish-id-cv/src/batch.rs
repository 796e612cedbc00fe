//! Batch driver: every video under the input root, one after another

use crate::Result;
use crate::extract::{ExtractionStats, FrameExtractor};
use crate::traits::DetectionModel;
use fish_id_core::{ExtractConfig, find_videos, output_dir_for};
use image::RgbImage;
use std::path::Path;
use tracing::info;

/// Totals over a whole batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub videos: usize,
    pub totals: ExtractionStats,
}

/// Extract crops from every matching video under `config.input_dir`.
///
/// `open_frames` turns a video path into its frame sequence. Each video's
/// crops go to `config.output_dir/<parent directory name>`. The first error
/// from opening, decoding or inference aborts the batch.
pub fn run_batch<M, F, I>(config: &ExtractConfig, model: &mut M, mut open_frames: F) -> Result<BatchStats>
where
    M: DetectionModel + ?Sized,
    F: FnMut(&Path) -> Result<I>,
    I: Iterator<Item = Result<RgbImage>>,
{
    let videos = find_videos(&config.input_dir, &config.video_extension)?;
    info!(
        input = %config.input_dir.display(),
        count = videos.len(),
        "Found videos"
    );

    let extractor = FrameExtractor::new(config);
    let mut stats = BatchStats::default();

    for video in &videos {
        let output_dir = output_dir_for(video, &config.output_dir);
        let frames = open_frames(video)?;

        stats.totals += extractor.extract(frames, video, &output_dir, model)?;
        stats.videos += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::{ScriptedModel, fish, frames, scratch_dir};
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_only_matching_extension_is_extracted() {
        let root = scratch_dir("batch_extension");
        let input = root.join("videos");
        fs::create_dir_all(input.join("pond_a")).unwrap();
        fs::create_dir_all(input.join("pond_b/deep")).unwrap();
        fs::write(input.join("pond_a/one.avi"), b"").unwrap();
        fs::write(input.join("pond_a/two.mp4"), b"").unwrap();
        fs::write(input.join("pond_b/deep/three.avi"), b"").unwrap();
        fs::write(input.join("pond_b/four.AVI"), b"").unwrap();

        let config = ExtractConfig {
            input_dir: input.clone(),
            output_dir: root.join("bboxes"),
            ..ExtractConfig::default()
        };
        let mut model = ScriptedModel::new(vec![
            vec![fish(10.0, 10.0, 50.0, 50.0, 0.95)],
            vec![fish(100.0, 100.0, 200.0, 150.0, 0.93)],
        ]);

        let mut opened: Vec<PathBuf> = Vec::new();
        let stats = run_batch(&config, &mut model, |path| {
            opened.push(path.to_path_buf());
            Ok(frames(1).into_iter())
        })
        .unwrap();

        assert_eq!(
            opened,
            vec![input.join("pond_a/one.avi"), input.join("pond_b/deep/three.avi")]
        );
        assert_eq!(stats.videos, 2);
        assert_eq!(stats.totals.crops_written, 2);
        assert!(root.join("bboxes/pond_a/one_frame_0_bbox_10_10_50_50.png").is_file());
        assert!(root.join("bboxes/deep/three_frame_0_bbox_100_100_200_150.png").is_file());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_open_failure_aborts_batch() {
        let root = scratch_dir("batch_abort");
        let input = root.join("videos/pond");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.avi"), b"").unwrap();
        fs::write(input.join("b.avi"), b"").unwrap();

        let config = ExtractConfig {
            input_dir: root.join("videos"),
            output_dir: root.join("bboxes"),
            ..ExtractConfig::default()
        };

        let mut calls = 0;
        let result = run_batch(&config, &mut ScriptedModel::new(Vec::new()), |_| {
            calls += 1;
            Err::<std::vec::IntoIter<Result<RgbImage>>, _>(anyhow::anyhow!("unreadable video"))
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);

        fs::remove_dir_all(&root).unwrap();
    }
}
