//! Per-video extraction loop
//!
//! resize -> inference -> suppression -> confidence filter -> crop -> save

use crate::Result;
use crate::error::SaveError;
use crate::traits::DetectionModel;
use crate::utils::{ImageUtils, non_max_suppression};
use anyhow::Context;
use fish_id_core::{ExtractConfig, NmsConfig, crop_file_name, video_base_name};
use image::RgbImage;
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to a single frame
#[derive(Debug)]
pub enum FrameOutcome {
    Written(PathBuf),
    NoDetection,
    LowConfidence(f32),
    AlreadyExists(PathBuf),
    Failed(SaveError),
}

/// Per-video counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub frames_processed: usize,
    pub crops_written: usize,
    pub no_detection: usize,
    pub low_confidence: usize,
    pub already_exists: usize,
    pub failed: usize,
}

impl ExtractionStats {
    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames_processed += 1;
        match outcome {
            FrameOutcome::Written(_) => self.crops_written += 1,
            FrameOutcome::NoDetection => self.no_detection += 1,
            FrameOutcome::LowConfidence(_) => self.low_confidence += 1,
            FrameOutcome::AlreadyExists(_) => self.already_exists += 1,
            FrameOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl AddAssign for ExtractionStats {
    fn add_assign(&mut self, other: Self) {
        self.frames_processed += other.frames_processed;
        self.crops_written += other.crops_written;
        self.no_detection += other.no_detection;
        self.low_confidence += other.low_confidence;
        self.already_exists += other.already_exists;
        self.failed += other.failed;
    }
}

/// Crops the top-ranked detection of every frame into a PNG file
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    input_size: u32,
    min_confidence: f32,
    nms: NmsConfig,
}

impl FrameExtractor {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            input_size: config.input_size,
            min_confidence: config.min_confidence,
            nms: config.nms.clone(),
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Decode `video_path` with OpenCV and extract its frames
    #[cfg(feature = "opencv")]
    pub fn extract_video<M>(
        &self,
        video_path: &Path,
        output_dir: &Path,
        model: &mut M,
    ) -> Result<ExtractionStats>
    where
        M: DetectionModel + ?Sized,
    {
        let frames = crate::video::VideoFrames::open(video_path)?;
        self.extract(frames, video_path, output_dir, model)
    }

    /// Run the extraction loop over `frames`, in order.
    ///
    /// Frame decode and inference errors are fatal; failures to write a
    /// single crop are logged and counted.
    pub fn extract<I, M>(
        &self,
        frames: I,
        video_path: &Path,
        output_dir: &Path,
        model: &mut M,
    ) -> Result<ExtractionStats>
    where
        I: IntoIterator<Item = Result<RgbImage>>,
        M: DetectionModel + ?Sized,
    {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        let base_name = video_base_name(video_path);
        let mut stats = ExtractionStats::default();

        for (index, frame) in frames.into_iter().enumerate() {
            let frame = frame?;
            let outcome = self
                .process_frame(index, &frame, &base_name, output_dir, model)
                .with_context(|| format!("Failed to process frame {} of {:?}", index, video_path))?;

            match &outcome {
                FrameOutcome::Written(path) => debug!(frame = index, path = ?path, "Saved crop"),
                FrameOutcome::NoDetection => debug!(frame = index, "No detection"),
                FrameOutcome::LowConfidence(confidence) => {
                    debug!(frame = index, confidence, "Detection below threshold")
                }
                FrameOutcome::AlreadyExists(path) => debug!(frame = index, path = ?path, "Crop exists"),
                FrameOutcome::Failed(e) => {
                    warn!("Error extracting frame {} from {}: {}", index, video_path.display(), e)
                }
            }

            stats.record(&outcome);
        }

        info!(
            video = %video_path.display(),
            frames = stats.frames_processed,
            written = stats.crops_written,
            failed = stats.failed,
            "Finished video"
        );

        Ok(stats)
    }

    fn process_frame<M>(
        &self,
        index: usize,
        frame: &RgbImage,
        base_name: &str,
        output_dir: &Path,
        model: &mut M,
    ) -> Result<FrameOutcome>
    where
        M: DetectionModel + ?Sized,
    {
        let square = ImageUtils::resize_square(frame, self.input_size);
        let input = ImageUtils::to_model_input(&square);

        let proposals = model.infer(&input)?;
        let detections = non_max_suppression(&proposals, &self.nms);

        // One crop per frame: only the top-ranked detection is considered
        let Some(best) = detections.first() else {
            return Ok(FrameOutcome::NoDetection);
        };
        if best.confidence < self.min_confidence {
            return Ok(FrameOutcome::LowConfidence(best.confidence));
        }

        let bounds = best.bounds();
        let path = output_dir.join(crop_file_name(base_name, index, &bounds));
        if path.exists() {
            return Ok(FrameOutcome::AlreadyExists(path));
        }

        let saved = ImageUtils::crop(&square, &bounds)
            .and_then(|crop| ImageUtils::save_png_new(&crop, &path));

        Ok(match saved {
            Ok(true) => FrameOutcome::Written(path),
            Ok(false) => FrameOutcome::AlreadyExists(path),
            Err(e) => FrameOutcome::Failed(e),
        })
    }
}
