//! Streaming frame source backed by OpenCV `videoio`

use crate::Result;
use anyhow::{Context, anyhow, ensure};
use image::RgbImage;
use opencv::{core::Mat, imgproc, prelude::*, videoio};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Forward-only iterator over the RGB frames of a video file.
///
/// Frames are decoded one at a time; the sequence cannot be restarted.
pub struct VideoFrames {
    capture: videoio::VideoCapture,
    path: PathBuf,
    decoded: usize,
    finished: bool,
}

impl VideoFrames {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        ensure!(path.is_file(), "Video file not found: {:?}", path);

        let path_str = path.to_string_lossy();
        let capture = videoio::VideoCapture::from_file(&path_str, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open video: {}", path_str))?;
        ensure!(capture.is_opened()?, "Failed to open video file: {}", path_str);

        debug!(
            video = %path_str,
            frames = capture.get(videoio::CAP_PROP_FRAME_COUNT).unwrap_or(0.0),
            fps = capture.get(videoio::CAP_PROP_FPS).unwrap_or(0.0),
            "Opened video"
        );

        Ok(Self {
            capture,
            path: path.to_path_buf(),
            decoded: 0,
            finished: false,
        })
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&frame, &mut rgb, imgproc::COLOR_BGR2RGB)?;

        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let bytes = rgb.data_bytes()?.to_vec();
        let image = RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
            anyhow!(
                "Frame {} of {:?} has an unexpected layout",
                self.decoded,
                self.path
            )
        })?;

        self.decoded += 1;
        Ok(Some(image))
    }
}

impl Iterator for VideoFrames {
    type Item = Result<RgbImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.context(format!("Failed to decode {:?}", self.path))))
            }
        }
    }
}
