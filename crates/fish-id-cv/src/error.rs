//! Recoverable per-frame failures

use fish_id_core::CropBounds;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single crop could not be written.
///
/// None of these abort a run; the frame is logged and skipped.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("bounding box {bounds:?} is empty inside a {width}x{height} frame")]
    InvalidGeometry {
        bounds: CropBounds,
        width: u32,
        height: u32,
    },
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
