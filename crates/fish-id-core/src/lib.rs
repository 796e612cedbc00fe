//! Core data types for the fish-id bounding-box extractor.
//!
//! Configuration, output naming and video discovery. Nothing in here touches
//! the detection model or video decoding.

pub mod config;
pub mod discovery;
pub mod naming;

pub use config::{ConfigError, DevicePreference, ExtractConfig, NmsConfig};
pub use discovery::{find_videos, output_dir_for};
pub use naming::{CropBounds, crop_file_name, video_base_name};
