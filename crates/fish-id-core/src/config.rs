//! Extraction configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_IN_DIR: &str = "intro/videos";
pub const DEFAULT_OUT_DIR: &str = "bboxes";
pub const DEFAULT_WEIGHTS: &str = "intro/annotations/models/last.onnx";
pub const DEFAULT_MIN_CONF: f32 = 0.9;
pub const DEFAULT_VIDEO_EXTENSION: &str = "avi";
pub const DEFAULT_INPUT_SIZE: u32 = 640;

/// Compute target for the detection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Use an accelerator when one is available, otherwise the CPU
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// Non-maximum suppression settings applied to raw model proposals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NmsConfig {
    /// Proposals scoring below this are discarded before suppression
    pub conf_threshold: f32,
    /// Boxes of the same class overlapping more than this are suppressed
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
        }
    }
}

/// Main extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub weights: PathBuf,
    /// Extension (without the dot) a file must have to be treated as a video
    pub video_extension: String,
    pub min_confidence: f32,
    /// Side of the square the frames are resized to before inference
    pub input_size: u32,
    pub num_classes: usize,
    pub device: DevicePreference,
    pub nms: NmsConfig,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("video extension must not be empty")]
    EmptyExtension,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_dir: DEFAULT_IN_DIR.into(),
            output_dir: DEFAULT_OUT_DIR.into(),
            weights: DEFAULT_WEIGHTS.into(),
            video_extension: DEFAULT_VIDEO_EXTENSION.to_string(),
            min_confidence: DEFAULT_MIN_CONF,
            input_size: DEFAULT_INPUT_SIZE,
            num_classes: 1,
            device: DevicePreference::Auto,
            nms: NmsConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Load a JSON configuration file; missing fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = [
            ("min_confidence", self.min_confidence),
            ("nms.conf_threshold", self.nms.conf_threshold),
            ("nms.iou_threshold", self.nms.iou_threshold),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        if self.input_size == 0 {
            return Err(ConfigError::Zero("input_size"));
        }
        if self.num_classes == 0 {
            return Err(ConfigError::Zero("num_classes"));
        }
        if self.nms.max_detections == 0 {
            return Err(ConfigError::Zero("nms.max_detections"));
        }
        if self.video_extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = ExtractConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("intro/videos"));
        assert_eq!(config.output_dir, PathBuf::from("bboxes"));
        assert_eq!(config.min_confidence, 0.9);
        assert_eq!(config.input_size, 640);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{"min_confidence": 0.5, "device": "cpu", "nms": {"iou_threshold": 0.6}}"#)
                .unwrap();

        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.device, DevicePreference::Cpu);
        assert_eq!(config.nms.iou_threshold, 0.6);
        assert_eq!(config.nms.max_detections, 300);
        assert_eq!(config.video_extension, "avi");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ExtractConfig::default();
        config.min_confidence = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange { name: "min_confidence", value: 1.5 })
        );

        let mut config = ExtractConfig::default();
        config.input_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::Zero("input_size")));

        let mut config = ExtractConfig::default();
        config.video_extension.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyExtension));
    }
}
