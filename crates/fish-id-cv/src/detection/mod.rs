//! Detection model inputs, raw outputs and backends

pub mod device;
#[cfg(feature = "opencv")]
pub mod yolo;

pub use device::Device;
#[cfg(feature = "opencv")]
pub use yolo::YoloModel;

use anyhow::ensure;

/// Normalized `(1, 3, size, size)` NCHW tensor fed to a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub size: u32,
    pub data: Vec<f32>,
}

impl ModelInput {
    pub fn shape(&self) -> [usize; 4] {
        let side = self.size as usize;
        [1, 3, side, side]
    }
}

/// One raw model output row before suppression.
///
/// Box is center/size in input pixels; class scores are per-class
/// probabilities to be multiplied by the objectness.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
    pub objectness: f32,
    pub class_scores: Vec<f32>,
}

impl Proposal {
    /// Split a flat YOLO output buffer into proposals.
    ///
    /// Each row holds `5 + num_classes` values:
    /// `cx, cy, w, h, objectness, class scores...`.
    pub fn from_rows(data: &[f32], num_classes: usize) -> crate::Result<Vec<Proposal>> {
        let stride = 5 + num_classes;
        ensure!(
            data.len() % stride == 0,
            "model output of {} values is not a multiple of the row size {}",
            data.len(),
            stride
        );

        Ok(data
            .chunks_exact(stride)
            .map(|row| Proposal {
                cx: row[0],
                cy: row[1],
                w: row[2],
                h: row[3],
                objectness: row[4],
                class_scores: row[5..].to_vec(),
            })
            .collect())
    }
}
