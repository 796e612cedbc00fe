//! Detections produced by the model after suppression
//!
//! Core abstraction for representing and comparing detection results.

use fish_id_core::CropBounds;

/// A bounding box detection in input-pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: usize,
}

impl Detection {
    /// Create a new detection from its corners
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: usize) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
            class_id,
        }
    }

    /// Create from a center point and size
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32, confidence: f32, class_id: usize) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0, confidence, class_id)
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Calculate area of the bounding box
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Calculate intersection over union (IoU) with another box
    pub fn iou(&self, other: &Detection) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) * (y2 - y1);
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            return 0.0;
        }

        intersection / union
    }

    /// Check if this box overlaps with another
    pub fn overlaps(&self, other: &Detection, threshold: f32) -> bool {
        self.iou(other) > threshold
    }

    /// Integer crop bounds (corners truncated toward zero)
    pub fn bounds(&self) -> CropBounds {
        CropBounds::from_corners(self.x1, self.y1, self.x2, self.y2)
    }
}
