//! Crop bounds and deterministic output file names

use std::path::Path;

/// Integer pixel bounds of a crop, as used in the output file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropBounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CropBounds {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Truncate floating point corners toward zero.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32)
    }

    /// Intersect with a `width` x `height` image.
    ///
    /// Returns `(x, y, width, height)` of the visible region, or `None` when
    /// nothing of the box lies inside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let clamp = |v: i32, max: u32| v.clamp(0, max as i32) as u32;

        let (x1, x2) = (clamp(self.x1, width), clamp(self.x2, width));
        let (y1, y2) = (clamp(self.y1, height), clamp(self.y2, height));

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some((x1, y1, x2 - x1, y2 - y1))
    }
}

/// File name of a video without its directory and extension
pub fn video_base_name(video_path: &Path) -> String {
    video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `{video}_frame_{index}_bbox_{x1}_{y1}_{x2}_{y2}.png`
pub fn crop_file_name(base_name: &str, frame_index: usize, bounds: &CropBounds) -> String {
    format!(
        "{}_frame_{}_bbox_{}_{}_{}_{}.png",
        base_name, frame_index, bounds.x1, bounds.y1, bounds.x2, bounds.y2
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_toward_zero() {
        let bounds = CropBounds::from_corners(10.9, 10.1, 49.99, 50.0);
        assert_eq!(bounds, CropBounds::new(10, 10, 49, 50));

        let bounds = CropBounds::from_corners(-0.7, -3.2, 5.5, 5.5);
        assert_eq!(bounds, CropBounds::new(0, -3, 5, 5));
    }

    #[test]
    fn test_clamp_to_image() {
        let inside = CropBounds::new(10, 10, 50, 50);
        assert_eq!(inside.clamp_to(640, 640), Some((10, 10, 40, 40)));

        let overhanging = CropBounds::new(-5, 600, 700, 660);
        assert_eq!(overhanging.clamp_to(640, 640), Some((0, 600, 640, 40)));
    }

    #[test]
    fn test_degenerate_bounds() {
        assert_eq!(CropBounds::new(20, 10, 20, 50).clamp_to(640, 640), None);
        assert_eq!(CropBounds::new(10, 30, 50, 30).clamp_to(640, 640), None);
        assert_eq!(CropBounds::new(50, 10, 20, 50).clamp_to(640, 640), None);
        assert_eq!(CropBounds::new(700, 10, 800, 50).clamp_to(640, 640), None);
    }

    #[test]
    fn test_file_name() {
        let name = crop_file_name("tank_03", 0, &CropBounds::new(10, 10, 50, 50));
        assert_eq!(name, "tank_03_frame_0_bbox_10_10_50_50.png");
    }

    #[test]
    fn test_video_base_name() {
        assert_eq!(video_base_name(Path::new("intro/videos/a/tank_03.avi")), "tank_03");
        assert_eq!(video_base_name(Path::new("clip.v2.avi")), "clip.v2");
    }
}
