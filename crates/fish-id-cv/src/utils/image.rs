//! Frame preparation, cropping and PNG output using the `image` crate

use crate::detection::ModelInput;
use crate::error::SaveError;
use fish_id_core::CropBounds;
use image::{ImageFormat, RgbImage, imageops::{self, FilterType}};
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Image utility functions for the extraction loop
pub struct ImageUtils;

impl ImageUtils {
    /// Resize to a `size` x `size` square with bilinear filtering.
    /// Aspect ratio is not preserved.
    pub fn resize_square(frame: &RgbImage, size: u32) -> RgbImage {
        if frame.dimensions() == (size, size) {
            return frame.clone();
        }
        imageops::resize(frame, size, size, FilterType::Triangle)
    }

    /// Lay a square RGB image out as a `(1, 3, H, W)` tensor scaled to [0, 1]
    pub fn to_model_input(square: &RgbImage) -> ModelInput {
        let (width, height) = square.dimensions();
        debug_assert_eq!(width, height);

        let plane = (width * height) as usize;
        let mut data = vec![0.0f32; 3 * plane];

        for (i, pixel) in square.pixels().enumerate() {
            for channel in 0..3 {
                data[channel * plane + i] = pixel[channel] as f32 / 255.0;
            }
        }

        ModelInput { size: width, data }
    }

    /// Crop `bounds` out of `frame`, clamped to the frame edges
    pub fn crop(frame: &RgbImage, bounds: &CropBounds) -> Result<RgbImage, SaveError> {
        let (width, height) = frame.dimensions();
        let (x, y, w, h) = bounds
            .clamp_to(width, height)
            .ok_or(SaveError::InvalidGeometry {
                bounds: *bounds,
                width,
                height,
            })?;

        Ok(imageops::crop_imm(frame, x, y, w, h).to_image())
    }

    /// Write `image` as a PNG at `path` unless the file already exists.
    ///
    /// Returns `Ok(false)` when the file was already there; it is left
    /// untouched. A file that fails to encode is removed again.
    pub fn save_png_new(image: &RgbImage, path: &Path) -> Result<bool, SaveError> {
        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(source) => {
                return Err(SaveError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut writer = BufWriter::new(file);
        let written = image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|source| SaveError::Encode {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|_| {
                writer.flush().map_err(|source| SaveError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            });

        if let Err(e) = written {
            drop(writer);
            let _ = fs::remove_file(path);
            return Err(e);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("fish_id_image_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resize_square() {
        let frame = RgbImage::new(320, 240);
        assert_eq!(ImageUtils::resize_square(&frame, 640).dimensions(), (640, 640));
    }

    #[test]
    fn test_model_input_is_planar_and_normalized() {
        let mut square = RgbImage::new(2, 2);
        square.put_pixel(1, 0, Rgb([255, 0, 51]));

        let input = ImageUtils::to_model_input(&square);
        assert_eq!(input.data.len(), 12);
        // pixel (1, 0) is index 1 in each plane
        assert_eq!(input.data[1], 1.0);
        assert_eq!(input.data[4 + 1], 0.0);
        assert!((input.data[8 + 1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_crop() {
        let mut frame = RgbImage::new(640, 640);
        frame.put_pixel(10, 10, Rgb([1, 2, 3]));

        let crop = ImageUtils::crop(&frame, &CropBounds::new(10, 10, 50, 50)).unwrap();
        assert_eq!(crop.dimensions(), (40, 40));
        assert_eq!(crop.get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_crop_rejects_empty_box() {
        let frame = RgbImage::new(640, 640);
        let result = ImageUtils::crop(&frame, &CropBounds::new(10, 10, 10, 50));
        assert!(matches!(result, Err(SaveError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_save_png_new_never_overwrites() {
        let dir = scratch_dir("no_overwrite");
        let path = dir.join("crop.png");
        fs::write(&path, b"existing").unwrap();

        let written = ImageUtils::save_png_new(&RgbImage::new(4, 4), &path).unwrap();
        assert!(!written);
        assert_eq!(fs::read(&path).unwrap(), b"existing");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_png_new_writes_png() {
        let dir = scratch_dir("writes");
        let path = dir.join("crop.png");

        assert!(ImageUtils::save_png_new(&RgbImage::new(4, 3), &path).unwrap());
        assert_eq!(image::open(&path).unwrap().to_rgb8().dimensions(), (4, 3));

        fs::remove_dir_all(&dir).unwrap();
    }
}
