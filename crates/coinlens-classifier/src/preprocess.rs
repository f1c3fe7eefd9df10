//! Upload preprocessing.
//!
//! Mirrors the training data's shape: decode the raster, resize to 28×28,
//! grayscale, normalize pixels to [0, 1], flatten row-major.

use image::imageops::FilterType;
use ndarray::Array1;

use crate::error::ClassifierError;
use crate::mnist::{IMAGE_PIXELS, IMAGE_SIDE};

/// Converts an uploaded jpg/png payload into a flattened network input.
pub fn image_to_input(bytes: &[u8]) -> Result<Array1<f32>, ClassifierError> {
    let decoded = image::load_from_memory(bytes)?;
    let gray = decoded
        .resize_exact(IMAGE_SIDE as u32, IMAGE_SIDE as u32, FilterType::Triangle)
        .to_luma8();

    let pixels = gray
        .pixels()
        .map(|p| f32::from(p.0[0]) / 255.0)
        .collect::<Vec<_>>();
    debug_assert_eq!(pixels.len(), IMAGE_PIXELS);

    Ok(Array1::from_vec(pixels))
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;

    fn png_bytes(width: u32, height: u32, value: u8) -> Vec<u8> {
        let mut img = GrayImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Luma([value]);
        }
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png)
            .expect("encodes");
        bytes.into_inner()
    }

    #[test]
    fn any_input_size_resizes_to_network_shape() {
        let input = image_to_input(&png_bytes(100, 60, 255)).expect("decodes");
        assert_eq!(input.len(), IMAGE_PIXELS);
        assert!(input.iter().all(|&v| (v - 1.0).abs() < 1e-3));
    }

    #[test]
    fn pixels_normalize_to_unit_range() {
        let input = image_to_input(&png_bytes(28, 28, 128)).expect("decodes");
        assert!(input.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!((input[0] - 128.0 / 255.0).abs() < 1e-3);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            image_to_input(b"not an image"),
            Err(ClassifierError::Image(_))
        ));
    }
}
