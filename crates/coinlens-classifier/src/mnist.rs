//! MNIST IDX file reader.
//!
//! The standard dataset ships as big-endian IDX files: magic 2051 for image
//! tensors (count × rows × cols of u8 pixels) and 2049 for label vectors.
//! Pixels normalize to [0, 1] on load, matching the network's input range.

use std::fs;
use std::path::Path;

use ndarray::Array2;

use crate::error::ClassifierError;

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

pub const IMAGE_SIDE: usize = 28;
pub const IMAGE_PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;

/// One labeled split of the dataset.
#[derive(Debug, Clone)]
pub struct MnistSet {
    /// (samples × 784) pixel matrix in [0, 1].
    pub images: Array2<f32>,
    pub labels: Vec<u8>,
}

impl MnistSet {
    pub fn load(images_path: &Path, labels_path: &Path) -> Result<Self, ClassifierError> {
        let images = parse_images(&fs::read(images_path)?)?;
        let labels = parse_labels(&fs::read(labels_path)?)?;

        if images.nrows() != labels.len() {
            return Err(ClassifierError::Dataset(format!(
                "image count {} does not match label count {}",
                images.nrows(),
                labels.len()
            )));
        }

        Ok(Self { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn parse_images(bytes: &[u8]) -> Result<Array2<f32>, ClassifierError> {
    if bytes.len() < 16 {
        return Err(ClassifierError::Dataset(String::from(
            "image file shorter than its header",
        )));
    }

    let magic = read_u32(bytes, 0);
    if magic != IMAGES_MAGIC {
        return Err(ClassifierError::Dataset(format!(
            "unexpected image magic {magic}, want {IMAGES_MAGIC}"
        )));
    }

    let count = read_u32(bytes, 4) as usize;
    let rows = read_u32(bytes, 8) as usize;
    let cols = read_u32(bytes, 12) as usize;
    if rows != IMAGE_SIDE || cols != IMAGE_SIDE {
        return Err(ClassifierError::Dataset(format!(
            "unsupported image shape {rows}x{cols}, want {IMAGE_SIDE}x{IMAGE_SIDE}"
        )));
    }

    let pixels = &bytes[16..];
    if pixels.len() != count * IMAGE_PIXELS {
        return Err(ClassifierError::Dataset(format!(
            "pixel payload is {} bytes, want {}",
            pixels.len(),
            count * IMAGE_PIXELS
        )));
    }

    let data = pixels.iter().map(|&b| f32::from(b) / 255.0).collect();
    Array2::from_shape_vec((count, IMAGE_PIXELS), data)
        .map_err(|e| ClassifierError::Dataset(e.to_string()))
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>, ClassifierError> {
    if bytes.len() < 8 {
        return Err(ClassifierError::Dataset(String::from(
            "label file shorter than its header",
        )));
    }

    let magic = read_u32(bytes, 0);
    if magic != LABELS_MAGIC {
        return Err(ClassifierError::Dataset(format!(
            "unexpected label magic {magic}, want {LABELS_MAGIC}"
        )));
    }

    let count = read_u32(bytes, 4) as usize;
    let labels = &bytes[8..];
    if labels.len() != count {
        return Err(ClassifierError::Dataset(format!(
            "label payload is {} bytes, want {count}",
            labels.len()
        )));
    }
    if let Some(&bad) = labels.iter().find(|&&l| l > 9) {
        return Err(ClassifierError::Dataset(format!(
            "label {bad} outside digit range 0-9"
        )));
    }

    Ok(labels.to_vec())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
