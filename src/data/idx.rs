//! Reader for the IDX binary format used by MNIST and its derivatives
//! (Fashion-MNIST, EMNIST, …).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```

use std::path::Path;

use log::info;

use crate::error::{NnError, Result};
use crate::math::vector::Vector;
use crate::train::trainer::TrainingPair;

/// Images paired with their labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub width: usize,
    pub height: usize,
    /// Row-major pixels divided by 255 so values lie in `[0.0, 1.0]`.
    pub images: Vec<Vector>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Pixels per image, i.e. the input layer size a network needs.
    pub fn input_size(&self) -> usize {
        self.width * self.height
    }

    /// Pairs every image with a one-hot desired vector of length `n_classes`.
    pub fn training_pairs(&self, n_classes: usize) -> Result<Vec<TrainingPair>> {
        self.images
            .iter()
            .zip(self.labels.iter())
            .enumerate()
            .map(|(i, (image, &label))| {
                let desired = Vector::one_hot(n_classes, label as usize).map_err(|_| {
                    NnError::Dataset(format!(
                        "label at index {}: class {} is out of range for {} classes",
                        i, label, n_classes
                    ))
                })?;
                Ok(TrainingPair::new(image.clone(), desired))
            })
            .collect()
    }

    /// Keeps only the first `n` examples.
    pub fn truncate(&mut self, n: usize) {
        self.images.truncate(n);
        self.labels.truncate(n);
    }
}

fn read_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

fn check_header(bytes: &[u8], what: &str, header_len: usize, dims: u8) -> Result<()> {
    if bytes.len() < header_len {
        return Err(NnError::Dataset(format!(
            "IDX {} file too short: expected at least {} header bytes, got {}",
            what,
            header_len,
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NnError::Dataset(format!(
            "IDX {} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            what, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(NnError::Dataset(format!(
            "IDX {} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            what, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(NnError::Dataset(format!(
            "IDX {} file: expected {} dimensions, got {}",
            what, dims, bytes[3]
        )));
    }
    Ok(())
}

/// Parses an IDX3 image file and an IDX1 label file held in memory.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Dataset> {
    check_header(image_bytes, "image", 16, 0x03)?;
    check_header(label_bytes, "label", 8, 0x01)?;

    let n_items = read_u32(image_bytes, 4);
    let height = read_u32(image_bytes, 8);
    let width = read_u32(image_bytes, 12);
    let label_count = read_u32(label_bytes, 4);

    if label_count != n_items {
        return Err(NnError::Dataset(format!(
            "image file declares {} items but label file declares {}",
            n_items, label_count
        )));
    }

    let n_pixels = height
        .checked_mul(width)
        .filter(|&n| n > 0)
        .ok_or_else(|| NnError::Dataset(format!("invalid image size {}x{}", height, width)))?;
    let required_image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| NnError::Dataset("image data length overflows usize".into()))?;

    if image_bytes.len() < required_image_len {
        return Err(NnError::Dataset(format!(
            "IDX image file too short: {} items of {}x{} pixels need {} bytes, file has {}",
            n_items,
            height,
            width,
            required_image_len,
            image_bytes.len()
        )));
    }
    if label_bytes.len() < 8 + n_items {
        return Err(NnError::Dataset(format!(
            "IDX label file too short: {} labels need {} bytes, file has {}",
            n_items,
            8 + n_items,
            label_bytes.len()
        )));
    }

    let images = image_bytes[16..required_image_len]
        .chunks_exact(n_pixels)
        .map(|chunk| Vector::new(chunk.iter().map(|&px| px as f64 / 255.0).collect()))
        .collect();
    let labels = label_bytes[8..8 + n_items].to_vec();

    Ok(Dataset { width, height, images, labels })
}

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(images_path: impl AsRef<Path>, labels_path: impl AsRef<Path>) -> Result<Dataset> {
    let image_bytes = std::fs::read(images_path.as_ref())?;
    let label_bytes = std::fs::read(labels_path.as_ref())?;
    let dataset = parse_idx_pair(&image_bytes, &label_bytes)?;
    info!(
        "loaded {} images of {}x{} from {}",
        dataset.len(),
        dataset.height,
        dataset.width,
        images_path.as_ref().display()
    );
    Ok(dataset)
}
