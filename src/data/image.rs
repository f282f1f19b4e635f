//! Turns ordinary image files into network input vectors.
//!
//! Images are decoded (PNG/JPEG/BMP/GIF), resized to the requested
//! dimensions, converted to grayscale and normalized to `[0, 1]`, matching
//! the pixel layout produced by the IDX reader.

use std::path::Path;

use crate::error::Result;
use crate::math::vector::Vector;

/// Decodes image bytes into a row-major grayscale vector of length
/// `width * height`.
pub fn image_bytes_to_input(bytes: &[u8], width: u32, height: u32) -> Result<Vector> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(width, height, image::imageops::FilterType::Lanczos3);
    let gray = resized.to_luma8();
    Ok(Vector::new(gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect()))
}

pub fn load_image_input(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Vector> {
    let bytes = std::fs::read(path)?;
    image_bytes_to_input(&bytes, width, height)
}
