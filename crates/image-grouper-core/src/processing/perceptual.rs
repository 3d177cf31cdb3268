//! # Perceptual Hashing Module
//!
//! DCT-based perceptual hash (pHash) for visual similarity detection.
//!
//! ## Overview
//!
//! Perceptual hashing generates "fingerprints" that remain similar for visually similar images,
//! unlike cryptographic hashes where minor changes produce completely different outputs.
//!
//! The hash of side `hash_size` is computed as follows:
//!
//! 1. Decode and convert to 8-bit grayscale
//! 2. Resize to `(hash_size * 4)²` with a Lanczos3 filter
//! 3. Apply a 2-D DCT-II (rows, then columns)
//! 4. Keep the top-left `hash_size × hash_size` low-frequency coefficients
//! 5. Take the median of those coefficients, leaving out the DC term
//! 6. Emit one bit per coefficient, set when it exceeds the median (row-major)
//!
//! ## Hamming Distance Interpretation
//!
//! For the default 8×8 grid (64 bits):
//!
//! - 0-5: Same picture after recompression, small crops or brightness shifts
//! - 6-12: Related pictures (same scene, moderate edits)
//! - ~32: Unrelated pictures
//!
//! ## References
//!
//! - "Implementation and analysis of DCT based global perceptual image hashing" by Bian Yang, et al.
//! - "Perceptual Hashing: Robust Image Identification" by Nasir Memon and Savvas A. Chatzichristofis

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use ndarray::Array2;
use rustdct::{Dct2, DctPlanner};
use std::io::Read;

use crate::config::validate_perceptual;
use crate::error::{Error, Result};
use crate::types::ByteSource;

use super::types::PerceptualFingerprint;

/// Ratio between the resize side and the hash side
const HIGHFREQ_FACTOR: u32 = 4;

/// Calculate the perceptual hash of a decoded image.
///
/// Fails with [`Error::Configuration`] when `hash_size` is out of range and
/// with [`Error::Decode`] when the image has no pixels.
pub fn calculate_phash(img: &DynamicImage, hash_size: u32) -> Result<PerceptualFingerprint> {
    validate_perceptual(hash_size, 0)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::Decode("image has no pixels".to_string()));
    }

    let img_size = hash_size * HIGHFREQ_FACTOR;
    let gray = imageops::resize(&img.to_luma8(), img_size, img_size, FilterType::Lanczos3);

    let mut coefficients = pixel_matrix(&gray);
    dct_2d(&mut coefficients);

    let side = hash_size as usize;
    let low_freq: Vec<f32> = coefficients
        .slice(ndarray::s![..side, ..side])
        .iter()
        .copied()
        .collect();

    let threshold = median(&low_freq[1..]);
    let bits: Vec<bool> = low_freq.iter().map(|&c| c > threshold).collect();

    Ok(PerceptualFingerprint::from_bits(&bits))
}

/// Calculate a perceptual hash from encoded image bytes
pub fn phash_from_bytes(bytes: &[u8], hash_size: u32) -> Result<PerceptualFingerprint> {
    validate_perceptual(hash_size, 0)?;

    let img = image::load_from_memory(bytes)?;
    calculate_phash(&img, hash_size)
}

/// Read the whole source and compute its perceptual hash.
///
/// Unlike content hashing the full raster is needed, so the encoded bytes are
/// buffered before decoding.
pub fn compute_perceptual_fingerprint<S: ByteSource + ?Sized>(
    source: &S,
    hash_size: u32,
) -> Result<PerceptualFingerprint> {
    let mut bytes = Vec::new();
    source.open()?.read_to_end(&mut bytes)?;
    phash_from_bytes(&bytes, hash_size)
}

fn pixel_matrix(gray: &GrayImage) -> Array2<f32> {
    let (width, height) = gray.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        gray.get_pixel(x as u32, y as u32)[0] as f32
    })
}

/// Unnormalised 2-D DCT-II, in place
fn dct_2d(matrix: &mut Array2<f32>) {
    let mut planner = DctPlanner::<f32>::new();

    let row_dct = planner.plan_dct2(matrix.ncols());
    let mut buffer = vec![0.0f32; matrix.ncols()];
    for mut row in matrix.rows_mut() {
        buffer.iter_mut().zip(row.iter()).for_each(|(b, &v)| *b = v);
        row_dct.process_dct2(&mut buffer);
        row.iter_mut().zip(&buffer).for_each(|(v, &b)| *v = b);
    }

    let col_dct = planner.plan_dct2(matrix.nrows());
    let mut buffer = vec![0.0f32; matrix.nrows()];
    for mut column in matrix.columns_mut() {
        buffer.iter_mut().zip(column.iter()).for_each(|(b, &v)| *b = v);
        col_dct.process_dct2(&mut buffer);
        column.iter_mut().zip(&buffer).for_each(|(v, &b)| *v = b);
    }
}

/// Median of `values`, 0.0 when empty
fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
