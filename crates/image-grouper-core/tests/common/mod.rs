//! Helpers shared by the integration tests: synthetic images encoded in memory
#![allow(dead_code)]

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Smooth grayscale pattern; `offset` brightens without clipping
pub fn pattern_image(width: u32, height: u32, offset: u8) -> DynamicImage {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let value = 100.0
            + 40.0 * (fx * 0.15).sin()
            + 30.0 * (fy * 0.11).cos()
            + 20.0 * ((fx + fy) * 0.05).sin();
        Luma([value as u8 + offset])
    });
    DynamicImage::ImageLuma8(img)
}

pub fn encode(img: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    encode(img, ImageOutputFormat::Png)
}

/// Write `bytes` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
