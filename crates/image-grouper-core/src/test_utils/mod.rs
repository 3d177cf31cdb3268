use image::{DynamicImage, GrayImage, Luma};
use std::io::{self, Cursor, Read};

use crate::types::ByteSource;

/// Smooth grayscale pattern with structure at several frequencies.
/// `offset` brightens every pixel without clipping (values stay below 220).
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

/// Encode an image as PNG in memory
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageOutputFormat::Png)
        .unwrap();
    cursor.into_inner()
}

/// A source whose reads always fail
pub struct FailingSource;

impl ByteSource for FailingSource {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "permission denied",
        ))
    }
}
