use image::error::ImageFormatHint;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the image-grouper library
#[derive(Error, Debug)]
pub enum Error {
    /// The byte source could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a valid image
    #[error("Image decoding error: {0}")]
    Decode(String),

    /// Recognised container without a raster we can decode
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The reference image of a comparison could not be fingerprinted
    #[error("Error processing reference image: {0}")]
    Reference(#[source] Box<Error>),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            // No decoder recognised the bytes at all
            image::ImageError::Unsupported(e)
                if matches!(e.format_hint(), ImageFormatHint::Unknown) =>
            {
                Error::Decode(e.to_string())
            }
            image::ImageError::Unsupported(e) => Error::UnsupportedFormat(e.to_string()),
            other => Error::Decode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::error::UnsupportedError;

    #[test]
    fn test_image_io_error_maps_to_io() {
        let err: Error = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ))
        .into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_image_unsupported_maps_to_unsupported_format() {
        let err: Error = image::ImageError::Unsupported(UnsupportedError::from(
            ImageFormatHint::Name("svg".to_string()),
        ))
        .into();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_unrecognised_bytes_map_to_decode() {
        let err: Error = image::load_from_memory(b"definitely not an image")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_reference_error_keeps_source_message() {
        let inner = Error::Decode("bad header".to_string());
        let err = Error::Reference(Box::new(inner));
        assert_eq!(
            err.to_string(),
            "Error processing reference image: Image decoding error: bad header"
        );
    }
}
