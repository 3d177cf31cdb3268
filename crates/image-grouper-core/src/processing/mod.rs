// Core modules
mod batch_processor;
mod cryptographic;
mod distance;
mod perceptual;

pub mod types;

// Expose content fingerprint calculations
pub use cryptographic::*;

// Expose perceptual hash
pub use distance::hamming_distance;
pub use perceptual::{calculate_phash, compute_perceptual_fingerprint, phash_from_bytes};

// Reexport core functionality
pub use batch_processor::{fingerprint_batch, FingerprintBatch};
pub use types::{ContentFingerprint, HashAlgorithm, PerceptualFingerprint};
