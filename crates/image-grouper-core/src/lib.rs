//! Core functionality for grouping images by content similarity.
//!
//! Two notions of "same" are supported:
//! - Exact: byte-identical files, via a cryptographic content fingerprint
//! - Perceptual: visually near-identical images, via a DCT perceptual hash
//!   compared with a Hamming distance threshold
//!
//! Every call fingerprints its inputs from scratch; nothing is cached or
//! persisted between calls.

// -- External Dependencies --
use log::info;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use deduplication::*;
pub use error::{Error, Result};
pub use processing::{
    calculate_phash, compute_content_fingerprint, compute_perceptual_fingerprint,
    content_fingerprint_from_source, hamming_distance, phash_from_bytes, ContentFingerprint,
    HashAlgorithm, PerceptualFingerprint,
};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod deduplication;
pub mod logging;
pub mod processing;
pub mod types;

// -- Test Modules --
#[cfg(test)]
pub mod test_utils;

/// Main entry point binding a [`Config`] to a worker pool.
///
/// Perceptual parameters are checked by the operations that use them, so an
/// out-of-range threshold does not block exact grouping.
pub struct ImageGrouper {
    config: Config,
    pool: rayon::ThreadPool,
    progress: Option<Arc<AtomicUsize>>,
}

impl ImageGrouper {
    /// Create a new ImageGrouper with the provided configuration
    pub fn new(config: Config) -> Result<Self> {
        let threads = config.effective_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fingerprint-{}", i))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build thread pool: {}", e)))?;
        info!("Using {} threads for fingerprinting", threads);

        Ok(Self {
            config,
            pool,
            progress: None,
        })
    }

    /// Count every fingerprinted item (success or failure) into `counter`
    pub fn with_progress(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.progress = Some(counter);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find byte-identical items using the configured hash algorithm
    pub fn find_exact_duplicates<S: ByteSource>(
        &self,
        items: &[SourceItem<S>],
    ) -> ExactDuplicateReport {
        let algorithm = self.config.hash_algorithm;
        self.pool.install(|| {
            deduplication::exact::group_exact(items, algorithm, self.progress.as_deref())
        })
    }

    /// Group visually similar items using the configured threshold and hash size
    pub fn find_similar_groups<S: ByteSource>(
        &self,
        items: &[SourceItem<S>],
    ) -> Result<SimilarGroupReport> {
        self.pool.install(|| {
            deduplication::similar::group_similar(
                items,
                self.config.threshold,
                self.config.hash_size,
                self.progress.as_deref(),
            )
        })
    }

    /// Rank candidates against a reference image using the configured threshold and hash size
    pub fn compare_to_reference<R: ByteSource, S: ByteSource>(
        &self,
        reference: &SourceItem<R>,
        candidates: &[SourceItem<S>],
    ) -> Result<ReferenceReport> {
        self.pool.install(|| {
            deduplication::reference::compare_with_progress(
                reference,
                candidates,
                self.config.threshold,
                self.config.hash_size,
                self.progress.as_deref(),
            )
        })
    }
}
