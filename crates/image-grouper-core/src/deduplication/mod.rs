//! Grouping of fingerprinted items.
//!
//! - [`exact`]: byte-identical items, bucketed on a content fingerprint
//! - [`similar`]: greedy threshold clustering of perceptual fingerprints
//! - [`reference`]: candidates ranked by distance to one reference image

pub mod exact;
pub mod reference;
pub mod similar;

pub use exact::{bucket_by_fingerprint, find_exact_duplicates, DuplicateGroup, ExactDuplicateReport};
pub use reference::{compare_to_reference, rank_by_distance, RankedMatch, ReferenceReport};
pub use similar::{cluster_by_threshold, find_similar_groups, SimilarGroup, SimilarGroupReport};
