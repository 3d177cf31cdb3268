use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicUsize;

use crate::config::validate_perceptual;
use crate::error::Result;
use crate::processing::{compute_perceptual_fingerprint, fingerprint_batch, PerceptualFingerprint};
use crate::types::{ByteSource, ProcessingError, SourceItem};

/// Items within the threshold of a shared representative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarGroup {
    /// 0-based, in assignment order
    pub group_id: usize,

    /// Fingerprint of the first member
    pub representative_fingerprint: PerceptualFingerprint,

    /// Identifiers, representative first, then input order
    pub members: Vec<String>,
}

/// Outcome of a perceptual similarity search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarGroupReport {
    pub hash_size: u32,
    pub threshold: u32,
    pub total: usize,
    /// Items that were fingerprinted successfully
    pub processed: usize,
    pub similar_group_count: usize,
    pub groups: Vec<SimilarGroup>,
    pub errors: Vec<ProcessingError>,
}

/// Group visually similar items.
///
/// `hash_size` and `threshold` are checked once before any item is read. Items
/// that do not end up in a group of 2+ are not listed anywhere; they only show
/// up in `processed`.
pub fn find_similar_groups<S: ByteSource>(
    items: &[SourceItem<S>],
    threshold: u32,
    hash_size: u32,
) -> Result<SimilarGroupReport> {
    group_similar(items, threshold, hash_size, None)
}

pub(crate) fn group_similar<S: ByteSource>(
    items: &[SourceItem<S>],
    threshold: u32,
    hash_size: u32,
    progress: Option<&AtomicUsize>,
) -> Result<SimilarGroupReport> {
    validate_perceptual(hash_size, threshold)?;

    let batch = fingerprint_batch(items, progress, |source| {
        compute_perceptual_fingerprint(source, hash_size)
    });

    let groups = cluster_by_threshold(&batch.fingerprinted, threshold);

    info!(
        "Similar images (hash_size={}, threshold={}): {} groups from {} fingerprinted, {} errors",
        hash_size,
        threshold,
        groups.len(),
        batch.fingerprinted.len(),
        batch.errors.len()
    );

    Ok(SimilarGroupReport {
        hash_size,
        threshold,
        total: items.len(),
        processed: batch.fingerprinted.len(),
        similar_group_count: groups.len(),
        groups,
        errors: batch.errors,
    })
}

/// Greedy single-link clustering seeded by input order.
///
/// Each item not yet claimed opens a candidate group and claims every later
/// unclaimed item within `threshold` (inclusive) of *its own* fingerprint.
/// Members are never compared with each other, so two members of a group can
/// be further apart than `threshold`. Once claimed an item is never
/// reconsidered. A root that claims nothing is dropped and never retried.
pub fn cluster_by_threshold(
    fingerprinted: &[(String, PerceptualFingerprint)],
    threshold: u32,
) -> Vec<SimilarGroup> {
    let mut processed = vec![false; fingerprinted.len()];
    let mut groups = Vec::new();

    for (i, (root_id, root_fp)) in fingerprinted.iter().enumerate() {
        if processed[i] {
            continue;
        }

        let mut members = vec![root_id.clone()];
        for (j, (candidate_id, candidate_fp)) in fingerprinted.iter().enumerate().skip(i + 1) {
            if processed[j] {
                continue;
            }
            let distance = root_fp.distance(candidate_fp);
            if distance <= threshold {
                debug!("'{}' joins '{}' at distance {}", candidate_id, root_id, distance);
                members.push(candidate_id.clone());
                processed[j] = true;
            }
        }

        if members.len() > 1 {
            processed[i] = true;
            groups.push(SimilarGroup {
                group_id: groups.len(),
                representative_fingerprint: root_fp.clone(),
                members,
            });
        }
    }

    groups
}
