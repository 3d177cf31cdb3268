use log::info;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicUsize;

use crate::config::validate_perceptual;
use crate::error::{Error, Result};
use crate::processing::{compute_perceptual_fingerprint, fingerprint_batch, PerceptualFingerprint};
use crate::types::{ByteSource, ProcessingError, SourceItem};

/// A candidate within the threshold of the reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub identifier: String,
    pub distance: u32,
    pub fingerprint: PerceptualFingerprint,
}

/// Outcome of comparing candidates against one reference image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceReport {
    pub reference: String,
    pub reference_fingerprint: PerceptualFingerprint,
    pub threshold: u32,
    pub total_candidates: usize,
    pub similar_count: usize,
    /// Closest first
    pub matches: Vec<RankedMatch>,
    pub errors: Vec<ProcessingError>,
}

/// Rank candidates by perceptual distance to a reference image.
///
/// Fails as a whole with [`Error::Reference`] when the reference itself cannot
/// be fingerprinted; candidate failures are listed in `errors` instead.
pub fn compare_to_reference<R: ByteSource, S: ByteSource>(
    reference: &SourceItem<R>,
    candidates: &[SourceItem<S>],
    threshold: u32,
    hash_size: u32,
) -> Result<ReferenceReport> {
    compare_with_progress(reference, candidates, threshold, hash_size, None)
}

pub(crate) fn compare_with_progress<R: ByteSource, S: ByteSource>(
    reference: &SourceItem<R>,
    candidates: &[SourceItem<S>],
    threshold: u32,
    hash_size: u32,
    progress: Option<&AtomicUsize>,
) -> Result<ReferenceReport> {
    validate_perceptual(hash_size, threshold)?;

    let reference_fingerprint = compute_perceptual_fingerprint(&reference.source, hash_size)
        .map_err(|e| Error::Reference(Box::new(e)))?;

    let batch = fingerprint_batch(candidates, progress, |source| {
        compute_perceptual_fingerprint(source, hash_size)
    });

    let matches = rank_by_distance(&reference_fingerprint, batch.fingerprinted, threshold);

    info!(
        "Reference '{}': {} of {} candidates within {}, {} errors",
        reference.id,
        matches.len(),
        candidates.len(),
        threshold,
        batch.errors.len()
    );

    Ok(ReferenceReport {
        reference: reference.id.clone(),
        reference_fingerprint,
        threshold,
        total_candidates: candidates.len(),
        similar_count: matches.len(),
        matches,
        errors: batch.errors,
    })
}

/// Keep the candidates within `threshold` (inclusive) of `reference`, closest
/// first. Ties keep their input order.
pub fn rank_by_distance(
    reference: &PerceptualFingerprint,
    fingerprinted: Vec<(String, PerceptualFingerprint)>,
    threshold: u32,
) -> Vec<RankedMatch> {
    let mut matches: Vec<RankedMatch> = fingerprinted
        .into_iter()
        .filter_map(|(identifier, fingerprint)| {
            let distance = reference.distance(&fingerprint);
            (distance <= threshold).then_some(RankedMatch {
                identifier,
                distance,
                fingerprint,
            })
        })
        .collect();

    matches.sort_by_key(|m| m.distance);
    matches
}
