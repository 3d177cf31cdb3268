use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicUsize;

use crate::processing::{
    content_fingerprint_from_source, fingerprint_batch, ContentFingerprint, HashAlgorithm,
};
use crate::types::{ByteSource, ProcessingError, SourceItem};

/// Items whose bytes are identical
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    /// Shared content fingerprint
    pub fingerprint: ContentFingerprint,

    /// Identifiers in input order
    pub members: Vec<String>,
}

/// Outcome of an exact duplicate search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactDuplicateReport {
    pub algorithm: HashAlgorithm,
    pub total: usize,
    /// Items whose fingerprint nobody else shares
    pub unique: usize,
    pub duplicate_group_count: usize,
    pub groups: Vec<DuplicateGroup>,
    pub errors: Vec<ProcessingError>,
}

/// Finds byte-identical items by grouping them on their content fingerprint.
///
/// Groups come out in the order their fingerprint was first seen, members in
/// input order. Only groups with 2 or more items are included in the result;
/// singletons are counted in `unique`, failures in `errors`.
pub fn find_exact_duplicates<S: ByteSource>(
    items: &[SourceItem<S>],
    algorithm: HashAlgorithm,
) -> ExactDuplicateReport {
    group_exact(items, algorithm, None)
}

pub(crate) fn group_exact<S: ByteSource>(
    items: &[SourceItem<S>],
    algorithm: HashAlgorithm,
    progress: Option<&AtomicUsize>,
) -> ExactDuplicateReport {
    let batch = fingerprint_batch(items, progress, |source| {
        content_fingerprint_from_source(source, algorithm)
    });

    let (groups, unique) = bucket_by_fingerprint(batch.fingerprinted);

    info!(
        "Exact duplicates ({}): {} groups, {} unique, {} errors out of {} items",
        algorithm,
        groups.len(),
        unique,
        batch.errors.len(),
        items.len()
    );

    ExactDuplicateReport {
        algorithm,
        total: items.len(),
        unique,
        duplicate_group_count: groups.len(),
        groups,
        errors: batch.errors,
    }
}

/// Bucket identifiers by fingerprint, keeping first-seen order.
/// Returns the groups with 2+ members and the number of singleton buckets.
pub fn bucket_by_fingerprint(
    fingerprinted: Vec<(String, ContentFingerprint)>,
) -> (Vec<DuplicateGroup>, usize) {
    let mut buckets: IndexMap<ContentFingerprint, Vec<String>> = IndexMap::new();
    for (id, fingerprint) in fingerprinted {
        buckets.entry(fingerprint).or_default().push(id);
    }

    let mut unique = 0;
    let mut groups = Vec::new();
    for (fingerprint, members) in buckets {
        if members.len() > 1 {
            groups.push(DuplicateGroup {
                fingerprint,
                members,
            });
        } else {
            unique += 1;
        }
    }

    (groups, unique)
}
