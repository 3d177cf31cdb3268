//! Fingerprints a batch of items in parallel while keeping input order.
//!
//! Every item is processed independently on the current rayon pool. Results
//! are collected through an indexed parallel iterator, so the output order is
//! the input order regardless of which worker finished first. A failing item
//! becomes a [`ProcessingError`] and never stops the rest of the batch.

use log::{debug, info};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::error::Result;
use crate::logging::log_hash_error;
use crate::types::{ProcessingError, SourceItem};

/// Successful fingerprints in input order, plus the failures
#[derive(Debug)]
pub struct FingerprintBatch<T> {
    pub fingerprinted: Vec<(String, T)>,
    pub errors: Vec<ProcessingError>,
}

/// Run `fingerprint` over every item.
///
/// `progress`, when given, is bumped once per item whatever the outcome.
pub fn fingerprint_batch<S, T, F>(
    items: &[SourceItem<S>],
    progress: Option<&AtomicUsize>,
    fingerprint: F,
) -> FingerprintBatch<T>
where
    S: Sync,
    T: Send,
    F: Fn(&S) -> Result<T> + Sync,
{
    let start = Instant::now();
    info!("Fingerprinting batch of {} items...", items.len());

    let results: Vec<Result<T>> = items
        .par_iter()
        .map(|item| {
            debug!("Fingerprinting '{}'", item.id);
            let result = fingerprint(&item.source);
            if let Err(e) = &result {
                log_hash_error(&item.id, e);
            }
            if let Some(counter) = progress {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            result
        })
        .collect();

    let mut batch = FingerprintBatch {
        fingerprinted: Vec::with_capacity(items.len()),
        errors: Vec::new(),
    };
    for (item, result) in items.iter().zip(results) {
        match result {
            Ok(value) => batch.fingerprinted.push((item.id.clone(), value)),
            Err(e) => batch
                .errors
                .push(ProcessingError::new(item.id.clone(), e.to_string())),
        }
    }

    info!(
        "Fingerprinted {} items ({} failed) in {:.2?}",
        batch.fingerprinted.len(),
        batch.errors.len(),
        start.elapsed()
    );

    batch
}
