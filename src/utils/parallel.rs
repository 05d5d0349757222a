use std::sync::mpsc;

use rayon::prelude::*;

use crate::audio::metadata::{Candidate, MetadataExtractor, RawScan};

/// Installs the global rayon pool with the configured worker count. Safe to
/// call when a pool already exists (the existing pool wins).
pub fn init_worker_pool(num_threads: usize) {
    let result = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .build_global();
    if result.is_err() {
        log::debug!("rayon pool already initialized, keeping existing configuration");
    }
    log::info!("extracting with {} worker threads", rayon::current_num_threads());
}

/// Fans extraction out over the worker pool and drains results on the
/// calling thread. Workers publish into the channel as they finish, so
/// delivery order tracks completion, not traversal; the consumer owns all
/// aggregation state and sees one scan at a time.
pub fn scan_stream<F>(candidates: Vec<Candidate>, mut consume: F)
where
    F: FnMut(RawScan),
{
    let (sender, receiver) = mpsc::channel();
    rayon::spawn(move || {
        candidates.into_par_iter().for_each_with(sender, |sender, candidate| {
            // A closed channel means the consumer is gone; nothing to do.
            let _ = sender.send(MetadataExtractor::scan(candidate));
        });
    });
    for scan in receiver {
        consume(scan);
    }
}
