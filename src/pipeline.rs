use std::path::PathBuf;

use crate::analyzers::aggregate::StreamingAggregator;
use crate::analyzers::anomaly::AnomalyDetector;
use crate::analyzers::duplicate::DuplicateDetector;
use crate::analyzers::health::HealthScorer;
use crate::analyzers::normalize::TrackNormalizer;
use crate::audio::metadata::RawScan;
use crate::config::AuditConfig;
use crate::report::AuditReport;
use crate::{Issue, IssueKind, Result, TraceEntry, TrackRecord};

/// Owns the single consuming path of the audit: raw scans go in one at a
/// time, `finalize` runs the post-ingestion passes and assembles the report.
/// Exactly one thread drives this struct; workers only produce `RawScan`s.
pub struct AuditPipeline {
    root: PathBuf,
    normalizer: TrackNormalizer,
    aggregator: StreamingAggregator,
    duplicates: DuplicateDetector,
    anomalies: AnomalyDetector,
    scorer: HealthScorer,
    records: Vec<TrackRecord>,
    issues: Vec<Issue>,
    trace: Option<Vec<TraceEntry>>,
}

impl AuditPipeline {
    pub fn new(root: impl Into<PathBuf>, config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            normalizer: TrackNormalizer::new(),
            aggregator: StreamingAggregator::new(config.top_k),
            duplicates: DuplicateDetector::new(config)?,
            anomalies: AnomalyDetector::new(config),
            scorer: HealthScorer::new(config),
            records: Vec::new(),
            issues: Vec::new(),
            trace: None,
        })
    }

    /// Enables the per-file debug trace (path, album, depth).
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    pub fn ingest(&mut self, scan: RawScan) {
        let path = scan.path.clone();
        let depth = scan.depth;
        let normalized = self.normalizer.normalize(scan);

        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEntry {
                path,
                album: normalized
                    .record
                    .as_ref()
                    .and_then(|r| r.album.clone()),
                depth,
            });
        }

        match normalized.record {
            Some(record) => {
                let index = self.records.len();
                self.aggregator.ingest(index, &record);
                self.duplicates.ingest(&record);
                self.records.push(record);
            }
            None => self.aggregator.note_skipped(),
        }
        self.issues.extend(normalized.issues);
    }

    pub fn tracks_seen(&self) -> usize {
        self.records.len()
    }

    /// Freezes all running state, runs the post-ingestion passes and merges
    /// everything into the immutable report.
    pub fn finalize(self) -> AuditReport {
        let Self {
            root,
            aggregator,
            duplicates,
            anomalies,
            scorer,
            records,
            mut issues,
            trace,
            ..
        } = self;

        let (snapshot, albums) = aggregator.finalize();
        let duplicate_groups = duplicates.finalize();

        // One issue per redundant member keeps the CSV log one-row-per-issue
        // across every kind.
        for group in &duplicate_groups {
            let original = &group.paths[0];
            for extra in &group.paths[1..] {
                issues.push(Issue::for_track(
                    IssueKind::Duplicate,
                    extra.clone(),
                    format!(
                        "same fingerprint as {} (title '{}')",
                        original.display(),
                        group.fingerprint.title
                    ),
                ));
            }
        }

        issues.extend(anomalies.run(&records, &albums));
        let health = scorer.score(&snapshot, &issues, &duplicate_groups);

        log::info!(
            "audit finalized: {} tracks, {} albums, {} duplicate groups, health {}",
            snapshot.total_tracks,
            snapshot.total_albums,
            duplicate_groups.len(),
            health
        );

        AuditReport::assemble(
            root,
            snapshot,
            albums,
            duplicate_groups,
            issues,
            health,
            trace.unwrap_or_default(),
        )
    }
}
