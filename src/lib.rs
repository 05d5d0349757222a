use std::path::PathBuf;
use serde::Serialize;

pub mod analyzers;
pub mod audio;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod utils;

/// Per-file metadata as read from the audio header and tags. Built once by
/// the normalizer and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct TrackRecord {
    pub path: PathBuf,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub composer: Option<String>,
    pub duration_secs: Option<f64>,
    pub sample_rate_hz: Option<u32>,
    pub bit_depth: Option<u32>,
    pub codec: String,
    pub size_bytes: u64,
    pub cover_art_hash: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    MissingTag,
    Duplicate,
    Anomaly,
    SkippedFile,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingTag => "missing_tag",
            IssueKind::Duplicate => "duplicate",
            IssueKind::Anomaly => "anomaly",
            IssueKind::SkippedFile => "skipped_file",
        }
    }
}

/// A single finding. `path` is None for album- or library-wide findings.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub path: Option<PathBuf>,
    pub detail: String,
}

impl Issue {
    pub fn for_track(kind: IssueKind, path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
            detail: detail.into(),
        }
    }

    pub fn library_wide(kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: None,
            detail: detail.into(),
        }
    }
}

/// One debug trace line per scanned file (path, album, directory depth).
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub path: PathBuf,
    pub album: Option<String>,
    pub depth: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metadata extraction error: {0}")]
    Metadata(String),
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;

// Re-exports for convenience
pub use analyzers::aggregate::{AlbumGroup, AlbumKey, LibrarySnapshot, StreamingAggregator};
pub use analyzers::anomaly::AnomalyDetector;
pub use analyzers::duplicate::{DuplicateDetector, DuplicateGroup, Fingerprint};
pub use analyzers::health::HealthScorer;
pub use analyzers::normalize::TrackNormalizer;
pub use audio::metadata::{Candidate, MetadataExtractor, RawScan};
pub use config::AuditConfig;
pub use pipeline::AuditPipeline;
pub use report::AuditReport;
