use std::path::PathBuf;

use serde::Serialize;

use crate::analyzers::aggregate::{AlbumGroup, LibrarySnapshot};
use crate::analyzers::duplicate::DuplicateGroup;
use crate::{Issue, IssueKind, TraceEntry};

/// The finalized result object handed to renderers. Assembly only structures
/// what the pipeline already computed; nothing is re-derived downstream.
#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub root: PathBuf,
    pub snapshot: LibrarySnapshot,
    pub albums: Vec<AlbumGroup>,
    pub duplicates: Vec<DuplicateGroup>,
    pub missing_tag_issues: Vec<Issue>,
    pub duplicate_issues: Vec<Issue>,
    pub anomaly_issues: Vec<Issue>,
    pub skipped_issues: Vec<Issue>,
    pub health: u8,
    pub trace: Vec<TraceEntry>,
}

impl AuditReport {
    pub fn assemble(
        root: PathBuf,
        snapshot: LibrarySnapshot,
        albums: Vec<AlbumGroup>,
        duplicates: Vec<DuplicateGroup>,
        issues: Vec<Issue>,
        health: u8,
        trace: Vec<TraceEntry>,
    ) -> Self {
        let mut missing_tag_issues = Vec::new();
        let mut duplicate_issues = Vec::new();
        let mut anomaly_issues = Vec::new();
        let mut skipped_issues = Vec::new();
        for issue in issues {
            match issue.kind {
                IssueKind::MissingTag => missing_tag_issues.push(issue),
                IssueKind::Duplicate => duplicate_issues.push(issue),
                IssueKind::Anomaly => anomaly_issues.push(issue),
                IssueKind::SkippedFile => skipped_issues.push(issue),
            }
        }
        Self {
            root,
            snapshot,
            albums,
            duplicates,
            missing_tag_issues,
            duplicate_issues,
            anomaly_issues,
            skipped_issues,
            health,
            trace,
        }
    }

    /// All issues in a stable order, for the CSV log.
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.missing_tag_issues
            .iter()
            .chain(self.duplicate_issues.iter())
            .chain(self.anomaly_issues.iter())
            .chain(self.skipped_issues.iter())
    }

    pub fn issue_count(&self) -> usize {
        self.missing_tag_issues.len()
            + self.duplicate_issues.len()
            + self.anomaly_issues.len()
            + self.skipped_issues.len()
    }
}
