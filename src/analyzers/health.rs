use crate::analyzers::aggregate::LibrarySnapshot;
use crate::analyzers::duplicate::DuplicateGroup;
use crate::config::{AuditConfig, PenaltyWeights};
use crate::{Issue, IssueKind};

/// Folds the issue counts into one 0..=100 figure. Deterministic for a given
/// set of counts and weights; an empty library scores 100.
pub struct HealthScorer {
    weights: PenaltyWeights,
}

impl HealthScorer {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            weights: config.weights,
        }
    }

    pub fn score(
        &self,
        snapshot: &LibrarySnapshot,
        issues: &[Issue],
        duplicates: &[DuplicateGroup],
    ) -> u8 {
        let missing = issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingTag)
            .count() as f64;
        let anomalies = issues
            .iter()
            .filter(|i| i.kind == IssueKind::Anomaly)
            .count() as f64;
        // Every group member beyond the first is a redundant file.
        let redundant: usize = duplicates
            .iter()
            .map(|g| g.paths.len().saturating_sub(1))
            .sum();

        let penalty = self.weights.missing_tag * missing
            + self.weights.anomaly * anomalies
            + self.weights.duplicate * redundant as f64;
        let tracks = snapshot.total_tracks.max(1) as f64;
        let deduction = (100.0 * penalty / tracks).round() as i64;
        (100 - deduction).clamp(0, 100) as u8
    }
}
