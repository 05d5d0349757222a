use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::analyzers::canonicalize;
use crate::config::AuditConfig;
use crate::{AuditError, Result, TrackRecord};

/// Fuzzy identity of a track: decorated-title noise stripped, duration and
/// size coarsened so re-encodes and tag edits still collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fingerprint {
    pub title: String,
    pub duration_bucket: i64,
    pub size_bucket: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub fingerprint: Fingerprint,
    pub paths: Vec<PathBuf>,
}

/// Groups tracks by fingerprint as they stream in. Records without a title
/// or duration cannot be fingerprinted and are left to the missing-tag
/// reporting instead.
pub struct DuplicateDetector {
    patterns: Vec<Regex>,
    size_bucket_bytes: u64,
    groups: HashMap<Fingerprint, Vec<PathBuf>>,
}

impl DuplicateDetector {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let mut patterns = Vec::with_capacity(config.decoration_patterns.len());
        for source in &config.decoration_patterns {
            let regex = RegexBuilder::new(source)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    AuditError::Config(format!("bad decoration pattern '{}': {}", source, e))
                })?;
            patterns.push(regex);
        }
        Ok(Self {
            patterns,
            size_bucket_bytes: config.size_bucket_bytes.max(1),
            groups: HashMap::new(),
        })
    }

    pub fn ingest(&mut self, record: &TrackRecord) {
        let Some(fingerprint) = self.fingerprint(record) else {
            return;
        };
        let members = self.groups.entry(fingerprint).or_default();
        // Paths are unique per run; the guard keeps the invariant explicit.
        if !members.contains(&record.path) {
            members.push(record.path.clone());
        }
    }

    pub fn fingerprint(&self, record: &TrackRecord) -> Option<Fingerprint> {
        let title = record.title.as_deref()?;
        let duration = record.duration_secs?;
        let normalized = self.normalize_title(title);
        if normalized.is_empty() {
            return None;
        }
        Some(Fingerprint {
            title: normalized,
            // Two-second cells: a one-second drift between rips of the same
            // track must still collide.
            duration_bucket: (duration / 2.0).round() as i64,
            size_bucket: (record.size_bytes + self.size_bucket_bytes / 2) / self.size_bucket_bytes,
        })
    }

    fn normalize_title(&self, title: &str) -> String {
        let mut stripped = title.to_string();
        for pattern in &self.patterns {
            stripped = pattern.replace_all(&stripped, " ").into_owned();
        }
        let depunctuated: String = stripped
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        canonicalize(&depunctuated)
    }

    /// Only groups with two or more members are reportable. Ordering is a
    /// pure function of the final content: largest groups first, ties by
    /// normalized title; member paths sorted.
    pub fn finalize(self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = self
            .groups
            .into_iter()
            .filter(|(_, paths)| paths.len() >= 2)
            .map(|(fingerprint, mut paths)| {
                paths.sort();
                DuplicateGroup { fingerprint, paths }
            })
            .collect();
        groups.sort_by(|a, b| {
            Reverse(a.paths.len())
                .cmp(&Reverse(b.paths.len()))
                .then_with(|| a.fingerprint.title.cmp(&b.fingerprint.title))
        });
        groups
    }
}
