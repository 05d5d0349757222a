use std::collections::BTreeSet;

use crate::analyzers::aggregate::AlbumGroup;
use crate::config::AuditConfig;
use crate::{Issue, IssueKind, TrackRecord};

/// Rule-based classifier run once after ingestion, over the finalized
/// records and album groups. Each rule is evaluated on its own: a track or
/// album violating several rules produces one issue per rule.
pub struct AnomalyDetector {
    min_duration_secs: f64,
    max_duration_secs: f64,
    min_sample_rate_hz: u32,
}

impl AnomalyDetector {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            min_duration_secs: config.min_duration_secs,
            max_duration_secs: config.max_duration_secs,
            min_sample_rate_hz: config.min_sample_rate_hz,
        }
    }

    pub fn run(&self, records: &[TrackRecord], albums: &[AlbumGroup]) -> Vec<Issue> {
        let mut issues = Vec::new();
        for record in records {
            self.check_track(record, &mut issues);
        }
        for album in albums {
            self.check_album(album, records, &mut issues);
        }
        issues
    }

    fn check_track(&self, record: &TrackRecord, issues: &mut Vec<Issue>) {
        let mut flag = |detail: String| {
            issues.push(Issue::for_track(IssueKind::Anomaly, record.path.clone(), detail));
        };

        if let Some(duration) = record.duration_secs {
            if duration <= 0.0 {
                flag(format!("non-positive duration ({:.1}s)", duration));
            } else if duration < self.min_duration_secs {
                flag(format!(
                    "implausibly short duration ({:.1}s, minimum {:.0}s)",
                    duration, self.min_duration_secs
                ));
            } else if duration > self.max_duration_secs {
                flag(format!(
                    "implausibly long duration ({:.0}s, maximum {:.0}s)",
                    duration, self.max_duration_secs
                ));
            }
        }

        if let Some(rate) = record.sample_rate_hz {
            if rate < self.min_sample_rate_hz {
                flag(format!(
                    "low sample rate ({} Hz, minimum {} Hz)",
                    rate, self.min_sample_rate_hz
                ));
            }
        }
    }

    /// Album rules fire once per album, not once per offending track.
    fn check_album(&self, album: &AlbumGroup, records: &[TrackRecord], issues: &mut Vec<Issue>) {
        let members: Vec<&TrackRecord> = album
            .tracks
            .iter()
            .filter_map(|&index| records.get(index))
            .collect();
        let mut flag = |detail: String| {
            issues.push(Issue::library_wide(
                IssueKind::Anomaly,
                format!("{}: {}", album.label(), detail),
            ));
        };

        let bit_depths: BTreeSet<u32> =
            members.iter().filter_map(|r| r.bit_depth).collect();
        if bit_depths.len() > 1 {
            flag(format!(
                "mixed bit depths across tracks ({})",
                join_numbers(&bit_depths)
            ));
        }

        if album.cover_hashes.len() > 1 {
            flag("cover artwork differs across tracks".to_string());
        }

        let sample_rates: BTreeSet<u32> =
            members.iter().filter_map(|r| r.sample_rate_hz).collect();
        if sample_rates.len() > 1 {
            flag(format!(
                "mixed sample rates across tracks ({} Hz)",
                join_numbers(&sample_rates)
            ));
        }

        let codecs: BTreeSet<&str> = members
            .iter()
            .map(|r| r.codec.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        if codecs.len() > 1 {
            flag(format!(
                "mixed file formats in one album ({})",
                codecs.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let without_art = members
            .iter()
            .filter(|r| r.cover_art_hash.is_none())
            .count();
        if without_art > 0 && without_art < members.len() {
            flag(format!(
                "{} of {} tracks have no embedded cover art",
                without_art,
                members.len()
            ));
        }
    }
}

fn join_numbers(values: &BTreeSet<u32>) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
