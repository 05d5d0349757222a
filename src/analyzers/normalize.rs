use crate::audio::metadata::RawScan;
use crate::{Issue, IssueKind, TrackRecord};

/// Output of normalizing one raw extraction result: at most one record, plus
/// the issues the read itself produced (missing tags or a skip).
#[derive(Debug)]
pub struct NormalizedScan {
    pub record: Option<TrackRecord>,
    pub issues: Vec<Issue>,
}

/// Turns raw extraction results into canonical records. Fields are taken as
/// read; nothing is inferred from file names or siblings.
pub struct TrackNormalizer;

impl TrackNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, scan: RawScan) -> NormalizedScan {
        let raw = match scan.outcome {
            Ok(raw) => raw,
            Err(reason) => {
                return NormalizedScan {
                    record: None,
                    issues: vec![Issue::for_track(IssueKind::SkippedFile, scan.path, reason)],
                };
            }
        };

        let record = TrackRecord {
            path: scan.path,
            artist: clean(raw.artist),
            album: clean(raw.album),
            title: clean(raw.title),
            composer: clean(raw.composer),
            duration_secs: raw.duration_secs,
            sample_rate_hz: raw.sample_rate_hz,
            bit_depth: raw.bit_depth,
            codec: raw.codec,
            size_bytes: raw.size_bytes,
            cover_art_hash: raw.cover_art_hash,
        };

        let mut issues = Vec::new();
        let mut flag_missing = |field: &str| {
            issues.push(Issue::for_track(
                IssueKind::MissingTag,
                record.path.clone(),
                format!("missing {} tag", field),
            ));
        };
        if record.artist.is_none() {
            flag_missing("artist");
        }
        if record.album.is_none() {
            flag_missing("album");
        }
        if record.title.is_none() {
            flag_missing("title");
        }
        if record.duration_secs.is_none() {
            flag_missing("duration");
        }

        NormalizedScan {
            record: Some(record),
            issues,
        }
    }
}

impl Default for TrackNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Blank tags are treated the same as absent ones.
fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
