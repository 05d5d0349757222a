use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;

use crate::config::AuditConfig;
use crate::{AuditError, Result};

/// An audio file discovered by the walker, with its directory depth below
/// the scan root.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    pub depth: usize,
}

/// Tag and header fields pulled straight out of the container, before any
/// classification. Every field except size is best-effort.
#[derive(Debug, Clone, Default)]
pub struct RawMetadata {
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

/// One extraction result delivered from a worker to the consumer. A failed
/// read carries the reason so the normalizer can turn it into a skip issue.
#[derive(Debug)]
pub struct RawScan {
    pub path: PathBuf,
    pub depth: usize,
    pub outcome: std::result::Result<RawMetadata, String>,
}

pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Walk `root` up to `max_depth` subfolder levels and collect audio
    /// candidates. An unreadable root is fatal; unreadable subtrees are
    /// logged and skipped.
    pub fn collect_candidates(
        root: &Path,
        max_depth: usize,
        config: &AuditConfig,
    ) -> Result<Vec<Candidate>> {
        if !root.is_dir() {
            return Err(AuditError::Config(format!(
                "'{}' is not a readable directory",
                root.display()
            )));
        }

        let mut candidates = Vec::new();
        // walkdir counts the root as depth 0 and files in it as depth 1;
        // max_depth here is the deepest subfolder level, so files may sit
        // one level further down.
        for entry in walkdir::WalkDir::new(root)
            .follow_links(true)
            .max_depth(max_depth + 1)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(AuditError::Config(format!(
                            "cannot read scan root '{}': {}",
                            root.display(),
                            err
                        )));
                    }
                    log::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let supported = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| config.is_supported_extension(e))
                .unwrap_or(false);
            if !supported {
                log::debug!("skipping non-audio file: {}", entry.path().display());
                continue;
            }
            candidates.push(Candidate {
                path: entry.path().to_path_buf(),
                depth: entry.depth().saturating_sub(1),
            });
        }

        log::info!("collected {} audio candidates", candidates.len());
        Ok(candidates)
    }

    /// Extract header fields and tags from one candidate. Never panics on a
    /// bad file; every failure becomes an error the normalizer records.
    pub fn scan(candidate: Candidate) -> RawScan {
        let outcome = Self::extract(&candidate.path).map_err(|e| e.to_string());
        RawScan {
            path: candidate.path,
            depth: candidate.depth,
            outcome,
        }
    }

    pub fn extract(path: &Path) -> Result<RawMetadata> {
        let file = std::fs::File::open(path)?;
        let size_bytes = file.metadata()?.len();

        let codec = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mss = MediaSourceStream::new(Box::new(file), Default::default());
        let mut hint = Hint::new();
        if !codec.is_empty() {
            hint.with_extension(&codec);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AuditError::Metadata(e.to_string()))?;

        let mut raw = RawMetadata {
            codec,
            size_bytes,
            ..Default::default()
        };

        let mut format = probed.format;
        if let Some(track) = format.default_track() {
            let params = &track.codec_params;
            if let (Some(time_base), Some(n_frames)) = (params.time_base, params.n_frames) {
                let time = time_base.calc_time(n_frames);
                raw.duration_secs = Some(time.seconds as f64 + time.frac);
            }
            raw.sample_rate_hz = params.sample_rate;
            raw.bit_depth = params.bits_per_sample;
        }

        if let Some(revision) = format.metadata().current() {
            Self::apply_revision(&mut raw, revision);
        }
        // Some containers surface tags at probe level rather than on the
        // format reader.
        let mut probed_meta = probed.metadata;
        if let Some(meta) = probed_meta.get() {
            if let Some(revision) = meta.current() {
                Self::apply_revision(&mut raw, revision);
            }
        }

        Ok(raw)
    }

    fn apply_revision(raw: &mut RawMetadata, revision: &MetadataRevision) {
        for tag in revision.tags() {
            let value = tag.value.to_string();
            if value.trim().is_empty() {
                continue;
            }
            match tag.std_key {
                Some(StandardTagKey::Artist) => {
                    raw.artist.get_or_insert(value);
                }
                Some(StandardTagKey::Album) => {
                    raw.album.get_or_insert(value);
                }
                Some(StandardTagKey::TrackTitle) => {
                    raw.title.get_or_insert(value);
                }
                Some(StandardTagKey::Composer) => {
                    raw.composer.get_or_insert(value);
                }
                _ => {}
            }
        }
        if raw.cover_art_hash.is_none() {
            if let Some(visual) = revision.visuals().first() {
                let mut hasher = Sha256::new();
                hasher.update(&visual.data);
                let digest = hasher.finalize();
                let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
                raw.cover_art_hash = Some(hex);
            }
        }
    }
}
