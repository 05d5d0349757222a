//! End-to-end pipeline tests over synthetic extraction results. Real file
//! decoding is exercised separately; here the interest is what the pipeline
//! does with the records once they exist.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use audio_auditor::audio::metadata::{RawMetadata, RawScan};
use audio_auditor::utils::reporting::{RenderOptions, Reporter};
use audio_auditor::{AuditConfig, AuditError, AuditPipeline, IssueKind, MetadataExtractor};

fn scan(path: &str, raw: RawMetadata) -> RawScan {
    RawScan {
        path: PathBuf::from(path),
        depth: 1,
        outcome: Ok(raw),
    }
}

fn track(artist: &str, album: &str, title: &str, duration: f64, size: u64) -> RawMetadata {
    RawMetadata {
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        title: Some(title.to_string()),
        duration_secs: Some(duration),
        sample_rate_hz: Some(44_100),
        bit_depth: Some(16),
        codec: "mp3".to_string(),
        size_bytes: size,
        ..Default::default()
    }
}

fn pipeline() -> AuditPipeline {
    AuditPipeline::new("/music", &AuditConfig::default()).unwrap()
}

#[test]
fn totals_match_ingested_sums_exactly() {
    let mut pipeline = pipeline();
    let durations = [185.0, 0.0, -2.5, 241.0];
    for (index, duration) in durations.iter().enumerate() {
        pipeline.ingest(scan(
            &format!("/music/{}.mp3", index),
            track("A", "X", &format!("t{}", index), *duration, 1_000),
        ));
    }
    let report = pipeline.finalize();
    assert_eq!(report.snapshot.total_tracks, 4);
    assert_eq!(report.snapshot.total_duration_secs, 423.5);
    assert_eq!(report.snapshot.total_size_bytes, 4_000);
}

#[test]
fn untagged_track_is_counted_but_never_grouped() {
    let mut pipeline = pipeline();
    pipeline.ingest(scan(
        "/music/mystery.mp3",
        RawMetadata {
            title: Some("Mystery".to_string()),
            duration_secs: Some(100.0),
            codec: "mp3".to_string(),
            size_bytes: 2_000,
            ..Default::default()
        },
    ));
    let report = pipeline.finalize();
    assert_eq!(report.snapshot.total_tracks, 1);
    assert_eq!(report.snapshot.total_albums, 0);
    assert!(report.albums.is_empty());
    let missing: Vec<&str> = report
        .missing_tag_issues
        .iter()
        .map(|i| i.detail.as_str())
        .collect();
    assert_eq!(missing, vec!["missing artist tag", "missing album tag"]);
}

#[test]
fn near_identical_rips_group_and_penalize_the_score() {
    let mut clean = pipeline();
    let mut dirty = pipeline();
    for index in 0..10 {
        let path = format!("/music/{}.mp3", index);
        let title = format!("Track {}", index);
        clean.ingest(scan(&path, track("A", "X", &title, 180.0 + index as f64 * 10.0, 4_194_304)));
        dirty.ingest(scan(&path, track("A", "X", &title, 180.0 + index as f64 * 10.0, 4_194_304)));
    }
    // Two extra rips of the same song, one second and 40 KiB apart.
    dirty.ingest(scan("/music/numb_a.mp3", track("A", "X", "Numb", 185.0, 6_533_600)));
    dirty.ingest(scan("/music/numb_b.mp3", track("A", "X", "Numb", 186.0, 6_574_560)));

    let clean_report = clean.finalize();
    let dirty_report = dirty.finalize();
    assert!(clean_report.duplicates.is_empty());
    assert_eq!(dirty_report.duplicates.len(), 1);
    assert_eq!(dirty_report.duplicates[0].paths.len(), 2);
    assert!(dirty_report.health < clean_report.health);
}

#[test]
fn bit_depth_mismatch_is_one_issue_for_the_whole_album() {
    let mut pipeline = pipeline();
    for (index, depth) in [16u32, 24, 24].iter().enumerate() {
        let mut raw = track("A", "X", &format!("t{}", index), 200.0, 1_000);
        raw.bit_depth = Some(*depth);
        raw.codec = "flac".to_string();
        pipeline.ingest(scan(&format!("/music/{}.flac", index), raw));
    }
    let report = pipeline.finalize();
    let mismatches: Vec<_> = report
        .anomaly_issues
        .iter()
        .filter(|i| i.detail.contains("mixed bit depths"))
        .collect();
    assert_eq!(mismatches.len(), 1);
}

#[test]
fn extraction_failures_become_skips_not_aborts() {
    let mut pipeline = pipeline();
    pipeline.ingest(scan("/music/good.mp3", track("A", "X", "t", 200.0, 1_000)));
    for index in 0..3 {
        pipeline.ingest(RawScan {
            path: PathBuf::from(format!("/music/bad{}.mp3", index)),
            depth: 0,
            outcome: Err("unsupported codec".to_string()),
        });
    }
    let report = pipeline.finalize();
    assert_eq!(report.snapshot.total_tracks, 1);
    assert_eq!(report.snapshot.skipped_files, 3);
    assert!(report
        .skipped_issues
        .iter()
        .all(|i| i.kind == IssueKind::SkippedFile));
}

#[test]
fn empty_library_reports_perfect_health() {
    let report = pipeline().finalize();
    assert_eq!(report.health, 100);
    assert_eq!(report.snapshot.total_tracks, 0);
}

#[test]
fn ingestion_order_does_not_change_findings() {
    let scans = || {
        vec![
            ("/music/1.mp3", track("A", "X", "Numb", 185.0, 6_533_600)),
            ("/music/2.mp3", track("A", "X", "Numb", 186.0, 6_533_600)),
            ("/music/3.mp3", track("B", "Y", "Faint", 162.0, 4_194_304)),
            ("/music/4.mp3", track("B", "Y", "Faint", 162.5, 4_194_304)),
        ]
    };
    let mut forward = pipeline();
    for (path, raw) in scans() {
        forward.ingest(scan(path, raw));
    }
    let mut reversed = pipeline();
    for (path, raw) in scans().into_iter().rev() {
        reversed.ingest(scan(path, raw));
    }
    let a = forward.finalize();
    let b = reversed.finalize();
    assert_eq!(a.duplicates.len(), b.duplicates.len());
    for (x, y) in a.duplicates.iter().zip(b.duplicates.iter()) {
        assert_eq!(x.fingerprint, y.fingerprint);
        assert_eq!(x.paths, y.paths);
    }
    assert_eq!(a.health, b.health);
    assert_eq!(a.snapshot.total_duration_secs, b.snapshot.total_duration_secs);
}

#[test]
fn missing_root_aborts_before_any_scan() {
    let config = AuditConfig::default();
    let result =
        MetadataExtractor::collect_candidates(Path::new("/definitely/not/here"), 5, &config);
    assert!(matches!(result, Err(AuditError::Config(_))));
}

#[test]
fn rendered_outputs_agree_with_the_report() {
    let mut pipeline = pipeline();
    pipeline.ingest(scan("/music/a.mp3", track("A", "X", "Numb", 185.0, 6_533_600)));
    pipeline.ingest(scan("/music/b.mp3", track("A", "X", "Numb", 186.0, 6_574_560)));
    let report = pipeline.finalize();

    let reporter = Reporter::new();
    let terminal = reporter.render_terminal(&report, &RenderOptions::default());
    assert!(terminal.contains(&format!("{}%", report.health)));

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("issues.csv");
    reporter.write_issue_csv(&report, &csv_path).unwrap();
    let rows = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(rows.lines().count(), 1 + report.issue_count());
}
