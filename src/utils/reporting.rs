use std::path::Path;

use csv::Writer;

use crate::report::AuditReport;
use crate::utils::format::{format_bytes, format_duration};
use crate::Result;

const HEALTH_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Show per-album duration/size on album header lines.
    pub per_album: bool,
    /// Hide the totals line under the health bar.
    pub no_quick_stats: bool,
    /// Append the per-file trace section.
    pub debug: bool,
}

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// Plain-text report for the terminal: health bar, totals, album warning
    /// blocks, duplicate and missing-tag summaries.
    pub fn render_terminal(&self, report: &AuditReport, options: &RenderOptions) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push(format!("\"{}\" Library Scan", report.root.display()));

        let health_line = health_bar(report.health);
        let quick_line = format!(
            "Albums: {}  Tracks: {}  Size: {}  Duration: {}",
            report.snapshot.total_albums,
            report.snapshot.total_tracks,
            format_bytes(report.snapshot.total_size_bytes),
            format_duration(report.snapshot.total_duration_secs),
        );
        let separator = "=".repeat(quick_line.len().max(health_line.len()));
        lines.push(separator.clone());
        lines.push(health_line);
        if !options.no_quick_stats {
            lines.push(quick_line);
        }
        lines.push(separator);
        lines.push(String::new());

        let mut wrote_block = false;
        for album in &report.albums {
            let prefix = format!("{}: ", album.label());
            let messages: Vec<&str> = report
                .anomaly_issues
                .iter()
                .filter(|issue| issue.path.is_none())
                .filter_map(|issue| issue.detail.strip_prefix(prefix.as_str()))
                .collect();
            if messages.is_empty() {
                continue;
            }
            wrote_block = true;
            if options.per_album {
                lines.push(format!(
                    "[WARN] {} | Duration: {}, Size {}",
                    album.label(),
                    format_duration(album.total_duration_secs),
                    format_bytes(album.total_size_bytes),
                ));
            } else {
                lines.push(format!("[WARN] {}:", album.label()));
            }
            for message in messages {
                lines.push(format!("    - {}", message));
            }
            lines.push(String::new());
        }

        let track_warnings: Vec<&crate::Issue> = report
            .anomaly_issues
            .iter()
            .filter(|issue| issue.path.is_some())
            .collect();
        if !track_warnings.is_empty() {
            wrote_block = true;
            lines.push("Track warnings".to_string());
            for issue in track_warnings {
                let path = issue.path.as_deref().unwrap_or_else(|| Path::new(""));
                lines.push(format!("    - {}: {}", path.display(), issue.detail));
            }
            lines.push(String::new());
        }

        if !report.duplicates.is_empty() {
            wrote_block = true;
            lines.push("Duplicates".to_string());
            for group in &report.duplicates {
                let paths: Vec<String> = group
                    .paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                lines.push(format!(
                    "    - '{}' ({} tracks): {}",
                    group.fingerprint.title,
                    group.paths.len(),
                    paths.join(", ")
                ));
            }
            lines.push(String::new());
        }

        let missing = &report.snapshot.missing_tags;
        if !report.missing_tag_issues.is_empty() {
            wrote_block = true;
            lines.push(format!(
                "Missing tags: artist {}, album {}, title {}, duration {}",
                missing.artist, missing.album, missing.title, missing.duration
            ));
        }
        if report.snapshot.skipped_files > 0 {
            wrote_block = true;
            lines.push(format!("Skipped files: {}", report.snapshot.skipped_files));
        }

        if !wrote_block {
            lines.push("No warnings or informational notes were detected.".to_string());
        } else {
            lines.push(String::new());
            lines.push("Legend".to_string());
            lines.push("  [WARN] Album-level inconsistencies that may cause uneven playback or organization.".to_string());
        }

        if options.debug && !report.trace.is_empty() {
            lines.push(String::new());
            lines.push("Debug".to_string());
            for entry in &report.trace {
                lines.push(format!(
                    "  [debug] {} (album: {}, depth {})",
                    entry.path.display(),
                    entry.album.as_deref().unwrap_or("?"),
                    entry.depth
                ));
            }
        }

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }

    /// Markdown report with totals, rankings and findings sections.
    pub fn render_markdown(&self, report: &AuditReport) -> String {
        let mut out = String::new();
        out.push_str("# Library Health Report\n\n");
        out.push_str(&format!("Scanned root: `{}`\n\n", report.root.display()));
        out.push_str(&format!("Health score: **{}/100**\n\n", report.health));

        out.push_str("## Totals\n\n");
        out.push_str(&format!("- Tracks: {}\n", report.snapshot.total_tracks));
        out.push_str(&format!("- Albums: {}\n", report.snapshot.total_albums));
        out.push_str(&format!(
            "- Total size: {}\n",
            format_bytes(report.snapshot.total_size_bytes)
        ));
        out.push_str(&format!(
            "- Total duration: {}\n",
            format_duration(report.snapshot.total_duration_secs)
        ));
        out.push_str(&format!(
            "- Skipped files: {}\n\n",
            report.snapshot.skipped_files
        ));

        out.push_str("## Top Artists\n\n");
        push_ranking(&mut out, &report.snapshot.top_artists);
        out.push_str("## Top Composers\n\n");
        push_ranking(&mut out, &report.snapshot.top_composers);

        out.push_str("## Missing Tags\n\n");
        let missing = &report.snapshot.missing_tags;
        out.push_str("| Field | Count |\n|---|---|\n");
        out.push_str(&format!("| artist | {} |\n", missing.artist));
        out.push_str(&format!("| album | {} |\n", missing.album));
        out.push_str(&format!("| title | {} |\n", missing.title));
        out.push_str(&format!("| duration | {} |\n\n", missing.duration));

        out.push_str("## Duplicates\n\n");
        if report.duplicates.is_empty() {
            out.push_str("None found.\n\n");
        } else {
            for group in &report.duplicates {
                out.push_str(&format!(
                    "### '{}' ({} tracks)\n\n",
                    group.fingerprint.title,
                    group.paths.len()
                ));
                for path in &group.paths {
                    out.push_str(&format!("- `{}`\n", path.display()));
                }
                out.push('\n');
            }
        }

        out.push_str("## Anomalies\n\n");
        if report.anomaly_issues.is_empty() {
            out.push_str("None found.\n");
        } else {
            for issue in &report.anomaly_issues {
                match &issue.path {
                    Some(path) => {
                        out.push_str(&format!("- `{}`: {}\n", path.display(), issue.detail))
                    }
                    None => out.push_str(&format!("- {}\n", issue.detail)),
                }
            }
        }
        out
    }

    /// One CSV row per issue: problem_type, file_path, details.
    pub fn write_issue_csv(&self, report: &AuditReport, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["problem_type", "file_path", "details"])?;
        for issue in report.all_issues() {
            let file_path = issue
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            writer.write_record([issue.kind.as_str(), file_path.as_str(), issue.detail.as_str()])?;
        }
        writer.flush()?;
        log::info!("issue log written to {}", path.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

fn health_bar(health: u8) -> String {
    let filled = HEALTH_BAR_WIDTH * usize::from(health.min(100)) / 100;
    let bar: String = "=".repeat(filled) + &".".repeat(HEALTH_BAR_WIDTH - filled);
    format!("Health: [{}] {}%", bar, health)
}

fn push_ranking(out: &mut String, entries: &[crate::analyzers::aggregate::TopEntry]) {
    if entries.is_empty() {
        out.push_str("None found.\n\n");
        return;
    }
    out.push_str("| # | Name | Tracks |\n|---|---|---|\n");
    for (rank, entry) in entries.iter().enumerate() {
        out.push_str(&format!("| {} | {} | {} |\n", rank + 1, entry.name, entry.count));
    }
    out.push('\n');
}
