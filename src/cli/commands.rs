use clap::Parser;
use std::path::PathBuf;

/// Flat flag surface for a single audit run. The two-letter aliases mirror
/// the short forms the tool has historically accepted (`--tf`, `--op`, ...).
#[derive(Debug, Parser)]
#[command(name = "audio-auditor")]
#[command(version = "1.0")]
#[command(about = "Return an overall health report of all audio files in a given folder", long_about = None)]
pub struct Cli {
    /// Path of the folder to scan
    #[arg(short = 'f', long)]
    pub folder: PathBuf,

    /// Print the report to the terminal
    #[arg(short = 't', long)]
    pub terminal: bool,

    /// Save the Markdown report (plus the CSV issue log) to a file
    #[arg(long, alias = "tf")]
    pub to_file: bool,

    /// File path to save the report to
    #[arg(long, alias = "op", default_value = "report.md")]
    pub output_path: PathBuf,

    /// Copy the Markdown report to the clipboard
    #[arg(short = 'c', long)]
    pub copy: bool,

    /// Maximum subfolder depth to scan
    #[arg(long, alias = "md", default_value_t = 5)]
    pub max_depth: usize,

    /// Show per-album duration and size on album header lines
    #[arg(long, alias = "pa")]
    pub per_album: bool,

    /// Hide the totals line under the health bar
    #[arg(long, alias = "nqs")]
    pub no_quick_stats: bool,

    /// Append per-file trace entries (path, album, depth) to the report
    #[arg(short = 'd', long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_is_required() {
        assert!(Cli::try_parse_from(["audio-auditor"]).is_err());
        assert!(Cli::try_parse_from(["audio-auditor", "--folder", "/music"]).is_ok());
    }

    #[test]
    fn aliases_match_historic_short_forms() {
        let cli = Cli::try_parse_from([
            "audio-auditor",
            "-f",
            "/music",
            "--tf",
            "--op",
            "/tmp/out.md",
            "--md",
            "3",
            "--pa",
            "--nqs",
        ])
        .unwrap();
        assert!(cli.to_file);
        assert_eq!(cli.output_path, PathBuf::from("/tmp/out.md"));
        assert_eq!(cli.max_depth, 3);
        assert!(cli.per_album);
        assert!(cli.no_quick_stats);
    }

    #[test]
    fn defaults_are_sensible() {
        let cli = Cli::try_parse_from(["audio-auditor", "-f", "/music"]).unwrap();
        assert_eq!(cli.max_depth, 5);
        assert!(!cli.terminal);
        assert!(!cli.to_file);
        assert!(!cli.copy);
    }
}
