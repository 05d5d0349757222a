use std::process::ExitCode;

use clap::Parser;

use audio_auditor::cli::commands::Cli;
use audio_auditor::utils::file_ops::OutputWriter;
use audio_auditor::utils::parallel;
use audio_auditor::utils::reporting::{RenderOptions, Reporter};
use audio_auditor::{AuditConfig, AuditPipeline, MetadataExtractor, Result};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AuditConfig::default();
    parallel::init_worker_pool(config.num_threads);

    // Fatal before any worker starts: a bad root produces no partial report.
    let candidates = MetadataExtractor::collect_candidates(&cli.folder, cli.max_depth, &config)?;

    let mut pipeline = AuditPipeline::new(&cli.folder, &config)?;
    if cli.debug {
        pipeline = pipeline.with_trace();
    }

    let total = candidates.len();
    let mut processed = 0usize;
    parallel::scan_stream(candidates, |scan| {
        pipeline.ingest(scan);
        processed += 1;
        if processed % 250 == 0 || processed == total {
            log::info!("processed {}/{} files", processed, total);
        }
    });

    let report = pipeline.finalize();
    let reporter = Reporter::new();
    let writer = OutputWriter::new();
    let mut sink_failures = 0usize;

    // The terminal is the fallback sink when nothing else was requested.
    let print_to_terminal = cli.terminal || (!cli.to_file && !cli.copy);
    if print_to_terminal {
        let options = RenderOptions {
            per_album: cli.per_album,
            no_quick_stats: cli.no_quick_stats,
            debug: cli.debug,
        };
        print!("{}", reporter.render_terminal(&report, &options));
    }

    if cli.to_file || cli.copy {
        let markdown = reporter.render_markdown(&report);
        if cli.to_file {
            if let Err(e) = writer.write_file(&cli.output_path, &markdown) {
                eprintln!("Error: {}", e);
                sink_failures += 1;
            } else {
                println!("Report written to: {}", cli.output_path.display());
            }
            let csv_path = cli.output_path.with_extension("csv");
            if let Err(e) = reporter.write_issue_csv(&report, &csv_path) {
                eprintln!("Error: {}", e);
                sink_failures += 1;
            } else {
                println!("Issue log written to: {}", csv_path.display());
            }
        }
        if cli.copy {
            if let Err(e) = writer.copy_to_clipboard(&markdown) {
                eprintln!("Error: {}", e);
                sink_failures += 1;
            } else {
                println!("Report copied to clipboard.");
            }
        }
    }

    if sink_failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
