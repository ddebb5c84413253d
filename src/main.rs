//! impatient-walker - Deadline-Bounded Filesystem Scanner
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use impatient_walker::config::{CliArgs, WalkConfig};
use impatient_walker::content;
use impatient_walker::error::ProbeError;
use impatient_walker::probe::{FileInfo, FileStatter};
use impatient_walker::progress::{print_header, print_summary, ProgressReporter, WalkTally};
use impatient_walker::walker::{FailureRecord, Step, Walker};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = WalkConfig::from_args(args).context("Invalid configuration")?;

    // Print header
    if config.show_progress {
        print_header(
            &config.root.display().to_string(),
            config.deadline,
            config.stat_files,
        );
    }

    // Setup signal handler for graceful shutdown
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Create progress reporter
    let progress = if config.show_progress {
        Some(ProgressReporter::new())
    } else {
        None
    };

    if let Some(ref p) = progress {
        p.set_status("Walking...");
    }

    let statter = config
        .stat_files
        .then(|| FileStatter::new(config.magic_len));

    let started = Instant::now();
    let mut walker = Walker::new();
    let mut tally = WalkTally::default();
    let mut stat_failures: Vec<(PathBuf, ProbeError)> = Vec::new();
    let mut complete = true;

    // The root probe counts as the first step; after that, one advance per
    // iteration until the FIFO drains, the budget runs out, or Ctrl-C.
    let mut step = walker.probe(&config.root, config.deadline);
    loop {
        match step {
            Step::Batch(batch) => {
                tally.dirs += 1;
                tally.files += batch.files.len() as u64;
                // Every discovered file prints its path; statting only adds
                // columns (and never suppresses the path on failure).
                for path in batch.file_paths() {
                    let info = match statter {
                        Some(ref statter) => match statter.stat(&path, config.deadline) {
                            Ok(mut info) => {
                                if config.checksum && info.is_complete() {
                                    match content::checksum_file(&path) {
                                        Ok(sum) => info.checksum = Some(sum),
                                        Err(e) => {
                                            warn!(path = %path.display(), error = %e,
                                                  "checksum failed");
                                        }
                                    }
                                }
                                tally.bytes += info.size();
                                Some(info)
                            }
                            Err(e) => {
                                if e.is_timeout() {
                                    tally.timeouts += 1;
                                } else {
                                    tally.errors += 1;
                                }
                                stat_failures.push((path.clone(), e));
                                warn!(path = %path.display(), error = %e, "stat failed");
                                None
                            }
                        },
                        None => None,
                    };
                    println!("{}", file_line(&path, info.as_ref()));
                    if interrupted.load(Ordering::SeqCst) {
                        break;
                    }
                }
            }
            Step::Failed(record) => {
                if record.error.is_timeout() {
                    tally.timeouts += 1;
                } else {
                    tally.errors += 1;
                }
            }
            Step::Done => break,
        }

        tally.queue_size = walker.pending();
        if let Some(ref p) = progress {
            p.update(&tally, started.elapsed());
        }

        if interrupted.load(Ordering::SeqCst) {
            info!("Walk interrupted before completion");
            complete = false;
            break;
        }
        if let Some(budget) = config.budget {
            if started.elapsed() >= budget {
                info!(budget_ms = budget.as_millis() as u64, "Walk budget exhausted");
                complete = false;
                break;
            }
        }

        step = walker.advance(config.deadline);
    }

    let duration = started.elapsed();
    if let Some(ref p) = progress {
        p.finish_and_clear();
    }

    print_summary(&tally, duration, complete);

    if config.verbose {
        for line in failure_lines(walker.timeouts(), walker.errors(), &stat_failures) {
            eprintln!("{line}");
        }
    }

    if tally.timeouts > 0 {
        info!(timeouts = tally.timeouts, "Some probes missed their deadline");
    }
    if tally.errors > 0 {
        info!(errors = tally.errors, "Some probes failed");
    }

    Ok(())
}

/// One output line per discovered file: the bare path, or the path plus
/// tab-separated stat columns when a stat result is available
fn file_line(path: &Path, info: Option<&FileInfo>) -> String {
    let Some(info) = info else {
        return path.display().to_string();
    };
    let mime = content::sniff_info(info).unwrap_or("-");
    match &info.checksum {
        Some(sum) => format!(
            "{}\t{}\t{}\t{}\t{}",
            path.display(),
            info.entry_type().label(),
            info.size(),
            mime,
            sum
        ),
        None => format!(
            "{}\t{}\t{}\t{}",
            path.display(),
            info.entry_type().label(),
            info.size(),
            mime
        ),
    }
}

/// Render both failure lists for verbose output: directory probes first,
/// then per-file stat failures. Every counted failure appears exactly once.
fn failure_lines(
    timeouts: &[FailureRecord],
    errors: &[FailureRecord],
    stat_failures: &[(PathBuf, ProbeError)],
) -> Vec<String> {
    let mut lines = Vec::new();
    for record in timeouts {
        lines.push(format!("timeout: {}", record.path.display()));
    }
    for record in errors {
        lines.push(format!("error: {} ({})", record.path.display(), record.error));
    }
    for (path, error) in stat_failures {
        if error.is_timeout() {
            lines.push(format!("timeout: {} (stat)", path.display()));
        } else {
            lines.push(format!("error: {} (stat: {})", path.display(), error));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn info_for(path: &Path, checksum: Option<String>) -> FileInfo {
        FileInfo {
            path: path.to_path_buf(),
            metadata: fs::metadata(path).unwrap(),
            magic: Vec::new(),
            checksum,
            degraded: None,
        }
    }

    #[test]
    fn test_file_line_without_stat_is_just_the_path() {
        let path = Path::new("/mnt/share/plain.txt");
        assert_eq!(file_line(path, None), "/mnt/share/plain.txt");
    }

    #[test]
    fn test_file_line_with_stat_adds_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"12345").unwrap();

        let info = info_for(&path, None);
        let line = file_line(&path, Some(&info));
        let fields: Vec<_> = line.split('\t').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], path.display().to_string());
        assert_eq!(fields[1], "regular file");
        assert_eq!(fields[2], "5");

        let with_sum = info_for(&path, Some("abc123".to_string()));
        let line = file_line(&path, Some(&with_sum));
        assert_eq!(line.split('\t').count(), 5);
        assert!(line.ends_with("abc123"));
    }

    #[test]
    fn test_failure_lines_include_stat_failures() {
        let dir_timeouts = vec![FailureRecord {
            path: PathBuf::from("/slow/dir"),
            error: ProbeError::Timeout,
        }];
        let stat_failures = vec![
            (PathBuf::from("/slow/file"), ProbeError::Timeout),
            (PathBuf::from("/gone/file"), ProbeError::Os { code: libc::ENOENT }),
        ];

        let lines = failure_lines(&dir_timeouts, &[], &stat_failures);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timeout: /slow/dir");
        assert_eq!(lines[1], "timeout: /slow/file (stat)");
        assert!(lines[2].starts_with("error: /gone/file (stat:"));
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("impatient_walker=debug,warn")
    } else {
        EnvFilter::new("impatient_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
