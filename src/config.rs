//! Configuration types for impatient-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use crate::probe::statter::DEFAULT_MAGIC_LEN;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-probe deadline: 0.1 s in nanoseconds
pub const DEFAULT_DEADLINE_NS: i64 = 100_000_000;

/// Deadline-bounded filesystem walker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "impatient-walker",
    version,
    about = "Walk a directory tree, giving up on any single directory or file that answers too slowly",
    long_about = "Walks a directory tree breadth-first. Every directory listing and every stat call \
                  races a watchdog timer; a probe that misses its deadline is recorded as a timeout \
                  and the walk moves on, so one stalled network mount cannot hang the whole scan.",
    after_help = "EXAMPLES:\n    \
        impatient-walker /mnt/share\n    \
        impatient-walker /data --deadline 250000000 --stat\n    \
        impatient-walker /exports --budget-ms 30000 --checksum -v"
)]
pub struct CliArgs {
    /// Directory to walk
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Per-probe deadline in nanoseconds
    #[arg(long, default_value_t = DEFAULT_DEADLINE_NS, value_name = "NANOS")]
    pub deadline: i64,

    /// Stat each discovered file (type, size, sniffed MIME)
    #[arg(short = 's', long)]
    pub stat: bool,

    /// Compute a content checksum per file (implies --stat)
    #[arg(short = 'c', long)]
    pub checksum: bool,

    /// Magic prefix length in bytes for content sniffing
    #[arg(long, default_value_t = DEFAULT_MAGIC_LEN, value_name = "BYTES")]
    pub magic_bytes: usize,

    /// Global wall-clock budget for the whole walk, in milliseconds.
    /// Applied between steps by the driver; the engine itself only ever
    /// bounds single probes.
    #[arg(long, value_name = "MILLIS")]
    pub budget_ms: Option<u64>,

    /// Quiet mode - suppress the progress spinner
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging, full failure lists)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Root directory of the walk
    pub root: PathBuf,

    /// Per-probe deadline
    pub deadline: Duration,

    /// Stat each discovered file
    pub stat_files: bool,

    /// Populate checksums (implies stat)
    pub checksum: bool,

    /// Magic prefix length
    pub magic_len: usize,

    /// Caller-side whole-walk budget
    pub budget: Option<Duration>,

    /// Show the progress spinner
    pub show_progress: bool,

    /// Verbose reporting
    pub verbose: bool,
}

impl WalkConfig {
    /// Validate CLI arguments into a runtime configuration
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.deadline <= 0 {
            return Err(ConfigError::InvalidDeadline {
                nanos: args.deadline,
            });
        }
        if args.magic_bytes == 0 {
            return Err(ConfigError::InvalidMagicLen {
                len: args.magic_bytes,
            });
        }
        if !args.path.is_dir() {
            return Err(ConfigError::RootNotADirectory { path: args.path });
        }

        Ok(Self {
            root: args.path,
            deadline: Duration::from_nanos(args.deadline as u64),
            stat_files: args.stat || args.checksum,
            checksum: args.checksum,
            magic_len: args.magic_bytes,
            budget: args.budget_ms.map(Duration::from_millis),
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args_for(path: PathBuf) -> CliArgs {
        CliArgs {
            path,
            deadline: DEFAULT_DEADLINE_NS,
            stat: false,
            checksum: false,
            magic_bytes: DEFAULT_MAGIC_LEN,
            budget_ms: None,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn test_default_deadline_is_100ms() {
        let dir = tempdir().unwrap();
        let config = WalkConfig::from_args(args_for(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.deadline, Duration::from_millis(100));
    }

    #[test]
    fn test_nonpositive_deadline_rejected() {
        let dir = tempdir().unwrap();
        let mut args = args_for(dir.path().to_path_buf());
        args.deadline = 0;
        assert!(matches!(
            WalkConfig::from_args(args),
            Err(ConfigError::InvalidDeadline { nanos: 0 })
        ));
    }

    #[test]
    fn test_checksum_implies_stat() {
        let dir = tempdir().unwrap();
        let mut args = args_for(dir.path().to_path_buf());
        args.checksum = true;
        let config = WalkConfig::from_args(args).unwrap();
        assert!(config.stat_files);
    }

    #[test]
    fn test_missing_root_rejected() {
        let dir = tempdir().unwrap();
        let args = args_for(dir.path().join("absent"));
        assert!(matches!(
            WalkConfig::from_args(args),
            Err(ConfigError::RootNotADirectory { .. })
        ));
    }
}
