//! impatient-walker - Deadline-Bounded Filesystem Scanner
//!
//! A library and CLI for walking directory trees where any single path may
//! hang: soft-mounted network shares, flaky FUSE filesystems, disks on their
//! way out. Every directory listing and every stat call races a watchdog
//! timer; a probe that misses its deadline is recorded and skipped, so the
//! walk always makes progress at a bounded cost per path.
//!
//! # Features
//!
//! - **Per-probe deadlines**: Each directory listing or stat gets its own
//!   deadline (default 0.1s). One stalled path costs at most one deadline.
//!
//! - **Partial-failure tolerance**: Timeouts and OS errors land in separate
//!   side lists instead of aborting the walk. The report says exactly which
//!   subtrees went unexplored and why.
//!
//! - **Breadth-first, single-step**: The engine exposes one `advance` call
//!   per directory, so a driver can interleave its own budget checks,
//!   progress display, or per-file stat work between steps.
//!
//! - **Invisible stats**: The stat probe reads a magic prefix for content
//!   sniffing, then restores the file's original timestamps so the scan
//!   leaves no trace in atime/mtime.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    Driver                        │
//! │   (CLI, tests, or any embedding application)     │
//! └───────────────┬──────────────────────────────────┘
//!                 │ probe / advance
//!                 ▼
//! ┌──────────────────────────────────────────────────┐
//! │               Walker (BFS engine)                │
//! │  ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │  FIFO of dirs   │   │  timeouts / errors   │  │
//! │  │   (VecDeque)    │   │     side lists       │  │
//! │  └────────┬────────┘   └──────────────────────┘  │
//! └───────────┼──────────────────────────────────────┘
//!             │ one probe at a time
//!             ▼
//! ┌──────────────────────────────────────────────────┐
//! │              Watchdog (per probe)                │
//! │   operation thread  vs  deadline timer           │
//! │     (crossbeam select, one winner)               │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use impatient_walker::walker::Walker;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let report = Walker::new().run(Path::new("/mnt/share"), Duration::from_millis(100));
//! println!(
//!     "{} files, {} timeouts, {} errors",
//!     report.file_count(),
//!     report.timeouts.len(),
//!     report.errors.len()
//! );
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod probe;
pub mod progress;
pub mod walker;
pub mod watchdog;

pub use config::{CliArgs, WalkConfig};
pub use error::{ProbeError, Result, WalkerError};
pub use probe::{DirEntry, EntryType, FileInfo, FileStatter};
pub use walker::{Step, WalkReport, Walker};
