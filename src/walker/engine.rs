//! Breadth-first traversal engine
//!
//! A single-step walker over a FIFO of pending directories. Each `advance`
//! pops one directory, probes it under the per-probe deadline, queues the
//! subdirectories it finds, and hands back the regular files (or the failure
//! record). The engine never owns a whole-walk time budget: a driver that
//! wants one tracks elapsed time across `advance` calls and simply stops
//! calling.
//!
//! The engine is strictly sequential. The only concurrency anywhere is
//! inside one probe's watchdog race, so one stalled directory costs at most
//! its own deadline and nothing else.

use crate::error::ProbeResult;
use crate::probe::lister;
use crate::probe::types::{DirEntry, EntryType};
use crate::walker::types::{FailureRecord, PendingDirectory, ResultBatch, Step, WalkReport};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// The listing seam: the engine only needs "give me this directory's entries
/// under this deadline". The default goes through the watchdog; tests slot
/// in delayed or failing listers.
pub trait DirLister {
    fn list(&self, path: &Path, deadline: Duration) -> ProbeResult<Vec<DirEntry>>;
}

/// Production lister: watchdog-wrapped `read_dir`
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchdogLister;

impl DirLister for WatchdogLister {
    fn list(&self, path: &Path, deadline: Duration) -> ProbeResult<Vec<DirEntry>> {
        lister::list(path, deadline)
    }
}

/// Breadth-first step machine over deadline-bounded probes
///
/// Owns the FIFO and both failure side lists; `probe` and `advance` are the
/// only mutators. Not safe for concurrent external mutation, by design.
pub struct Walker<L = WatchdogLister> {
    lister: L,
    queue: VecDeque<PendingDirectory>,
    timeouts: Vec<FailureRecord>,
    errors: Vec<FailureRecord>,
}

impl Walker<WatchdogLister> {
    /// Engine backed by the production watchdog lister
    pub fn new() -> Self {
        Self::with_lister(WatchdogLister)
    }
}

impl Default for Walker<WatchdogLister> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DirLister> Walker<L> {
    /// Engine backed by a custom lister
    pub fn with_lister(lister: L) -> Self {
        Self {
            lister,
            queue: VecDeque::new(),
            timeouts: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Probe one directory: list it under `deadline`, queue its
    /// subdirectories, and return its regular files.
    ///
    /// Symbolic links are intentionally not followed and not recorded
    /// anywhere; entry types other than directory and regular file are
    /// ignored. On failure the record goes to the matching side list and no
    /// batch is produced.
    pub fn probe(&mut self, path: &Path, deadline: Duration) -> Step {
        match self.lister.list(path, deadline) {
            Ok(entries) => {
                let mut files = Vec::new();
                let mut subdirs = 0usize;

                for entry in entries {
                    match entry.kind {
                        EntryType::Directory => {
                            self.queue.push_back(PendingDirectory::new(path, entry));
                            subdirs += 1;
                        }
                        EntryType::File => files.push(entry),
                        EntryType::Symlink => {}
                        _ => {}
                    }
                }

                debug!(
                    path = %path.display(),
                    files = files.len(),
                    subdirs,
                    queued = self.queue.len(),
                    "probe complete"
                );

                Step::Batch(ResultBatch {
                    path: path.to_path_buf(),
                    files,
                })
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "probe failed");
                let record = FailureRecord {
                    path: path.to_path_buf(),
                    error,
                };
                if error.is_timeout() {
                    self.timeouts.push(record.clone());
                } else {
                    self.errors.push(record.clone());
                }
                Step::Failed(record)
            }
        }
    }

    /// Pop the next pending directory (FIFO order, i.e. BFS order) and probe
    /// it. Returns `Step::Done` once the FIFO is empty; Done is terminal and
    /// repeats deterministically.
    pub fn advance(&mut self, deadline: Duration) -> Step {
        let Some(pending) = self.queue.pop_front() else {
            return Step::Done;
        };
        let path = pending.child_path();
        self.probe(&path, deadline)
    }

    /// Probe `root` and then drive `advance` until the FIFO drains,
    /// collecting everything into a report.
    pub fn run(mut self, root: &Path, deadline: Duration) -> WalkReport {
        let mut batches = Vec::new();

        if let Step::Batch(batch) = self.probe(root, deadline) {
            batches.push(batch);
        }
        loop {
            match self.advance(deadline) {
                Step::Batch(batch) => batches.push(batch),
                Step::Failed(_) => {}
                Step::Done => break,
            }
        }

        WalkReport {
            batches,
            timeouts: self.timeouts,
            errors: self.errors,
        }
    }

    /// Probes that hit their deadline so far
    pub fn timeouts(&self) -> &[FailureRecord] {
        &self.timeouts
    }

    /// Probes the OS failed so far
    pub fn errors(&self) -> &[FailureRecord] {
        &self.errors
    }

    /// Directories still waiting in the FIFO
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// True once the FIFO is empty (also true before the first probe)
    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use std::fs::{self, File};
    use tempfile::tempdir;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[test]
    fn test_probe_classifies_and_queues() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("file.txt")).unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        std::os::unix::fs::symlink("file.txt", dir.path().join("link")).unwrap();

        let mut walker = Walker::new();
        let step = walker.probe(dir.path(), DEADLINE);

        let Step::Batch(batch) = step else {
            panic!("expected a batch");
        };
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.files[0].name, "file.txt");
        // The symlink is neither followed nor reported.
        assert_eq!(walker.pending(), 1);
        assert!(walker.timeouts().is_empty());
        assert!(walker.errors().is_empty());
    }

    #[test]
    fn test_advance_is_breadth_first() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a").join("deep")).unwrap();
        fs::create_dir(dir.path().join("b").join("deeper")).unwrap();

        let mut walker = Walker::new();
        walker.probe(dir.path(), DEADLINE);

        let mut probed = Vec::new();
        loop {
            match walker.advance(DEADLINE) {
                Step::Batch(batch) => probed.push(batch.path),
                Step::Failed(rec) => panic!("unexpected failure: {rec:?}"),
                Step::Done => break,
            }
        }

        // All depth-1 directories come before any depth-2 directory.
        let depth = |p: &std::path::PathBuf| p.components().count();
        let depths: Vec<_> = probed.iter().map(depth).collect();
        let mut sorted = depths.clone();
        sorted.sort_unstable();
        assert_eq!(depths, sorted, "probe order was not breadth-first: {probed:?}");
        assert_eq!(probed.len(), 4);
    }

    #[test]
    fn test_done_is_terminal_and_repeats() {
        let dir = tempdir().unwrap();
        let mut walker = Walker::new();
        walker.probe(dir.path(), DEADLINE);

        for _ in 0..5 {
            assert!(walker.advance(DEADLINE).is_done());
        }
        assert!(walker.is_done());
    }

    #[test]
    fn test_vanished_directory_lands_in_error_list() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("doomed")).unwrap();
        File::create(dir.path().join("keeper.txt")).unwrap();

        let mut walker = Walker::new();
        let Step::Batch(batch) = walker.probe(dir.path(), DEADLINE) else {
            panic!("root probe failed");
        };
        assert_eq!(batch.files.len(), 1);

        // The queued directory disappears before its probe.
        fs::remove_dir(dir.path().join("doomed")).unwrap();

        let Step::Failed(record) = walker.advance(DEADLINE) else {
            panic!("expected a failure record");
        };
        assert_eq!(record.error, ProbeError::Os { code: libc::ENOENT });
        assert_eq!(walker.errors().len(), 1);
        assert!(walker.timeouts().is_empty());
        assert!(walker.advance(DEADLINE).is_done());
    }

    #[test]
    fn test_run_collects_full_tree() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("top.txt")).unwrap();
        fs::create_dir(dir.path().join("nest")).unwrap();
        File::create(dir.path().join("nest").join("inner.txt")).unwrap();

        let report = Walker::new().run(dir.path(), DEADLINE);
        assert_eq!(report.file_count(), 2);
        assert!(report.timeouts.is_empty());
        assert!(report.errors.is_empty());

        let mut names: Vec<_> = report
            .file_paths()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_os_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["inner.txt", "top.txt"]);
    }
}
