//! Queue and result containers for the traversal engine

use crate::error::ProbeError;
use crate::probe::types::DirEntry;
use std::path::{Path, PathBuf};

/// A directory waiting to be probed: the parent it was discovered under plus
/// its own directory entry. Created when a probe classifies a directory
/// entry; consumed exactly once when popped from the FIFO.
#[derive(Debug, Clone)]
pub struct PendingDirectory {
    /// Path of the directory the entry was listed in
    pub parent: PathBuf,

    /// The directory entry itself (kind is always `Directory`)
    pub entry: DirEntry,
}

impl PendingDirectory {
    /// Tag a discovered directory entry with its parent
    pub fn new(parent: &Path, entry: DirEntry) -> Self {
        Self {
            parent: parent.to_path_buf(),
            entry,
        }
    }

    /// Reconstruct the full child path (`parent` + separator + name)
    pub fn child_path(&self) -> PathBuf {
        self.parent.join(&self.entry.name)
    }
}

/// Regular files discovered directly inside one successfully probed
/// directory. One batch per successful probe, none on failure.
#[derive(Debug, Clone)]
pub struct ResultBatch {
    /// The directory that was probed
    pub path: PathBuf,

    /// Regular-file entries found directly inside it
    pub files: Vec<DirEntry>,
}

impl ResultBatch {
    /// Full paths of the files in this batch
    pub fn file_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.files.iter().map(|f| self.path.join(&f.name))
    }
}

/// A probe that failed, with its classification. Recorded in exactly one of
/// the walker's two side lists.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// The directory whose probe failed
    pub path: PathBuf,

    /// Timeout or the OS error
    pub error: ProbeError,
}

/// Outcome of one engine step
#[derive(Debug, Clone)]
pub enum Step {
    /// The probe succeeded; here is what it found
    Batch(ResultBatch),

    /// The probe failed; the record has also been pushed to the matching
    /// side list
    Failed(FailureRecord),

    /// The FIFO is empty. Terminal: every later step reports Done again.
    Done,
}

impl Step {
    /// True for the terminal state
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done)
    }
}

/// Everything a completed walk produced
#[derive(Debug, Default)]
pub struct WalkReport {
    /// One batch per successfully probed directory, in BFS order
    pub batches: Vec<ResultBatch>,

    /// Probes that hit their deadline
    pub timeouts: Vec<FailureRecord>,

    /// Probes the OS failed
    pub errors: Vec<FailureRecord>,
}

impl WalkReport {
    /// Full paths of every regular file discovered, in BFS batch order
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.batches.iter().flat_map(|b| b.file_paths()).collect()
    }

    /// Total number of regular files discovered
    pub fn file_count(&self) -> usize {
        self.batches.iter().map(|b| b.files.len()).sum()
    }
}
