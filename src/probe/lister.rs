//! Deadline-bounded directory listing
//!
//! [`list`] wraps the blocking open-and-read-everything loop in the
//! watchdog. An open failure is already a known outcome and surfaces as its
//! OS error without waiting for the deadline; a mid-read failure fails the
//! whole listing and whatever was collected so far is dropped with it. The
//! `ReadDir` handle is owned by the operation closure, so it closes exactly
//! once on every exit path, the cooperative-cancellation return included.

use crate::error::{ProbeError, ProbeResult};
use crate::probe::types::DirEntry;
use crate::watchdog::{self, CancelToken};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// List a directory under a deadline.
///
/// Returns every entry the OS reports (no ordering promise beyond that),
/// `Err(ProbeError::Timeout)` if the deadline expires mid-read, or the OS
/// error otherwise. An empty directory is a success with zero entries.
pub fn list(path: &Path, deadline: Duration) -> ProbeResult<Vec<DirEntry>> {
    let owned = path.to_path_buf();
    let result = watchdog::execute(move |token| read_all(&owned, token), deadline);

    match &result {
        Ok(entries) => debug!(path = %path.display(), entries = entries.len(), "listed directory"),
        Err(err) => debug!(path = %path.display(), error = %err, "listing failed"),
    }

    result
}

/// The unbounded synchronous core: open `path` and collect every entry.
///
/// Callers that want no deadline (or a ground-truth listing to compare a
/// bounded walk against) can use this directly.
pub fn read_entries(path: &Path) -> ProbeResult<Vec<DirEntry>> {
    read_all(path, &CancelToken::new())
}

fn read_all(path: &Path, token: &CancelToken) -> ProbeResult<Vec<DirEntry>> {
    let reader = fs::read_dir(path).map_err(|e| ProbeError::from_io(&e))?;

    let mut entries = Vec::new();
    for next in reader {
        // Cancellation checkpoint, once per entry. Returning here drops the
        // ReadDir handle and the partial Vec; the verdict is already
        // Timeout and this value is discarded.
        if token.is_cancelled() {
            return Err(ProbeError::Timeout);
        }

        let dirent = next.map_err(|e| ProbeError::from_io(&e))?;
        let entry = DirEntry::from_std(&dirent).map_err(|e| ProbeError::from_io(&e))?;
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::types::EntryType;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::tempdir;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[test]
    fn test_list_classifies_entries() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("plain.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink("plain.txt", dir.path().join("link")).unwrap();

        let mut entries = list(dir.path(), DEADLINE).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "link");
        assert_eq!(entries[0].kind, EntryType::Symlink);
        assert_eq!(entries[1].name, "plain.txt");
        assert_eq!(entries[1].kind, EntryType::File);
        assert_eq!(entries[2].name, "sub");
        assert_eq!(entries[2].kind, EntryType::Directory);
    }

    #[test]
    fn test_empty_directory_is_success() {
        let dir = tempdir().unwrap();
        let entries = list(dir.path(), DEADLINE).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_directory_reports_enoent() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        let err = list(&gone, DEADLINE).unwrap_err();
        assert_eq!(err, ProbeError::Os { code: libc::ENOENT });
    }

    #[test]
    fn test_listing_a_file_reports_os_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f");
        File::create(&file).unwrap();
        let err = list(&file, DEADLINE).unwrap_err();
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_read_entries_matches_bounded_list() {
        let dir = tempdir().unwrap();
        for i in 0..10 {
            File::create(dir.path().join(format!("f{i}"))).unwrap();
        }

        let mut bounded = list(dir.path(), DEADLINE).unwrap();
        let mut unbounded = read_entries(dir.path()).unwrap();
        bounded.sort_by(|a, b| a.name.cmp(&b.name));
        unbounded.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(bounded, unbounded);
    }
}
