//! Deadline-bounded stat with magic-prefix sniffing
//!
//! A stat probe does three things under one watchdog: the platform stat
//! call, a read of the file's leading bytes (the "magic" used for content
//! sniffing), and a restore of the original access/modify timestamps so the
//! probe is invisible to timestamp-based tooling.
//!
//! Failure policy: if the stat itself fails, the whole probe fails with the
//! OS error. If any auxiliary step fails (open, prefix read, timestamp
//! restore), the probe still succeeds with the stat fields populated,
//! `magic` empty, and `degraded` carrying the errno of the failed step.
//! That policy is uniform across all three steps.

use crate::error::{ProbeError, ProbeResult};
use crate::probe::types::FileInfo;
use crate::watchdog;
use std::ffi::CString;
use std::fs::{self, File, Metadata};
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default magic prefix length: enough for every sniffer signature the
/// `infer` catalogue checks
pub const DEFAULT_MAGIC_LEN: usize = 8192;

/// Deadline-bounded stat probe
#[derive(Debug, Clone, Copy)]
pub struct FileStatter {
    magic_len: usize,
}

impl Default for FileStatter {
    fn default() -> Self {
        Self {
            magic_len: DEFAULT_MAGIC_LEN,
        }
    }
}

impl FileStatter {
    /// Statter reading `magic_len` leading bytes per file
    pub fn new(magic_len: usize) -> Self {
        Self { magic_len }
    }

    /// Stat `path` under `deadline`.
    ///
    /// Follows symlinks, like the platform `stat` call. See the module docs
    /// for the auxiliary failure policy.
    pub fn stat(&self, path: &Path, deadline: Duration) -> ProbeResult<FileInfo> {
        let owned = path.to_path_buf();
        let magic_len = self.magic_len;

        let result = watchdog::execute(
            move |token| {
                let metadata = fs::metadata(&owned).map_err(|e| ProbeError::from_io(&e))?;

                let mut info = FileInfo {
                    path: owned,
                    metadata,
                    magic: Vec::new(),
                    checksum: None,
                    degraded: None,
                };

                // Checkpoint between the stat and the prefix read.
                if token.is_cancelled() {
                    return Err(ProbeError::Timeout);
                }

                if let Err(errno) = read_magic(&mut info, magic_len) {
                    info.magic.clear();
                    info.degraded = Some(errno);
                }

                Ok(info)
            },
            deadline,
        );

        match &result {
            Ok(info) => debug!(
                path = %path.display(),
                size = info.size(),
                magic = info.magic.len(),
                degraded = ?info.degraded,
                "stat complete"
            ),
            Err(err) => debug!(path = %path.display(), error = %err, "stat failed"),
        }

        result
    }
}

/// Read the leading bytes into `info.magic`, then put the file's access and
/// modify timestamps back the way the stat saw them.
fn read_magic(info: &mut FileInfo, magic_len: usize) -> Result<(), i32> {
    let file = File::open(&info.path).map_err(errno_of)?;

    let mut magic = Vec::with_capacity(magic_len);
    file.take(magic_len as u64)
        .read_to_end(&mut magic)
        .map_err(errno_of)?;
    info.magic = magic;

    restore_times(&info.path, &info.metadata).map_err(errno_of)?;
    Ok(())
}

/// Reset atime/mtime to the values captured by the stat, nanosecond exact
fn restore_times(path: &Path, meta: &Metadata) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains interior NUL"))?;

    let times = [
        libc::timespec {
            tv_sec: meta.atime(),
            tv_nsec: meta.atime_nsec(),
        },
        libc::timespec {
            tv_sec: meta.mtime(),
            tv_nsec: meta.mtime_nsec(),
        },
    ];

    let rc = unsafe { libc::utimensat(libc::AT_FDCWD, c_path.as_ptr(), times.as_ptr(), 0) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn errno_of(err: io::Error) -> i32 {
    err.raw_os_error().unwrap_or(libc::EIO)
}
