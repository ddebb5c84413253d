//! Entry and stat types produced by probes
//!
//! These are the immutable records that come back from deadline-bounded
//! directory listings and stat calls.

use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::os::unix::fs::FileTypeExt;
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;

/// Type tag of a directory entry
///
/// The full set a platform `d_type` byte can carry, including the BSD
/// whiteout inode. std's `FileType` never reports `Unknown` or `Whiteout`,
/// but raw `d_type` and `st_mode` conversions can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryType {
    /// Filesystem did not report a type (DT_UNKNOWN)
    Unknown,
    /// Named pipe (FIFO)
    Fifo,
    /// Character device
    CharDevice,
    /// Directory
    Directory,
    /// Block device
    BlockDevice,
    /// Regular file
    File,
    /// Symbolic link
    Symlink,
    /// Unix socket
    Socket,
    /// Whiteout inode
    Whiteout,
    /// Type byte present but not one we recognize
    Unrecognized,
}

impl EntryType {
    /// Classify a `std::fs::FileType` as returned by `read_dir`/`metadata`
    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            EntryType::Directory
        } else if ft.is_file() {
            EntryType::File
        } else if ft.is_symlink() {
            EntryType::Symlink
        } else if ft.is_fifo() {
            EntryType::Fifo
        } else if ft.is_char_device() {
            EntryType::CharDevice
        } else if ft.is_block_device() {
            EntryType::BlockDevice
        } else if ft.is_socket() {
            EntryType::Socket
        } else {
            EntryType::Unrecognized
        }
    }

    /// Classify a raw dirent `d_type` byte
    pub fn from_dirent_type(d_type: u8) -> Self {
        match d_type {
            libc::DT_UNKNOWN => EntryType::Unknown,
            libc::DT_FIFO => EntryType::Fifo,
            libc::DT_CHR => EntryType::CharDevice,
            libc::DT_DIR => EntryType::Directory,
            libc::DT_BLK => EntryType::BlockDevice,
            libc::DT_REG => EntryType::File,
            libc::DT_LNK => EntryType::Symlink,
            libc::DT_SOCK => EntryType::Socket,
            14 => EntryType::Whiteout, // DT_WHT
            _ => EntryType::Unrecognized,
        }
    }

    /// Classify `st_mode` type bits
    pub fn from_mode(mode: u32) -> Self {
        match mode & libc::S_IFMT {
            libc::S_IFREG => EntryType::File,
            libc::S_IFDIR => EntryType::Directory,
            libc::S_IFLNK => EntryType::Symlink,
            libc::S_IFBLK => EntryType::BlockDevice,
            libc::S_IFCHR => EntryType::CharDevice,
            libc::S_IFIFO => EntryType::Fifo,
            libc::S_IFSOCK => EntryType::Socket,
            _ => EntryType::Unrecognized,
        }
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == EntryType::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == EntryType::Directory
    }

    /// Check if this is a symbolic link
    pub fn is_symlink(&self) -> bool {
        *self == EntryType::Symlink
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Unknown => "unknown filetype",
            EntryType::Fifo => "named pipe",
            EntryType::CharDevice => "character device",
            EntryType::Directory => "directory",
            EntryType::BlockDevice => "block device",
            EntryType::File => "regular file",
            EntryType::Symlink => "symbolic link",
            EntryType::Socket => "socket",
            EntryType::Whiteout => "whiteout inode",
            EntryType::Unrecognized => "unrecognized filetype",
        }
    }
}

/// One entry from a directory listing, immutable once read
///
/// The name plus the parent path it was listed under is enough to
/// reconstruct the entry's full path later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name (not a full path)
    pub name: OsString,

    /// Type tag as reported by the listing
    pub kind: EntryType,
}

impl DirEntry {
    /// Build from a `std::fs::DirEntry`.
    ///
    /// `file_type()` is essentially free on platforms whose dirents carry
    /// `d_type`; where it has to stat, that cost counts against the probe's
    /// deadline like any other suspension point.
    pub fn from_std(entry: &fs::DirEntry) -> std::io::Result<Self> {
        let kind = EntryType::from_file_type(entry.file_type()?);
        Ok(Self {
            name: entry.file_name(),
            kind,
        })
    }
}

/// Result of a deadline-bounded stat probe
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Path that was probed
    pub path: PathBuf,

    /// Raw platform stat record
    pub metadata: Metadata,

    /// Leading bytes of the file's content, for type sniffing. Empty when
    /// the prefix read was skipped or failed (see `degraded`).
    pub magic: Vec<u8>,

    /// Content checksum; never populated by `stat` itself, only by callers
    /// that opt in (see `content::checksum_file`)
    pub checksum: Option<String>,

    /// errno of a failed auxiliary step (open / prefix read / timestamp
    /// restore). The stat fields are still valid when this is set.
    pub degraded: Option<i32>,
}

impl FileInfo {
    /// File size in bytes
    pub fn size(&self) -> u64 {
        self.metadata.len()
    }

    /// Entry type from the stat mode bits
    pub fn entry_type(&self) -> EntryType {
        EntryType::from_mode(self.metadata.mode())
    }

    /// True if every auxiliary step succeeded
    pub fn is_complete(&self) -> bool {
        self.degraded.is_none()
    }
}
