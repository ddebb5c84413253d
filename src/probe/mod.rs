//! Deadline-bounded filesystem probes
//!
//! A probe is one watchdogged OS interaction: a directory listing or a stat
//! call. Both produce either their result or `ProbeError::Timeout`, never
//! both, never neither.

pub mod lister;
pub mod statter;
pub mod types;

pub use lister::{list, read_entries};
pub use statter::{FileStatter, DEFAULT_MAGIC_LEN};
pub use types::{DirEntry, EntryType, FileInfo};
