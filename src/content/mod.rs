//! Content inspection helpers: MIME sniffing and checksums
//!
//! Both operate on data the probes already produced (the magic prefix) or on
//! explicit caller request (whole-file checksums); nothing here runs under a
//! watchdog deadline.

pub mod checksum;
pub mod filetype;

pub use checksum::{checksum_bytes, checksum_file};
pub use filetype::{looks_textual, sniff_info, sniff_mime};
