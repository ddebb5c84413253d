//! Error types for impatient-walker
//!
//! Probe-level failures are exactly two kinds: a deadline expired before the
//! operation finished (`Timeout`), or the OS reported a genuine failure
//! (`Os` with its errno). `Timeout` is reserved for deadline expiry and is
//! never overloaded with an OS error code.
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - A failing probe never aborts a walk; it is recorded and the walk
//!   continues with the remaining queued directories

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a single deadline-bounded probe (listing or stat)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// The deadline expired before the operation completed
    #[error("operation timed out")]
    Timeout,

    /// The operation completed but the OS reported failure
    #[error("OS error {code}")]
    Os { code: i32 },
}

impl ProbeError {
    /// Human-readable description, with the platform strerror text for OS
    /// failures
    pub fn message(&self) -> String {
        match self {
            ProbeError::Timeout => "operation timed out".to_string(),
            ProbeError::Os { code } => io::Error::from_raw_os_error(*code).to_string(),
        }
    }

    /// Build from an I/O error, preserving the platform errno.
    ///
    /// I/O errors synthesized without an OS code (e.g. unexpected EOF) map
    /// to `EIO` so the two-kind contract holds.
    pub fn from_io(err: &io::Error) -> Self {
        ProbeError::Os {
            code: err.raw_os_error().unwrap_or(libc::EIO),
        }
    }

    /// True if this failure was a deadline expiry
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout)
    }

    /// The errno for OS failures, `None` for timeouts
    pub fn os_code(&self) -> Option<i32> {
        match self {
            ProbeError::Timeout => None,
            ProbeError::Os { code } => Some(*code),
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        ProbeError::from_io(&err)
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Deadline must be a positive number of nanoseconds
    #[error("Invalid deadline {nanos} ns: must be positive")]
    InvalidDeadline { nanos: i64 },

    /// Magic prefix length must be non-zero
    #[error("Invalid magic length {len}: must be at least 1 byte")]
    InvalidMagicLen { len: usize },

    /// Root path must exist and be a directory
    #[error("Root path '{}' is not a directory", path.display())]
    RootNotADirectory { path: PathBuf },
}

/// Top-level error type for the impatient-walker application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Probe failure surfaced directly to a caller (outside a walk)
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors outside the probe path (e.g. checksum reads)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for ProbeError
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_error_kinds() {
        let timeout = ProbeError::Timeout;
        assert!(timeout.is_timeout());
        assert_eq!(timeout.os_code(), None);

        let os = ProbeError::Os { code: libc::ENOENT };
        assert!(!os.is_timeout());
        assert_eq!(os.os_code(), Some(libc::ENOENT));
    }

    #[test]
    fn test_from_io_preserves_errno() {
        let io_err = io::Error::from_raw_os_error(libc::EACCES);
        assert_eq!(
            ProbeError::from_io(&io_err),
            ProbeError::Os { code: libc::EACCES }
        );

        // Synthetic errors without an errno fall back to EIO
        let synthetic = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(
            ProbeError::from_io(&synthetic),
            ProbeError::Os { code: libc::EIO }
        );
    }

    #[test]
    fn test_error_conversion() {
        let probe: WalkerError = ProbeError::Timeout.into();
        assert!(matches!(probe, WalkerError::Probe(ProbeError::Timeout)));
    }
}
