//! Content-type sniffing over magic prefixes
//!
//! Works on the leading bytes a stat probe already collected, so sniffing a
//! file's type costs nothing beyond the probe itself.

use crate::probe::types::FileInfo;

/// Sniff a MIME type from leading content bytes.
///
/// Returns `None` when the signature is not in the catalogue (plain text,
/// empty files, truncated prefixes).
pub fn sniff_mime(magic: &[u8]) -> Option<&'static str> {
    infer::get(magic).map(|kind| kind.mime_type())
}

/// Sniff the MIME type of a stat probe's result
pub fn sniff_info(info: &FileInfo) -> Option<&'static str> {
    sniff_mime(&info.magic)
}

/// True if the prefix looks like text: no NUL byte and valid UTF-8 up to the
/// last complete character. A crude but serviceable fallback for prefixes
/// the signature catalogue does not know.
pub fn looks_textual(magic: &[u8]) -> bool {
    if magic.is_empty() || magic.contains(&0) {
        return false;
    }
    match std::str::from_utf8(magic) {
        Ok(_) => true,
        // A multi-byte character may be cut off at the prefix boundary.
        Err(e) => e.valid_up_to() + 4 > magic.len(),
    }
}
