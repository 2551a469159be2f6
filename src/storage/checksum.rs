//! CRC32 checksums for committed record data
//!
//! Checksums are stored in the version manifest as `crc32:XXXXXXXX` (eight
//! lowercase hex digits) and verified on every read.

/// Computes the CRC32 checksum of a byte slice.
pub fn compute_crc32(bytes: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Formats a checksum for the manifest: `crc32:XXXXXXXX`.
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses a formatted checksum back into its raw value.
///
/// Returns `None` when the prefix or hex payload is malformed.
pub fn parse_checksum(formatted: &str) -> Option<u32> {
    let hex = formatted.strip_prefix("crc32:")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
