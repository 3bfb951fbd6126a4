//! Checksum calculation for written datasets

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw bytes
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use ledgerline::core::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"[]");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
