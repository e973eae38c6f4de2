use std::fmt;

use sha2::{Digest, Sha256};

/// Identity assigned to a transaction when it is read from the store.
///
/// `position` is the zero-based data row the transaction came from; `digest` fingerprints the raw
/// cells as they were read. Together they let an edited copy find its original even when the
/// edit touched the date, payer or merchant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RowId {
    pub position: usize,
    pub digest: u64,
}

impl RowId {
    pub fn new<S: AsRef<str>>(position: usize, cells: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for cell in cells {
            hasher.update(cell.as_ref().as_bytes());
            // unit separator, so ["ab", "c"] and ["a", "bc"] differ
            hasher.update([0x1fu8]);
        }
        let hash = hasher.finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash[..8]);
        RowId {
            position,
            digest: u64::from_be_bytes(prefix),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{:016x}", self.position, self.digest)
    }
}
