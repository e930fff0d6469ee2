//! Deterministic ordering of merged fragments.
//!
//! Downstream consumers hash the generated configuration, so the order in which
//! fragments are handed over must depend only on their names, never on directory
//! listing order or map iteration order.

use sha2::{Digest, Sha256};

use super::MergedSet;

/// Fragment contents in ascending byte-wise order of their names
#[must_use]
pub fn sorted_contents(set: &MergedSet) -> Vec<String> {
    // BTreeMap<String, _> iterates in byte-wise key order
    set.values().cloned().collect()
}

/// Fingerprint of the ordered file and unit contents, as `sha256:<hex>`.
///
/// Every section and item is length-prefixed, so moving bytes between adjacent items
/// or between the two sections changes the fingerprint.
#[must_use]
pub fn content_fingerprint(files: &[String], units: &[String]) -> String {
    let mut hasher = Sha256::new();
    for (tag, section) in [(b"files", files), (b"units", units)] {
        hasher.update(tag);
        hasher.update((section.len() as u64).to_le_bytes());
        for item in section {
            hasher.update((item.len() as u64).to_le_bytes());
            hasher.update(item.as_bytes());
        }
    }
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
