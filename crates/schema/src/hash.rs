//! FNV-1a hashing for schema fingerprints
//!
//! Fingerprints let the registry notice when a known schema name is requested
//! again with a different field list.

const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x00000100000001B3;

/// Fold more bytes into a running FNV-1a 64-bit hash
pub(crate) const fn fnv1a_64_continue(mut hash: u64, data: &[u8]) -> u64 {
    let mut i = 0;
    while i < data.len() {
        hash ^= data[i] as u64;
        hash = hash.wrapping_mul(FNV64_PRIME);
        i += 1;
    }
    hash
}

/// Incremental FNV-1a 64-bit hasher over a sequence of string parts
///
/// Each part is followed by a `0x00` separator so that `["ab", "c"]` and
/// `["a", "bc"]` hash differently.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fingerprinter {
    hash: u64,
}

impl Fingerprinter {
    pub(crate) const fn new() -> Self {
        Self {
            hash: FNV64_OFFSET_BASIS,
        }
    }

    pub(crate) fn part(mut self, s: &str) -> Self {
        self.hash = fnv1a_64_continue(self.hash, s.as_bytes());
        self.hash = fnv1a_64_continue(self.hash, &[0]);
        self
    }

    pub(crate) const fn finish(self) -> u64 {
        self.hash
    }
}
