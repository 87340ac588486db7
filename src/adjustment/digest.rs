use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Canonical digest of an address set.
///
/// Addresses are sorted ascending with duplicates collapsed, concatenated
/// without a delimiter, hashed with SHA-256 and base-58 encoded (Bitcoin
/// alphabet). Returns `None` for an empty set.
pub fn compute_digest<'a, I>(addresses: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let sorted: BTreeSet<&str> = addresses.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    for address in &sorted {
        hasher.update(address.as_bytes());
    }
    Some(bs58::encode(hasher.finalize()).into_string())
}

/// True when the digest of `addresses` is exactly `expected`.
pub fn verify<'a, I>(expected: &str, addresses: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    compute_digest(addresses).as_deref() == Some(expected)
}
