//! Resource key derivation.
//!
//! Free text (intent examples, dialog output) is keyed by a short readable
//! prefix plus a 32-bit polynomial string hash. The hash must stay bit-for-bit
//! compatible with keys already stored in remote bundles, so it folds over
//! UTF-16 code units with wrapping arithmetic and prints the unsigned bit
//! pattern in lowercase hex without padding.
//!
//! Entity values and synonyms use composite `entity:value` keys instead.

use std::collections::BTreeMap;

use super::{Entries, Units};

/// Number of leading UTF-16 code units kept as the readable part of a hashed key.
pub const KEY_PREFIX_UNITS: usize = 4;

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
pub fn string_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Derive the key for a free-text unit, e.g. `"Hello"` -> `"Hell_42628b2"`.
///
/// Callers never pass empty strings; empty units are skipped upstream.
///
/// The prefix counts UTF-16 units like the hash does. A surrogate pair cut in
/// half at the boundary becomes U+FFFD.
pub fn derive_key(text: &str) -> String {
    let units: Vec<u16> = text.encode_utf16().take(KEY_PREFIX_UNITS).collect();
    let prefix = String::from_utf16_lossy(&units);
    format!("{}_{:x}", prefix, string_hash(text))
}

/// Composite key for an entity value or synonym.
pub fn entity_key(entity: &str, value: &str) -> String {
    format!("{}:{}", entity, value)
}

/// Flatten collision buckets into uploadable entries.
///
/// A bucket with one member keeps its key. A bucket with several members is
/// expanded into `key:0`, `key:1`, ... in set order.
pub fn expand_collisions(units: &Units) -> Entries {
    upload_keys(units)
        .into_iter()
        .map(|(text, key)| (key, text))
        .collect()
}

/// Source string -> key it is uploaded under, after collision expansion.
///
/// Only meaningful for hashed regions, where a source string maps to exactly
/// one bucket.
pub fn upload_keys(units: &Units) -> BTreeMap<String, String> {
    let mut keys = BTreeMap::new();
    for (key, texts) in units {
        if texts.len() == 1 {
            if let Some(text) = texts.first() {
                keys.insert(text.clone(), key.clone());
            }
            continue;
        }
        for (index, text) in texts.iter().enumerate() {
            keys.insert(text.clone(), format!("{}:{}", key, index));
        }
    }
    keys
}
