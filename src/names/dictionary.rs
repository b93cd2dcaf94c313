//! Static name dictionaries, baked into the binary at compile time.
//!
//! Real-world usage of this format ships dictionaries with on the order of
//! 10^5 entries, built by scanning every archive in a game's data for
//! strings and hashing them. The lists bundled here are a representative
//! seed rather than an exhaustive reproduction of any particular game's
//! dictionary.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::Crc32;

const HASHED_NAMES_SRC: &str = include_str!("../../data/hashed_names.txt");
const NUMBERED_NAMES_SRC: &str = include_str!("../../data/numbered_names.txt");

/// CRC32 -> name, built by hashing each dictionary entry at startup so the
/// table can never drift from the hash function actually used on the wire.
pub static HASHED_NAMES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HASHED_NAMES_SRC
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|name| (Crc32::hash(name).value(), name))
        .collect()
});

/// Printf-style templates for the numbered-name scan, each containing a
/// single `%d`/`%u` conversion (optionally zero-padded) for the index.
pub static NUMBERED_NAME_TEMPLATES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    NUMBERED_NAMES_SRC
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_loads_and_hashes() {
        assert!(HASHED_NAMES.get(&Crc32::hash("Children").value()).is_some());
    }

    #[test]
    fn test_numbered_templates_contain_conversion() {
        assert!(NUMBERED_NAME_TEMPLATES.iter().all(|t| t.contains('%')));
    }
}
