//! Name-recovery heuristic: AAMP keys are CRC32 hashes with no embedded
//! string, so a textual representation has to guess back the original
//! name. [`NameResolver`] implements the five-tier lookup this format's
//! tooling has always used: values seen verbatim during parsing, a static
//! dictionary of known names, a contextual guess from the parent name and
//! sibling index, a numbered-template scan, and finally the raw hash.

mod dictionary;

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::types::Crc32;
use dictionary::{HASHED_NAMES, NUMBERED_NAME_TEMPLATES};

/// Substitute a template's single printf-style `%d`/`%u` conversion
/// (optionally zero-padded, e.g. `%03d`) with `i`, mirroring Python's `%`
/// string-formatting operator, which is the format the dictionary file
/// is defined against. Returns `None` if `template` has no such conversion.
fn format_numbered(template: &str, i: usize) -> Option<String> {
    let percent = template.find('%')?;
    let rest = &template[percent + 1..];
    let zero_padded = rest.starts_with('0');
    let digits_start = if zero_padded { 1 } else { 0 };
    let digits_end = digits_start
        + rest[digits_start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len() - digits_start);
    let width: usize = rest[digits_start..digits_end].parse().unwrap_or(0);
    let conversion = rest[digits_end..].chars().next()?;
    if conversion != 'd' && conversion != 'u' {
        return None;
    }
    let consumed = digits_end + conversion.len_utf8();
    let number = if zero_padded && width > 0 {
        format!("{i:0width$}")
    } else {
        i.to_string()
    };
    Some(format!("{}{number}{}", &template[..percent], &rest[consumed..]))
}

/// Scan every numbered-name template for an index that hashes to
/// `wanted_hash`.
fn test_possible_numbered_names(idx: usize, wanted_hash: u32) -> Option<String> {
    for template in NUMBERED_NAME_TEMPLATES.iter() {
        for i in 0..=(idx + 1) {
            let Some(candidate) = format_numbered(template, i) else {
                break;
            };
            if Crc32::hash(&candidate).value() == wanted_hash {
                return Some(candidate);
            }
        }
    }
    None
}

/// The result of resolving a key: either a recovered name or the raw hash.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedName {
    Known(String),
    Unknown(Crc32),
}

impl ResolvedName {
    /// The YAML mapping key text this name should be written as.
    pub fn as_key(&self) -> String {
        match self {
            ResolvedName::Known(s) => s.clone(),
            ResolvedName::Unknown(crc) => crc.value().to_string(),
        }
    }
}

/// Bundles the string side table produced while parsing a single archive
/// with the process-wide static dictionaries. The numbered-template scan
/// (tier 4) is memoized in `numbered_cache`, scoped to this resolver's
/// lifetime rather than process-wide, so the cache's working set is bounded
/// by a single archive's traversal rather than growing across decodes.
pub struct NameResolver<'a> {
    seen: &'a IndexMap<Crc32, String>,
    numbered_cache: RefCell<IndexMap<(usize, u32), Option<String>>>,
}

impl<'a> NameResolver<'a> {
    pub fn new(seen: &'a IndexMap<Crc32, String>) -> Self {
        NameResolver {
            seen,
            numbered_cache: RefCell::new(IndexMap::new()),
        }
    }

    fn test_numbered(&self, idx: usize, wanted_hash: u32) -> Option<String> {
        if let Some(cached) = self.numbered_cache.borrow().get(&(idx, wanted_hash)) {
            return cached.clone();
        }
        let result = test_possible_numbered_names(idx, wanted_hash);
        self.numbered_cache.borrow_mut().insert((idx, wanted_hash), result.clone());
        result
    }

    /// Resolve the name for key `crc` at sibling index `idx` within its
    /// parent (keyed by `parent_crc`). Never fails: the caller always gets
    /// back either a name or the hash itself.
    pub fn resolve(&self, idx: usize, crc: Crc32, parent_crc: Crc32) -> ResolvedName {
        if let Some(name) = self.seen.get(&crc) {
            return ResolvedName::Known(name.clone());
        }
        if let Some(name) = HASHED_NAMES.get(&crc.value()) {
            return ResolvedName::Known((*name).to_string());
        }

        let parent_name = HASHED_NAMES.get(&parent_crc.value());
        let parent_name = match parent_name {
            Some(name) => *name,
            None => {
                return self
                    .test_numbered(idx, crc.value())
                    .map(ResolvedName::Known)
                    .unwrap_or(ResolvedName::Unknown(crc));
            }
        };

        for i in [idx, idx + 1] {
            for candidate in generate_possible_names(parent_name, i) {
                if Crc32::hash(&candidate) == crc {
                    return ResolvedName::Known(candidate);
                }
            }
        }

        // Some containers are named in the plural while their children are
        // named in the singular.
        if parent_name == "Children" {
            for i in [idx, idx + 1] {
                for candidate in generate_possible_names("Child", i) {
                    if Crc32::hash(&candidate) == crc {
                        return ResolvedName::Known(candidate);
                    }
                }
            }
        }
        for suffix in ["s", "es", "List"] {
            if let Some(stem) = parent_name.strip_suffix(suffix) {
                for i in [idx, idx + 1] {
                    for candidate in generate_possible_names(stem, i) {
                        if Crc32::hash(&candidate) == crc {
                            return ResolvedName::Known(candidate);
                        }
                    }
                }
            }
        }

        self.test_numbered(idx, crc.value())
            .map(ResolvedName::Known)
            .unwrap_or(ResolvedName::Unknown(crc))
    }
}

fn generate_possible_names(parent: &str, i: usize) -> [String; 6] {
    [
        format!("{parent}{i}"),
        format!("{parent}_{i}"),
        format!("{parent}{i:02}"),
        format!("{parent}_{i:02}"),
        format!("{parent}{i:03}"),
        format!("{parent}_{i:03}"),
    ]
}
