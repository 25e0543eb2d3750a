//! Region table and normalization.
//!
//! Maps raw region tokens to canonical region identifiers. Callers
//! split comma lists before normalizing; group keywords (`all`, `us`,
//! `eu`, `ap`) expand in table order.

use thiserror::Error;

use crate::types::RegionId;

/// Distinguished normalization failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("invalid region identifier: \"{0}\"")]
    Unknown(String),

    #[error("the region keyword \"all\" cannot be combined with other regions")]
    AllWithOthers,
}

/// Canonical region codes, in table order.
const REGIONS: &[&str] = &["sfo", "iad", "cle", "bru", "dub", "hnd", "syd"];

/// Group keywords expanding to several regions.
const GROUPS: &[(&str, &[&str])] = &[
    ("us", &["sfo", "iad", "cle"]),
    ("eu", &["bru", "dub"]),
    ("ap", &["hnd", "syd"]),
];

/// All canonical region codes.
pub fn all_regions() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().copied()
}

/// Normalize raw region tokens into an ordered, duplicate-free list of
/// canonical identifiers.
///
/// `all` expands to every region and is only valid on its own. Tokens
/// are matched case-insensitively.
pub fn normalize(tokens: &[&str]) -> Result<Vec<RegionId>, RegionError> {
    let lowered: Vec<String> = tokens.iter().map(|t| t.trim().to_ascii_lowercase()).collect();

    if lowered.iter().any(|t| t == "all") && lowered.len() > 1 {
        return Err(RegionError::AllWithOthers);
    }

    let mut out: Vec<RegionId> = Vec::new();
    for token in &lowered {
        if token == "all" {
            extend(&mut out, REGIONS);
        } else if let Some((_, members)) = GROUPS.iter().find(|(g, _)| *g == token.as_str()) {
            extend(&mut out, members);
        } else if REGIONS.contains(&token.as_str()) {
            extend(&mut out, &[token.as_str()]);
        } else {
            return Err(RegionError::Unknown(token.clone()));
        }
    }
    Ok(out)
}

fn extend(out: &mut Vec<RegionId>, codes: &[&str]) {
    for code in codes {
        if !out.iter().any(|c| c == code) {
            out.push((*code).to_string());
        }
    }
}
