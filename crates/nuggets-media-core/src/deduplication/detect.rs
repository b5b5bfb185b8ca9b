use std::collections::HashMap;

use log::debug;

use super::normalize::{is_blank, normalize};
use crate::types::{Detection, DuplicateEntry, DuplicateKind, NormalizedPair};

/// Find every pair of references that point at the same image.
///
/// Blank entries are skipped. Each unordered pair is reported once, ordered by
/// the position of its first member and then its second.
pub fn detect<S: AsRef<str>>(urls: &[S]) -> Detection {
    let normalized_pairs: Vec<NormalizedPair> = urls
        .iter()
        .map(AsRef::as_ref)
        .filter(|url| !is_blank(url))
        .map(|url| NormalizedPair {
            original: url.to_string(),
            normalized: normalize(url),
        })
        .collect();

    // Positions of each normalized form, in input order
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, pair) in normalized_pairs.iter().enumerate() {
        groups.entry(pair.normalized.as_str()).or_default().push(index);
    }

    let mut duplicates = Vec::new();
    for (index, pair) in normalized_pairs.iter().enumerate() {
        let group = &groups[pair.normalized.as_str()];
        for &other in group.iter().filter(|&&other| other > index) {
            let other_pair = &normalized_pairs[other];
            duplicates.push(DuplicateEntry {
                original_a: pair.original.clone(),
                original_b: other_pair.original.clone(),
                kind: classify(&pair.original, &other_pair.original),
            });
        }
    }

    debug!(
        "Detected {} duplicate pairs among {} references",
        duplicates.len(),
        normalized_pairs.len()
    );

    Detection {
        duplicates,
        normalized_pairs,
    }
}

/// Classify two references already known to normalize equal
fn classify(a: &str, b: &str) -> DuplicateKind {
    if a.trim().to_lowercase() == b.trim().to_lowercase() {
        DuplicateKind::CaseInsensitive
    } else {
        DuplicateKind::QueryParams
    }
}
