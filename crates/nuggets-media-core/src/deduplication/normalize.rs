use url::{Position, Url};

/// Canonical form of an image reference used for equality checks.
///
/// Trims and lowercases the input. When it parses as an absolute URL the query
/// string and fragment are dropped; anything else (relative paths, junk) is
/// compared as the trimmed lowercased text.
pub fn normalize(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    if lowered.is_empty() {
        return lowered;
    }

    match Url::parse(&lowered) {
        // Serialization re-encodes some characters with uppercase escapes
        Ok(parsed) if parsed.cannot_be_a_base() => {
            trim_opaque_tail(&parsed[..Position::AfterPath]).to_lowercase()
        }
        Ok(parsed) => parsed[..Position::AfterPath].to_lowercase(),
        Err(_) => lowered,
    }
}

/// An opaque path keeps the spaces that preceded a dropped query or fragment,
/// raw or escaped depending on the parser version
fn trim_opaque_tail(serialized: &str) -> &str {
    let mut tail = serialized.trim_end();
    while let Some(rest) = tail.strip_suffix("%20") {
        tail = rest.trim_end();
    }
    tail
}

/// Same as [`normalize`], with a missing value treated as empty
pub fn normalize_opt(url: Option<&str>) -> String {
    url.map(normalize).unwrap_or_default()
}

/// Whether an entry carries anything worth comparing
pub fn is_blank(url: &str) -> bool {
    url.trim().is_empty()
}
