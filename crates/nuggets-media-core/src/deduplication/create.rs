use std::collections::HashSet;

use log::debug;

use super::normalize::{is_blank, normalize};
use crate::types::{DedupeOutcome, LogAction, LogEntry, LogReason};

/// Collapse candidate images gathered while composing a new post.
///
/// Manual URLs, pasted links and uploaded files arrive as one flat list. The
/// first occurrence of each image wins and keeps its casing; later occurrences
/// are reported as removed. Blank entries are dropped without a log entry.
pub fn dedupe_for_create<S: AsRef<str>>(images: &[S]) -> DedupeOutcome {
    let mut outcome = DedupeOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for image in images.iter().map(AsRef::as_ref) {
        if is_blank(image) {
            outcome.filtered += 1;
            continue;
        }

        if seen.insert(normalize(image)) {
            outcome.deduplicated.push(image.to_string());
        } else {
            debug!("Dropping duplicate image reference {}", image);
            outcome.removed.push(image.to_string());
            outcome
                .logs
                .push(LogEntry::new(LogAction::Removed, LogReason::Duplicate, image));
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_casing_is_kept() {
        let outcome = dedupe_for_create(&["A.jpg", "a.jpg"]);
        assert_eq!(outcome.deduplicated, vec!["A.jpg"]);
        assert_eq!(outcome.removed, vec!["a.jpg"]);
        assert_eq!(
            outcome.logs,
            vec![LogEntry::new(LogAction::Removed, LogReason::Duplicate, "a.jpg")]
        );
    }

    #[test]
    fn test_blank_entries_are_not_removals() {
        let outcome = dedupe_for_create(&["", "https://x.com/1.jpg", "   ", "https://x.com/2.jpg"]);
        assert_eq!(outcome.deduplicated.len(), 2);
        assert!(outcome.removed.is_empty());
        assert!(outcome.logs.is_empty());
        assert_eq!(outcome.filtered, 2);
    }

    #[test]
    fn test_counts_add_up() {
        let images = [
            "https://x.com/1.jpg",
            "https://X.com/1.jpg?w=10",
            "",
            "https://x.com/2.jpg",
            "https://x.com/2.jpg#frag",
            "https://x.com/3.jpg",
        ];
        let outcome = dedupe_for_create(&images);

        assert_eq!(
            outcome.deduplicated.len() + outcome.filtered + outcome.removed.len(),
            images.len()
        );
        assert_eq!(
            outcome.deduplicated,
            vec!["https://x.com/1.jpg", "https://x.com/2.jpg", "https://x.com/3.jpg"]
        );
    }

    #[test]
    fn test_every_removal_matches_a_kept_entry() {
        let outcome = dedupe_for_create(&["b.PNG", "a.png", "B.png", "A.PNG", "c.png"]);
        let kept: HashSet<String> = outcome.deduplicated.iter().map(|u| normalize(u)).collect();

        assert_eq!(kept.len(), outcome.deduplicated.len());
        for removed in &outcome.removed {
            assert!(kept.contains(&normalize(removed)));
        }
    }
}
