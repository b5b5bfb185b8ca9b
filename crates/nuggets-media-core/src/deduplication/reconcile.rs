use std::collections::HashSet;

use log::{debug, info};

use super::create::dedupe_for_create;
use super::normalize::normalize;
use crate::types::{LogAction, LogEntry, LogReason, ReconciliationResult, SupportingMediaItem};

/// Reconcile a post's image list after an edit.
///
/// The union of `existing_images` and `new_images` is deduplicated first. From
/// that union, explicitly deleted images are dropped and images that now live
/// in supporting media as `image` attachments are pruned. Finally every backup
/// entry that is neither in supporting media, nor deleted, nor already listed
/// is restored to the plain list.
///
/// Pruning always runs before restoring: an image that is both in the backup
/// and in supporting media stays in supporting media. Backup and deletion
/// sets may hold raw or normalized URLs; they are normalized on read.
pub fn reconcile<E, N>(
    existing_images: &[E],
    new_images: &[N],
    supporting_media: Option<&[SupportingMediaItem]>,
    images_backup: Option<&HashSet<String>>,
    explicitly_deleted: Option<&HashSet<String>>,
) -> ReconciliationResult
where
    E: AsRef<str>,
    N: AsRef<str>,
{
    // 1. Union and dedupe
    let candidates: Vec<&str> = existing_images
        .iter()
        .map(AsRef::as_ref)
        .chain(new_images.iter().map(AsRef::as_ref))
        .collect();
    let union = dedupe_for_create(&candidates);

    let supporting_keys: HashSet<String> = supporting_media
        .unwrap_or_default()
        .iter()
        .filter(|item| item.kind.is_image())
        .map(|item| normalize(&item.url))
        .filter(|key| !key.is_empty())
        .collect();
    let deleted_keys = normalized_keys(explicitly_deleted);

    let mut result = ReconciliationResult {
        removed: union.removed,
        logs: union.logs,
        ..Default::default()
    };
    let mut listed: HashSet<String> = HashSet::new();

    // 2. Deletions and pruning
    for image in union.deduplicated {
        let key = normalize(&image);

        if deleted_keys.contains(&key) {
            debug!("Excluding explicitly deleted image {}", image);
            result.logs.push(LogEntry::new(
                LogAction::Deleted,
                LogReason::ExplicitDelete,
                image.as_str(),
            ));
            result.deleted.push(image);
        } else if supporting_keys.contains(&key) {
            debug!("Image {} moved to supporting media", image);
            result.logs.push(LogEntry::new(
                LogAction::Moved,
                LogReason::SupportingMedia,
                image.as_str(),
            ));
            result.moved_to_supporting.push(image);
        } else {
            result.logs.push(LogEntry::new(
                LogAction::Preserved,
                LogReason::Unique,
                image.as_str(),
            ));
            listed.insert(key);
            result.deduplicated.push(image);
        }
    }

    // 3. Restore demoted images from the backup
    for (key, original) in backup_entries(images_backup) {
        if supporting_keys.contains(&key) || deleted_keys.contains(&key) || listed.contains(&key)
        {
            continue;
        }

        debug!("Restoring image {} from backup", original);
        result.logs.push(LogEntry::new(
            LogAction::Restored,
            LogReason::Backup,
            original.as_str(),
        ));
        listed.insert(key);
        result.deduplicated.push(original.clone());
        result.restored.push(original);
    }

    info!(
        "Reconciled {} candidates: {} kept, {} duplicates, {} moved, {} restored, {} deleted",
        candidates.len(),
        result.deduplicated.len() - result.restored.len(),
        result.removed.len(),
        result.moved_to_supporting.len(),
        result.restored.len(),
        result.deleted.len()
    );

    result
}

fn normalized_keys(set: Option<&HashSet<String>>) -> HashSet<String> {
    set.into_iter()
        .flatten()
        .map(|url| normalize(url))
        .filter(|key| !key.is_empty())
        .collect()
}

/// Backup entries as (key, original) pairs, one per key, in key order
fn backup_entries(backup: Option<&HashSet<String>>) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = backup
        .into_iter()
        .flatten()
        .map(|url| (normalize(url), url.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect();
    entries.sort();
    entries.dedup_by(|a, b| a.0 == b.0);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;

    fn set(urls: &[&str]) -> HashSet<String> {
        urls.iter().map(|url| url.to_string()).collect()
    }

    const NONE: &[&str] = &[];

    #[test]
    fn test_nothing_lost_without_media_or_history() {
        let result = reconcile(&["a.jpg", "b.jpg", "c.jpg"], NONE, None, None, None);

        assert_eq!(result.deduplicated, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert!(result.removed.is_empty());
        assert!(result.moved_to_supporting.is_empty());
        assert!(result.restored.is_empty());
        assert_eq!(result.logs.len(), 3);
        assert!(result
            .logs
            .iter()
            .all(|entry| entry.action == LogAction::Preserved));
    }

    #[test]
    fn test_new_duplicate_collapses_onto_existing_casing() {
        let result = reconcile(
            &["https://x.com/1.jpg"],
            &["HTTPS://X.COM/1.JPG?w=2", "https://x.com/2.jpg"],
            None,
            None,
            None,
        );

        assert_eq!(
            result.deduplicated,
            vec!["https://x.com/1.jpg", "https://x.com/2.jpg"]
        );
        assert_eq!(result.removed, vec!["HTTPS://X.COM/1.JPG?w=2"]);
    }

    #[test]
    fn test_non_image_supporting_item_does_not_prune() {
        let media = [SupportingMediaItem::new(MediaKind::Link, "https://x.com/1.jpg")];
        let result = reconcile(&["https://x.com/1.jpg"], NONE, Some(&media), None, None);

        assert_eq!(result.deduplicated, vec!["https://x.com/1.jpg"]);
        assert!(result.moved_to_supporting.is_empty());
    }

    #[test]
    fn test_image_supporting_item_prunes_ignoring_case_and_query() {
        let media = [SupportingMediaItem::image("HTTPS://X.COM/1.JPG?w=800").in_masonry(None)];
        let result = reconcile(
            &["https://x.com/1.jpg", "https://x.com/2.jpg"],
            NONE,
            Some(&media),
            None,
            None,
        );

        assert_eq!(result.deduplicated, vec!["https://x.com/2.jpg"]);
        assert_eq!(result.moved_to_supporting, vec!["https://x.com/1.jpg"]);
    }

    #[test]
    fn test_prune_wins_over_restore() {
        // In the backup and freshly promoted at the same time
        let media = [SupportingMediaItem::image("x.jpg")];
        let backup = set(&["x.jpg"]);
        let result = reconcile(&["x.jpg"], NONE, Some(&media), Some(&backup), None);

        assert!(result.deduplicated.is_empty());
        assert_eq!(result.moved_to_supporting, vec!["x.jpg"]);
        assert!(result.restored.is_empty());
    }

    #[test]
    fn test_backup_entry_already_listed_is_not_restored_twice() {
        let backup = set(&["X.JPG"]);
        let result = reconcile(&["x.jpg"], NONE, None, Some(&backup), None);

        assert_eq!(result.deduplicated, vec!["x.jpg"]);
        assert!(result.restored.is_empty());
    }

    #[test]
    fn test_explicit_delete_beats_everything() {
        let backup = set(&["x.jpg"]);
        let deleted = set(&["X.jpg"]);
        let result = reconcile(&["x.jpg", "y.jpg"], &["x.jpg?v=2"], None, Some(&backup), Some(&deleted));

        assert_eq!(result.deduplicated, vec!["y.jpg"]);
        assert_eq!(result.deleted, vec!["x.jpg"]);
        assert!(result.restored.is_empty());
    }

    #[test]
    fn test_every_candidate_has_one_terminal_log() {
        let media = [SupportingMediaItem::image("b.jpg")];
        let deleted = set(&["c.jpg"]);
        let result = reconcile(
            &["a.jpg", "b.jpg", "c.jpg"],
            &["A.jpg"],
            Some(&media),
            None,
            Some(&deleted),
        );

        assert_eq!(result.logs.len(), 4);
        for value in ["a.jpg", "b.jpg", "c.jpg", "A.jpg"] {
            assert_eq!(
                result.logs.iter().filter(|entry| entry.value == value).count(),
                1,
                "{value} should have exactly one log entry"
            );
        }
    }

    #[test]
    fn test_restore_order_is_deterministic() {
        let backup = set(&["c.jpg", "a.jpg", "b.jpg"]);
        let result = reconcile(NONE, NONE, None, Some(&backup), None);

        assert_eq!(result.restored, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(result.deduplicated, result.restored);
    }
}
