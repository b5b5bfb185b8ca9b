mod common;

use common::{link, masonry, set, NONE};
use nuggets_media_core::{reconcile, EditSession, LogAction, LogReason};

#[test]
fn test_no_accidental_loss() {
    let result = reconcile(&["a.jpg", "b.jpg", "c.jpg"], NONE, None, None, None);

    assert_eq!(result.deduplicated, vec!["a.jpg", "b.jpg", "c.jpg"]);
}

#[test]
fn test_mixed_sources_collapse_onto_existing_casing() {
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
}

#[test]
fn test_link_with_same_url_does_not_prune() {
    let media = vec![link("https://x.com/1.jpg")];
    let result = reconcile(&["https://x.com/1.jpg"], NONE, Some(&media), None, None);

    assert_eq!(result.deduplicated, vec!["https://x.com/1.jpg"]);
    assert!(result.moved_to_supporting.is_empty());
}

#[test]
fn test_promote_then_demote_restores() {
    let backup = set(&["x.jpg"]);

    // Promote
    let media = masonry(&["x.jpg"]);
    let promoted = reconcile(&["x.jpg"], NONE, Some(&media), Some(&backup), None);
    assert!(promoted.deduplicated.is_empty());
    assert_eq!(promoted.moved_to_supporting, vec!["x.jpg"]);

    // Demote by clearing supporting media
    let demoted = reconcile(&promoted.deduplicated, NONE, Some(&[]), Some(&backup), None);
    assert_eq!(demoted.deduplicated, vec!["x.jpg"]);
    assert_eq!(demoted.restored, vec!["x.jpg"]);
    assert!(demoted
        .logs
        .iter()
        .any(|entry| entry.action == LogAction::Restored && entry.reason == LogReason::Backup));
}

#[test]
fn test_repeated_cycles_never_duplicate() {
    let backup = set(&["x.jpg", "y.jpg"]);
    let promoted_media = masonry(&["x.jpg"]);
    let mut images: Vec<String> = vec!["x.jpg".to_string(), "y.jpg".to_string()];

    for _ in 0..5 {
        let promoted = reconcile(&images, NONE, Some(&promoted_media), Some(&backup), None);
        assert_eq!(promoted.deduplicated, vec!["y.jpg"]);
        images = promoted.deduplicated;

        let demoted = reconcile(&images, NONE, None, Some(&backup), None);
        assert_eq!(demoted.deduplicated, vec!["y.jpg", "x.jpg"]);
        images = demoted.deduplicated;

        // Steady state is a fixed point
        let again = reconcile(&images, NONE, None, Some(&backup), None);
        assert_eq!(again.deduplicated, images);
        assert!(again.restored.is_empty());
    }
}

#[test]
fn test_prune_precedes_restore_for_newly_promoted_backup_entry() {
    let backup = set(&["https://x.com/hero.jpg"]);
    let media = masonry(&["HTTPS://X.COM/HERO.JPG?crop=1"]);

    let result = reconcile(
        NONE,
        &["https://x.com/hero.jpg"],
        Some(&media),
        Some(&backup),
        None,
    );

    assert!(result.deduplicated.is_empty());
    assert!(result.restored.is_empty());
    assert_eq!(result.moved_to_supporting, vec!["https://x.com/hero.jpg"]);
}

#[test]
fn test_explicit_delete_is_terminal_across_cycles() {
    let backup = set(&["x.jpg"]);
    let deleted = set(&["x.jpg"]);
    let media = masonry(&["x.jpg"]);

    let steps = [
        reconcile(&["x.jpg"], NONE, None, Some(&backup), Some(&deleted)),
        reconcile(&["x.jpg"], NONE, Some(&media), Some(&backup), Some(&deleted)),
        reconcile(NONE, &["X.JPG"], None, Some(&backup), Some(&deleted)),
        reconcile(NONE, NONE, None, Some(&backup), Some(&deleted)),
    ];

    for result in steps {
        assert!(!result.deduplicated.iter().any(|url| url.eq_ignore_ascii_case("x.jpg")));
        assert!(result.restored.is_empty());
    }
}

#[test]
fn test_every_reference_accounted_for() {
    let media = masonry(&["b.jpg"]);
    let backup = set(&["d.jpg"]);
    let deleted = set(&["c.jpg"]);
    let result = reconcile(
        &["a.jpg", "b.jpg", "c.jpg"],
        &["A.JPG?x=1", "e.jpg"],
        Some(&media),
        Some(&backup),
        Some(&deleted),
    );

    assert_eq!(result.deduplicated, vec!["a.jpg", "e.jpg", "d.jpg"]);
    assert_eq!(result.removed, vec!["A.JPG?x=1"]);
    assert_eq!(result.moved_to_supporting, vec!["b.jpg"]);
    assert_eq!(result.deleted, vec!["c.jpg"]);
    assert_eq!(result.restored, vec!["d.jpg"]);
}

#[test]
fn test_session_drives_full_edit_flow() {
    let hero = "https://cdn.x.com/Photos/Hero.JPG?sig=AbC";
    let mut session = EditSession::new();
    let images = vec!["https://x.com/1.jpg", hero];

    session.promote(hero);
    let media = masonry(&[hero]);
    let promoted = session.reconcile(&images, NONE, Some(&media));
    session.absorb(&promoted);
    assert_eq!(promoted.deduplicated, vec!["https://x.com/1.jpg"]);

    session.demote(hero);
    let demoted = session.reconcile(&promoted.deduplicated, NONE, None);
    assert_eq!(demoted.deduplicated, vec!["https://x.com/1.jpg", hero]);
    assert_eq!(demoted.restored, vec![hero]);

    session.delete("https://cdn.x.com/photos/hero.jpg");
    let deleted = session.reconcile(&demoted.deduplicated, NONE, None);
    assert_eq!(deleted.deduplicated, vec!["https://x.com/1.jpg"]);
    assert_eq!(deleted.deleted, vec![hero]);
}
