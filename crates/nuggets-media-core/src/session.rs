use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::deduplication::{normalize, reconcile};
use crate::types::{ReconciliationResult, SupportingMediaItem};

/// Per-post edit history carried between reconcile calls.
///
/// The backup holds the original URLs of images promoted out of the plain
/// list, at most one per normalized form, so that demoting them brings them
/// back unchanged. The deletion set holds normalized URLs of user deletes,
/// which are never undone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    #[serde(default)]
    pub images_backup: HashSet<String>,

    #[serde(default)]
    pub explicitly_deleted: HashSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an image that is being promoted into supporting media
    pub fn promote(&mut self, url: &str) {
        if self.remember(url) {
            debug!("Backing up promoted image {}", url.trim());
            self.touch();
        }
    }

    /// Mark an image as demoted from supporting media.
    ///
    /// Returns true when the next reconcile will restore it to the plain list.
    pub fn demote(&mut self, url: &str) -> bool {
        if !self.remember(url) {
            return false;
        }
        self.touch();
        true
    }

    /// Record a user delete. Terminal for this image.
    pub fn delete(&mut self, url: &str) {
        let key = normalize(url);
        if key.is_empty() {
            return;
        }
        debug!("Recording explicit delete of {}", key);
        self.forget(&key);
        self.explicitly_deleted.insert(key);
        self.touch();
    }

    pub fn is_deleted(&self, url: &str) -> bool {
        self.explicitly_deleted.contains(&normalize(url))
    }

    /// Reconcile using this session's backup and deletion sets
    pub fn reconcile<E: AsRef<str>, N: AsRef<str>>(
        &self,
        existing_images: &[E],
        new_images: &[N],
        supporting_media: Option<&[SupportingMediaItem]>,
    ) -> ReconciliationResult {
        reconcile(
            existing_images,
            new_images,
            supporting_media,
            Some(&self.images_backup),
            Some(&self.explicitly_deleted),
        )
    }

    /// Fold a reconcile result back in so moved images can be restored later
    pub fn absorb(&mut self, result: &ReconciliationResult) {
        if result.moved_to_supporting.is_empty() {
            return;
        }
        for url in &result.moved_to_supporting {
            self.remember(url);
        }
        self.touch();
    }

    /// Keep the trimmed original URL as the single backup entry for its key.
    ///
    /// Returns false for blank or explicitly deleted URLs.
    fn remember(&mut self, url: &str) -> bool {
        let key = normalize(url);
        if key.is_empty() || self.explicitly_deleted.contains(&key) {
            return false;
        }
        self.forget(&key);
        self.images_backup.insert(url.trim().to_string());
        true
    }

    fn forget(&mut self, key: &str) {
        self.images_backup.retain(|entry| normalize(entry) != key);
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
