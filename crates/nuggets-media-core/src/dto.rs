//! Boundary types for a post's media fields.
//!
//! Stored documents still carry deprecated single-value fields (`image`,
//! `media`). Responses go out through [`PostMediaDto`], which is built from an
//! allowlist and never includes them.

use serde::{Deserialize, Serialize};

use crate::migration::{read_tags, MigrationPhase, TagFields};
use crate::types::{ImageReference, ReconciliationResult, SupportingMediaItem};

pub const MEDIA_DTO_VERSION: u32 = 1;

/// Media fields as stored on a post document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMedia {
    #[serde(default)]
    pub images: Vec<ImageReference>,

    #[serde(default)]
    pub supporting_media: Vec<SupportingMediaItem>,

    #[serde(flatten)]
    pub tag_fields: TagFields,

    /// Deprecated: single cover image, superseded by `images`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageReference>,

    /// Deprecated: single attachment, superseded by `supportingMedia`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<SupportingMediaItem>,
}

impl PostMedia {
    /// Persist the outcome of a reconcile call
    pub fn apply(&mut self, result: &ReconciliationResult) {
        self.images = result.deduplicated.clone();
    }

    /// Fold deprecated fields into their replacements and clear them
    pub fn upgrade(&mut self) {
        if let Some(image) = self.image.take() {
            if !image.trim().is_empty() && !self.images.contains(&image) {
                self.images.insert(0, image);
            }
        }
        if let Some(media) = self.media.take() {
            if !self.supporting_media.contains(&media) {
                self.supporting_media.push(media);
            }
        }
    }
}

/// Versioned outbound view of [`PostMedia`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMediaDto {
    pub version: u32,
    pub images: Vec<ImageReference>,
    pub supporting_media: Vec<SupportingMediaItem>,
    pub tags: Vec<String>,
}

impl PostMediaDto {
    pub fn from_media(media: &PostMedia, phase: MigrationPhase) -> Self {
        Self {
            version: MEDIA_DTO_VERSION,
            images: media.images.clone(),
            supporting_media: media.supporting_media.clone(),
            tags: read_tags(phase, &media.tag_fields),
        }
    }
}
