use serde::{Deserialize, Serialize};

/// An image reference is just its URL string
pub type ImageReference = String;

/// Kind of a supporting media attachment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Link,
    Video,
    Document,
    Other(String),
}

impl MediaKind {
    /// Parse a kind from its wire name, keeping unknown kinds verbatim
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "image" => Self::Image,
            "link" => Self::Link,
            "video" => Self::Video,
            "document" => Self::Document,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Wire name of the kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::Image => "image",
            Self::Link => "link",
            Self::Video => "video",
            Self::Document => "document",
            Self::Other(name) => name,
        }
    }

    /// Only image attachments take part in pruning
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image)
    }
}

impl Serialize for MediaKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// A media attachment owned by a post, optionally shown in the masonry layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingMediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,

    pub url: ImageReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_masonry: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masonry_title: Option<String>,
}

impl SupportingMediaItem {
    /// Image attachment with no masonry settings
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            url: url.into(),
            show_in_masonry: None,
            masonry_title: None,
        }
    }

    /// Attachment of any kind with no masonry settings
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            show_in_masonry: None,
            masonry_title: None,
        }
    }

    /// Flag the attachment for the masonry layout
    pub fn in_masonry(mut self, title: Option<&str>) -> Self {
        self.show_in_masonry = Some(true);
        self.masonry_title = title.map(str::to_string);
        self
    }
}

/// An input reference paired with its normalized form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPair {
    pub original: ImageReference,
    pub normalized: String,
}

/// Why two references were considered the same image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKind {
    /// The references differ only in letter case
    CaseInsensitive,

    /// The references differ beyond case, usually in query string or fragment
    QueryParams,
}

/// One detected duplicate relationship between two inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEntry {
    pub original_a: ImageReference,
    pub original_b: ImageReference,

    #[serde(rename = "type")]
    pub kind: DuplicateKind,
}

/// Output of duplicate detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub duplicates: Vec<DuplicateEntry>,
    pub normalized_pairs: Vec<NormalizedPair>,
}

/// What happened to a candidate reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogAction {
    Preserved,
    Removed,
    Moved,
    Restored,
    Deleted,
}

/// Why it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogReason {
    Unique,
    Duplicate,
    SupportingMedia,
    Backup,
    ExplicitDelete,
}

/// Audit record of a single decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: LogAction,
    pub reason: LogReason,
    pub value: ImageReference,
}

impl LogEntry {
    pub fn new(action: LogAction, reason: LogReason, value: impl Into<String>) -> Self {
        Self {
            action,
            reason,
            value: value.into(),
        }
    }
}

/// Output of create-mode deduplication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupeOutcome {
    /// First occurrence of every distinct image, original casing
    pub deduplicated: Vec<ImageReference>,

    /// Later occurrences that collapsed onto a kept entry
    pub removed: Vec<ImageReference>,

    /// Number of blank entries dropped before deduplication
    #[serde(skip)]
    pub filtered: usize,

    pub logs: Vec<LogEntry>,
}

/// Output of edit-mode reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Final plain image list
    pub deduplicated: Vec<ImageReference>,

    /// Candidates dropped as duplicates of another candidate
    pub removed: Vec<ImageReference>,

    /// Candidates now living in supporting media
    pub moved_to_supporting: Vec<ImageReference>,

    /// Backup entries brought back into the plain list
    pub restored: Vec<ImageReference>,

    /// Candidates excluded because the user deleted them
    pub deleted: Vec<ImageReference>,

    pub logs: Vec<LogEntry>,
}
