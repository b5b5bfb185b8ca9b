#![allow(dead_code)]

use std::collections::HashSet;

use nuggets_media_core::{MediaKind, SupportingMediaItem};

/// No images
pub const NONE: &[&str] = &[];

/// Owned set from string literals
pub fn set(urls: &[&str]) -> HashSet<String> {
    urls.iter().map(|url| url.to_string()).collect()
}

/// Image attachments flagged for the masonry layout
pub fn masonry(urls: &[&str]) -> Vec<SupportingMediaItem> {
    urls.iter()
        .map(|url| SupportingMediaItem::image(*url).in_masonry(None))
        .collect()
}

pub fn link(url: &str) -> SupportingMediaItem {
    SupportingMediaItem::new(MediaKind::Link, url)
}

/// Reference variants a user might paste for the same few images
pub fn sample_references() -> Vec<&'static str> {
    vec![
        "https://cdn.example.com/a.jpg",
        "HTTPS://CDN.EXAMPLE.COM/A.JPG",
        "https://cdn.example.com/a.jpg?w=640",
        "https://cdn.example.com/a.jpg#hero",
        "  https://cdn.example.com/b.png  ",
        "https://cdn.example.com/B.png?v=2",
        "uploads/c.webp",
        "UPLOADS/C.WEBP",
        "uploads/c.webp?x=1",
        "",
        "   ",
        "not a url at all",
        "foo:bar ?x",
        "foo:bar #x",
    ]
}
