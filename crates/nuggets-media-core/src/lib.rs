//! Core functionality for deduplicating and reconciling image references.
//!
//! This library provides the pieces behind composing and editing Nuggets posts:
//! - URL normalization and duplicate detection
//! - Create-mode deduplication of candidate images
//! - Edit-mode reconciliation against supporting media, backups and deletes
//! - Edit session bookkeeping over an injected key-value store

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use deduplication::{dedupe_for_create, detect, normalize, reconcile};
pub use error::{Error, Result};
pub use session::EditSession;
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod deduplication;
pub mod dto;
pub mod logging;
pub mod migration;
pub mod persistence;
pub mod request;
pub mod session;
pub mod types;
