//! Image reference deduplication.
//!
//! Leaves first: [`normalize`] feeds [`detect`] and [`dedupe_for_create`], and
//! [`reconcile`] builds on all three.

mod create;
mod detect;
mod normalize;
mod reconcile;

pub use create::dedupe_for_create;
pub use detect::detect;
pub use normalize::{is_blank, normalize, normalize_opt};
pub use reconcile::reconcile;
