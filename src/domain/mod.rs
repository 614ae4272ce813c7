//! Domain layer: filter state, post ordering, and draft validation.

pub mod draft;
pub mod error;
pub mod filter;
pub mod posts;
pub mod slug;
