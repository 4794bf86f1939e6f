//! Shared helpers

pub mod files;
pub mod hashing;
pub mod paths;

pub use files::{modified_time, read_text, split_frontmatter};
pub use hashing::content_hash;
pub use paths::{display_relative, normalize_path};
