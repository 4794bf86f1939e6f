//! Configuration loading and project layout
//!
//! Settings come from an explicit config file, an auto-discovered one at the project root,
//! or the built-in defaults, in that order.

pub mod layout;
pub mod loader;
pub mod settings;

pub use layout::ProjectLayout;
pub use loader::load_config;
pub use settings::{Config, ManifestPolicy};
