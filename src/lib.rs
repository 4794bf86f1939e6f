//! specboard: one project-health view from journeys, feature scenarios, and use cases
//!
//! The engine reads three independently authored specification sources, cross-references
//! them with an externally produced test-results snapshot and the working tree's git state,
//! and classifies every scenario and outcome into a small status lattice. A sync pass keeps
//! journeys and their linked scenario files in step through a content-hash manifest.

pub mod cli;
pub mod config;
pub mod domain;
pub mod journey;
pub mod locate;
pub mod manifest;
pub mod render;
pub mod schema;
pub mod status;
pub mod sync;
pub mod usecase;
pub mod utils;

pub use config::{load_config, Config, ProjectLayout};
pub use domain::{OutcomeStatus, ProjectStatus, ScenarioStatus};
pub use status::project_status;
pub use sync::{sync_journeys, SyncError, SyncOptions, SyncReport};
