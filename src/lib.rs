/// PhaseLock Showcase - Rust Implementation
///
/// Builds the benchmark comparison manifest from a samples directory and
/// renders it into a page of side-by-side, synchronized video players.

pub mod builder;
pub mod config;
pub mod render;
pub mod sync;

// Re-export main types for easy access
pub use crate::builder::{BuildReport, ManifestBuilder, ModelRuleTable, PromptList};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::render::{ManifestFetcher, ManifestSource, RenderedPage, Renderer, RuleSet};
pub use crate::sync::{
    MediaEvent, MediaPlayer, PairSide, SyncCoordinator, SyncOutcome, SyncRegistry,
};
pub use showcase_core::{Manifest, ShowcaseError};
