//! Showcase Core - Shared manifest data structures and media naming conventions

pub mod manifest;
pub mod media_file;

pub use manifest::{
    benchmark_slug, Benchmark, BenchmarkKind, Category, Manifest, Model, ModelContent, Sample,
    PROMPT_NOT_FOUND,
};
pub use media_file::{media_type_for, MediaFile, MediaRole};

/// Result type for Showcase Core operations
pub type Result<T> = std::result::Result<T, ShowcaseError>;

/// Error types for Showcase Core operations
#[derive(thiserror::Error, Debug)]
pub enum ShowcaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid manifest at {path}: {reason}")]
    InvalidManifest { path: String, reason: String },

    #[error("Failed to fetch manifest: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShowcaseError {
    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ShowcaseError::InvalidManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
