//! Where the renderer reads its manifest from

use async_trait::async_trait;
use showcase_core::{Manifest, Result, ShowcaseError};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Anything that can produce a manifest with a single fetch
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    async fn fetch_manifest(&self) -> Result<Manifest>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(PathBuf),
    Http(Url),
}

impl ManifestSource {
    /// `http://` and `https://` locations are URLs, anything else a path
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location).map_err(|e| {
                ShowcaseError::Config(format!("invalid manifest URL '{}': {}", location, e))
            })?;
            Ok(ManifestSource::Http(url))
        } else {
            Ok(ManifestSource::File(PathBuf::from(location)))
        }
    }

    async fn fetch_text(&self) -> Result<String> {
        match self {
            ManifestSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            ManifestSource::Http(url) => {
                let response = reqwest::get(url.clone())
                    .await
                    .map_err(|e| ShowcaseError::Fetch(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ShowcaseError::Fetch(format!("{} returned {}", url, status)));
                }

                response
                    .text()
                    .await
                    .map_err(|e| ShowcaseError::Fetch(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl ManifestFetcher for ManifestSource {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        debug!("Fetching manifest from {}", self);
        let text = self.fetch_text().await?;
        Manifest::from_json(&text)
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::File(path) => write!(f, "{}", path.display()),
            ManifestSource::Http(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            ManifestSource::parse("data/videos.json").unwrap(),
            ManifestSource::File(PathBuf::from("data/videos.json"))
        );
        assert!(matches!(
            ManifestSource::parse("https://example.org/data/videos.json").unwrap(),
            ManifestSource::Http(_)
        ));
        assert!(ManifestSource::parse("http://[bad").is_err());
    }

    #[tokio::test]
    async fn test_file_fetch_validates_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("videos.json");
        tokio::fs::write(&path, r#"{"benchmarks":[]}"#).await.unwrap();

        let manifest = ManifestSource::File(path.clone()).fetch_manifest().await.unwrap();
        assert!(manifest.is_empty());

        tokio::fs::write(&path, r#"{"benchmarks":[{"id":"x"}]}"#).await.unwrap();
        assert!(ManifestSource::File(path).fetch_manifest().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let source = ManifestSource::File(PathBuf::from("/definitely/not/here/videos.json"));
        assert!(matches!(
            source.fetch_manifest().await,
            Err(ShowcaseError::Io(_))
        ));
    }
}
