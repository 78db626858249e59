//! Media file naming convention: `<leadingInteger>_<...>[BASE|OURS]<...>.<ext>`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Which side of the comparison a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaRole {
    Base,
    Ours,
}

impl MediaRole {
    /// Literal filename marker for this role
    pub fn marker(&self) -> &'static str {
        match self {
            MediaRole::Base => "[BASE]",
            MediaRole::Ours => "[OURS]",
        }
    }

    /// Detect the role from a filename; `[BASE]` wins if both markers appear
    pub fn from_filename(filename: &str) -> Option<Self> {
        [MediaRole::Base, MediaRole::Ours]
            .into_iter()
            .find(|role| filename.contains(role.marker()))
    }
}

fn leading_id_regex() -> &'static Regex {
    static LEADING_ID: OnceLock<Regex> = OnceLock::new();
    LEADING_ID.get_or_init(|| Regex::new(r"^(\d+)_").expect("leading id pattern is valid"))
}

/// Digits before the first `_` at the start of a filename
pub fn leading_sample_id(filename: &str) -> Option<&str> {
    leading_id_regex()
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// MIME hint for a media source path
pub fn media_type_for(src: &str) -> &'static str {
    if src.ends_with(".webm") {
        "video/webm"
    } else {
        "video/mp4"
    }
}

/// A media file discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    path: PathBuf,
    filename: String,
}

impl MediaFile {
    pub fn new(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, filename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn role(&self) -> Option<MediaRole> {
        MediaRole::from_filename(&self.filename)
    }

    /// Leading digits as written, zero padding kept
    pub fn raw_sample_id(&self) -> Option<&str> {
        leading_sample_id(&self.filename)
    }

    /// Leading digits as a number
    pub fn sample_number(&self) -> Option<u64> {
        self.raw_sample_id().and_then(|id| id.parse().ok())
    }

    /// Check the extension against a list like `["mp4", "webm"]`
    pub fn has_extension(&self, extensions: &[String]) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_detection() {
        assert_eq!(MediaRole::from_filename("07_clip[BASE].mp4"), Some(MediaRole::Base));
        assert_eq!(MediaRole::from_filename("07_clip[OURS].mp4"), Some(MediaRole::Ours));
        assert_eq!(MediaRole::from_filename("07_clip[base].mp4"), None);
        assert_eq!(MediaRole::from_filename("07_[OURS]_[BASE].mp4"), Some(MediaRole::Base));
    }

    #[test]
    fn test_leading_sample_id() {
        assert_eq!(leading_sample_id("07_clipA[BASE].mp4"), Some("07"));
        assert_eq!(leading_sample_id("122_wan[OURS].mp4"), Some("122"));
        assert_eq!(leading_sample_id("clip_07[BASE].mp4"), None);
        assert_eq!(leading_sample_id("07clip[BASE].mp4"), None);
    }

    #[test]
    fn test_media_type_hint() {
        assert_eq!(media_type_for("samples/a.webm"), "video/webm");
        assert_eq!(media_type_for("samples/a.mp4"), "video/mp4");
        assert_eq!(media_type_for("samples/a.mov"), "video/mp4");
    }

    #[test]
    fn test_extension_filter() {
        let exts = vec!["mp4".to_string()];
        assert!(MediaFile::new(PathBuf::from("a/1_x.mp4")).has_extension(&exts));
        assert!(MediaFile::new(PathBuf::from("a/1_x.MP4")).has_extension(&exts));
        assert!(!MediaFile::new(PathBuf::from("a/1_x.webm")).has_extension(&exts));
        assert!(!MediaFile::new(PathBuf::from("a/notes")).has_extension(&exts));
    }

    #[test]
    fn test_sample_number_drops_padding() {
        let file = MediaFile::new(PathBuf::from("samples/007_wan[BASE].mp4"));
        assert_eq!(file.raw_sample_id(), Some("007"));
        assert_eq!(file.sample_number(), Some(7));
        assert_eq!(file.role(), Some(MediaRole::Base));
    }
}
