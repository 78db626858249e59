//! Newline-delimited prompt lists, line N belongs to sample id N

use showcase_core::PROMPT_NOT_FOUND;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptList {
    lines: Vec<String>,
}

impl PromptList {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(|line| line.trim().to_string()).collect(),
        }
    }

    /// Read a prompt file; a missing or unreadable file yields an empty list
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let prompts = Self::parse(&content);
                debug!("Loaded {} prompt lines from {}", prompts.len(), path.display());
                prompts
            }
            Err(e) => {
                warn!("Error reading prompts from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Prompt for a 1-based sample id, or the sentinel if absent or blank
    pub fn lookup(&self, id: u64) -> &str {
        id.checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
            .filter(|line| !line.is_empty())
            .unwrap_or(PROMPT_NOT_FOUND)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
