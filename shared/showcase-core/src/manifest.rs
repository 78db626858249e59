//! Manifest document shared by the builder and the renderer

use crate::{Result, ShowcaseError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Prompt text used when a sample has no matching prompt line
pub const PROMPT_NOT_FOUND: &str = "Prompt not found";

/// Root document: an ordered list of benchmarks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub benchmarks: Vec<Benchmark>,
}

/// How the models of a benchmark organize their samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkKind {
    Flat,
    Categorized,
}

impl BenchmarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkKind::Flat => "flat",
            BenchmarkKind::Categorized => "categorized",
        }
    }
}

/// Top-level grouping of models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Slug derived from the title
    pub id: String,

    /// Display name
    pub title: String,

    /// Declared layout; render rules may override it
    #[serde(rename = "type")]
    pub kind: BenchmarkKind,

    /// Models in configured order
    pub models: Vec<Model>,
}

/// A named model variant holding either flat samples or categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel")]
pub struct Model {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub content: ModelContent,
}

/// Exactly one of `samples` or `categories` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelContent {
    #[serde(rename = "samples")]
    Flat(Vec<Sample>),
    #[serde(rename = "categories")]
    Categorized(Vec<Category>),
}

/// Named grouping of samples inside a categorized model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub samples: Vec<Sample>,
}

/// One comparison unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Numeric id as text, may keep zero padding
    pub id: String,

    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Baseline media path
    pub base: Option<String>,

    /// PhaseLock media path
    pub ours: Option<String>,
}

#[derive(Deserialize)]
struct RawModel {
    id: String,
    title: String,
    #[serde(default)]
    samples: Option<Vec<Sample>>,
    #[serde(default)]
    categories: Option<Vec<Category>>,
}

impl TryFrom<RawModel> for Model {
    type Error = String;

    fn try_from(raw: RawModel) -> std::result::Result<Self, Self::Error> {
        let content = match (raw.samples, raw.categories) {
            (Some(samples), None) => ModelContent::Flat(samples),
            (None, Some(categories)) => ModelContent::Categorized(categories),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "model '{}' carries both `samples` and `categories`",
                    raw.id
                ))
            }
            (None, None) => {
                return Err(format!(
                    "model '{}' carries neither `samples` nor `categories`",
                    raw.id
                ))
            }
        };

        Ok(Model {
            id: raw.id,
            title: raw.title,
            content,
        })
    }
}

/// Derive a benchmark id from its display name.
///
/// Lowercases the name and replaces every character outside `[a-z0-9]`
/// with `-`, so `"Physics-IQ"` becomes `"physics-iq"`.
pub fn benchmark_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

impl Manifest {
    /// Parse a manifest and check its shape
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load and validate a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Two-space indented JSON with stable key order
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_pretty_json()?)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.benchmarks
            .iter()
            .flat_map(|b| b.models.iter())
            .map(Model::sample_count)
            .sum()
    }

    /// Check the invariants the renderer relies on
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for (b_idx, benchmark) in self.benchmarks.iter().enumerate() {
            let b_path = format!("benchmarks[{}]", b_idx);

            if benchmark.id.is_empty() {
                return Err(ShowcaseError::invalid(b_path, "empty benchmark id"));
            }
            if !seen.insert(benchmark.id.as_str()) {
                return Err(ShowcaseError::invalid(
                    b_path,
                    format!("duplicate benchmark id '{}'", benchmark.id),
                ));
            }

            for (m_idx, model) in benchmark.models.iter().enumerate() {
                let m_path = format!("{}.models[{}]", b_path, m_idx);

                match (&benchmark.kind, &model.content) {
                    (BenchmarkKind::Flat, ModelContent::Flat(samples)) => {
                        validate_samples(samples, &format!("{}.samples", m_path))?;
                    }
                    (BenchmarkKind::Categorized, ModelContent::Categorized(categories)) => {
                        for (c_idx, category) in categories.iter().enumerate() {
                            validate_samples(
                                &category.samples,
                                &format!("{}.categories[{}].samples", m_path, c_idx),
                            )?;
                        }
                    }
                    (kind, _) => {
                        return Err(ShowcaseError::invalid(
                            m_path,
                            format!(
                                "model '{}' content does not match benchmark type '{}'",
                                model.id,
                                kind.as_str()
                            ),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

fn validate_samples(samples: &[Sample], path: &str) -> Result<()> {
    for (idx, sample) in samples.iter().enumerate() {
        if sample.numeric_id().is_none() {
            return Err(ShowcaseError::invalid(
                format!("{}[{}]", path, idx),
                format!("sample id '{}' is not numeric", sample.id),
            ));
        }
    }
    Ok(())
}

impl Model {
    pub fn flat(id: impl Into<String>, title: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: ModelContent::Flat(samples),
        }
    }

    pub fn categorized(
        id: impl Into<String>,
        title: impl Into<String>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: ModelContent::Categorized(categories),
        }
    }

    /// Flat samples, or `None` for a categorized model
    pub fn flat_samples(&self) -> Option<&[Sample]> {
        match &self.content {
            ModelContent::Flat(samples) => Some(samples),
            ModelContent::Categorized(_) => None,
        }
    }

    /// Every sample regardless of layout
    pub fn all_samples(&self) -> Box<dyn Iterator<Item = &Sample> + '_> {
        match &self.content {
            ModelContent::Flat(samples) => Box::new(samples.iter()),
            ModelContent::Categorized(categories) => {
                Box::new(categories.iter().flat_map(|c| c.samples.iter()))
            }
        }
    }

    pub fn sample_count(&self) -> usize {
        self.all_samples().count()
    }
}

impl Sample {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            category: None,
            base: None,
            ours: None,
        }
    }

    /// Numeric value of the id, ignoring zero padding
    pub fn numeric_id(&self) -> Option<u64> {
        if self.id.is_empty() || !self.id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.id.parse().ok()
    }
}
