//! Ordered filename rule table for model classification

use crate::config::ModelRuleConfig;
use regex::Regex;
use showcase_core::{MediaFile, MediaRole, Result, ShowcaseError};

/// One pattern → model mapping
#[derive(Debug, Clone)]
pub struct ModelRule {
    pattern: Regex,
    model: String,
}

impl ModelRule {
    pub fn new(pattern: &str, model: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            ShowcaseError::Config(format!("invalid model rule pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern,
            model: model.into(),
        })
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.pattern.is_match(filename)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Rules evaluated in order; the first match decides the model
#[derive(Debug, Clone, Default)]
pub struct ModelRuleTable {
    rules: Vec<ModelRule>,
}

impl ModelRuleTable {
    pub fn new(rules: Vec<ModelRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(rules: &[ModelRuleConfig]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| ModelRule::new(&rule.pattern, rule.model.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn model_for(&self, filename: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(filename))
            .map(ModelRule::model)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The three facts a media filename must yield to join the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub model: &'a str,
    pub role: MediaRole,
    pub raw_id: &'a str,
    pub number: u64,
}

/// Classify a file, or `None` if model, role or sample id is missing
pub fn classify<'a>(table: &'a ModelRuleTable, file: &'a MediaFile) -> Option<Classification<'a>> {
    let model = table.model_for(file.filename())?;
    let role = file.role()?;
    let raw_id = file.raw_sample_id()?;
    let number = raw_id.parse().ok()?;

    Some(Classification {
        model,
        role,
        raw_id,
        number,
    })
}
