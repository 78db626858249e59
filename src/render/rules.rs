//! Benchmark-specific reshaping applied in memory before rendering

use crate::config::RenderRuleConfig;
use rand::seq::SliceRandom;
use rand::RngCore;
use showcase_core::{Benchmark, BenchmarkKind, Manifest, Model, ModelContent, Sample};
use std::fmt;
use tracing::debug;

/// A named presentation rule bound to one benchmark id
pub trait ReshapeRule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Id of the benchmark this rule reshapes
    fn benchmark(&self) -> &str;

    fn apply(&self, benchmark: &mut Benchmark, rng: &mut dyn RngCore);
}

/// Moves fixed sample ids to the front, then models holding them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityReorder {
    benchmark: String,
    priority_ids: Vec<String>,
}

impl PriorityReorder {
    pub fn new(benchmark: impl Into<String>, priority_ids: Vec<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            priority_ids,
        }
    }

    fn rank(&self, id: &str) -> Option<usize> {
        self.priority_ids.iter().position(|p| p == id)
    }

    pub fn has_priority(&self, model: &Model) -> bool {
        model
            .flat_samples()
            .map(|samples| samples.iter().any(|s| self.rank(&s.id).is_some()))
            .unwrap_or(false)
    }

    /// Priority samples first in priority order, the rest keep their order
    pub fn reorder_samples(&self, samples: &mut [Sample]) {
        samples.sort_by_key(|s| self.rank(&s.id).unwrap_or(usize::MAX));
    }

    /// Models with a priority sample sort before those without, stably
    pub fn reorder_models(&self, models: &mut [Model]) {
        models.sort_by_key(|m| !self.has_priority(m));
    }
}

impl ReshapeRule for PriorityReorder {
    fn name(&self) -> &'static str {
        "priority-reorder"
    }

    fn benchmark(&self) -> &str {
        &self.benchmark
    }

    fn apply(&self, benchmark: &mut Benchmark, _rng: &mut dyn RngCore) {
        for model in &mut benchmark.models {
            if let ModelContent::Flat(samples) = &mut model.content {
                self.reorder_samples(samples);
            }
        }
        self.reorder_models(&mut benchmark.models);
    }
}

/// Renders a categorized benchmark as one shuffled flat list per model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFlatten {
    benchmark: String,
}

impl CategoryFlatten {
    pub fn new(benchmark: impl Into<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
        }
    }
}

impl ReshapeRule for CategoryFlatten {
    fn name(&self) -> &'static str {
        "category-flatten"
    }

    fn benchmark(&self) -> &str {
        &self.benchmark
    }

    fn apply(&self, benchmark: &mut Benchmark, rng: &mut dyn RngCore) {
        benchmark.kind = BenchmarkKind::Flat;

        for model in &mut benchmark.models {
            let merged: Option<Vec<Sample>> = match &mut model.content {
                ModelContent::Categorized(categories) => Some(
                    std::mem::take(categories)
                        .into_iter()
                        .flat_map(|c| c.samples)
                        .collect(),
                ),
                ModelContent::Flat(_) => None,
            };

            if let Some(mut samples) = merged {
                samples.shuffle(rng);
                model.content = ModelContent::Flat(samples);
            }
        }
    }
}

/// Ordered collection of rules applied to a manifest
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn ReshapeRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(rules: &[RenderRuleConfig]) -> Self {
        let mut set = Self::new();
        for rule in rules {
            match rule {
                RenderRuleConfig::PriorityReorder {
                    benchmark,
                    priority_ids,
                } => set.push(PriorityReorder::new(benchmark.clone(), priority_ids.clone())),
                RenderRuleConfig::CategoryFlatten { benchmark } => {
                    set.push(CategoryFlatten::new(benchmark.clone()))
                }
            }
        }
        set
    }

    pub fn push(&mut self, rule: impl ReshapeRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule, in order, to the benchmarks it names
    pub fn apply(&self, manifest: &mut Manifest, rng: &mut dyn RngCore) {
        for benchmark in &mut manifest.benchmarks {
            let id = benchmark.id.clone();
            for rule in self.rules.iter().filter(|r| r.benchmark() == id) {
                debug!("Applying {} to {}", rule.name(), benchmark.id);
                rule.apply(benchmark, rng);
            }
        }
    }
}
