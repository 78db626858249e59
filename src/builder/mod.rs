//! Offline manifest generation from a samples directory tree

pub mod classify;
pub mod prompts;

pub use classify::{classify, Classification, ModelRule, ModelRuleTable};
pub use prompts::PromptList;

use crate::config::{BenchmarkConfig, BuilderConfig};
use serde::Serialize;
use showcase_core::{
    benchmark_slug, Benchmark, BenchmarkKind, Category, Manifest, MediaFile, MediaRole, Model,
    ModelContent, Result, Sample,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Counters collected while building a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub benchmarks_built: usize,
    pub benchmarks_skipped: Vec<String>,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub samples: usize,
    pub role_overwrites: usize,
}

/// Scans benchmark directories and assembles the manifest
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    samples_dir: PathBuf,
    media_extensions: Vec<String>,
    benchmarks: Vec<BenchmarkConfig>,
    rules: ModelRuleTable,
}

/// Samples of one model keyed by category (None for flat) then numeric id
struct ModelAccumulator {
    id: String,
    title: String,
    groups: BTreeMap<Option<String>, BTreeMap<u64, Sample>>,
}

impl ModelAccumulator {
    fn into_model(self, kind: BenchmarkKind) -> Model {
        let content = match kind {
            BenchmarkKind::Flat => ModelContent::Flat(
                self.groups
                    .into_values()
                    .flat_map(BTreeMap::into_values)
                    .collect(),
            ),
            BenchmarkKind::Categorized => ModelContent::Categorized(
                self.groups
                    .into_iter()
                    .filter_map(|(name, samples)| {
                        name.map(|name| Category {
                            name,
                            samples: samples.into_values().collect(),
                        })
                    })
                    .collect(),
            ),
        };

        Model {
            id: self.id,
            title: self.title,
            content,
        }
    }
}

impl ManifestBuilder {
    pub fn new(config: &BuilderConfig) -> Result<Self> {
        Ok(Self {
            samples_dir: config.samples_dir.clone(),
            media_extensions: config.media_extensions.clone(),
            benchmarks: config.benchmarks.clone(),
            rules: ModelRuleTable::from_config(&config.model_rules)?,
        })
    }

    pub fn samples_dir(&self) -> &Path {
        &self.samples_dir
    }

    /// Build the manifest for every configured benchmark
    pub fn build(&self) -> Result<(Manifest, BuildReport)> {
        let start_time = Instant::now();
        let mut report = BuildReport::default();
        let mut manifest = Manifest::default();

        info!("🔍 Scanning samples in {}", self.samples_dir.display());

        for bench_config in &self.benchmarks {
            match self.build_benchmark(bench_config, &mut report)? {
                Some(benchmark) => {
                    report.benchmarks_built += 1;
                    manifest.benchmarks.push(benchmark);
                }
                None => report.benchmarks_skipped.push(bench_config.name.clone()),
            }
        }

        report.samples = manifest.sample_count();

        info!(
            "📊 Built {} benchmarks with {} samples from {} files in {:.2}s",
            report.benchmarks_built,
            report.samples,
            report.files_scanned,
            start_time.elapsed().as_secs_f64()
        );

        Ok((manifest, report))
    }

    /// Build the manifest and write it as indented JSON
    pub fn build_and_write(&self, output: &Path) -> Result<BuildReport> {
        let (manifest, report) = self.build()?;
        manifest.save(output)?;
        info!("💾 Generated {}", output.display());
        Ok(report)
    }

    fn build_benchmark(
        &self,
        bench_config: &BenchmarkConfig,
        report: &mut BuildReport,
    ) -> Result<Option<Benchmark>> {
        let bench_path = self.samples_dir.join(&bench_config.name);
        if !bench_path.is_dir() {
            warn!("Benchmark directory not found: {}", bench_path.display());
            return Ok(None);
        }

        let prompts = PromptList::load(&self.samples_dir.join(&bench_config.prompt_file));

        let mut models: Vec<ModelAccumulator> = bench_config
            .models
            .iter()
            .map(|m| ModelAccumulator {
                id: m.id.clone(),
                title: m.title.clone(),
                groups: BTreeMap::new(),
            })
            .collect();

        let files: Vec<(Option<String>, MediaFile)> = match bench_config.kind {
            BenchmarkKind::Flat => self
                .scan_media(&bench_path)?
                .into_iter()
                .map(|file| (None, file))
                .collect(),
            BenchmarkKind::Categorized => {
                let mut files = Vec::new();
                for (category, category_path) in self.scan_categories(&bench_path)? {
                    for file in self.scan_media(&category_path)? {
                        files.push((Some(category.clone()), file));
                    }
                }
                files
            }
        };

        for (category, file) in &files {
            report.files_scanned += 1;

            let Some(facts) = classify(&self.rules, file) else {
                debug!("Skipping unclassified file: {}", file.path().display());
                report.files_skipped += 1;
                continue;
            };

            let Some(model) = models.iter_mut().find(|m| m.id == facts.model) else {
                debug!(
                    "Skipping {}: model '{}' not part of {}",
                    file.filename(),
                    facts.model,
                    bench_config.name
                );
                report.files_skipped += 1;
                continue;
            };

            let sample_id = match bench_config.kind {
                BenchmarkKind::Flat => facts.number.to_string(),
                BenchmarkKind::Categorized => facts.raw_id.to_string(),
            };

            let sample = model
                .groups
                .entry(category.clone())
                .or_default()
                .entry(facts.number)
                .or_insert_with(|| Sample {
                    id: sample_id,
                    prompt: prompts.lookup(facts.number).to_string(),
                    category: category.clone(),
                    base: None,
                    ours: None,
                });

            let slot = match facts.role {
                MediaRole::Base => &mut sample.base,
                MediaRole::Ours => &mut sample.ours,
            };

            let media_path = file.path().to_string_lossy().to_string();
            if let Some(previous) = slot.replace(media_path) {
                warn!(
                    "Duplicate {:?} media for {} sample {}: {} replaces {}",
                    facts.role,
                    facts.model,
                    sample.id,
                    file.filename(),
                    previous
                );
                report.role_overwrites += 1;
            }
        }

        let benchmark = Benchmark {
            id: benchmark_slug(&bench_config.name),
            title: bench_config.name.clone(),
            kind: bench_config.kind,
            models: models
                .into_iter()
                .map(|m| m.into_model(bench_config.kind))
                .collect(),
        };

        info!(
            "📹 {}: {} samples across {} models",
            benchmark.title,
            benchmark.models.iter().map(Model::sample_count).sum::<usize>(),
            benchmark.models.len()
        );

        Ok(Some(benchmark))
    }

    /// Media files directly inside `dir`, in file-name order; symlinks are followed
    fn scan_media(&self, dir: &Path) -> Result<Vec<MediaFile>> {
        let mut media = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let file = MediaFile::new(entry.into_path());
            if file.has_extension(&self.media_extensions) {
                media.push(file);
            }
        }

        Ok(media)
    }

    /// Immediate subdirectories of `dir` as (category name, path)
    fn scan_categories(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        let mut categories = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy().to_string();
                categories.push((name, entry.into_path()));
            }
        }

        Ok(categories)
    }
}
