use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use showcase_core::BenchmarkKind;
use std::path::{Path, PathBuf};

/// Configuration for the PhaseLock showcase tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Manifest builder settings
    pub builder: BuilderConfig,

    /// Comparison renderer settings
    pub renderer: RendererConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Root directory holding one directory per benchmark plus prompt files
    pub samples_dir: PathBuf,

    /// Where the manifest is written
    pub output_file: PathBuf,

    /// Recognized media file extensions
    pub media_extensions: Vec<String>,

    /// Benchmarks in manifest order
    pub benchmarks: Vec<BenchmarkConfig>,

    /// Ordered filename rules mapping to model ids, first match wins
    pub model_rules: Vec<ModelRuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Directory name under `samples_dir`, also used as the title
    pub name: String,

    /// Declared layout
    #[serde(rename = "type")]
    pub kind: BenchmarkKind,

    /// Prompt file under `samples_dir`, one prompt per line
    pub prompt_file: String,

    /// Models in output order
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRuleConfig {
    /// Regular expression matched against the filename
    pub pattern: String,

    /// Model id assigned on match
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Manifest location, a file path or an http(s) URL
    pub manifest: String,

    /// Where the rendered page is written
    pub output_file: PathBuf,

    /// Document title of the rendered page
    pub page_title: String,

    /// Stylesheet linked from the rendered page
    pub stylesheet: Option<String>,

    /// Reshaping rules applied before rendering
    pub rules: Vec<RenderRuleConfig>,
}

/// Benchmark-specific reshaping rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum RenderRuleConfig {
    /// Promote fixed sample ids to the front
    PriorityReorder {
        benchmark: String,
        priority_ids: Vec<String>,
    },

    /// Merge categories into one shuffled flat list
    CategoryFlatten { benchmark: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter directive
    pub level: String,
}

impl Config {
    /// Load configuration from an explicit file or the default locations
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let mut config = Self::from_file(path)?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let config_paths = [
            "phaselock-showcase.toml",
            "config/phaselock-showcase.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env_overrides();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Cannot parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(samples_dir) = std::env::var("SHOWCASE_SAMPLES_DIR") {
            self.builder.samples_dir = PathBuf::from(samples_dir);
        }

        if let Ok(output_file) = std::env::var("SHOWCASE_OUTPUT_FILE") {
            self.builder.output_file = PathBuf::from(output_file);
        }

        if let Ok(manifest) = std::env::var("SHOWCASE_MANIFEST") {
            self.renderer.manifest = manifest;
        }

        if let Ok(log_level) = std::env::var("SHOWCASE_LOG_LEVEL") {
            self.logging.level = log_level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.builder.media_extensions.is_empty() {
            return Err(anyhow!("media_extensions must not be empty"));
        }

        if self.builder.benchmarks.is_empty() {
            return Err(anyhow!("at least one benchmark must be configured"));
        }

        if self.builder.model_rules.is_empty() {
            return Err(anyhow!("at least one model rule must be configured"));
        }

        for benchmark in &self.builder.benchmarks {
            if benchmark.models.is_empty() {
                return Err(anyhow!("benchmark '{}' has no models", benchmark.name));
            }
        }

        for rule in &self.builder.model_rules {
            Regex::new(&rule.pattern)
                .with_context(|| format!("invalid model rule pattern '{}'", rule.pattern))?;

            let known = self
                .builder
                .benchmarks
                .iter()
                .flat_map(|b| b.models.iter())
                .any(|m| m.id == rule.model);
            if !known {
                return Err(anyhow!(
                    "model rule '{}' targets unknown model '{}'",
                    rule.pattern,
                    rule.model
                ));
            }
        }

        if self.renderer.manifest.trim().is_empty() {
            return Err(anyhow!("renderer manifest location must not be empty"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "PhaseLock Showcase Configuration:\n\
            - Samples Directory: {}\n\
            - Manifest Output: {}\n\
            - Media Extensions: {}\n\
            - Benchmarks: {}\n\
            - Model Rules: {}\n\
            - Renderer Manifest: {}\n\
            - Renderer Output: {}\n\
            - Render Rules: {}",
            self.builder.samples_dir.display(),
            self.builder.output_file.display(),
            self.builder.media_extensions.join(", "),
            self.builder
                .benchmarks
                .iter()
                .map(|b| format!("{} ({})", b.name, b.kind.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            self.builder.model_rules.len(),
            self.renderer.manifest,
            self.renderer.output_file.display(),
            self.renderer.rules.len()
        )
    }
}

fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig {
            id: "wan".to_string(),
            title: "Wan".to_string(),
        },
        ModelConfig {
            id: "cogvideox".to_string(),
            title: "CogVideoX".to_string(),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            builder: BuilderConfig {
                samples_dir: PathBuf::from("samples"),
                output_file: PathBuf::from("data/videos.json"),
                media_extensions: vec!["mp4".to_string()],
                benchmarks: vec![
                    BenchmarkConfig {
                        name: "PhyGenBench".to_string(),
                        kind: BenchmarkKind::Flat,
                        prompt_file: "phygenbench.txt".to_string(),
                        models: default_models(),
                    },
                    BenchmarkConfig {
                        name: "Physics-IQ".to_string(),
                        kind: BenchmarkKind::Categorized,
                        prompt_file: "physics-iq.txt".to_string(),
                        models: default_models(),
                    },
                ],
                model_rules: vec![
                    ModelRuleConfig {
                        pattern: "_v9_lowfreq".to_string(),
                        model: "wan".to_string(),
                    },
                    ModelRuleConfig {
                        pattern: "_v9_s005".to_string(),
                        model: "cogvideox".to_string(),
                    },
                    ModelRuleConfig {
                        pattern: "(?i)wan".to_string(),
                        model: "wan".to_string(),
                    },
                    ModelRuleConfig {
                        pattern: "(?i)cogvideox".to_string(),
                        model: "cogvideox".to_string(),
                    },
                ],
            },
            renderer: RendererConfig {
                manifest: "data/videos.json".to_string(),
                output_file: PathBuf::from("index.html"),
                page_title: "PhaseLock: Video Comparisons".to_string(),
                stylesheet: Some("style.css".to_string()),
                rules: vec![
                    RenderRuleConfig::PriorityReorder {
                        benchmark: "phygenbench".to_string(),
                        priority_ids: vec!["34".to_string(), "70".to_string(), "122".to_string()],
                    },
                    RenderRuleConfig::CategoryFlatten {
                        benchmark: "physics-iq".to_string(),
                    },
                ],
            },
            logging: LoggingConfig {
                level: "phaselock_showcase=info,showcase_core=info,warn".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_samples_dir(mut self, dir: PathBuf) -> Self {
        self.config.builder.samples_dir = dir;
        self
    }

    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.config.builder.output_file = path;
        self
    }

    pub fn with_media_extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.builder.media_extensions = extensions;
        self
    }

    pub fn with_benchmarks(mut self, benchmarks: Vec<BenchmarkConfig>) -> Self {
        self.config.builder.benchmarks = benchmarks;
        self
    }

    pub fn with_model_rules(mut self, rules: Vec<ModelRuleConfig>) -> Self {
        self.config.builder.model_rules = rules;
        self
    }

    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.config.renderer.manifest = manifest.into();
        self
    }

    pub fn with_render_rules(mut self, rules: Vec<RenderRuleConfig>) -> Self {
        self.config.renderer.rules = rules;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.builder.samples_dir, PathBuf::from("samples"));
        assert_eq!(config.builder.output_file, PathBuf::from("data/videos.json"));
        assert_eq!(config.builder.benchmarks.len(), 2);
        assert_eq!(config.builder.benchmarks[1].kind, BenchmarkKind::Categorized);
        assert_eq!(config.builder.model_rules[0].pattern, "_v9_lowfreq");
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_samples_dir(PathBuf::from("/data/samples"))
            .with_media_extensions(vec!["mp4".to_string(), "webm".to_string()])
            .with_render_rules(Vec::new())
            .build();

        assert_eq!(config.builder.samples_dir, PathBuf::from("/data/samples"));
        assert_eq!(config.builder.media_extensions.len(), 2);
        assert!(config.renderer.rules.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_pattern() {
        let config = ConfigBuilder::new()
            .with_model_rules(vec![ModelRuleConfig {
                pattern: "([unclosed".to_string(),
                model: "wan".to_string(),
            }])
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_rule_target() {
        let config = ConfigBuilder::new()
            .with_model_rules(vec![ModelRuleConfig {
                pattern: "sora".to_string(),
                model: "sora".to_string(),
            }])
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_keeps_render_rules() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("rule = \"priority-reorder\""));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.renderer.rules, config.renderer.rules);
    }
}
