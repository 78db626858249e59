use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phaselock_showcase::{Config, ManifestBuilder, ManifestSource, Renderer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use showcase_core::Manifest;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phaselock-showcase")]
#[command(version, about = "Build and render the PhaseLock benchmark comparison page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the samples directory and write the manifest
    Build {
        /// Samples root containing benchmark directories and prompt files
        #[arg(long)]
        samples_dir: Option<PathBuf>,

        /// Manifest output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch the manifest and write the comparison page
    Render {
        /// Manifest file path or http(s) URL
        #[arg(short, long)]
        manifest: Option<String>,

        /// HTML output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the category shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a manifest file and summarize it
    Check {
        /// Manifest file path
        manifest: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("phaselock_showcase=debug,showcase_core=debug,info")
        } else {
            EnvFilter::new(&config.logging.level)
        }
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);
    debug!("{}", config.summary());

    match cli.command {
        Commands::Build {
            samples_dir,
            output,
        } => {
            let mut builder_config = config.builder.clone();
            if let Some(dir) = samples_dir {
                builder_config.samples_dir = dir;
            }
            let output = output.unwrap_or_else(|| builder_config.output_file.clone());

            config.validate()?;

            info!("🚀 PhaseLock manifest builder starting...");
            info!("📁 Samples directory: {}", builder_config.samples_dir.display());
            info!("📂 Output: {}", output.display());

            let builder = ManifestBuilder::new(&builder_config)?;
            let report = builder.build_and_write(&output)?;

            info!("✅ Benchmarks built: {}", report.benchmarks_built);
            if !report.benchmarks_skipped.is_empty() {
                warn!("⚠️  Benchmarks skipped: {}", report.benchmarks_skipped.join(", "));
            }
            info!("📹 Samples: {}", report.samples);
            info!(
                "🗂️  Files scanned: {} ({} skipped)",
                report.files_scanned, report.files_skipped
            );
            debug!("Build report: {}", serde_json::to_string(&report)?);
            if report.role_overwrites > 0 {
                warn!(
                    "⚠️  {} media files replaced an earlier file for the same sample",
                    report.role_overwrites
                );
            }
        }
        Commands::Render {
            manifest,
            output,
            seed,
        } => {
            let location = manifest.unwrap_or_else(|| config.renderer.manifest.clone());
            let output = output.unwrap_or_else(|| config.renderer.output_file.clone());
            let source = ManifestSource::parse(&location)?;

            info!("🌐 Loading manifest from {}", source);

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let renderer = Renderer::from_config(&config.renderer);
            let page = renderer.render_from(&source, &mut rng).await;
            let document = page.to_document(
                &config.renderer.page_title,
                config.renderer.stylesheet.as_deref(),
            )?;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&output, document)
                .await
                .with_context(|| format!("Cannot write {}", output.display()))?;

            info!(
                "💾 Page written to {} ({} synced pairs)",
                output.display(),
                page.bindings.len()
            );
        }
        Commands::Check { manifest } => {
            let path = manifest.unwrap_or_else(|| config.builder.output_file.clone());
            let manifest = Manifest::load(&path)
                .with_context(|| format!("Manifest {} is not valid", path.display()))?;

            info!("✅ {} is valid", path.display());
            for benchmark in &manifest.benchmarks {
                info!(
                    "📊 {} ({}, {}): {} models, {} samples",
                    benchmark.title,
                    benchmark.id,
                    benchmark.kind.as_str(),
                    benchmark.models.len(),
                    benchmark.models.iter().map(|m| m.sample_count()).sum::<usize>()
                );
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
