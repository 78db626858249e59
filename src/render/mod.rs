//! Comparison page rendering from a manifest

pub mod card;
pub mod dom;
pub mod rules;
pub mod runtime;
pub mod source;

pub use card::{comparison_card, handle_media_error, SyncBinding};
pub use dom::Element;
pub use rules::{CategoryFlatten, PriorityReorder, ReshapeRule, RuleSet};
pub use runtime::{bindings_script, player_script, BINDINGS_ELEMENT_ID};
pub use source::{ManifestFetcher, ManifestSource};

use crate::config::RendererConfig;
use rand::RngCore;
use showcase_core::{Benchmark, Manifest, ModelContent, Result, Sample};
use tracing::{error, info};

pub const NO_CONTENT_MESSAGE: &str = "No content available.";
pub const LOAD_ERROR_MESSAGE: &str =
    "Error loading content. Please ensure you are running this on a local server.";

/// Rendered `#content` tree plus the player pairs to keep in sync
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub content: Element,
    pub bindings: Vec<SyncBinding>,
}

impl RenderedPage {
    fn message(text: &str) -> Self {
        Self {
            content: content_root().child(Element::new("p").text(text)),
            bindings: Vec::new(),
        }
    }

    /// Wrap the content in a complete HTML document with the player wiring
    pub fn to_document(&self, title: &str, stylesheet: Option<&str>) -> Result<String> {
        let mut head = Element::new("head")
            .child(Element::new("meta").attr("charset", "utf-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .child(Element::new("title").text(title));
        if let Some(href) = stylesheet {
            head.append_child(Element::new("link").attr("rel", "stylesheet").attr("href", href));
        }

        let body = Element::new("body")
            .child(self.content.clone())
            .child(bindings_script(&self.bindings)?)
            .child(player_script()?);

        let html = Element::new("html").attr("lang", "en").child(head).child(body);

        Ok(format!("<!DOCTYPE html>\n{}\n", html.to_html()))
    }
}

fn content_root() -> Element {
    Element::new("div").attr("id", "content")
}

/// Turns a manifest into the comparison DOM
#[derive(Debug, Default)]
pub struct Renderer {
    rules: RuleSet,
}

impl Renderer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(RuleSet::from_config(&config.rules))
    }

    /// Fetch once and render, falling back to a message on any fetch failure
    pub async fn render_from<R: RngCore>(
        &self,
        fetcher: &dyn ManifestFetcher,
        rng: &mut R,
    ) -> RenderedPage {
        match fetcher.fetch_manifest().await {
            Ok(manifest) => self.render(manifest, rng),
            Err(e) => {
                error!("Error fetching data: {}", e);
                RenderedPage::message(LOAD_ERROR_MESSAGE)
            }
        }
    }

    /// Apply reshaping rules and build one section per benchmark
    pub fn render(&self, mut manifest: Manifest, rng: &mut dyn RngCore) -> RenderedPage {
        if manifest.is_empty() {
            return RenderedPage::message(NO_CONTENT_MESSAGE);
        }

        self.rules.apply(&mut manifest, rng);

        let mut content = content_root();
        let mut cards = CardCounter::default();

        for (index, benchmark) in manifest.benchmarks.iter().enumerate() {
            content.append_child(benchmark_section(benchmark, index, &mut cards));
        }

        info!(
            "🎬 Rendered {} benchmarks, {} cards, {} synced pairs",
            manifest.benchmarks.len(),
            cards.next,
            cards.bindings.len()
        );

        RenderedPage {
            content,
            bindings: cards.bindings,
        }
    }
}

/// Numbers cards page-wide so player ids stay unique
#[derive(Default)]
struct CardCounter {
    next: usize,
    bindings: Vec<SyncBinding>,
}

fn grid<'a>(samples: impl IntoIterator<Item = &'a Sample>, cards: &mut CardCounter) -> Element {
    let mut grid = Element::with_class("div", "grid");
    for sample in samples {
        let (card, binding) = comparison_card(sample, cards.next);
        cards.next += 1;
        cards.bindings.extend(binding);
        grid.append_child(card);
    }
    grid
}

fn benchmark_section(benchmark: &Benchmark, index: usize, cards: &mut CardCounter) -> Element {
    let mut section = Element::with_class("div", "benchmark-section")
        .attr("style", format!("animation-delay: {}s", index as f64 * 0.1))
        .child(Element::with_class("h2", "benchmark-title").text(benchmark.title.as_str()));

    for model in &benchmark.models {
        let mut model_div =
            Element::with_class("div", "model-section").attr("data-model", model.id.as_str());

        match &model.content {
            ModelContent::Categorized(categories) => {
                for category in categories {
                    let category_grid = grid(&category.samples, cards)
                        .attr("data-category", category.name.as_str());
                    model_div.append_child(category_grid);
                }
            }
            ModelContent::Flat(samples) => model_div.append_child(grid(samples, cards)),
        }

        section.append_child(model_div);
    }

    section
}
