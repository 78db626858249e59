use phaselock_showcase::render::{SyncBinding, LOAD_ERROR_MESSAGE, NO_CONTENT_MESSAGE};
use phaselock_showcase::{Config, ConfigBuilder, ManifestBuilder, ManifestSource, Renderer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"mock video").unwrap();
}

fn select<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
    let selector = Selector::parse(css).unwrap();
    doc.select(&selector).collect()
}

fn build_fixture(root: &Path) -> std::path::PathBuf {
    let samples = root.join("samples");
    let phygen = samples.join("PhyGenBench");
    for id in ["1", "34", "70", "5"] {
        touch(&phygen.join(format!("{}_wan[BASE].mp4", id)));
        touch(&phygen.join(format!("{}_wan[OURS].mp4", id)));
    }
    touch(&phygen.join("2_cogvideox[BASE].mp4"));
    fs::write(
        samples.join("phygenbench.txt"),
        (1..=80).map(|i| format!("Prompt <{}> & more\n", i)).collect::<String>(),
    )
    .unwrap();

    let physics = samples.join("Physics-IQ");
    touch(&physics.join("Fluids").join("01_wan[BASE].mp4"));
    touch(&physics.join("Fluids").join("01_wan[OURS].mp4"));
    touch(&physics.join("Optics").join("03_wan[OURS].mp4"));

    let config = ConfigBuilder::new().with_samples_dir(samples).build();
    let output = root.join("data").join("videos.json");
    ManifestBuilder::new(&config.builder)
        .unwrap()
        .build_and_write(&output)
        .unwrap();
    output
}

#[tokio::test]
async fn test_end_to_end_page() {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = build_fixture(temp_dir.path());

    let config = Config::default();
    let renderer = Renderer::from_config(&config.renderer);
    let source = ManifestSource::File(manifest_path);
    let page = renderer.render_from(&source, &mut StdRng::seed_from_u64(3)).await;

    let html = page.to_document("PhaseLock", None).unwrap();
    let doc = Html::parse_document(&html);

    let titles: Vec<String> = select(&doc, "h2.benchmark-title")
        .iter()
        .map(|t| t.text().collect())
        .collect();
    assert_eq!(titles, vec!["PhyGenBench", "Physics-IQ"]);

    // priority samples lead the wan grid, wan sorts before cogvideox
    let sections = select(&doc, "div.benchmark-section");
    let first_model = sections[0]
        .select(&Selector::parse("div.model-section").unwrap())
        .next()
        .unwrap();
    assert_eq!(first_model.value().attr("data-model"), Some("wan"));
    let prompts: Vec<String> = first_model
        .select(&Selector::parse("div.comp-prompt").unwrap())
        .map(|p| p.text().collect())
        .collect();
    assert_eq!(
        prompts,
        vec!["Prompt <34> & more", "Prompt <70> & more", "Prompt <1> & more", "Prompt <5> & more"]
    );

    // flattened benchmark renders one grid per model
    let flattened_grids = sections[1]
        .select(&Selector::parse("div.model-section div.grid").unwrap())
        .count();
    assert_eq!(flattened_grids, 2);
    assert!(select(&doc, "div.grid[data-category]").is_empty());

    // cogvideox sample has only a baseline, so one placeholder
    let placeholders: Vec<String> = select(&doc, "div.video-placeholder")
        .iter()
        .map(|p| p.text().collect())
        .collect();
    assert!(placeholders.iter().all(|p| p == "Not Available"));
    assert_eq!(placeholders.len(), 2);

    // four paired phygenbench cards plus one paired physics-iq card
    assert_eq!(page.bindings.len(), 5);
    assert_eq!(select(&doc, "video[data-sync-pair]").len(), 10);
    assert!(select(&doc, "video")
        .iter()
        .all(|v| v.value().attr("preload") == Some("metadata")));
}

#[tokio::test]
async fn test_document_wires_every_synced_pair() {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = build_fixture(temp_dir.path());

    let renderer = Renderer::from_config(&Config::default().renderer);
    let page = renderer
        .render_from(&ManifestSource::File(manifest_path), &mut StdRng::seed_from_u64(11))
        .await;
    let doc = Html::parse_document(&page.to_document("PhaseLock", None).unwrap());

    let blocks = select(&doc, "script#sync-bindings[type=\"application/json\"]");
    assert_eq!(blocks.len(), 1);
    let json: String = blocks[0].text().collect();
    let bindings: Vec<SyncBinding> = serde_json::from_str(&json).unwrap();
    assert_eq!(bindings, page.bindings);

    let synced = select(&doc, "video[data-sync-pair]");
    assert_eq!(synced.len(), bindings.len() * 2);
    for video in &synced {
        let pair: usize = video.value().attr("data-sync-pair").unwrap().parse().unwrap();
        let id = video.value().attr("id").unwrap();
        let binding = bindings.iter().find(|b| b.pair == pair).unwrap();
        assert!(binding.first == id || binding.second == id, "{} not bound", id);
    }

    // unpaired players are left out of the bindings but still get the error fallback
    let unpaired = select(&doc, "video:not([data-sync-pair])");
    assert_eq!(unpaired.len(), 2);
    for video in &unpaired {
        let id = video.value().attr("id").unwrap();
        assert!(bindings.iter().all(|b| b.first != id && b.second != id));
    }

    let runtime: Vec<String> = select(&doc, "script:not([type])")
        .iter()
        .map(|s| s.text().collect())
        .collect();
    assert_eq!(runtime.len(), 1);
    let script = &runtime[0];
    assert!(script.contains("var TOLERANCE = 0.1;"));
    assert!(script.contains("var RELEASE_MS = 50;"));
    assert!(script.contains(r#""play","pause","seeking","seeked""#));
    assert!(script.contains(r#"var UNAVAILABLE = "Media Unavailable";"#));
    assert!(script.contains(r##"querySelectorAll("#content video")"##));
}

#[tokio::test]
async fn test_empty_manifest_shows_message() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("videos.json");
    fs::write(&path, r#"{"benchmarks": []}"#).unwrap();

    let page = Renderer::default()
        .render_from(&ManifestSource::File(path), &mut StdRng::seed_from_u64(0))
        .await;

    let doc = Html::parse_document(&page.to_document("PhaseLock", None).unwrap());
    let messages: Vec<String> = select(&doc, "#content p")
        .iter()
        .map(|p| p.text().collect())
        .collect();
    assert_eq!(messages, vec![NO_CONTENT_MESSAGE]);
}

#[tokio::test]
async fn test_malformed_manifest_shows_error_message() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("videos.json");
    fs::write(
        &path,
        r#"{"benchmarks":[{"id":"x","title":"X","type":"flat","models":[{"id":"wan","title":"Wan"}]}]}"#,
    )
    .unwrap();

    let page = Renderer::default()
        .render_from(&ManifestSource::File(path), &mut StdRng::seed_from_u64(0))
        .await;
    assert_eq!(page.content.text_content(), LOAD_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_missing_manifest_shows_error_message() {
    let temp_dir = TempDir::new().unwrap();
    let page = Renderer::default()
        .render_from(
            &ManifestSource::File(temp_dir.path().join("absent.json")),
            &mut StdRng::seed_from_u64(0),
        )
        .await;
    assert_eq!(page.content.text_content(), LOAD_ERROR_MESSAGE);
}
