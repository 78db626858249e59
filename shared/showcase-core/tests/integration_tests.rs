use showcase_core::{Benchmark, BenchmarkKind, Category, Manifest, Model, Sample, ShowcaseError};
use tempfile::TempDir;

fn physics_iq() -> Benchmark {
    let mut sample = Sample::new("07", "A ball rolls down a ramp");
    sample.category = Some("Mechanics".to_string());
    sample.base = Some("samples/Physics-IQ/Mechanics/07_wan[BASE].mp4".to_string());

    Benchmark {
        id: "physics-iq".to_string(),
        title: "Physics-IQ".to_string(),
        kind: BenchmarkKind::Categorized,
        models: vec![Model::categorized(
            "wan",
            "Wan",
            vec![Category { name: "Mechanics".to_string(), samples: vec![sample] }],
        )],
    }
}

#[test]
fn test_manifest_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("videos.json");

    let manifest = Manifest { benchmarks: vec![physics_iq()] };
    manifest.save(&path).unwrap();

    let loaded = Manifest::load(&path).unwrap();
    assert_eq!(loaded, manifest);
    assert_eq!(loaded.sample_count(), 1);
}

#[test]
fn test_manifest_pretty_output_shape() {
    let manifest = Manifest { benchmarks: vec![physics_iq()] };
    let json = manifest.to_pretty_json().unwrap();

    assert!(json.starts_with("{\n  \"benchmarks\": [\n    {\n      \"id\": \"physics-iq\""));
    assert!(json.contains("\"type\": \"categorized\""));
    assert!(json.contains("\"ours\": null"));
    let category_at = json.find("\"category\": \"Mechanics\"").unwrap();
    let base_at = json.find("\"base\":").unwrap();
    assert!(category_at < base_at);
}

#[test]
fn test_load_rejects_mismatched_model() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("videos.json");
    std::fs::write(
        &path,
        r#"{"benchmarks":[{"id":"phygenbench","title":"PhyGenBench","type":"flat",
            "models":[{"id":"wan","title":"Wan","categories":[]}]}]}"#,
    )
    .unwrap();

    let err = Manifest::load(&path).unwrap_err();
    assert!(matches!(err, ShowcaseError::InvalidManifest { .. }));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Manifest::load(&temp_dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ShowcaseError::Io(_)));
}
