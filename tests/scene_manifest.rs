use diorama_engine::scene::{ClipPlaybackData, StageManifest};
use tempfile::TempDir;

#[test]
fn demo_manifest_round_trips_through_json() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("stage.json");

    let manifest = StageManifest::demo();
    manifest.save(&path).expect("save manifest");
    let loaded = StageManifest::load(&path).expect("load manifest");

    assert_eq!(loaded.flipbooks.len(), manifest.flipbooks.len());
    assert_eq!(loaded.flipbooks[0].frames.count, 35);
    assert_eq!(loaded.flipbooks[0].hold, 48);
    assert_eq!(loaded.convoy.control_points.len(), 10);
    assert_eq!(loaded.convoy.instances, 3);
    assert_eq!(loaded.swarm.count, 10);
    assert_eq!(loaded.clip_models.len(), 2);
    assert!(matches!(
        loaded.clip_models[1].playback,
        ClipPlaybackData::ByName { ref name } if name == "Animation"
    ));
    assert!((loaded.camera.fov_degrees - 75.0).abs() < f32::EPSILON);
}

#[test]
fn empty_document_fills_in_every_default() {
    let manifest: StageManifest = serde_json::from_str("{}").expect("parse empty manifest");
    assert_eq!(manifest.lighting.directionals.len(), 2);
    assert!((manifest.lighting.spot.intensity - 5.0).abs() < f32::EPSILON);
    assert!((manifest.lighting.spot.jitter.position_bias - 0.5).abs() < f32::EPSILON);
    assert_eq!(manifest.background.width, 2048);
    assert_eq!(manifest.background.stars, 300);
    assert!((manifest.convoy.loop_duration - 10.0).abs() < f32::EPSILON);
    assert!((manifest.camera.damping - 0.2).abs() < f32::EPSILON);
}

#[test]
fn partial_documents_keep_unrelated_defaults() {
    let manifest: StageManifest =
        serde_json::from_str(r#"{ "swarm": { "count": 4 }, "convoy": { "instances": 7 } }"#)
            .expect("parse partial manifest");
    assert_eq!(manifest.swarm.count, 4);
    assert!((manifest.swarm.bob_amplitude - 0.1).abs() < f32::EPSILON);
    assert_eq!(manifest.convoy.instances, 7);
    assert_eq!(manifest.convoy.control_points.len(), 10);
}

#[test]
fn load_or_default_falls_back_on_missing_or_bad_files() {
    let dir = TempDir::new().expect("create temp dir");

    let missing = dir.path().join("nowhere.json");
    let manifest = StageManifest::load_or_default(&missing);
    assert_eq!(manifest.swarm.count, 10);

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").expect("write broken manifest");
    assert!(StageManifest::load(&broken).is_err());
    let manifest = StageManifest::load_or_default(&broken);
    assert_eq!(manifest.flipbooks.len(), 1);
}
