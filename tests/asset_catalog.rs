use diorama_engine::assets::AssetCatalog;
use diorama_engine::events::{EventBus, StageEvent};
use image::{Rgba, RgbaImage};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn wait_until_settled(catalog: &mut AssetCatalog, events: &mut EventBus) {
    for _ in 0..500 {
        catalog.poll(events);
        if catalog.all_settled() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("asset loads did not settle in time");
}

#[test]
fn texture_loads_resolve_off_thread() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("frame.png");
    let image = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]));
    image.save(&path).expect("write fixture png");

    let mut events = EventBus::default();
    let mut catalog = AssetCatalog::new();
    catalog.request_texture("frame", &path);
    wait_until_settled(&mut catalog, &mut events);

    let texture = catalog.texture("frame").expect("texture loaded");
    assert_eq!((texture.width, texture.height), (4, 2));
    assert_eq!(texture.pixels.len(), 4 * 2 * 4);
    assert_eq!(catalog.failed_count(), 0);

    let drained = events.drain();
    assert!(drained.iter().any(|event| matches!(event, StageEvent::AssetLoaded { key } if key == "frame")));
}

#[test]
fn model_loads_resolve_off_thread() {
    let mut events = EventBus::default();
    let mut catalog = AssetCatalog::new();
    catalog.request_model("spinner", "tests/fixtures/spinner.gltf");
    wait_until_settled(&mut catalog, &mut events);

    let model = catalog.model("spinner").expect("model loaded");
    assert_eq!(model.clips.len(), 1);
}

#[test]
fn failed_loads_settle_without_wedging_the_gate() {
    let mut events = EventBus::default();
    let mut catalog = AssetCatalog::new();
    catalog.request_texture("missing", "does/not/exist.png");
    catalog.request_model("also_missing", "does/not/exist.gltf");
    wait_until_settled(&mut catalog, &mut events);

    assert_eq!(catalog.failed_count(), 2);
    assert_eq!(catalog.loaded_count(), 0);
    assert!(catalog.texture("missing").is_none());

    let drained = events.drain();
    let failures = drained
        .iter()
        .filter(|event| matches!(event, StageEvent::AssetFailed { .. }))
        .count();
    assert_eq!(failures, 2, "each failure is reported");

    // The gate still opens: a bad asset degrades the scene, it does not
    // keep the orchestrator in Loading forever.
    assert!(catalog.take_all_ready(&mut events));
    assert!(!catalog.take_all_ready(&mut events), "the ready signal is one-shot");
    let drained = events.drain();
    assert!(drained
        .iter()
        .any(|event| matches!(event, StageEvent::AllAssetsReady { loaded: 0, failed: 2 })));
}

#[test]
fn ready_gate_waits_for_every_tracked_load() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("frame.png");
    let image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
    image.save(&path).expect("write fixture png");

    let mut events = EventBus::default();
    let mut catalog = AssetCatalog::new();
    catalog.request_texture("a", &path);
    catalog.request_texture("b", &path);

    // Nothing polled yet, so nothing has settled.
    assert!(!catalog.take_all_ready(&mut events));

    wait_until_settled(&mut catalog, &mut events);
    assert!(catalog.take_all_ready(&mut events));
    assert_eq!(catalog.loaded_count(), 2);
}
