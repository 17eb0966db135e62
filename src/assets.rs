use crate::events::{EventBus, StageEvent};
use anyhow::{Context, Result};
use image::ImageReader;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

pub mod clips;

pub use clips::{ClipAsset, ModelAsset};

/// Decoded RGBA8 texture, shared by reference between the catalog, material
/// slots, and the flip-book animators.
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Clone)]
pub enum LoadedAsset {
    Texture(Arc<TextureAsset>),
    Model(Arc<ModelAsset>),
}

struct LoadOutcome {
    key: String,
    result: Result<LoadedAsset>,
}

/// Tracks every requested load and aggregates completions into a one-shot
/// "all settled" signal. Loads run on worker threads; completions are drained
/// on the tick thread via `poll`, so all shared state stays single-threaded.
/// A failed load is reported and its effect stays absent for the session; it
/// does not hold the gate closed.
pub struct AssetCatalog {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    pending: usize,
    loaded: HashMap<String, LoadedAsset>,
    failed: usize,
    ready_fired: bool,
}

impl AssetCatalog {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx, pending: 0, loaded: HashMap::new(), failed: 0, ready_fired: false }
    }

    pub fn request_texture(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let path = path.into();
        self.spawn(key.into(), move || load_texture(&path).map(LoadedAsset::Texture));
    }

    pub fn request_model(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let path = path.into();
        self.spawn(key.into(), move || {
            clips::load_model_from_gltf(&path).map(|model| LoadedAsset::Model(Arc::new(model)))
        });
    }

    fn spawn<F>(&mut self, key: String, loader: F)
    where
        F: FnOnce() -> Result<LoadedAsset> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = loader();
            // The receiver only disappears on teardown; a send error is moot then.
            let _ = tx.send(LoadOutcome { key, result });
        });
    }

    /// Drains finished loads into the catalog. Call once per tick.
    pub fn poll(&mut self, events: &mut EventBus) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match outcome.result {
                Ok(asset) => {
                    events.push(StageEvent::AssetLoaded { key: outcome.key.clone() });
                    self.loaded.insert(outcome.key, asset);
                }
                Err(err) => {
                    self.failed += 1;
                    events.push(StageEvent::AssetFailed {
                        key: outcome.key,
                        reason: format!("{err:#}"),
                    });
                }
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn all_settled(&self) -> bool {
        self.pending == 0
    }

    /// One-shot gate: returns `true` exactly once, after every tracked load
    /// has settled. This is the sole Loading->Running trigger.
    pub fn take_all_ready(&mut self, events: &mut EventBus) -> bool {
        if self.ready_fired || !self.all_settled() {
            return false;
        }
        self.ready_fired = true;
        events.push(StageEvent::AllAssetsReady { loaded: self.loaded.len(), failed: self.failed });
        true
    }

    pub fn texture(&self, key: &str) -> Option<Arc<TextureAsset>> {
        match self.loaded.get(key) {
            Some(LoadedAsset::Texture(texture)) => Some(Arc::clone(texture)),
            _ => None,
        }
    }

    pub fn model(&self, key: &str) -> Option<Arc<ModelAsset>> {
        match self.loaded.get(key) {
            Some(LoadedAsset::Model(model)) => Some(Arc::clone(model)),
            _ => None,
        }
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn load_texture(path: &std::path::Path) -> Result<Arc<TextureAsset>> {
    let image = ImageReader::open(path)
        .with_context(|| format!("Failed to open texture {}", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode texture {}", path.display()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Arc::new(TextureAsset { width, height, pixels: rgba.into_raw() }))
}
