use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct StagePaths {
    #[serde(default = "StagePaths::default_manifest")]
    pub manifest: String,
}

impl StagePaths {
    fn default_manifest() -> String {
        "config/stage.json".to_string()
    }
}

impl Default for StagePaths {
    fn default() -> Self {
        Self { manifest: Self::default_manifest() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "PlaybackConfig::default_target_fps")]
    pub target_fps: f32,
    /// Tick budget for the demo loop; `None` runs until the process is killed.
    #[serde(default = "PlaybackConfig::default_max_ticks")]
    pub max_ticks: Option<u64>,
}

impl PlaybackConfig {
    const fn default_target_fps() -> f32 {
        60.0
    }

    const fn default_max_ticks() -> Option<u64> {
        Some(600)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { target_fps: Self::default_target_fps(), max_ticks: Self::default_max_ticks() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub stage: StagePaths,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub manifest: Option<String>,
    pub ticks: Option<u64>,
    pub fps: Option<f32>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[config] load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(manifest) = &overrides.manifest {
            self.stage.manifest = manifest.clone();
        }
        if let Some(ticks) = overrides.ticks {
            self.playback.max_ticks = Some(ticks);
        }
        if let Some(fps) = overrides.fps {
            self.playback.target_fps = fps.max(1.0);
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.manifest.is_none() && self.ticks.is_none() && self.fps.is_none()
    }
}
