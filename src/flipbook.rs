use crate::assets::TextureAsset;
use crate::stage::Material;
use anyhow::{bail, Result};
use std::sync::Arc;

/// Frame-sequence ("flip-book") animator. Steps through a fixed list of
/// preloaded textures at a fixed rate, then holds the last-shown frame for
/// `hold_len` further triggers before restarting.
///
/// Each animator owns its own gate timestamp, index, and hold counter;
/// running several at different rates or holds shares nothing.
pub struct FlipbookAnimator {
    frames: Vec<Arc<TextureAsset>>,
    frame_interval_ms: f64,
    last_frame_ms: f64,
    current_index: usize,
    hold_counter: u32,
    hold_len: u32,
}

impl FlipbookAnimator {
    pub fn new(frames: Vec<Arc<TextureAsset>>, rate_fps: f32, hold_len: u32) -> Result<Self> {
        if frames.is_empty() {
            bail!("Flip-book animator needs at least one frame");
        }
        if !rate_fps.is_finite() || rate_fps <= 0.0 {
            bail!("Flip-book frame rate must be positive, got {rate_fps}");
        }
        Ok(Self {
            frames,
            frame_interval_ms: 1000.0 / rate_fps as f64,
            last_frame_ms: 0.0,
            current_index: 0,
            hold_counter: hold_len,
            hold_len,
        })
    }

    /// Advances the animation if the frame interval has elapsed since the
    /// last trigger. While holding, the material keeps the last-set frame;
    /// the trigger after the hold drains resets the sequence. A hold of 0
    /// restarts on the trigger immediately after the final frame.
    pub fn advance(&mut self, now_ms: f64, material: &mut Material) {
        if now_ms - self.last_frame_ms < self.frame_interval_ms {
            return;
        }
        self.last_frame_ms = now_ms;

        if self.current_index < self.frames.len() {
            material.set_frame(&self.frames[self.current_index]);
            self.current_index += 1;
        } else if self.hold_counter > 0 {
            self.hold_counter -= 1;
        } else {
            self.current_index = 0;
            self.hold_counter = self.hold_len;
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn hold_counter(&self) -> u32 {
        self.hold_counter
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }
}
