use crate::assets::clips::ClipAsset;
use glam::{Quat, Vec3};
use smallvec::SmallVec;
use std::sync::Arc;

/// Sampled TRS state for one animated node.
#[derive(Debug, Clone, Copy)]
pub struct NodePose {
    pub node_index: u32,
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

/// One playing clip: looped local time plus the pose it currently drives.
pub struct ClipAction {
    clip: Arc<ClipAsset>,
    time: f32,
    pose: Vec<NodePose>,
}

impl ClipAction {
    pub fn new(clip: Arc<ClipAsset>) -> Self {
        let pose = clip
            .channels
            .iter()
            .map(|curve| NodePose {
                node_index: curve.node_index,
                translation: None,
                rotation: None,
                scale: None,
            })
            .collect();
        let mut action = Self { clip, time: 0.0, pose };
        action.resample();
        action
    }

    fn advance(&mut self, delta: f32) {
        let duration = self.clip.duration;
        if duration <= 0.0 {
            self.time = 0.0;
            return;
        }
        self.time = (self.time + delta).rem_euclid(duration.max(f32::EPSILON));
        self.resample();
    }

    fn resample(&mut self) {
        for (slot, curve) in self.pose.iter_mut().zip(self.clip.channels.iter()) {
            slot.translation = curve.translation.as_ref().map(|track| track.sample(self.time));
            slot.rotation = curve.rotation.as_ref().map(|track| track.sample(self.time));
            slot.scale = curve.scale.as_ref().map(|track| track.sample(self.time));
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn clip(&self) -> &Arc<ClipAsset> {
        &self.clip
    }

    pub fn pose(&self) -> &[NodePose] {
        &self.pose
    }
}

/// Playback driver for the clips of one loaded model.
pub struct ClipMixer {
    label: String,
    actions: SmallVec<[ClipAction; 2]>,
}

impl ClipMixer {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), actions: SmallVec::new() }
    }

    pub fn play(&mut self, clip: Arc<ClipAsset>) {
        self.actions.push(ClipAction::new(clip));
    }

    pub fn play_all<I: IntoIterator<Item = Arc<ClipAsset>>>(&mut self, clips: I) {
        for clip in clips {
            self.play(clip);
        }
    }

    pub fn advance(&mut self, delta: f32) {
        for action in &mut self.actions {
            action.advance(delta);
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    pub fn is_idle(&self) -> bool {
        self.actions.is_empty()
    }
}

struct MixerSlot {
    label: String,
    mixer: Option<ClipMixer>,
}

/// The per-tick pass-through over every clip mixer. Slots are reserved when
/// loads are requested and filled when they complete, so a frame produced
/// before a model finishes loading simply skips that slot.
#[derive(Default)]
pub struct MixerPool {
    slots: SmallVec<[MixerSlot; 2]>,
}

impl MixerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves an empty slot for a mixer that will be bound later.
    pub fn reserve(&mut self, label: impl Into<String>) -> usize {
        self.slots.push(MixerSlot { label: label.into(), mixer: None });
        self.slots.len() - 1
    }

    pub fn bind(&mut self, slot: usize, mixer: ClipMixer) {
        debug_assert!(slot < self.slots.len(), "mixer slot out of range");
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.mixer = Some(mixer);
        }
    }

    /// Advances every bound mixer; unbound slots are skipped.
    pub fn advance(&mut self, delta_seconds: f32) {
        for slot in &mut self.slots {
            if let Some(mixer) = slot.mixer.as_mut() {
                mixer.advance(delta_seconds);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.mixer.is_some()).count()
    }

    pub fn label(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(|entry| entry.label.as_str())
    }

    pub fn mixer(&self, slot: usize) -> Option<&ClipMixer> {
        self.slots.get(slot).and_then(|entry| entry.mixer.as_ref())
    }
}
