use crate::camera3d::OrbitRig;
use crate::clips::MixerPool;
use crate::curve::CurveConvoy;
use crate::flipbook::FlipbookAnimator;
use crate::jitter::LightFlicker;
use crate::stage::{RenderTarget, Stage};
use crate::swarm::LightSwarm;
use crate::time::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Assets are still preloading; no per-frame update logic runs.
    Loading,
    /// Terminal state for the session: every tick updates and renders.
    Running,
}

struct FlipbookBinding {
    animator: FlipbookAnimator,
    material: usize,
}

/// Drives every time-varying effect from one shared clock. Each tick while
/// running advances, in fixed order: swarm choreography, spotlight flicker,
/// flip-book surfaces, the curve convoy, clip mixers, then camera damping,
/// and finally issues exactly one render call.
pub struct FrameOrchestrator {
    clock: Clock,
    phase: Phase,
    flipbooks: Vec<FlipbookBinding>,
    swarm: Option<LightSwarm>,
    flicker: Option<LightFlicker>,
    convoy: Option<CurveConvoy>,
    mixers: MixerPool,
    renders: u64,
}

impl FrameOrchestrator {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            phase: Phase::Loading,
            flipbooks: Vec::new(),
            swarm: None,
            flicker: None,
            convoy: None,
            mixers: MixerPool::new(),
            renders: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn add_flipbook(&mut self, animator: FlipbookAnimator, material: usize) {
        self.flipbooks.push(FlipbookBinding { animator, material });
    }

    pub fn flipbook_count(&self) -> usize {
        self.flipbooks.len()
    }

    pub fn set_swarm(&mut self, swarm: LightSwarm) {
        self.swarm = Some(swarm);
    }

    pub fn set_flicker(&mut self, flicker: LightFlicker) {
        self.flicker = Some(flicker);
    }

    pub fn set_convoy(&mut self, convoy: CurveConvoy) {
        self.convoy = Some(convoy);
    }

    pub fn mixers(&self) -> &MixerPool {
        &self.mixers
    }

    pub fn mixers_mut(&mut self) -> &mut MixerPool {
        &mut self.mixers
    }

    /// Fires the Loading->Running transition. Idempotent: the state machine
    /// only ever moves forward once.
    pub fn activate(&mut self) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Running;
        }
    }

    /// One scheduling callback. Returns `true` when a frame was rendered;
    /// while loading this is a no-op.
    pub fn tick(
        &mut self,
        stage: &mut Stage,
        rig: &mut OrbitRig,
        target: &mut dyn RenderTarget,
    ) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let tick = self.clock.tick();
        let elapsed = tick.elapsed_seconds as f32;

        if let Some(swarm) = &self.swarm {
            swarm.advance(
                elapsed,
                &mut stage.swarm_markers,
                &mut stage.swarm_lights,
                &mut stage.instances,
            );
        }

        if let Some(flicker) = &self.flicker {
            let mut rng = rand::thread_rng();
            flicker.advance(&mut rng, &mut stage.spot);
        }

        let now_ms = self.clock.elapsed_millis();
        for binding in &mut self.flipbooks {
            if let Some(material) = stage.materials.get_mut(binding.material) {
                binding.animator.advance(now_ms, material);
            }
        }

        if let Some(convoy) = &self.convoy {
            convoy.advance(elapsed, &mut stage.models);
        }

        self.mixers.advance(tick.delta_seconds);

        rig.update();
        let camera = rig.to_camera();
        target.render(stage, &camera);
        self.renders += 1;
        true
    }
}

impl Default for FrameOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
