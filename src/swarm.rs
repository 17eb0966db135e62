use crate::stage::{InstanceBuffer, Marker, PointLight};
use anyhow::{bail, Result};
use glam::Vec3;
use rand::Rng;

/// Choreographs a fixed set of paired (marker, point light, instance slot)
/// actors with a shared bobbing motion. Base positions are rolled once at
/// construction and never reassigned; every tick displaces them by a pure
/// function of elapsed time and commits the batched buffer once.
pub struct LightSwarm {
    bases: Vec<Vec3>,
    amplitude: f32,
    translation: Vec3,
}

impl LightSwarm {
    pub fn new<R: Rng>(
        count: usize,
        extent: Vec3,
        offset_bias: f32,
        amplitude: f32,
        translation: Vec3,
        rng: &mut R,
    ) -> Result<Self> {
        if count == 0 {
            bail!("Light swarm needs at least one instance");
        }
        let bases = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - offset_bias) * extent.x,
                    (rng.gen::<f32>() - offset_bias) * extent.y,
                    (rng.gen::<f32>() - offset_bias) * extent.z,
                )
            })
            .collect();
        Ok(Self { bases, amplitude, translation })
    }

    /// Builds a swarm over explicit base positions.
    pub fn from_bases(bases: Vec<Vec3>, amplitude: f32, translation: Vec3) -> Result<Self> {
        if bases.is_empty() {
            bail!("Light swarm needs at least one instance");
        }
        Ok(Self { bases, amplitude, translation })
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn bases(&self) -> &[Vec3] {
        &self.bases
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Position of instance `i` at `elapsed` seconds. Depends only on the
    /// instance's own base and the shared clock, never on other instances.
    pub fn bob_position(&self, index: usize, elapsed: f32) -> Vec3 {
        let base = self.bases[index];
        let bob = (elapsed * 2.0 + index as f32).sin() * self.amplitude;
        base + Vec3::new(0.0, bob, 0.0) + self.translation
    }

    /// Writes every marker, light, and buffer slot, then commits the buffer
    /// exactly once.
    pub fn advance(
        &self,
        elapsed: f32,
        markers: &mut [Marker],
        lights: &mut [PointLight],
        buffer: &mut InstanceBuffer,
    ) {
        debug_assert_eq!(markers.len(), self.bases.len());
        debug_assert_eq!(lights.len(), self.bases.len());
        debug_assert_eq!(buffer.len(), self.bases.len());
        for index in 0..self.bases.len() {
            let position = self.bob_position(index, elapsed);
            markers[index].position = position;
            lights[index].position = position;
            buffer.set_transform_at(index, position);
        }
        buffer.commit();
    }
}
