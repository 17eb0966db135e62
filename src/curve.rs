use crate::stage::ModelInstance;
use anyhow::{bail, Result};
use glam::Vec3;

/// Closed Catmull-Rom spline through an ordered control polygon. The
/// parameter wraps, so the segment from the last point back to the first is
/// as smooth as any interior segment.
pub struct ClosedSpline {
    points: Vec<Vec3>,
}

impl ClosedSpline {
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        if points.len() < 2 {
            bail!("Closed spline needs at least two control points, got {}", points.len());
        }
        Ok(Self { points })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Samples the curve at `t`, wrapped into `[0, 1)`.
    pub fn sample(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let wrapped = t.rem_euclid(1.0);
        let scaled = wrapped * n as f32;
        let segment = (scaled as usize).min(n - 1);
        let u = scaled - segment as f32;

        let p0 = self.points[(segment + n - 1) % n];
        let p1 = self.points[segment];
        let p2 = self.points[(segment + 1) % n];
        let p3 = self.points[(segment + 2) % n];
        catmull_rom(p0, p1, p2, p3, u)
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, u: f32) -> Vec3 {
    let u2 = u * u;
    let u3 = u2 * u;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * u
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3)
}

struct PathRider {
    model: usize,
    phase: f32,
}

/// Moves a set of model instances along one shared closed spline. Each rider
/// carries a constant phase offset, staggering the convoy; spin accumulates
/// by a fixed step per tick.
pub struct CurveConvoy {
    spline: ClosedSpline,
    loop_duration: f32,
    spin_step: f32,
    riders: Vec<PathRider>,
}

impl CurveConvoy {
    pub fn new(spline: ClosedSpline, loop_duration: f32, spin_step: f32) -> Result<Self> {
        if !loop_duration.is_finite() || loop_duration <= 0.0 {
            bail!("Convoy loop duration must be positive, got {loop_duration}");
        }
        Ok(Self { spline, loop_duration, spin_step, riders: Vec::new() })
    }

    pub fn add_rider(&mut self, model: usize, phase: f32) {
        self.riders.push(PathRider { model, phase });
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    pub fn loop_duration(&self) -> f32 {
        self.loop_duration
    }

    pub fn spline(&self) -> &ClosedSpline {
        &self.spline
    }

    /// Curve position for a rider with the given phase at `elapsed` seconds.
    pub fn position_at(&self, elapsed: f32, phase: f32) -> Vec3 {
        let progress = (elapsed + phase).rem_euclid(self.loop_duration);
        self.spline.sample(progress / self.loop_duration)
    }

    pub fn advance(&self, elapsed: f32, models: &mut [ModelInstance]) {
        for rider in &self.riders {
            let Some(model) = models.get_mut(rider.model) else {
                continue;
            };
            model.position = self.position_at(elapsed, rider.phase);
            model.spin += self.spin_step;
        }
    }
}
