use crate::scene::CameraRigData;
use glam::{Mat4, Quat, Vec2, Vec3};
use winit::dpi::PhysicalSize;

const DEFAULT_UP: Vec3 = Vec3::Y;
const PITCH_EPSILON: f32 = 0.01;

/// Simple perspective camera handed to the render target every tick.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, viewport: PhysicalSize<u32>) -> Mat4 {
        let aspect = if viewport.height > 0 { viewport.width as f32 / viewport.height as f32 } else { 1.0 };
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Orbit-style camera rig with velocity damping. Interaction nudges yaw,
/// pitch, or zoom; `update` integrates and decays the velocities each tick.
/// The first interaction raises a one-shot edge used to trigger the media
/// deck.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    pub target: Vec3,
    pub radius: f32,
    pub yaw_radians: f32,
    pub pitch_radians: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    damping: f32,
    min_radius: f32,
    max_radius: f32,
    pitch_limit: f32,
    fov_y_radians: f32,
    near: f32,
    far: f32,
    interaction_armed: bool,
    interaction_pending: bool,
}

impl OrbitRig {
    pub fn new(target: Vec3, radius: f32, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self {
            target,
            radius: radius.max(0.01),
            yaw_radians: 0.0,
            pitch_radians: 0.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            damping: 0.2,
            min_radius: 0.01,
            max_radius: 10_000.0,
            pitch_limit: std::f32::consts::FRAC_PI_2,
            fov_y_radians,
            near,
            far,
            interaction_armed: true,
            interaction_pending: false,
        }
    }

    pub fn from_data(data: &CameraRigData) -> Self {
        let mut rig = Self::new(
            data.target.into(),
            data.radius,
            data.fov_degrees.to_radians(),
            data.near,
            data.far,
        );
        rig.damping = data.damping.clamp(0.0, 1.0);
        rig.min_radius = data.min_distance.max(0.01);
        rig.max_radius = data.max_distance.max(rig.min_radius);
        rig.pitch_limit = data.max_polar_degrees.to_radians();
        rig.radius = rig.radius.clamp(rig.min_radius, rig.max_radius);
        rig
    }

    /// Pointer-drag style input: adds angular velocity.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw_velocity += delta.x;
        self.pitch_velocity += delta.y;
        self.mark_interaction();
    }

    /// Wheel style input: scales the orbit radius.
    pub fn zoom(&mut self, factor: f32) {
        self.radius = (self.radius * factor).clamp(self.min_radius, self.max_radius);
        self.mark_interaction();
    }

    /// Integrates pending velocities and applies damping. Called once per
    /// orchestrator tick, after every scene update.
    pub fn update(&mut self) {
        self.yaw_radians += self.yaw_velocity;
        let limit = self.pitch_limit - PITCH_EPSILON;
        self.pitch_radians = (self.pitch_radians + self.pitch_velocity).clamp(-limit, limit);
        let retain = 1.0 - self.damping;
        self.yaw_velocity *= retain;
        self.pitch_velocity *= retain;
    }

    /// One-shot edge raised by the first interaction.
    pub fn take_interaction_started(&mut self) -> bool {
        std::mem::take(&mut self.interaction_pending)
    }

    pub fn to_camera(&self) -> Camera3D {
        let rotation = Quat::from_euler(glam::EulerRot::YXZ, self.yaw_radians, self.pitch_radians, 0.0);
        let offset = rotation * Vec3::new(0.0, 0.0, self.radius);
        Camera3D::new(self.target + offset, self.target, self.fov_y_radians, self.near, self.far)
    }

    fn mark_interaction(&mut self) {
        if self.interaction_armed {
            self.interaction_armed = false;
            self.interaction_pending = true;
        }
    }
}
