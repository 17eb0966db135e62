use crate::assets::TextureAsset;
use crate::camera3d::Camera3D;
use crate::scene::{
    DirectionalLightData, PointLightData, ShadowData, SpotLightData, SurfaceData,
};
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// Runtime scene model. Holds everything the per-frame orchestrator mutates
/// and everything a render backend needs to draw; the backend itself stays
/// behind [`RenderTarget`].
pub struct Stage {
    pub background: Option<Arc<TextureAsset>>,
    pub directionals: Vec<DirectionalLight>,
    pub spot: SpotLight,
    pub fill: PointLight,
    pub materials: Vec<Material>,
    pub surfaces: Vec<Surface>,
    pub swarm_markers: Vec<Marker>,
    pub swarm_lights: Vec<PointLight>,
    pub instances: InstanceBuffer,
    pub models: Vec<ModelInstance>,
}

impl Stage {
    pub fn new(spot: SpotLight, fill: PointLight) -> Self {
        Self {
            background: None,
            directionals: Vec::new(),
            spot,
            fill,
            materials: Vec::new(),
            surfaces: Vec::new(),
            swarm_markers: Vec::new(),
            swarm_lights: Vec::new(),
            instances: InstanceBuffer::new(0),
            models: Vec::new(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_surface(&mut self, surface: Surface) -> usize {
        self.surfaces.push(surface);
        self.surfaces.len() - 1
    }

    pub fn add_model(&mut self, model: ModelInstance) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }
}

#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub shadow: ShadowSettings,
}

impl From<&DirectionalLightData> for DirectionalLight {
    fn from(data: &DirectionalLightData) -> Self {
        Self {
            color: data.color.into(),
            intensity: data.intensity,
            position: data.position.into(),
            shadow: (&data.shadow).into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub extent: f32,
    pub near: f32,
    pub far: f32,
    pub bias: f32,
}

impl From<&ShadowData> for ShadowSettings {
    fn from(data: &ShadowData) -> Self {
        Self {
            map_size: data.map_size,
            extent: data.extent,
            near: data.near,
            far: data.far,
            bias: data.bias,
        }
    }
}

/// Spotlight with a constant base intensity; the flicker effect rewrites
/// `intensity` from `base_intensity` every tick and drifts `position`.
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub color: Vec3,
    pub base_intensity: f32,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub distance: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
}

impl From<&SpotLightData> for SpotLight {
    fn from(data: &SpotLightData) -> Self {
        Self {
            color: data.color.into(),
            base_intensity: data.intensity,
            intensity: data.intensity,
            position: data.position.into(),
            target: data.target.into(),
            distance: data.distance,
            angle: data.angle,
            penumbra: data.penumbra,
            decay: data.decay,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub range: f32,
}

impl From<&PointLightData> for PointLight {
    fn from(data: &PointLightData) -> Self {
        Self {
            color: data.color.into(),
            intensity: data.intensity,
            position: data.position.into(),
            range: data.range,
        }
    }
}

/// Small emissive proxy mesh that visualizes one swarm light.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub position: Vec3,
    pub radius: f32,
}

/// Textured quad in the scene, bound to one material slot.
#[derive(Debug, Clone)]
pub struct Surface {
    pub label: String,
    pub material: usize,
    pub position: Vec3,
    pub rotation_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn from_data(label: &str, material: usize, data: &SurfaceData) -> Self {
        Self {
            label: label.to_string(),
            material,
            position: data.position.into(),
            rotation_y: data.rotation_y,
            width: data.width,
            height: data.height,
        }
    }
}

/// Material with mutable albedo/emissive texture slots and a dirty flag the
/// host observes before the next render.
#[derive(Default)]
pub struct Material {
    pub albedo: Option<Arc<TextureAsset>>,
    pub emissive: Option<Arc<TextureAsset>>,
    pub emissive_intensity: f32,
    pub transparent: bool,
    dirty: bool,
}

impl Material {
    pub fn emissive_surface() -> Self {
        Self { albedo: None, emissive: None, emissive_intensity: 1.0, transparent: true, dirty: false }
    }

    /// Binds one flip-book frame to both texture slots.
    pub fn set_frame(&mut self, frame: &Arc<TextureAsset>) {
        self.albedo = Some(Arc::clone(frame));
        self.emissive = Some(Arc::clone(frame));
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Per-instance payload uploaded to the instanced draw path.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
}

/// Batched per-instance transform buffer with a single dirty flag. Writers
/// update slots then commit once per tick; the render backend takes the flag.
pub struct InstanceBuffer {
    data: Vec<InstanceData>,
    dirty: bool,
    commits: u64,
}

impl InstanceBuffer {
    pub fn new(count: usize) -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self { data: vec![InstanceData { model: identity }; count], dirty: false, commits: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_transform_at(&mut self, index: usize, position: Vec3) {
        debug_assert!(index < self.data.len(), "instance slot out of range");
        if let Some(slot) = self.data.get_mut(index) {
            slot.model = Mat4::from_translation(position).to_cols_array_2d();
        }
    }

    pub fn position_at(&self, index: usize) -> Option<Vec3> {
        self.data.get(index).map(|slot| {
            let column = slot.model[3];
            Vec3::new(column[0], column[1], column[2])
        })
    }

    pub fn commit(&mut self) {
        self.dirty = true;
        self.commits += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    pub fn raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// One placed scene-graph clone. The convoy moves `position` and accumulates
/// `spin` without normalization; render backends may wrap the angle.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
    pub spin: f32,
}

impl ModelInstance {
    pub fn new(name: impl Into<String>, position: Vec3, scale: Vec3) -> Self {
        Self { name: name.into(), position, scale, spin: 0.0 }
    }
}

/// Render backend seam: invoked exactly once per orchestrator tick while the
/// orchestrator is running.
pub trait RenderTarget {
    fn render(&mut self, stage: &mut Stage, camera: &Camera3D);
}

/// Headless target for the demo binary and tests; consumes dirty flags the
/// way a GPU backend would flush uploads, and counts frames.
#[derive(Default)]
pub struct FrameRecorder {
    frames: u64,
    material_flushes: u64,
    instance_flushes: u64,
}

impl FrameRecorder {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn material_flushes(&self) -> u64 {
        self.material_flushes
    }

    pub fn instance_flushes(&self) -> u64 {
        self.instance_flushes
    }
}

impl RenderTarget for FrameRecorder {
    fn render(&mut self, stage: &mut Stage, _camera: &Camera3D) {
        for material in &mut stage.materials {
            if material.take_dirty() {
                self.material_flushes += 1;
            }
        }
        if stage.instances.take_dirty() {
            self.instance_flushes += 1;
        }
        self.frames += 1;
    }
}
