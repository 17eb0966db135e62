use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Declarative description of the whole stage: lighting rig, camera rig,
/// background, animated surfaces, the light swarm, the curve convoy, and the
/// clip-driven models. Everything time-varying is parametrized here so one
/// orchestrator can be configured instead of duplicating assembly scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageManifest {
    #[serde(default)]
    pub camera: CameraRigData,
    #[serde(default)]
    pub lighting: LightingRigData,
    #[serde(default)]
    pub background: StarfieldData,
    #[serde(default = "default_flipbooks")]
    pub flipbooks: Vec<FlipbookData>,
    #[serde(default)]
    pub swarm: SwarmData,
    #[serde(default)]
    pub convoy: ConvoyData,
    #[serde(default = "default_clip_models")]
    pub clip_models: Vec<ClipModelData>,
    #[serde(default)]
    pub media: MediaData,
}

impl StageManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read stage manifest {}", path.display()))?;
        let manifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse stage manifest {}", path.display()))?;
        Ok(manifest)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::demo();
        }
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                eprintln!("[scene] manifest load error: {err:?}. Falling back to the demo stage.");
                Self::demo()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize stage manifest")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create manifest directory {}", parent.display()))?;
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write stage manifest {}", path.display()))?;
        Ok(())
    }

    /// The built-in stage: the TV-room diorama the engine grew up around.
    pub fn demo() -> Self {
        Self {
            camera: CameraRigData::default(),
            lighting: LightingRigData::default(),
            background: StarfieldData::default(),
            flipbooks: default_flipbooks(),
            swarm: SwarmData::default(),
            convoy: ConvoyData::default(),
            clip_models: default_clip_models(),
            media: MediaData::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRigData {
    #[serde(default = "CameraRigData::default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "CameraRigData::default_near")]
    pub near: f32,
    #[serde(default = "CameraRigData::default_far")]
    pub far: f32,
    #[serde(default = "CameraRigData::default_target")]
    pub target: Vec3Data,
    #[serde(default = "CameraRigData::default_radius")]
    pub radius: f32,
    #[serde(default = "CameraRigData::default_damping")]
    pub damping: f32,
    #[serde(default = "CameraRigData::default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "CameraRigData::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "CameraRigData::default_max_polar_degrees")]
    pub max_polar_degrees: f32,
}

impl CameraRigData {
    const fn default_fov_degrees() -> f32 {
        75.0
    }
    const fn default_near() -> f32 {
        0.1
    }
    const fn default_far() -> f32 {
        20.0
    }
    fn default_target() -> Vec3Data {
        Vec3Data::default()
    }
    const fn default_radius() -> f32 {
        2.0
    }
    const fn default_damping() -> f32 {
        0.2
    }
    const fn default_min_distance() -> f32 {
        0.1
    }
    const fn default_max_distance() -> f32 {
        10.0
    }
    const fn default_max_polar_degrees() -> f32 {
        90.0
    }
}

impl Default for CameraRigData {
    fn default() -> Self {
        Self {
            fov_degrees: Self::default_fov_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
            target: Self::default_target(),
            radius: Self::default_radius(),
            damping: Self::default_damping(),
            min_distance: Self::default_min_distance(),
            max_distance: Self::default_max_distance(),
            max_polar_degrees: Self::default_max_polar_degrees(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingRigData {
    #[serde(default = "LightingRigData::default_directionals")]
    pub directionals: Vec<DirectionalLightData>,
    #[serde(default)]
    pub spot: SpotLightData,
    #[serde(default = "LightingRigData::default_fill")]
    pub fill: PointLightData,
}

impl LightingRigData {
    fn default_directionals() -> Vec<DirectionalLightData> {
        vec![
            DirectionalLightData {
                color: Vec3Data { x: 0.980, y: 0.498, z: 0.031 },
                intensity: 0.8,
                position: Vec3Data { x: -5.0, y: 5.0, z: -5.0 },
                shadow: ShadowData::default(),
            },
            DirectionalLightData {
                color: Vec3Data { x: 1.0, y: 0.894, z: 0.710 },
                intensity: 0.3,
                position: Vec3Data { x: 5.0, y: 0.0, z: 5.0 },
                shadow: ShadowData::default(),
            },
        ]
    }

    fn default_fill() -> PointLightData {
        PointLightData {
            color: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
            intensity: 1.0,
            position: Vec3Data { x: 5.0, y: 5.0, z: 5.0 },
            range: 0.0,
        }
    }
}

impl Default for LightingRigData {
    fn default() -> Self {
        Self {
            directionals: Self::default_directionals(),
            spot: SpotLightData::default(),
            fill: Self::default_fill(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionalLightData {
    pub color: Vec3Data,
    pub intensity: f32,
    pub position: Vec3Data,
    #[serde(default)]
    pub shadow: ShadowData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowData {
    #[serde(default = "ShadowData::default_map_size")]
    pub map_size: u32,
    #[serde(default = "ShadowData::default_extent")]
    pub extent: f32,
    #[serde(default = "ShadowData::default_near")]
    pub near: f32,
    #[serde(default = "ShadowData::default_far")]
    pub far: f32,
    #[serde(default = "ShadowData::default_bias")]
    pub bias: f32,
}

impl ShadowData {
    const fn default_map_size() -> u32 {
        2048
    }
    const fn default_extent() -> f32 {
        10.0
    }
    const fn default_near() -> f32 {
        0.01
    }
    const fn default_far() -> f32 {
        20.0
    }
    const fn default_bias() -> f32 {
        -0.001
    }
}

impl Default for ShadowData {
    fn default() -> Self {
        Self {
            map_size: Self::default_map_size(),
            extent: Self::default_extent(),
            near: Self::default_near(),
            far: Self::default_far(),
            bias: Self::default_bias(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotLightData {
    #[serde(default = "SpotLightData::default_color")]
    pub color: Vec3Data,
    #[serde(default = "SpotLightData::default_intensity")]
    pub intensity: f32,
    #[serde(default = "SpotLightData::default_distance")]
    pub distance: f32,
    #[serde(default = "SpotLightData::default_angle")]
    pub angle: f32,
    #[serde(default = "SpotLightData::default_penumbra")]
    pub penumbra: f32,
    #[serde(default = "SpotLightData::default_decay")]
    pub decay: f32,
    #[serde(default = "SpotLightData::default_position")]
    pub position: Vec3Data,
    #[serde(default = "SpotLightData::default_target")]
    pub target: Vec3Data,
    #[serde(default)]
    pub jitter: JitterData,
}

impl SpotLightData {
    fn default_color() -> Vec3Data {
        Vec3Data { x: 0.133, y: 0.729, z: 0.733 }
    }
    const fn default_intensity() -> f32 {
        5.0
    }
    const fn default_distance() -> f32 {
        10.0
    }
    const fn default_angle() -> f32 {
        0.9
    }
    const fn default_penumbra() -> f32 {
        1.0
    }
    const fn default_decay() -> f32 {
        2.5
    }
    fn default_position() -> Vec3Data {
        Vec3Data { x: -0.1, y: -0.15, z: 0.15 }
    }
    fn default_target() -> Vec3Data {
        Vec3Data { x: 0.1, y: -2.0, z: 2.0 }
    }
}

impl Default for SpotLightData {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            intensity: Self::default_intensity(),
            distance: Self::default_distance(),
            angle: Self::default_angle(),
            penumbra: Self::default_penumbra(),
            decay: Self::default_decay(),
            position: Self::default_position(),
            target: Self::default_target(),
            jitter: JitterData::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JitterData {
    #[serde(default = "JitterData::default_intensity_spread")]
    pub intensity_spread: f32,
    #[serde(default = "JitterData::default_position_amount")]
    pub position_amount: f32,
    /// Bias subtracted from each position sample. The two historical assembly
    /// scripts disagreed (0.5 vs 0.3); 0.5 is the surviving default and the
    /// other variant stays reachable through this field.
    #[serde(default = "JitterData::default_position_bias")]
    pub position_bias: f32,
}

impl JitterData {
    const fn default_intensity_spread() -> f32 {
        0.5
    }
    const fn default_position_amount() -> f32 {
        0.0005
    }
    const fn default_position_bias() -> f32 {
        0.5
    }
}

impl Default for JitterData {
    fn default() -> Self {
        Self {
            intensity_spread: Self::default_intensity_spread(),
            position_amount: Self::default_position_amount(),
            position_bias: Self::default_position_bias(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLightData {
    pub color: Vec3Data,
    pub intensity: f32,
    pub position: Vec3Data,
    #[serde(default)]
    pub range: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarfieldData {
    #[serde(default = "StarfieldData::default_width")]
    pub width: u32,
    #[serde(default = "StarfieldData::default_height")]
    pub height: u32,
    #[serde(default = "StarfieldData::default_stars")]
    pub stars: u32,
    #[serde(default = "StarfieldData::default_max_radius")]
    pub max_radius: f32,
}

impl StarfieldData {
    const fn default_width() -> u32 {
        2048
    }
    const fn default_height() -> u32 {
        1024
    }
    const fn default_stars() -> u32 {
        300
    }
    const fn default_max_radius() -> f32 {
        0.5
    }
}

impl Default for StarfieldData {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            stars: Self::default_stars(),
            max_radius: Self::default_max_radius(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipbookData {
    pub name: String,
    pub frames: FrameSequenceData,
    #[serde(default = "FlipbookData::default_rate")]
    pub rate: f32,
    #[serde(default)]
    pub hold: u32,
    #[serde(default)]
    pub surface: SurfaceData,
}

impl FlipbookData {
    const fn default_rate() -> f32 {
        12.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSequenceData {
    #[serde(default = "FrameSequenceData::default_directory")]
    pub directory: String,
    pub prefix: String,
    pub count: u32,
    #[serde(default = "FrameSequenceData::default_extension")]
    pub extension: String,
}

impl FrameSequenceData {
    fn default_directory() -> String {
        "assets".to_string()
    }

    fn default_extension() -> String {
        "png".to_string()
    }

    pub fn frame_path(&self, index: u32) -> String {
        format!("{}/{}{}.{}", self.directory, self.prefix, index, self.extension)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceData {
    #[serde(default)]
    pub position: Vec3Data,
    #[serde(default)]
    pub rotation_y: f32,
    #[serde(default = "SurfaceData::default_width")]
    pub width: f32,
    #[serde(default = "SurfaceData::default_height")]
    pub height: f32,
}

impl SurfaceData {
    const fn default_width() -> f32 {
        1.0
    }
    const fn default_height() -> f32 {
        1.0
    }
}

impl Default for SurfaceData {
    fn default() -> Self {
        Self {
            position: Vec3Data::default(),
            rotation_y: 0.0,
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmData {
    #[serde(default = "SwarmData::default_count")]
    pub count: u32,
    #[serde(default = "SwarmData::default_extent")]
    pub extent: Vec3Data,
    #[serde(default = "SwarmData::default_offset_bias")]
    pub offset_bias: f32,
    #[serde(default = "SwarmData::default_bob_amplitude")]
    pub bob_amplitude: f32,
    #[serde(default = "SwarmData::default_translation")]
    pub translation: Vec3Data,
    #[serde(default = "SwarmData::default_light_color")]
    pub light_color: Vec3Data,
    #[serde(default = "SwarmData::default_light_intensity")]
    pub light_intensity: f32,
    #[serde(default = "SwarmData::default_light_range")]
    pub light_range: f32,
    #[serde(default = "SwarmData::default_marker_radius")]
    pub marker_radius: f32,
    #[serde(default = "SwarmData::default_instance_radius")]
    pub instance_radius: f32,
}

impl SwarmData {
    const fn default_count() -> u32 {
        10
    }
    fn default_extent() -> Vec3Data {
        Vec3Data { x: 1.3, y: 1.3, z: 0.25 }
    }
    const fn default_offset_bias() -> f32 {
        0.25
    }
    const fn default_bob_amplitude() -> f32 {
        0.1
    }
    fn default_translation() -> Vec3Data {
        Vec3Data { x: -0.52, y: -0.2, z: -0.55 }
    }
    fn default_light_color() -> Vec3Data {
        Vec3Data { x: 1.0, y: 0.0, z: 0.0 }
    }
    const fn default_light_intensity() -> f32 {
        0.25
    }
    const fn default_light_range() -> f32 {
        0.25
    }
    const fn default_marker_radius() -> f32 {
        0.01
    }
    const fn default_instance_radius() -> f32 {
        0.025
    }
}

impl Default for SwarmData {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            extent: Self::default_extent(),
            offset_bias: Self::default_offset_bias(),
            bob_amplitude: Self::default_bob_amplitude(),
            translation: Self::default_translation(),
            light_color: Self::default_light_color(),
            light_intensity: Self::default_light_intensity(),
            light_range: Self::default_light_range(),
            marker_radius: Self::default_marker_radius(),
            instance_radius: Self::default_instance_radius(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvoyData {
    #[serde(default = "ConvoyData::default_model")]
    pub model: String,
    #[serde(default = "ConvoyData::default_instances")]
    pub instances: u32,
    #[serde(default = "ConvoyData::default_loop_duration")]
    pub loop_duration: f32,
    #[serde(default = "ConvoyData::default_spin_step")]
    pub spin_step: f32,
    #[serde(default = "ConvoyData::default_control_points")]
    pub control_points: Vec<Vec3Data>,
}

impl ConvoyData {
    fn default_model() -> String {
        "assets/vhs.gltf".to_string()
    }
    const fn default_instances() -> u32 {
        3
    }
    const fn default_loop_duration() -> f32 {
        10.0
    }
    const fn default_spin_step() -> f32 {
        0.01
    }
    fn default_control_points() -> Vec<Vec3Data> {
        vec![
            Vec3Data { x: 0.1, y: -0.3, z: 0.8 },
            Vec3Data { x: 0.2, y: -0.3, z: 0.7 },
            Vec3Data { x: 0.2, y: -0.3, z: 0.6 },
            Vec3Data { x: 0.1, y: -0.33, z: 0.5 },
            Vec3Data { x: 0.0, y: -0.35, z: 0.4 },
            Vec3Data { x: -0.1, y: -0.35, z: 0.4 },
            Vec3Data { x: -0.2, y: -0.35, z: 0.5 },
            Vec3Data { x: -0.2, y: -0.33, z: 0.6 },
            Vec3Data { x: -0.1, y: -0.3, z: 0.7 },
            Vec3Data { x: 0.0, y: -0.3, z: 0.8 },
        ]
    }
}

impl Default for ConvoyData {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            instances: Self::default_instances(),
            loop_duration: Self::default_loop_duration(),
            spin_step: Self::default_spin_step(),
            control_points: Self::default_control_points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipModelData {
    pub name: String,
    pub path: String,
    #[serde(default = "ClipModelData::default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub position: Vec3Data,
    #[serde(default)]
    pub playback: ClipPlaybackData,
}

impl ClipModelData {
    const fn default_scale() -> f32 {
        1.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipPlaybackData {
    /// Play every clip the model carries.
    #[default]
    All,
    /// Play a single clip looked up by name; a miss is a silent no-op.
    ByName {
        name: String,
    },
}

fn default_clip_models() -> Vec<ClipModelData> {
    vec![
        ClipModelData {
            name: "tv".to_string(),
            path: "assets/tv.gltf".to_string(),
            scale: 10.0,
            position: Vec3Data::default(),
            playback: ClipPlaybackData::All,
        },
        ClipModelData {
            name: "vase".to_string(),
            path: "assets/vase.gltf".to_string(),
            scale: 3.0,
            position: Vec3Data { x: -0.5, y: 0.0, z: 0.5 },
            playback: ClipPlaybackData::ByName { name: "Animation".to_string() },
        },
    ]
}

fn default_flipbooks() -> Vec<FlipbookData> {
    vec![FlipbookData {
        name: "paper_spin".to_string(),
        frames: FrameSequenceData {
            directory: "assets".to_string(),
            prefix: "PaperSpin_".to_string(),
            count: 35,
            extension: "png".to_string(),
        },
        rate: FlipbookData::default_rate(),
        hold: 48,
        surface: SurfaceData {
            position: Vec3Data { x: -0.2, y: 0.26, z: -0.15 },
            rotation_y: 0.25,
            width: 0.5,
            height: 0.5,
        },
    }]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaData {
    #[serde(default = "MediaData::default_source")]
    pub source: String,
    #[serde(default = "MediaData::default_surface")]
    pub surface: SurfaceData,
}

impl MediaData {
    fn default_source() -> String {
        "media/orion_from_the_street.mp4".to_string()
    }

    fn default_surface() -> SurfaceData {
        SurfaceData {
            position: Vec3Data { x: -0.165, y: -0.130, z: 0.0445 },
            rotation_y: 0.2,
            width: 0.35,
            height: 0.25,
        }
    }
}

impl Default for MediaData {
    fn default() -> Self {
        Self { source: Self::default_source(), surface: Self::default_surface() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<glam::Vec3> for Vec3Data {
    fn from(value: glam::Vec3) -> Self {
        Self { x: value.x, y: value.y, z: value.z }
    }
}

impl From<Vec3Data> for glam::Vec3 {
    fn from(value: Vec3Data) -> Self {
        glam::Vec3::new(value.x, value.y, value.z)
    }
}
