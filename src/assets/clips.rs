use anyhow::{anyhow, bail, Context, Result};
use glam::{Quat, Vec3};
use gltf::animation::util::{ReadOutputs, Rotations};
use gltf::animation::{Interpolation, Property};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackInterpolation {
    Linear,
    Step,
}

#[derive(Clone, Copy, Debug)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

#[derive(Clone, Debug)]
pub struct Vec3Track {
    pub interpolation: TrackInterpolation,
    pub keyframes: Arc<[Keyframe<Vec3>]>,
}

impl Vec3Track {
    pub fn sample(&self, time: f32) -> Vec3 {
        sample_keyframes(&self.keyframes, self.interpolation, time, |a, b, t| a.lerp(b, t))
    }
}

#[derive(Clone)]
pub struct QuatTrack {
    pub interpolation: TrackInterpolation,
    pub keyframes: Arc<[Keyframe<Quat>]>,
}

impl QuatTrack {
    pub fn sample(&self, time: f32) -> Quat {
        sample_keyframes(&self.keyframes, self.interpolation, time, |a, b, t| a.slerp(b, t))
    }
}

/// Animated TRS channels targeting one scene-graph node.
#[derive(Clone)]
pub struct NodeCurve {
    pub node_index: u32,
    pub translation: Option<Vec3Track>,
    pub rotation: Option<QuatTrack>,
    pub scale: Option<Vec3Track>,
}

/// One imported animation clip: the unit a mixer plays back.
#[derive(Clone)]
pub struct ClipAsset {
    pub name: Arc<str>,
    pub duration: f32,
    pub channels: Arc<[NodeCurve]>,
}

/// Imported model: node names plus every animation clip the file carries.
#[derive(Clone)]
pub struct ModelAsset {
    pub name: Arc<str>,
    pub node_names: Vec<String>,
    pub clips: Vec<Arc<ClipAsset>>,
}

impl ModelAsset {
    pub fn clip_by_name(&self, name: &str) -> Option<Arc<ClipAsset>> {
        self.clips.iter().find(|clip| clip.name.as_ref() == name).map(Arc::clone)
    }
}

pub fn load_model_from_gltf(path: impl AsRef<Path>) -> Result<ModelAsset> {
    let path_ref = path.as_ref();
    let (document, buffers, _) = gltf::import(path_ref)
        .with_context(|| format!("Failed to import GLTF model from {}", path_ref.display()))?;

    let model_name: Arc<str> = Arc::<str>::from(
        path_ref
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.to_string())
            .unwrap_or_else(|| "model".to_string()),
    );

    let node_names: Vec<String> = document
        .nodes()
        .map(|node| node.name().map(|n| n.to_string()).unwrap_or_else(|| format!("node_{}", node.index())))
        .collect();

    let mut clips: Vec<Arc<ClipAsset>> = Vec::new();
    for (anim_index, animation) in document.animations().enumerate() {
        let clip_name: Arc<str> = animation
            .name()
            .map(|n| Arc::<str>::from(n.to_string()))
            .unwrap_or_else(|| Arc::<str>::from(format!("animation_{anim_index}")));

        let mut curve_builders: HashMap<u32, NodeCurveBuilder> = HashMap::new();

        for channel in animation.channels() {
            let target_node = channel.target().node().index() as u32;

            let interpolation = match channel.sampler().interpolation() {
                Interpolation::Linear => TrackInterpolation::Linear,
                Interpolation::Step => TrackInterpolation::Step,
                Interpolation::CubicSpline => {
                    eprintln!(
                        "[assets] animation '{}' uses CubicSpline interpolation; skipping channel (node {}).",
                        clip_name, target_node
                    );
                    continue;
                }
            };

            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            if times.is_empty() {
                continue;
            }

            let Some(outputs) = reader.read_outputs() else {
                continue;
            };

            let builder = curve_builders.entry(target_node).or_default();
            match (channel.target().property(), outputs) {
                (Property::Translation, ReadOutputs::Translations(values)) => {
                    let vec_values: Vec<Vec3> = values.map(Vec3::from_array).collect();
                    if vec_values.len() != times.len() {
                        return Err(anyhow!(
                            "Animation '{}' translation channel count mismatch (node {})",
                            clip_name,
                            target_node
                        ));
                    }
                    builder.translation = Some(build_vec3_track(&times, vec_values, interpolation)?);
                }
                (Property::Scale, ReadOutputs::Scales(values)) => {
                    let vec_values: Vec<Vec3> = values.map(Vec3::from_array).collect();
                    if vec_values.len() != times.len() {
                        return Err(anyhow!(
                            "Animation '{}' scale channel count mismatch (node {})",
                            clip_name,
                            target_node
                        ));
                    }
                    builder.scale = Some(build_vec3_track(&times, vec_values, interpolation)?);
                }
                (Property::Rotation, ReadOutputs::Rotations(rotations)) => {
                    let quat_values = convert_rotations(rotations);
                    if quat_values.len() != times.len() {
                        return Err(anyhow!(
                            "Animation '{}' rotation channel count mismatch (node {})",
                            clip_name,
                            target_node
                        ));
                    }
                    builder.rotation = Some(build_quat_track(&times, quat_values, interpolation)?);
                }
                (Property::MorphTargetWeights, _) => {
                    // Morph targets are not consumed by the playback stack.
                }
                _ => {}
            }
        }

        let mut channels: Vec<NodeCurve> = Vec::new();
        for (node_index, builder) in curve_builders {
            if let Some(curve) = builder.into_curve(node_index) {
                channels.push(curve);
            }
        }

        if channels.is_empty() {
            continue;
        }
        channels.sort_by_key(|curve| curve.node_index);

        let mut duration = 0.0_f32;
        for curve in &channels {
            if let Some(track) = &curve.translation {
                duration = duration.max(track.keyframes.last().map(|kf| kf.time).unwrap_or(0.0));
            }
            if let Some(track) = &curve.rotation {
                duration = duration.max(track.keyframes.last().map(|kf| kf.time).unwrap_or(0.0));
            }
            if let Some(track) = &curve.scale {
                duration = duration.max(track.keyframes.last().map(|kf| kf.time).unwrap_or(0.0));
            }
        }

        clips.push(Arc::new(ClipAsset {
            name: clip_name,
            duration,
            channels: Arc::from(channels.into_boxed_slice()),
        }));
    }

    Ok(ModelAsset { name: model_name, node_names, clips })
}

#[derive(Default)]
struct NodeCurveBuilder {
    translation: Option<Vec3Track>,
    rotation: Option<QuatTrack>,
    scale: Option<Vec3Track>,
}

impl NodeCurveBuilder {
    fn into_curve(self, node_index: u32) -> Option<NodeCurve> {
        if self.translation.is_none() && self.rotation.is_none() && self.scale.is_none() {
            None
        } else {
            Some(NodeCurve {
                node_index,
                translation: self.translation,
                rotation: self.rotation,
                scale: self.scale,
            })
        }
    }
}

fn build_vec3_track(
    times: &[f32],
    values: Vec<Vec3>,
    interpolation: TrackInterpolation,
) -> Result<Vec3Track> {
    let keyframes = build_keyframes(times, values)?;
    Ok(Vec3Track { interpolation, keyframes })
}

fn build_quat_track(
    times: &[f32],
    values: Vec<Quat>,
    interpolation: TrackInterpolation,
) -> Result<QuatTrack> {
    let keyframes = build_keyframes(times, values)?;
    Ok(QuatTrack { interpolation, keyframes })
}

fn build_keyframes<T: Clone>(times: &[f32], values: Vec<T>) -> Result<Arc<[Keyframe<T>]>> {
    if times.len() != values.len() {
        bail!("Animation channel time/value count mismatch ({} vs {})", times.len(), values.len());
    }
    let mut frames: Vec<Keyframe<T>> = Vec::with_capacity(times.len());
    for (time, value) in times.iter().copied().zip(values.into_iter()) {
        if !time.is_finite() {
            bail!("Animation channel contains non-finite time value");
        }
        if time < 0.0 {
            bail!("Animation channel time cannot be negative");
        }
        if let Some(last) = frames.last_mut() {
            if (time - last.time).abs() <= f32::EPSILON {
                last.value = value;
                continue;
            }
        }
        frames.push(Keyframe { time, value });
    }
    Ok(Arc::from(frames.into_boxed_slice()))
}

fn convert_rotations(rotations: Rotations) -> Vec<Quat> {
    rotations
        .into_f32()
        .map(|components| {
            let quat = Quat::from_xyzw(components[0], components[1], components[2], components[3]);
            if quat.length_squared() > 0.0 {
                quat.normalize()
            } else {
                Quat::IDENTITY
            }
        })
        .collect()
}

fn sample_keyframes<T: Copy>(
    frames: &[Keyframe<T>],
    interpolation: TrackInterpolation,
    time: f32,
    lerp: impl Fn(T, T, f32) -> T,
) -> T {
    debug_assert!(!frames.is_empty(), "tracks are built from non-empty channels");
    let first = frames[0];
    if frames.len() == 1 || time <= first.time {
        return first.value;
    }
    let last = frames[frames.len() - 1];
    if time >= last.time {
        return last.value;
    }
    for window in frames.windows(2) {
        let start = window[0];
        let end = window[1];
        if time < end.time {
            return match interpolation {
                TrackInterpolation::Step => start.value,
                TrackInterpolation::Linear => {
                    let span = (end.time - start.time).max(f32::EPSILON);
                    lerp(start.value, end.value, (time - start.time) / span)
                }
            };
        }
    }
    last.value
}
