use crate::assets::AssetCatalog;
use crate::camera3d::OrbitRig;
use crate::clips::ClipMixer;
use crate::config::{AppConfig, AppConfigOverrides};
use crate::curve::{ClosedSpline, CurveConvoy};
use crate::environment;
use crate::events::{EventBus, StageEvent};
use crate::flipbook::FlipbookAnimator;
use crate::jitter::LightFlicker;
use crate::media::MediaDeck;
use crate::orchestrator::FrameOrchestrator;
use crate::scene::{ClipModelData, ClipPlaybackData, FlipbookData, StageManifest, SwarmData};
use crate::stage::{
    FrameRecorder, InstanceBuffer, Marker, Material, ModelInstance, PointLight, Stage, Surface,
};
use crate::swarm::LightSwarm;
use anyhow::Result;
use glam::Vec3;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config/app.json";
const CONVOY_MODEL_KEY: &str = "convoy";

pub fn run() -> Result<()> {
    run_with_overrides(AppConfigOverrides::default())
}

/// Assembles the stage described by the manifest and drives the orchestrator
/// against a headless render target. Texture preloading gates activation;
/// model loads bind their effects whenever they settle, before or after the
/// first rendered frame.
pub fn run_with_overrides(overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default(DEFAULT_CONFIG_PATH);
    if !overrides.is_empty() {
        println!("[config] applying CLI overrides");
    }
    config.apply_overrides(&overrides);

    let manifest = StageManifest::load_or_default(&config.stage.manifest);
    let mut events = EventBus::default();
    let mut rng = rand::thread_rng();

    let mut stage = assemble_stage(&manifest, &mut rng);
    let mut rig = OrbitRig::from_data(&manifest.camera);
    let mut media = MediaDeck::new(manifest.media.source.clone());
    let mut orchestrator = FrameOrchestrator::new();

    // Procedural actors need no assets and are installed up front.
    let swarm = LightSwarm::new(
        manifest.swarm.count as usize,
        manifest.swarm.extent.into(),
        manifest.swarm.offset_bias,
        manifest.swarm.bob_amplitude,
        manifest.swarm.translation.into(),
        &mut rng,
    )?;
    install_swarm_actors(&mut stage, &manifest.swarm, swarm.len());
    orchestrator.set_swarm(swarm);
    orchestrator.set_flicker(LightFlicker::from(&manifest.lighting.spot.jitter));

    // Flip-book textures are the bulk preload whose completion starts the
    // frame loop; models bind late and nil-safe.
    let mut textures = AssetCatalog::new();
    for book in &manifest.flipbooks {
        for frame in 0..book.frames.count {
            textures.request_texture(flipbook_frame_key(&book.name, frame), book.frames.frame_path(frame));
        }
    }

    let mut models = AssetCatalog::new();
    let mut clip_bindings: Vec<ClipBinding> = manifest
        .clip_models
        .iter()
        .map(|data| {
            models.request_model(data.name.clone(), &data.path);
            ClipBinding {
                slot: orchestrator.mixers_mut().reserve(data.name.clone()),
                data: data.clone(),
                bound: false,
            }
        })
        .collect();
    models.request_model(CONVOY_MODEL_KEY, &manifest.convoy.model);
    let mut convoy_bound = false;

    let mut renderer = FrameRecorder::default();
    let frame_budget = Duration::from_secs_f32(1.0 / config.playback.target_fps.max(1.0));
    let mut ticks: u64 = 0;

    loop {
        textures.poll(&mut events);
        models.poll(&mut events);

        if textures.take_all_ready(&mut events) {
            bind_flipbooks(&manifest, &textures, &mut stage, &mut orchestrator);
            orchestrator.activate();
        }

        for binding in &mut clip_bindings {
            if binding.bound {
                continue;
            }
            let bound = bind_clip_model(binding, &models, &mut stage, &mut orchestrator, &mut events);
            binding.bound = bound;
        }
        if !convoy_bound {
            convoy_bound = bind_convoy(&manifest, &models, &mut stage, &mut orchestrator)?;
        }

        if rig.take_interaction_started() {
            events.push(StageEvent::InteractionStarted);
            media.on_interaction(&mut events);
        }

        orchestrator.tick(&mut stage, &mut rig, &mut renderer);

        for event in events.drain() {
            println!("[stage] {event}");
        }

        ticks += 1;
        if let Some(max) = config.playback.max_ticks {
            if ticks >= max {
                break;
            }
        }
        thread::sleep(frame_budget);
    }

    println!(
        "[stage] stopped after {} ticks: {} frames rendered, {} mixers bound, {} loads failed",
        ticks,
        renderer.frames(),
        orchestrator.mixers().bound_count(),
        textures.failed_count() + models.failed_count()
    );
    Ok(())
}

struct ClipBinding {
    slot: usize,
    data: ClipModelData,
    bound: bool,
}

fn assemble_stage<R: rand::Rng>(manifest: &StageManifest, rng: &mut R) -> Stage {
    let mut stage = Stage::new((&manifest.lighting.spot).into(), (&manifest.lighting.fill).into());
    stage.directionals = manifest.lighting.directionals.iter().map(Into::into).collect();
    stage.background = Some(environment::generate_starfield(&manifest.background, rng));

    // The media surface is always present; its texture stream is the host's.
    let material = stage.add_material(Material::emissive_surface());
    stage.add_surface(Surface::from_data("media", material, &manifest.media.surface));
    stage
}

fn install_swarm_actors(stage: &mut Stage, data: &SwarmData, count: usize) {
    stage.swarm_markers =
        vec![Marker { position: Vec3::ZERO, radius: data.marker_radius }; count];
    stage.swarm_lights = (0..count)
        .map(|_| PointLight {
            color: data.light_color.into(),
            intensity: data.light_intensity,
            position: Vec3::ZERO,
            range: data.light_range,
        })
        .collect();
    stage.instances = InstanceBuffer::new(count);
}

fn flipbook_frame_key(book: &str, frame: u32) -> String {
    format!("{book}:{frame}")
}

fn bind_flipbooks(
    manifest: &StageManifest,
    textures: &AssetCatalog,
    stage: &mut Stage,
    orchestrator: &mut FrameOrchestrator,
) {
    for book in &manifest.flipbooks {
        match collect_frames(book, textures) {
            Some(frames) => match FlipbookAnimator::new(frames, book.rate, book.hold) {
                Ok(animator) => {
                    let material = stage.add_material(Material::emissive_surface());
                    stage.add_surface(Surface::from_data(&book.name, material, &book.surface));
                    orchestrator.add_flipbook(animator, material);
                }
                Err(err) => {
                    eprintln!("[stage] flip-book '{}' rejected: {err:#}", book.name);
                }
            },
            None => {
                eprintln!(
                    "[stage] flip-book '{}' is missing frames; the surface stays static",
                    book.name
                );
            }
        }
    }
}

fn collect_frames(
    book: &FlipbookData,
    textures: &AssetCatalog,
) -> Option<Vec<Arc<crate::assets::TextureAsset>>> {
    let mut frames = Vec::with_capacity(book.frames.count as usize);
    for frame in 0..book.frames.count {
        frames.push(textures.texture(&flipbook_frame_key(&book.name, frame))?);
    }
    Some(frames)
}

fn bind_clip_model(
    binding: &ClipBinding,
    models: &AssetCatalog,
    stage: &mut Stage,
    orchestrator: &mut FrameOrchestrator,
    events: &mut EventBus,
) -> bool {
    let Some(model) = models.model(&binding.data.name) else {
        return false;
    };

    stage.add_model(ModelInstance::new(
        binding.data.name.clone(),
        binding.data.position.into(),
        Vec3::splat(binding.data.scale),
    ));

    let mut mixer = ClipMixer::new(binding.data.name.clone());
    match &binding.data.playback {
        ClipPlaybackData::All => mixer.play_all(model.clips.iter().cloned()),
        ClipPlaybackData::ByName { name } => match model.clip_by_name(name) {
            Some(clip) => mixer.play(clip),
            None => {
                // The named clip is absent; the mixer stays idle.
                events.push(StageEvent::ClipMissing {
                    model: binding.data.name.clone(),
                    clip: name.clone(),
                });
            }
        },
    }
    orchestrator.mixers_mut().bind(binding.slot, mixer);
    true
}

fn bind_convoy(
    manifest: &StageManifest,
    models: &AssetCatalog,
    stage: &mut Stage,
    orchestrator: &mut FrameOrchestrator,
) -> Result<bool> {
    let Some(model) = models.model(CONVOY_MODEL_KEY) else {
        return Ok(false);
    };

    let points = manifest.convoy.control_points.iter().map(|p| Vec3::from(*p)).collect();
    let spline = ClosedSpline::new(points)?;
    let mut convoy =
        CurveConvoy::new(spline, manifest.convoy.loop_duration, manifest.convoy.spin_step)?;

    let instances = manifest.convoy.instances.max(1);
    let stagger = manifest.convoy.loop_duration / instances as f32;
    for index in 0..instances {
        let id = stage.add_model(ModelInstance::new(
            format!("{}_{index}", model.name),
            Vec3::new(index as f32 * 0.5, 0.0, 0.0),
            Vec3::ONE,
        ));
        convoy.add_rider(id, index as f32 * stagger);
    }
    orchestrator.set_convoy(convoy);
    Ok(true)
}
