use diorama_engine::stage::{InstanceBuffer, Marker, PointLight};
use diorama_engine::swarm::LightSwarm;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn actors(count: usize) -> (Vec<Marker>, Vec<PointLight>, InstanceBuffer) {
    let markers = vec![Marker { position: Vec3::ZERO, radius: 0.01 }; count];
    let lights = (0..count)
        .map(|_| PointLight {
            color: Vec3::new(1.0, 0.0, 0.0),
            intensity: 0.25,
            position: Vec3::ZERO,
            range: 0.25,
        })
        .collect();
    (markers, lights, InstanceBuffer::new(count))
}

#[test]
fn construction_rejects_empty_swarms() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(LightSwarm::new(0, Vec3::ONE, 0.25, 0.1, Vec3::ZERO, &mut rng).is_err());
    assert!(LightSwarm::from_bases(Vec::new(), 0.1, Vec3::ZERO).is_err());
}

#[test]
fn generated_bases_stay_within_the_configured_ranges() {
    let mut rng = StdRng::seed_from_u64(42);
    let extent = Vec3::new(1.3, 1.3, 0.25);
    let swarm =
        LightSwarm::new(64, extent, 0.25, 0.1, Vec3::ZERO, &mut rng).expect("build swarm");
    for base in swarm.bases() {
        assert!(base.x >= -0.25 * 1.3 && base.x <= 0.75 * 1.3);
        assert!(base.y >= -0.25 * 1.3 && base.y <= 0.75 * 1.3);
        assert!(base.z >= -0.25 * 0.25 && base.z <= 0.75 * 0.25);
    }
}

#[test]
fn committed_positions_match_the_bob_formula() {
    let bases = vec![
        Vec3::new(0.2, -0.1, 0.0),
        Vec3::new(-0.4, 0.3, 0.1),
        Vec3::new(0.0, 0.0, -0.2),
    ];
    let translation = Vec3::new(-0.52, -0.2, -0.55);
    let amplitude = 0.1;
    let swarm = LightSwarm::from_bases(bases.clone(), amplitude, translation).expect("build swarm");
    let (mut markers, mut lights, mut buffer) = actors(bases.len());

    let elapsed = 1.75_f32;
    swarm.advance(elapsed, &mut markers, &mut lights, &mut buffer);

    for (index, base) in bases.iter().enumerate() {
        let bob = (elapsed * 2.0 + index as f32).sin() * amplitude;
        let expected = *base + Vec3::new(0.0, bob, 0.0) + swarm.translation();
        assert!(markers[index].position.distance(expected) < 1e-6);
        assert!(lights[index].position.distance(expected) < 1e-6);
        let committed = buffer.position_at(index).expect("slot written");
        assert!(committed.distance(expected) < 1e-6);
    }
}

#[test]
fn instances_do_not_couple_across_the_swarm() {
    let shared = Vec3::new(0.1, 0.2, 0.3);
    let a = LightSwarm::from_bases(vec![Vec3::ZERO, Vec3::ONE, shared], 0.1, Vec3::ZERO)
        .expect("build swarm");
    let b = LightSwarm::from_bases(vec![Vec3::splat(9.0), Vec3::splat(-3.0), shared], 0.1, Vec3::ZERO)
        .expect("build swarm");
    for elapsed in [0.0_f32, 0.5, 2.0, 31.4] {
        assert_eq!(
            a.bob_position(2, elapsed),
            b.bob_position(2, elapsed),
            "an instance's position depends only on its own base and the clock"
        );
    }
}

#[test]
fn buffer_commits_exactly_once_per_tick() {
    let swarm = LightSwarm::from_bases(vec![Vec3::ZERO; 10], 0.1, Vec3::ZERO).expect("build swarm");
    let (mut markers, mut lights, mut buffer) = actors(10);

    swarm.advance(0.1, &mut markers, &mut lights, &mut buffer);
    assert_eq!(buffer.commit_count(), 1, "ten slot writes commit once");
    assert!(buffer.is_dirty());
    assert_eq!(buffer.raw().len(), 10 * std::mem::size_of::<[[f32; 4]; 4]>());

    assert!(buffer.take_dirty());
    assert!(!buffer.is_dirty());

    swarm.advance(0.2, &mut markers, &mut lights, &mut buffer);
    assert_eq!(buffer.commit_count(), 2);
}
