use diorama_engine::assets::TextureAsset;
use diorama_engine::flipbook::FlipbookAnimator;
use diorama_engine::stage::Material;
use std::sync::Arc;

fn frames(count: usize) -> Vec<Arc<TextureAsset>> {
    (0..count)
        .map(|_| Arc::new(TextureAsset { width: 1, height: 1, pixels: vec![0, 0, 0, 255] }))
        .collect()
}

fn shows_frame(material: &Material, frame: &Arc<TextureAsset>) -> bool {
    material.albedo.as_ref().is_some_and(|bound| Arc::ptr_eq(bound, frame))
        && material.emissive.as_ref().is_some_and(|bound| Arc::ptr_eq(bound, frame))
}

#[test]
fn construction_rejects_empty_sequences_and_bad_rates() {
    assert!(FlipbookAnimator::new(Vec::new(), 12.0, 0).is_err());
    assert!(FlipbookAnimator::new(frames(3), 0.0, 0).is_err());
    assert!(FlipbookAnimator::new(frames(3), -5.0, 0).is_err());
    assert!(FlipbookAnimator::new(frames(3), f32::NAN, 0).is_err());
}

#[test]
fn no_advance_before_the_frame_interval_elapses() {
    let sequence = frames(3);
    let mut animator = FlipbookAnimator::new(sequence, 12.0, 0).expect("build animator");
    let mut material = Material::emissive_surface();
    animator.advance(0.0, &mut material);
    animator.advance(50.0, &mut material);
    assert_eq!(animator.current_index(), 0, "interval has not elapsed yet");
    assert!(material.albedo.is_none(), "no frame should be bound yet");
}

#[test]
fn twelve_fps_sequence_steps_one_frame_per_tick() {
    let sequence = frames(3);
    let mut animator = FlipbookAnimator::new(sequence.clone(), 12.0, 0).expect("build animator");
    let mut material = Material::emissive_surface();
    assert_eq!(animator.frame_count(), 3);
    assert!((animator.frame_interval_ms() - 1000.0 / 12.0).abs() < 1e-9);

    // Three ticks spaced just past the 83.3ms interval.
    let mut indices = Vec::new();
    for now_ms in [84.0, 168.0, 252.0] {
        animator.advance(now_ms, &mut material);
        indices.push(animator.current_index());
    }
    assert_eq!(indices, vec![1, 2, 3], "one frame per tick at 12 fps spacing");
    assert!(shows_frame(&material, &sequence[2]), "last frame stays bound");

    // With no hold, the very next trigger restarts the sequence.
    animator.advance(336.0, &mut material);
    assert_eq!(animator.current_index(), 0);
    assert!(shows_frame(&material, &sequence[2]), "restart trigger does not rebind a frame");
    animator.advance(420.0, &mut material);
    assert!(shows_frame(&material, &sequence[0]), "next trigger shows the first frame again");
}

#[test]
fn hold_counts_triggers_before_restart() {
    let sequence = frames(3);
    let mut animator = FlipbookAnimator::new(sequence.clone(), 1000.0, 2).expect("build animator");
    let mut material = Material::emissive_surface();

    // Display all three frames.
    for now_ms in [1.0, 2.0, 3.0] {
        animator.advance(now_ms, &mut material);
    }
    assert_eq!(animator.current_index(), 3);
    assert_eq!(animator.hold_counter(), 2);

    // Two hold triggers keep the last frame bound and only count down.
    animator.advance(4.0, &mut material);
    animator.advance(5.0, &mut material);
    assert_eq!(animator.hold_counter(), 0);
    assert!(shows_frame(&material, &sequence[2]));

    // The next trigger restarts and reloads the hold counter.
    animator.advance(6.0, &mut material);
    assert_eq!(animator.current_index(), 0);
    assert_eq!(animator.hold_counter(), 2);

    animator.advance(7.0, &mut material);
    assert!(shows_frame(&material, &sequence[0]));
}

#[test]
fn animators_with_different_holds_share_no_state() {
    let sequence_a = frames(2);
    let sequence_b = frames(2);
    let mut short = FlipbookAnimator::new(sequence_a, 1000.0, 0).expect("build animator");
    let mut long = FlipbookAnimator::new(sequence_b, 1000.0, 48).expect("build animator");
    let mut material_a = Material::emissive_surface();
    let mut material_b = Material::emissive_surface();

    for step in 1..=6 {
        let now_ms = step as f64;
        short.advance(now_ms, &mut material_a);
        long.advance(now_ms, &mut material_b);
    }

    // short cycles twice: display, display, restart, display, display, restart.
    assert_eq!(short.current_index(), 0);
    assert_eq!(short.hold_counter(), 0);
    // long: 2 displays then four triggers spent counting its own hold.
    assert_eq!(long.current_index(), 2);
    assert_eq!(long.hold_counter(), 44);
}

#[test]
fn animators_at_different_rates_gate_independently() {
    let mut fast = FlipbookAnimator::new(frames(4), 100.0, 0).expect("build animator");
    let mut slow = FlipbookAnimator::new(frames(4), 10.0, 0).expect("build animator");
    let mut material_fast = Material::emissive_surface();
    let mut material_slow = Material::emissive_surface();

    for step in 1..=10 {
        let now_ms = step as f64 * 11.0;
        fast.advance(now_ms, &mut material_fast);
        slow.advance(now_ms, &mut material_slow);
    }

    assert!(fast.current_index() != slow.current_index() || fast.hold_counter() != slow.hold_counter());
    assert_eq!(slow.current_index(), 1, "the slow book only passed its gate once at 110ms");
}
