use diorama_engine::jitter::LightFlicker;
use diorama_engine::scene::{JitterData, SpotLightData};
use diorama_engine::stage::SpotLight;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn spotlight() -> SpotLight {
    SpotLight::from(&SpotLightData::default())
}

#[test]
fn intensity_samples_stay_within_the_spread() {
    let flicker = LightFlicker::new(0.5, 0.0005, 0.5);
    let mut light = spotlight();
    let mut rng = StdRng::seed_from_u64(99);
    let base = light.base_intensity;
    for _ in 0..2000 {
        flicker.advance(&mut rng, &mut light);
        assert!(light.intensity >= base - 0.25 - 1e-6);
        assert!(light.intensity <= base + 0.25 + 1e-6);
    }
}

#[test]
fn intensity_is_rederived_from_the_base_not_compounded() {
    let flicker = LightFlicker::new(0.5, 0.0, 0.5);
    let mut light = spotlight();
    let mut rng = StdRng::seed_from_u64(7);
    // Corrupt the live intensity; the next sample must still be in bounds.
    light.intensity = 10_000.0;
    flicker.advance(&mut rng, &mut light);
    assert!((light.intensity - light.base_intensity).abs() <= 0.25 + 1e-6);
}

#[test]
fn zero_spread_pins_intensity_to_the_base() {
    let flicker = LightFlicker::new(0.0, 0.0005, 0.5);
    let mut light = spotlight();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        flicker.advance(&mut rng, &mut light);
        assert_eq!(light.intensity, light.base_intensity);
    }
}

#[test]
fn position_drift_accumulates_across_ticks() {
    // Bias 0 makes every sample non-negative, so the walk is monotone.
    let flicker = LightFlicker::new(0.0, 0.1, 0.0);
    let mut light = spotlight();
    let start = light.position;
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        flicker.advance(&mut rng, &mut light);
    }
    assert!(light.position.x > start.x, "drift is incremental, not re-derived");
    assert!(light.position.y > start.y);
    assert!(light.position.z > start.z);

    // And it keeps going: drift has no decay or bound.
    let mid = light.position;
    for _ in 0..100 {
        flicker.advance(&mut rng, &mut light);
    }
    assert!(light.position.x > mid.x);
}

#[test]
fn bias_variant_is_configuration_not_code() {
    let data = JitterData { intensity_spread: 0.5, position_amount: 0.0005, position_bias: 0.3 };
    let flicker = LightFlicker::from(&data);
    let mut light = spotlight();
    let start = light.position;
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..5000 {
        flicker.advance(&mut rng, &mut light);
    }
    // With bias 0.3 the expected step is +0.2 * amount per axis per tick.
    assert!(light.position.x > start.x, "a 0.3 bias drifts positive on average");
}
