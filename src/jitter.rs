use crate::scene::JitterData;
use crate::stage::SpotLight;
use rand::Rng;

/// Per-tick flicker for one spotlight. Intensity is re-derived from the
/// light's constant base every call, so it always stays within
/// `base ± spread / 2`. Position drift is accumulated incrementally with no
/// decay or bound.
pub struct LightFlicker {
    intensity_spread: f32,
    position_amount: f32,
    position_bias: f32,
}

impl LightFlicker {
    pub fn new(intensity_spread: f32, position_amount: f32, position_bias: f32) -> Self {
        Self { intensity_spread, position_amount, position_bias }
    }

    pub fn advance<R: Rng>(&self, rng: &mut R, light: &mut SpotLight) {
        light.intensity = light.base_intensity + (rng.gen::<f32>() - 0.5) * self.intensity_spread;

        light.position.x += (rng.gen::<f32>() - self.position_bias) * self.position_amount;
        light.position.y += (rng.gen::<f32>() - self.position_bias) * self.position_amount;
        light.position.z += (rng.gen::<f32>() - self.position_bias) * self.position_amount;
    }
}

impl From<&JitterData> for LightFlicker {
    fn from(data: &JitterData) -> Self {
        Self::new(data.intensity_spread, data.position_amount, data.position_bias)
    }
}
