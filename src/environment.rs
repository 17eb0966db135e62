use crate::assets::TextureAsset;
use crate::scene::StarfieldData;
use image::{Rgba, RgbaImage};
use rand::Rng;
use std::sync::Arc;

/// Generates the equirectangular star backdrop: random white points of
/// varying size and brightness over black. The result doubles as the scene's
/// background and its environment reflection source.
pub fn generate_starfield<R: Rng>(params: &StarfieldData, rng: &mut R) -> Arc<TextureAsset> {
    let width = params.width.max(1);
    let height = params.height.max(1);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));

    for _ in 0..params.stars {
        let x = rng.gen::<f32>() * width as f32;
        let y = rng.gen::<f32>() * height as f32;
        let radius = rng.gen::<f32>() * params.max_radius;
        let brightness = rng.gen::<f32>();
        draw_star(&mut canvas, x, y, radius, brightness);
    }

    Arc::new(TextureAsset { width, height, pixels: canvas.into_raw() })
}

fn draw_star(canvas: &mut RgbaImage, cx: f32, cy: f32, radius: f32, brightness: f32) {
    let (width, height) = canvas.dimensions();
    let value = (brightness.clamp(0.0, 1.0) * 255.0).round() as u8;
    // Sub-texel stars still land on one texel.
    let reach = radius.max(0.5);
    let min_x = (cx - reach).floor().max(0.0) as u32;
    let max_x = ((cx + reach).ceil() as u32).min(width.saturating_sub(1));
    let min_y = (cy - reach).floor().max(0.0) as u32;
    let max_y = ((cy + reach).ceil() as u32).min(height.saturating_sub(1));

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy > reach * reach {
                continue;
            }
            let pixel = canvas.get_pixel_mut(px, py);
            // Overlapping stars keep the brighter value.
            let lit = pixel.0[0].max(value);
            *pixel = Rgba([lit, lit, lit, 255]);
        }
    }
}
