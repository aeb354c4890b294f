/// Host-side resolve program
///
/// Mirrors `shaders/traa_resolve.wgsl` step for step so the CPU backend
/// produces the same image a GPU backend would.

use glam::{Vec2, Vec3, Vec4};
use crate::renderer::{FragmentProgram, TextureSampler};
use super::shader::{ResolveUniforms, WEIGHT_EPSILON};

/// Texture slot of the sample color
pub const SAMPLE_COLOR_SLOT: usize = 0;
/// Texture slot of the sample velocity
pub const VELOCITY_SLOT: usize = 1;
/// Texture slot of the sample depth
pub const DEPTH_SLOT: usize = 2;
/// Texture slot of the history color
pub const HISTORY_SLOT: usize = 3;

/// Rec.709 luma coefficients
pub const LUMINANCE_COEFFICIENTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Result of the 3x3 neighborhood scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    /// Component-wise minimum of the non-negative neighbor colors
    pub min_color: Vec4,
    /// Component-wise maximum of the non-negative neighbor colors
    pub max_color: Vec4,
    /// Smallest depth found
    pub closest_depth: f32,
    /// uv of the closest depth
    ///
    /// Among equal depths below 1.0 the first one visited in scan order
    /// wins. When every neighbor sits at depth 1.0 (nothing but far plane
    /// or cleared depth) no neighbor qualifies and this stays at the
    /// center uv, so velocity is read from the pixel being resolved.
    pub closest_uv: Vec2,
}

/// Scan the 3x3 neighborhood of `uv`, x outer and y inner.
///
/// The closest depth starts at the far plane (1.0) and only a strictly
/// smaller depth replaces it, so when nothing is closer than the far plane
/// the center pixel is used.
pub fn scan_neighborhood(textures: &dyn TextureSampler, uv: Vec2, inv_size: Vec2) -> Neighborhood {
    let mut hood = Neighborhood {
        min_color: Vec4::splat(10000.0),
        max_color: Vec4::splat(-10000.0),
        closest_depth: 1.0,
        closest_uv: uv,
    };

    for x in -1..=1 {
        for y in -1..=1 {
            let neighbor = uv + Vec2::new(x as f32, y as f32) * inv_size;
            let color = non_negative(textures.sample(SAMPLE_COLOR_SLOT, neighbor));
            hood.min_color = hood.min_color.min(color);
            hood.max_color = hood.max_color.max(color);

            let depth = textures.sample(DEPTH_SLOT, neighbor).x;
            if depth < hood.closest_depth {
                hood.closest_depth = depth;
                hood.closest_uv = neighbor;
            }
        }
    }

    hood
}

/// max(0, c) per component; NaN becomes 0
fn non_negative(color: Vec4) -> Vec4 {
    Vec4::new(color.x.max(0.0), color.y.max(0.0), color.z.max(0.0), color.w.max(0.0))
}

/// NDC displacement to uv displacement (y flips)
pub fn reprojection_offset(velocity: Vec4) -> Vec2 {
    Vec2::new(velocity.x, velocity.y) * Vec2::new(0.5, -0.5)
}

/// Clamp `color` into the box [`min`, `max`]; NaN components end up at `min`
pub fn clamp_to_box(color: Vec4, min: Vec4, max: Vec4) -> Vec4 {
    Vec4::new(
        color.x.max(min.x).min(max.x),
        color.y.max(min.y).min(max.y),
        color.z.max(min.z).min(max.z),
        color.w.max(min.w).min(max.w),
    )
}

/// x / (max(r, g, b) + 1)
pub fn tone_compress(color: Vec4) -> Vec4 {
    color / (color.x.max(color.y).max(color.z) + 1.0)
}

/// Rec.709 luminance
pub fn luminance(rgb: Vec3) -> f32 {
    rgb.dot(LUMINANCE_COEFFICIENTS)
}

/// Per-pixel blend weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub current: f32,
    pub history: f32,
}

/// Base weights divided by (1 + luminance) of each tone-compressed color
pub fn blend_weights(current: Vec4, history: Vec4, uniforms: &ResolveUniforms) -> BlendWeights {
    let current_luma = luminance(tone_compress(current).truncate());
    let history_luma = luminance(tone_compress(history).truncate());
    BlendWeights {
        current: uniforms.current_weight / (1.0 + current_luma),
        history: uniforms.history_weight / (1.0 + history_luma),
    }
}

/// Normalized weighted sum
pub fn blend(current: Vec4, history: Vec4, weights: BlendWeights) -> Vec4 {
    (current * weights.current + history * weights.history)
        / (weights.current + weights.history).max(WEIGHT_EPSILON)
}

/// Resolve one output pixel
pub fn resolve_pixel(textures: &dyn TextureSampler, uv: Vec2, uniforms: &ResolveUniforms) -> Vec4 {
    let hood = scan_neighborhood(textures, uv, uniforms.inv_size());

    let offset = reprojection_offset(textures.sample(VELOCITY_SLOT, hood.closest_uv));

    let current = textures.sample(SAMPLE_COLOR_SLOT, uv);
    let history = textures.sample(HISTORY_SLOT, uv - offset);
    let clamped = clamp_to_box(history, hood.min_color, hood.max_color);

    let weights = blend_weights(current, clamped, uniforms);
    blend(current, clamped, weights)
}

/// `FragmentProgram` running `resolve_pixel`
///
/// Reads a `ResolveUniforms` block from the material uniforms. A short
/// block falls back to default weights and the size of the sample texture.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveProgram;

impl FragmentProgram for ResolveProgram {
    fn shade(&self, uv: Vec2, uniforms: &[u8], textures: &dyn TextureSampler) -> Vec4 {
        let uniforms = bytemuck::try_pod_read_unaligned::<ResolveUniforms>(uniforms)
            .unwrap_or_else(|_| {
                let (width, height) = textures.size(SAMPLE_COLOR_SLOT);
                ResolveUniforms::new(width, height)
            });
        resolve_pixel(textures, uv, &uniforms)
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
