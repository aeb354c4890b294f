use glam::{Vec2, Vec3, Vec4};
use super::*;

// ============================================================================
// Synthetic 3x3 textures
// ============================================================================

/// Four 3x3 textures (color, velocity, depth, history), nearest, clamp to edge
struct Grid {
    slots: [[Vec4; 9]; 4],
}

impl Grid {
    fn uniform(color: Vec4, history: Vec4) -> Self {
        Self {
            slots: [
                [color; 9],
                [Vec4::ZERO; 9],
                [Vec4::splat(0.5); 9],
                [history; 9],
            ],
        }
    }

    /// Set texel (`x`, `y`) of `slot`, with (0, 0) the top-left texel
    fn set(&mut self, slot: usize, x: usize, y: usize, value: Vec4) {
        self.slots[slot][y * 3 + x] = value;
    }
}

impl TextureSampler for Grid {
    fn sample(&self, slot: usize, uv: Vec2) -> Vec4 {
        let x = ((uv.x * 3.0).floor() as i32).clamp(0, 2) as usize;
        let y = ((uv.y * 3.0).floor() as i32).clamp(0, 2) as usize;
        self.slots[slot][y * 3 + x]
    }

    fn size(&self, _slot: usize) -> (u32, u32) {
        (3, 3)
    }
}

const CENTER: Vec2 = Vec2::new(0.5, 0.5);
const INV_SIZE: Vec2 = Vec2::new(1.0 / 3.0, 1.0 / 3.0);

fn uniforms() -> ResolveUniforms {
    ResolveUniforms::new(3, 3)
}

fn assert_vec4_close(a: Vec4, b: Vec4) {
    assert!(a.abs_diff_eq(b, 1e-5), "{:?} != {:?}", a, b);
}

// ============================================================================
// Neighborhood scan
// ============================================================================

#[test]
fn test_neighborhood_box_covers_all_neighbors() {
    let mut grid = Grid::uniform(Vec4::splat(0.5), Vec4::ZERO);
    grid.set(SAMPLE_COLOR_SLOT, 0, 0, Vec4::new(0.1, 0.9, 0.5, 1.0));
    grid.set(SAMPLE_COLOR_SLOT, 2, 2, Vec4::new(0.8, 0.2, 0.5, 0.0));

    let hood = scan_neighborhood(&grid, CENTER, INV_SIZE);

    assert_vec4_close(hood.min_color, Vec4::new(0.1, 0.2, 0.5, 0.0));
    assert_vec4_close(hood.max_color, Vec4::new(0.8, 0.9, 0.5, 1.0));
}

#[test]
fn test_neighborhood_ignores_negative_and_nan() {
    let mut grid = Grid::uniform(Vec4::splat(0.5), Vec4::ZERO);
    grid.set(SAMPLE_COLOR_SLOT, 1, 0, Vec4::new(-4.0, f32::NAN, 0.5, 0.5));

    let hood = scan_neighborhood(&grid, CENTER, INV_SIZE);

    assert_eq!(hood.min_color, Vec4::new(0.0, 0.0, 0.5, 0.5));
    assert_eq!(hood.max_color, Vec4::splat(0.5));
}

#[test]
fn test_closest_depth_tie_picks_first_visited() {
    let mut grid = Grid::uniform(Vec4::ONE, Vec4::ONE);
    // Equal minima at (x = -1, y = +1) and (x = +1, y = -1); x is the outer loop
    grid.set(DEPTH_SLOT, 0, 2, Vec4::splat(0.1));
    grid.set(DEPTH_SLOT, 2, 0, Vec4::splat(0.1));

    let hood = scan_neighborhood(&grid, CENTER, INV_SIZE);

    assert_eq!(hood.closest_depth, 0.1);
    assert!(hood.closest_uv.abs_diff_eq(CENTER + Vec2::new(-1.0, 1.0) * INV_SIZE, 1e-6));
}

#[test]
fn test_closest_depth_strictly_smaller_wins() {
    let mut grid = Grid::uniform(Vec4::ONE, Vec4::ONE);
    grid.set(DEPTH_SLOT, 0, 0, Vec4::splat(0.3));
    grid.set(DEPTH_SLOT, 2, 1, Vec4::splat(0.2));

    let hood = scan_neighborhood(&grid, CENTER, INV_SIZE);

    assert_eq!(hood.closest_depth, 0.2);
    assert!(hood.closest_uv.abs_diff_eq(CENTER + Vec2::new(1.0, 0.0) * INV_SIZE, 1e-6));
}

#[test]
fn test_far_plane_neighborhood_keeps_center() {
    let mut grid = Grid::uniform(Vec4::ONE, Vec4::ONE);
    grid.slots[DEPTH_SLOT] = [Vec4::ONE; 9];

    let hood = scan_neighborhood(&grid, CENTER, INV_SIZE);

    assert_eq!(hood.closest_depth, 1.0);
    assert_eq!(hood.closest_uv, CENTER);
}

// ============================================================================
// Building blocks
// ============================================================================

#[test]
fn test_reprojection_offset_flips_y() {
    let offset = reprojection_offset(Vec4::new(0.2, 0.4, 9.0, 9.0));
    assert_eq!(offset, Vec2::new(0.1, -0.2));
}

#[test]
fn test_clamp_to_box() {
    let min = Vec4::splat(0.2);
    let max = Vec4::splat(0.6);

    assert_eq!(clamp_to_box(Vec4::new(0.0, 0.4, 1.0, 0.6), min, max), Vec4::new(0.2, 0.4, 0.6, 0.6));
    assert_eq!(clamp_to_box(Vec4::splat(f32::NAN), min, max), min);
}

#[test]
fn test_tone_compress() {
    let compressed = tone_compress(Vec4::new(3.0, 1.0, 0.0, 1.0));
    assert_vec4_close(compressed, Vec4::new(0.75, 0.25, 0.0, 0.25));
    assert_eq!(tone_compress(Vec4::ZERO), Vec4::ZERO);
}

#[test]
fn test_luminance_coefficients() {
    assert!((luminance(Vec3::ONE) - 1.0).abs() < 1e-6);
    assert!((luminance(Vec3::Y) - 0.7152).abs() < 1e-6);
}

#[test]
fn test_blend_weights_favor_history() {
    let weights = blend_weights(Vec4::ZERO, Vec4::ZERO, &uniforms());
    assert!((weights.current - 0.05).abs() < 1e-6);
    assert!((weights.history - 0.95).abs() < 1e-6);
}

#[test]
fn test_bright_current_is_down_weighted() {
    let dark = blend_weights(Vec4::ZERO, Vec4::ZERO, &uniforms());
    let bright = blend_weights(Vec4::new(100.0, 100.0, 100.0, 1.0), Vec4::ZERO, &uniforms());
    assert!(bright.current < dark.current);
    assert_eq!(bright.history, dark.history);
}

#[test]
fn test_blend_is_convex() {
    let pairs = [
        (Vec4::new(1.0, 0.0, 0.5, 1.0), Vec4::new(0.0, 1.0, 0.5, 1.0)),
        (Vec4::new(8.0, 2.0, 0.1, 1.0), Vec4::new(0.2, 0.3, 0.4, 0.0)),
        (Vec4::ZERO, Vec4::splat(3.0)),
    ];

    for (current, history) in pairs {
        let weights = blend_weights(current, history, &uniforms());
        let out = blend(current, history, weights);
        let lo = current.min(history) - Vec4::splat(1e-5);
        let hi = current.max(history) + Vec4::splat(1e-5);
        assert!(out.cmpge(lo).all() && out.cmple(hi).all(), "{:?} outside [{:?}, {:?}]", out, lo, hi);
    }
}

#[test]
fn test_blend_with_zero_weights_is_finite() {
    let out = blend(Vec4::ONE, Vec4::ONE, BlendWeights { current: 0.0, history: 0.0 });
    assert_eq!(out, Vec4::ZERO);
}

// ============================================================================
// Full pixel
// ============================================================================

#[test]
fn test_resolve_converged_pixel_is_stable() {
    let color = Vec4::new(0.3, 0.6, 0.9, 1.0);
    let grid = Grid::uniform(color, color);

    let out = resolve_pixel(&grid, CENTER, &uniforms());
    assert_vec4_close(out, color);
}

#[test]
fn test_resolve_clamps_ghost_history() {
    let color = Vec4::new(0.2, 0.2, 0.2, 1.0);
    let grid = Grid::uniform(color, Vec4::new(5.0, 0.0, 5.0, 1.0));

    let out = resolve_pixel(&grid, CENTER, &uniforms());

    // The history is pulled into the single-color box, so nothing else survives
    assert_vec4_close(out, color);
}

#[test]
fn test_resolve_follows_closest_velocity() {
    let mut grid = Grid::uniform(Vec4::splat(0.5), Vec4::splat(0.5));
    grid.set(SAMPLE_COLOR_SLOT, 0, 1, Vec4::new(0.0, 0.0, 0.0, 0.5));
    grid.set(SAMPLE_COLOR_SLOT, 2, 1, Vec4::new(1.0, 1.0, 1.0, 0.5));
    // History differs left and right of the center
    grid.set(HISTORY_SLOT, 0, 1, Vec4::new(0.0, 0.0, 0.0, 0.5));
    grid.set(HISTORY_SLOT, 2, 1, Vec4::new(1.0, 1.0, 1.0, 0.5));

    // The closest sample (center right) moved by one texel to the right:
    // 2/3 NDC horizontally is 1/3 uv, so history is fetched one texel left
    grid.set(DEPTH_SLOT, 2, 1, Vec4::splat(0.1));
    grid.set(VELOCITY_SLOT, 2, 1, Vec4::new(2.0 / 3.0, 0.0, 0.0, 0.0));

    let out = resolve_pixel(&grid, CENTER, &uniforms());

    // current 0.5, history 0.0 (left texel): the result lies between them
    assert!(out.x < 0.5 && out.x > 0.0, "out = {:?}", out);
}

#[test]
fn test_program_reads_uniform_block() {
    let color = Vec4::new(0.4, 0.4, 0.4, 1.0);
    let grid = Grid::uniform(color, Vec4::ZERO);

    let mut block = uniforms();
    block.current_weight = 1.0;
    block.history_weight = 0.0;

    let out = ResolveProgram.shade(CENTER, bytemuck::bytes_of(&block), &grid);
    assert_vec4_close(out, color);
}

#[test]
fn test_program_falls_back_on_short_uniforms() {
    let color = Vec4::new(0.4, 0.4, 0.4, 1.0);
    let grid = Grid::uniform(color, color);

    let out = ResolveProgram.shade(CENTER, &[], &grid);
    assert_vec4_close(out, color);
}
