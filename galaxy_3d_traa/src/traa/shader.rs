/// Resolve shader source and its uniform block

use glam::Vec2;

/// WGSL source of the resolve pass (`vs_main` / `fs_main`)
///
/// Bindings: 0 uniforms, 1 sample color, 2 sample velocity, 3 sample depth,
/// 4 history color, 5 point sampler, 6 linear sampler.
pub const TRAA_RESOLVE_WGSL: &str = include_str!("shaders/traa_resolve.wgsl");

/// Vertex entry point
pub const RESOLVE_VERTEX_ENTRY: &str = "vs_main";

/// Fragment entry point
pub const RESOLVE_FRAGMENT_ENTRY: &str = "fs_main";

/// Base weight of the current sample
pub const CURRENT_WEIGHT: f32 = 0.05;

/// Base weight of the clamped history
pub const HISTORY_WEIGHT: f32 = 1.0 - CURRENT_WEIGHT;

/// Lower bound of the combined weight
pub const WEIGHT_EPSILON: f32 = 1e-5;

/// Uniform block of the resolve pass, laid out for GPU consumption.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ResolveUniforms {
    /// 1 / buffer size in texels
    pub inv_size: [f32; 2],
    /// Camera near plane
    pub camera_near: f32,
    /// Camera far plane
    pub camera_far: f32,
    /// Base weight of the current sample
    pub current_weight: f32,
    /// Base weight of the clamped history
    pub history_weight: f32,
    pub _padding: [f32; 2],
}

impl ResolveUniforms {
    /// Uniforms for a `width` x `height` buffer with the default weights
    pub fn new(width: u32, height: u32) -> Self {
        let mut uniforms = Self {
            inv_size: [0.0; 2],
            camera_near: 0.0,
            camera_far: 0.0,
            current_weight: CURRENT_WEIGHT,
            history_weight: HISTORY_WEIGHT,
            _padding: [0.0; 2],
        };
        uniforms.set_size(width, height);
        uniforms
    }

    /// Update the inverse size
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.inv_size = [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32];
    }

    /// Update the camera planes
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.camera_near = near;
        self.camera_far = far;
    }

    pub fn inv_size(&self) -> Vec2 {
        Vec2::from(self.inv_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shader_validates() {
        let module = naga::front::wgsl::parse_str(TRAA_RESOLVE_WGSL)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(TRAA_RESOLVE_WGSL)));

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{:?}", e));

        let stage_of = |name: &str| {
            module.entry_points.iter().find(|ep| ep.name == name).map(|ep| ep.stage)
        };
        assert_eq!(stage_of(RESOLVE_VERTEX_ENTRY), Some(naga::ShaderStage::Vertex));
        assert_eq!(stage_of(RESOLVE_FRAGMENT_ENTRY), Some(naga::ShaderStage::Fragment));
    }

    #[test]
    fn test_uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<ResolveUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_inverse_size() {
        let uniforms = ResolveUniforms::new(4, 8);
        assert_eq!(uniforms.inv_size(), Vec2::new(0.25, 0.125));
        assert!((uniforms.current_weight + uniforms.history_weight - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniforms_bytes_round_trip() {
        let mut uniforms = ResolveUniforms::new(16, 16);
        uniforms.set_clip_planes(0.1, 100.0);
        let bytes = bytemuck::bytes_of(&uniforms);
        let read: ResolveUniforms = bytemuck::pod_read_unaligned(bytes);
        assert_eq!(read, uniforms);
    }
}
