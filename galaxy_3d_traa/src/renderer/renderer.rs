/// Renderer trait - the host engine interface the TRAA pass draws through

use glam::{Mat4, Vec4};
use crate::camera::Camera;
use crate::error::Result;
use crate::scene::Scene;
use crate::renderer::{
    FullscreenMaterial, Mrt, RenderTargetDesc, RenderTargetInfo, RenderTargetKey, ShaderDesc,
    ShaderKey, TextureRef,
};

// ============================================================================
// Renderer trait
// ============================================================================

/// Host renderer interface
///
/// Implemented by backends (e.g., `CpuRenderer`). Besides resource
/// creation it exposes the mutable state a pass changes while recording
/// a frame: bound render target, MRT, clear color and the projection
/// used to compute velocities.
pub trait Renderer: Send + Sync {
    // ===== FRAME SIZE =====

    /// Drawing buffer size in logical pixels
    fn size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel
    fn pixel_ratio(&self) -> f32;

    // ===== RESOURCES =====

    /// Create a render target
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetKey>;

    /// Resize a render target in place (contents are discarded)
    fn resize_render_target(&mut self, target: RenderTargetKey, width: u32, height: u32) -> Result<()>;

    /// Destroy a render target (no-op for unknown keys)
    fn destroy_render_target(&mut self, target: RenderTargetKey);

    /// Properties of a render target
    fn render_target_info(&self, target: RenderTargetKey) -> Option<RenderTargetInfo>;

    /// Create a shader module
    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderKey>;

    /// Destroy a shader module (no-op for unknown keys)
    fn destroy_shader(&mut self, shader: ShaderKey);

    // ===== STATE =====

    /// Currently bound render target (None = default framebuffer)
    fn render_target(&self) -> Option<RenderTargetKey>;

    /// Bind a render target
    fn set_render_target(&mut self, target: Option<RenderTargetKey>) -> Result<()>;

    /// Current MRT configuration
    fn mrt(&self) -> Option<Mrt>;

    /// Set the MRT configuration used by `render`
    fn set_mrt(&mut self, mrt: Option<Mrt>);

    /// Clear color (RGB) and alpha (W)
    fn clear_color(&self) -> Vec4;

    /// Set the clear color (RGB) and alpha (W)
    fn set_clear_color(&mut self, color: Vec4);

    /// Projection used by the velocity channel instead of the camera's
    fn velocity_projection(&self) -> Option<Mat4>;

    /// Override the projection used by the velocity channel
    ///
    /// Velocity is the NDC displacement of each surface point between its
    /// previous and current world position, both projected through this
    /// projection and the current view matrix. It captures object motion
    /// only: camera movement between frames does not show up in it.
    fn set_velocity_projection(&mut self, projection: Option<Mat4>);

    // ===== COMMANDS =====

    /// Clear every attachment of the bound target (colors to the clear color, depth to 1)
    fn clear(&mut self) -> Result<()>;

    /// Render `scene` from `camera` into the bound target, writing the MRT channels
    fn render(&mut self, scene: &dyn Scene, camera: &Camera) -> Result<()>;

    /// Draw a full-screen material into color attachment 0 of the bound target
    fn draw_fullscreen(&mut self, material: &FullscreenMaterial) -> Result<()>;

    /// Raw texel copy between two attachments of identical size and format
    fn copy_texture_to_texture(&mut self, src: TextureRef, dst: TextureRef) -> Result<()>;
}

// ============================================================================
// Renderer state snapshot
// ============================================================================

/// Snapshot of the renderer state a pass is allowed to change
#[derive(Debug, Clone, PartialEq)]
pub struct RendererState {
    pub render_target: Option<RenderTargetKey>,
    pub mrt: Option<Mrt>,
    pub clear_color: Vec4,
    pub velocity_projection: Option<Mat4>,
}

impl RendererState {
    /// Capture the current state of `renderer`
    pub fn capture(renderer: &dyn Renderer) -> Self {
        Self {
            render_target: renderer.render_target(),
            mrt: renderer.mrt(),
            clear_color: renderer.clear_color(),
            velocity_projection: renderer.velocity_projection(),
        }
    }

    /// Write this state back into `renderer`
    pub fn restore(&self, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.set_mrt(self.mrt);
        renderer.set_clear_color(self.clear_color);
        renderer.set_velocity_projection(self.velocity_projection);
        renderer.set_render_target(self.render_target)
    }
}
