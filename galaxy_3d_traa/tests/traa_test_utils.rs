#![allow(dead_code)]
//! Shared fixtures for TRAA integration tests
//!
//! Everything runs on the CPU reference backend, no GPU required.

use galaxy_3d_traa::galaxy3d::camera::Camera;
use galaxy_3d_traa::galaxy3d::render::{
    CpuRenderer, FullscreenMaterial, Mrt, RenderTargetDesc, RenderTargetInfo, RenderTargetKey,
    Renderer, ShaderDesc, ShaderKey, TextureFormat, TextureRef,
};
use galaxy_3d_traa::galaxy3d::scene::{Quad, QuadScene, Scene};
use galaxy_3d_traa::galaxy3d::traa::{TraaConfig, TraaPass, TraaPassDesc};
use galaxy_3d_traa::galaxy3d::{Error, Result};
use galaxy_3d_traa::glam::{Mat4, Vec2, Vec3, Vec4};
use std::sync::{Arc, Mutex};

pub const BACKDROP: Vec4 = Vec4::new(0.2, 0.4, 0.6, 1.0);
pub const CARD: Vec4 = Vec4::new(1.0, 0.8, 0.1, 1.0);

/// 90 degree camera at the origin looking down -Z
pub fn test_camera() -> Camera {
    Camera::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
}

/// Full-screen backdrop with a smaller card in front of it
pub fn test_scene() -> QuadScene {
    let mut scene = QuadScene::new();
    scene.add_quad(Quad::new(Vec3::new(0.0, 0.0, -5.0), Vec2::splat(50.0), BACKDROP));
    scene.add_quad(Quad::new(Vec3::new(0.3, 0.1, -2.0), Vec2::new(0.7, 0.5), CARD));
    scene
}

/// Full-screen backdrop only
pub fn flat_scene() -> QuadScene {
    let mut scene = QuadScene::new();
    scene.add_quad(Quad::new(Vec3::new(0.0, 0.0, -5.0), Vec2::splat(50.0), BACKDROP));
    scene
}

/// Pass plus typed handles on what it shares with the host
pub struct Harness<R: Renderer + 'static> {
    pub renderer: Arc<Mutex<R>>,
    pub camera: Arc<Mutex<Camera>>,
    pub pass: TraaPass,
}

pub fn harness_with<R: Renderer + 'static>(renderer: R, scene: impl Scene + 'static, config: TraaConfig) -> Harness<R> {
    let renderer = Arc::new(Mutex::new(renderer));
    let shared: Arc<Mutex<dyn Renderer>> = renderer.clone();
    let camera = Arc::new(Mutex::new(test_camera()));

    let pass = TraaPass::from_desc(TraaPassDesc {
        renderer: shared,
        scene: Arc::new(scene),
        camera: camera.clone(),
        mrt: Some(Mrt::output_velocity()),
        format: TextureFormat::R16G16B16A16_SFLOAT,
        config,
    })
    .expect("pass construction");

    Harness { renderer, camera, pass }
}

pub fn harness(width: u32, height: u32) -> Harness<CpuRenderer> {
    harness_with(CpuRenderer::new(width, height), test_scene(), TraaConfig::default())
}

pub fn texels(renderer: &Arc<Mutex<CpuRenderer>>, texture: TextureRef) -> Vec<Vec4> {
    renderer
        .lock()
        .unwrap()
        .texture(texture)
        .expect("texture exists")
        .texels()
        .to_vec()
}

// ============================================================================
// FailingRenderer
// ============================================================================

/// CPU renderer whose `render` can be made to fail
pub struct FailingRenderer {
    pub inner: CpuRenderer,
    pub fail_render: bool,
}

impl FailingRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { inner: CpuRenderer::new(width, height), fail_render: false }
    }
}

impl Renderer for FailingRenderer {
    fn size(&self) -> (u32, u32) { self.inner.size() }
    fn pixel_ratio(&self) -> f32 { self.inner.pixel_ratio() }
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetKey> {
        self.inner.create_render_target(desc)
    }
    fn resize_render_target(&mut self, target: RenderTargetKey, width: u32, height: u32) -> Result<()> {
        self.inner.resize_render_target(target, width, height)
    }
    fn destroy_render_target(&mut self, target: RenderTargetKey) { self.inner.destroy_render_target(target) }
    fn render_target_info(&self, target: RenderTargetKey) -> Option<RenderTargetInfo> {
        self.inner.render_target_info(target)
    }
    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderKey> { self.inner.create_shader(desc) }
    fn destroy_shader(&mut self, shader: ShaderKey) { self.inner.destroy_shader(shader) }
    fn render_target(&self) -> Option<RenderTargetKey> { self.inner.render_target() }
    fn set_render_target(&mut self, target: Option<RenderTargetKey>) -> Result<()> {
        self.inner.set_render_target(target)
    }
    fn mrt(&self) -> Option<Mrt> { self.inner.mrt() }
    fn set_mrt(&mut self, mrt: Option<Mrt>) { self.inner.set_mrt(mrt) }
    fn clear_color(&self) -> Vec4 { self.inner.clear_color() }
    fn set_clear_color(&mut self, color: Vec4) { self.inner.set_clear_color(color) }
    fn velocity_projection(&self) -> Option<Mat4> { self.inner.velocity_projection() }
    fn set_velocity_projection(&mut self, projection: Option<Mat4>) {
        self.inner.set_velocity_projection(projection)
    }
    fn clear(&mut self) -> Result<()> { self.inner.clear() }
    fn render(&mut self, scene: &dyn Scene, camera: &Camera) -> Result<()> {
        if self.fail_render {
            return Err(Error::BackendError("device lost".to_string()));
        }
        self.inner.render(scene, camera)
    }
    fn draw_fullscreen(&mut self, material: &FullscreenMaterial) -> Result<()> {
        self.inner.draw_fullscreen(material)
    }
    fn copy_texture_to_texture(&mut self, src: TextureRef, dst: TextureRef) -> Result<()> {
        self.inner.copy_texture_to_texture(src, dst)
    }
}
