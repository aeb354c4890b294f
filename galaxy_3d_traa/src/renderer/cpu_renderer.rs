/// CPU reference backend
///
/// Executes everything on the host: scenes are ray traced one ray per pixel,
/// full-screen materials run their `FragmentProgram` once per pixel. Slow,
/// but deterministic and available without a GPU, which makes it the
/// backend used by the test suite.

use glam::{Mat4, Vec2, Vec3, Vec4};
use slotmap::SlotMap;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::scene::{Ray, Scene};
use crate::{engine_bail, engine_debug, engine_error};
use super::cpu_texture::CpuTexture;
use super::material::{FullscreenMaterial, ShaderDesc, ShaderKey, TextureSampler};
use super::mrt::{Channel, ChannelFlags, Mrt};
use super::render_target::{RenderTargetDesc, RenderTargetInfo, RenderTargetKey};
use super::renderer::Renderer;
use super::texture::{Attachment, FilterMode, TextureFormat, TextureRef};

const SOURCE: &str = "galaxy3d::CpuRenderer";

// ============================================================================
// Render target storage
// ============================================================================

#[derive(Debug, Clone)]
struct CpuRenderTarget {
    info: RenderTargetInfo,
    colors: Vec<CpuTexture>,
    depth: Option<CpuTexture>,
}

impl CpuRenderTarget {
    fn new(desc: &RenderTargetDesc) -> Self {
        let colors = (0..desc.color_attachments)
            .map(|_| CpuTexture::new(desc.width, desc.height, desc.format, desc.min_filter, desc.mag_filter))
            .collect();
        let depth = desc.depth.then(|| {
            CpuTexture::new(desc.width, desc.height, TextureFormat::D32_FLOAT, FilterMode::Nearest, FilterMode::Nearest)
        });

        Self {
            info: RenderTargetInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                color_attachments: desc.color_attachments,
                depth: desc.depth,
                min_filter: desc.min_filter,
                mag_filter: desc.mag_filter,
            },
            colors,
            depth,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.info.width = width;
        self.info.height = height;
        for color in &mut self.colors {
            color.resize(width, height);
        }
        if let Some(depth) = self.depth.as_mut() {
            depth.resize(width, height);
        }
    }

    fn attachment(&self, attachment: Attachment) -> Option<&CpuTexture> {
        match attachment {
            Attachment::Color(index) => self.colors.get(index as usize),
            Attachment::Depth => self.depth.as_ref(),
        }
    }

    fn attachment_mut(&mut self, attachment: Attachment) -> Option<&mut CpuTexture> {
        match attachment {
            Attachment::Color(index) => self.colors.get_mut(index as usize),
            Attachment::Depth => self.depth.as_mut(),
        }
    }
}

// ============================================================================
// Texture bindings
// ============================================================================

/// Textures bound to a full-screen draw
struct BoundTextures<'a> {
    textures: Vec<&'a CpuTexture>,
}

impl TextureSampler for BoundTextures<'_> {
    fn sample(&self, slot: usize, uv: Vec2) -> Vec4 {
        self.textures.get(slot).map_or(Vec4::ZERO, |t| t.sample(uv))
    }

    fn size(&self, slot: usize) -> (u32, u32) {
        self.textures.get(slot).map_or((0, 0), |t| (t.width(), t.height()))
    }
}

// ============================================================================
// CpuRenderer
// ============================================================================

/// Host-side implementation of `Renderer`
pub struct CpuRenderer {
    width: u32,
    height: u32,
    pixel_ratio: f32,
    screen: CpuRenderTarget,
    targets: SlotMap<RenderTargetKey, CpuRenderTarget>,
    shaders: SlotMap<ShaderKey, ShaderDesc>,
    current_target: Option<RenderTargetKey>,
    mrt: Option<Mrt>,
    clear_color: Vec4,
    velocity_projection: Option<Mat4>,
    draw_count: u64,
}

impl CpuRenderer {
    /// Create a renderer with a `width` x `height` drawing buffer (pixel ratio 1)
    pub fn new(width: u32, height: u32) -> Self {
        let desc = RenderTargetDesc::new(width, height, TextureFormat::R8G8B8A8_UNORM);
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            screen: CpuRenderTarget::new(&desc),
            targets: SlotMap::with_key(),
            shaders: SlotMap::with_key(),
            current_target: None,
            mrt: None,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            velocity_projection: None,
            draw_count: 0,
        }
    }

    /// Same renderer with a different pixel ratio
    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.set_pixel_ratio(pixel_ratio);
        self
    }

    /// Resize the drawing buffer (logical pixels)
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resize_screen();
    }

    /// Change the number of physical pixels per logical pixel
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
        self.resize_screen();
    }

    fn resize_screen(&mut self) {
        let width = ((self.width as f32 * self.pixel_ratio).floor() as u32).max(1);
        let height = ((self.height as f32 * self.pixel_ratio).floor() as u32).max(1);
        self.screen.resize(width, height);
    }

    // ===== INSPECTION =====

    /// Texture behind `texture`, if it exists
    pub fn texture(&self, texture: TextureRef) -> Option<&CpuTexture> {
        self.targets.get(texture.target)?.attachment(texture.attachment)
    }

    /// Color buffer of the default framebuffer
    pub fn screen(&self) -> &CpuTexture {
        &self.screen.colors[0]
    }

    /// Number of live render targets
    pub fn render_target_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of live shader modules
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of `render` and `draw_fullscreen` calls so far
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    // ===== INTERNAL HELPERS =====

    fn bound_target_mut(&mut self) -> Result<&mut CpuRenderTarget> {
        match self.current_target {
            None => Ok(&mut self.screen),
            Some(key) => self.targets.get_mut(key).ok_or_else(|| unknown_target(key)),
        }
    }

    fn bound_target(&self) -> Result<&CpuRenderTarget> {
        match self.current_target {
            None => Ok(&self.screen),
            Some(key) => self.targets.get(key).ok_or_else(|| unknown_target(key)),
        }
    }

    fn resolve_texture(&self, texture: TextureRef) -> Result<&CpuTexture> {
        let target = self.targets.get(texture.target).ok_or_else(|| unknown_target(texture.target))?;
        target.attachment(texture.attachment).ok_or_else(|| {
            engine_error!(SOURCE, "Render target {:?} has no attachment {:?}", texture.target, texture.attachment);
            Error::InvalidResource(format!("missing attachment {:?}", texture.attachment))
        })
    }
}

fn unknown_target(key: RenderTargetKey) -> Error {
    engine_error!(SOURCE, "Unknown render target {:?}", key);
    Error::InvalidResource(format!("render target {:?}", key))
}

/// Perspective divide to NDC xy
fn ndc_xy(clip: Vec4) -> Vec2 {
    Vec2::new(clip.x, clip.y) / clip.w
}

impl Renderer for CpuRenderer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetKey> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(SOURCE, "Render target size must be non-zero, got {}x{}", desc.width, desc.height);
        }
        if desc.color_attachments == 0 {
            engine_bail!(SOURCE, "Render target needs at least one color attachment");
        }
        if desc.format.is_depth() {
            engine_bail!(SOURCE, "Color attachments cannot use depth format {:?}", desc.format);
        }

        let key = self.targets.insert(CpuRenderTarget::new(desc));
        engine_debug!(SOURCE, "Created render target {:?} ({}x{}, {:?} x{})",
            key, desc.width, desc.height, desc.format, desc.color_attachments);
        Ok(key)
    }

    fn resize_render_target(&mut self, target: RenderTargetKey, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            engine_bail!(SOURCE, "Render target size must be non-zero, got {}x{}", width, height);
        }
        let entry = self.targets.get_mut(target).ok_or_else(|| unknown_target(target))?;
        entry.resize(width, height);
        Ok(())
    }

    fn destroy_render_target(&mut self, target: RenderTargetKey) {
        if self.targets.remove(target).is_some() && self.current_target == Some(target) {
            self.current_target = None;
        }
    }

    fn render_target_info(&self, target: RenderTargetKey) -> Option<RenderTargetInfo> {
        self.targets.get(target).map(|t| t.info)
    }

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderKey> {
        if desc.source.trim().is_empty() {
            engine_bail!(SOURCE, "Shader '{}' has no source", desc.name);
        }
        if !desc.source.contains(desc.entry_point.as_str()) {
            engine_bail!(SOURCE, "Shader '{}' has no entry point '{}'", desc.name, desc.entry_point);
        }
        Ok(self.shaders.insert(desc.clone()))
    }

    fn destroy_shader(&mut self, shader: ShaderKey) {
        self.shaders.remove(shader);
    }

    fn render_target(&self) -> Option<RenderTargetKey> {
        self.current_target
    }

    fn set_render_target(&mut self, target: Option<RenderTargetKey>) -> Result<()> {
        if let Some(key) = target {
            if !self.targets.contains_key(key) {
                return Err(unknown_target(key));
            }
        }
        self.current_target = target;
        Ok(())
    }

    fn mrt(&self) -> Option<Mrt> {
        self.mrt
    }

    fn set_mrt(&mut self, mrt: Option<Mrt>) {
        self.mrt = mrt;
    }

    fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    fn velocity_projection(&self) -> Option<Mat4> {
        self.velocity_projection
    }

    fn set_velocity_projection(&mut self, projection: Option<Mat4>) {
        self.velocity_projection = projection;
    }

    fn clear(&mut self) -> Result<()> {
        let color = self.clear_color;
        let target = self.bound_target_mut()?;
        for attachment in &mut target.colors {
            attachment.fill(color);
        }
        if let Some(depth) = target.depth.as_mut() {
            depth.fill(Vec4::ONE);
        }
        Ok(())
    }

    fn render(&mut self, scene: &dyn Scene, camera: &Camera) -> Result<()> {
        let mrt = self.mrt.unwrap_or_else(|| Mrt::new(ChannelFlags::empty()));
        let velocity_projection = self.velocity_projection.unwrap_or(*camera.projection_matrix());

        let view = *camera.view_matrix();
        let view_inverse = view.inverse();
        let clip_from_world = *camera.projection_matrix() * view;
        let clip_to_world = view_inverse * *camera.projection_matrix_inverse();
        let velocity_from_world = velocity_projection * view;

        let target = self.bound_target_mut()?;
        if mrt.channel_count() > target.info.color_attachments {
            engine_bail!(SOURCE, "MRT writes {} channels but the render target has {} color attachments",
                mrt.channel_count(), target.info.color_attachments);
        }

        let (width, height) = (target.info.width, target.info.height);
        let channels: Vec<(Channel, usize)> = mrt
            .channels()
            .filter_map(|c| mrt.index_of(c).map(|i| (c, i as usize)))
            .collect();

        for y in 0..height {
            for x in 0..width {
                let ndc = Vec2::new(
                    (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
                    1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
                );
                let near = clip_to_world.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
                let far = clip_to_world.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
                let ray = Ray { origin: near, direction: (far - near).normalize() };

                let Some(hit) = scene.trace(&ray) else {
                    continue;
                };

                let clip = clip_from_world * hit.position.extend(1.0);
                let depth = clip.z / clip.w;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }
                if let Some(depth_buffer) = target.depth.as_mut() {
                    if depth >= depth_buffer.load(x as i64, y as i64).x {
                        continue;
                    }
                    depth_buffer.store(x, y, Vec4::splat(depth));
                }

                for &(channel, index) in &channels {
                    let value = match channel {
                        Channel::Output => hit.color,
                        Channel::Velocity => {
                            let current = ndc_xy(velocity_from_world * hit.position.extend(1.0));
                            let previous = ndc_xy(velocity_from_world * hit.previous_position.extend(1.0));
                            (current - previous).extend(0.0).extend(1.0)
                        }
                        Channel::Normal => hit.normal.extend(0.0),
                        Channel::Emissive => hit.emissive.extend(1.0),
                    };
                    target.colors[index].store(x, y, value);
                }
            }
        }

        self.draw_count += 1;
        Ok(())
    }

    fn draw_fullscreen(&mut self, material: &FullscreenMaterial) -> Result<()> {
        if !self.shaders.contains_key(material.shader) {
            engine_bail!(SOURCE, "Material '{}' uses an unknown shader", material.name);
        }
        if let Some(current) = self.current_target {
            let destination = TextureRef::color(current, 0);
            if material.textures.contains(&destination) {
                engine_bail!(SOURCE, "Material '{}' samples the attachment it draws into", material.name);
            }
        }

        let (width, height) = {
            let target = self.bound_target()?;
            (target.info.width, target.info.height)
        };

        let textures = material
            .textures
            .iter()
            .map(|t| self.resolve_texture(*t))
            .collect::<Result<Vec<_>>>()?;
        let bound = BoundTextures { textures };

        let mut texels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                texels.push(material.program.shade(uv, &material.uniforms, &bound));
            }
        }

        self.bound_target_mut()?.colors[0].write_all(&texels);
        self.draw_count += 1;
        Ok(())
    }

    fn copy_texture_to_texture(&mut self, src: TextureRef, dst: TextureRef) -> Result<()> {
        if src == dst {
            return Ok(());
        }

        let source = self.resolve_texture(src)?.clone();
        let destination = self.resolve_texture(dst)?;

        if (source.width(), source.height()) != (destination.width(), destination.height()) {
            engine_bail!(SOURCE, "Texture copy size mismatch: {}x{} -> {}x{}",
                source.width(), source.height(), destination.width(), destination.height());
        }
        if source.format() != destination.format() {
            engine_bail!(SOURCE, "Texture copy format mismatch: {:?} -> {:?}",
                source.format(), destination.format());
        }

        let destination = self
            .targets
            .get_mut(dst.target)
            .and_then(|t| t.attachment_mut(dst.attachment))
            .ok_or_else(|| unknown_target(dst.target))?;
        destination.copy_from(&source);
        Ok(())
    }
}

#[cfg(test)]
#[path = "cpu_renderer_tests.rs"]
mod tests;
