/// TraaPass - temporal reprojection anti-aliasing stage.
///
/// Each frame:
/// 1. the camera is jittered by a sub-pixel offset and the scene is
///    rendered into the sample buffer (every MRT channel plus depth)
/// 2. the resolve program blends the sample with the reprojected,
///    neighborhood-clamped history into the output buffer
/// 3. the output is copied into history for the next frame
///
/// When the buffers change size (and on the first frame) step 2 is
/// skipped and history / output are reseeded from the sample.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use glam::{Vec2, Vec3};
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::renderer::{
    Channel, ChannelIndexMap, FilterMode, FullscreenMaterial, Mrt, RenderTargetDesc, Renderer,
    ShaderDesc, ShaderKey, ShaderLanguage, TextureFormat, TextureRef,
};
use crate::scene::Scene;
use crate::{engine_debug, engine_err, engine_error, engine_info, engine_trace};
use super::config::TraaConfig;
use super::frame_buffers::FrameBuffers;
use super::jitter::JitterSequence;
use super::resolve::ResolveProgram;
use super::scoped::{JitteredCamera, RendererStateScope};
use super::shader::{ResolveUniforms, RESOLVE_FRAGMENT_ENTRY, TRAA_RESOLVE_WGSL};

const SOURCE: &str = "galaxy3d::TraaPass";

/// Debug name of the resolve shader and material
pub const RESOLVE_MATERIAL_NAME: &str = "TRAA.Resolve";

// ============================================================================
// Descriptor and outcome
// ============================================================================

/// Everything needed to build a `TraaPass`
pub struct TraaPassDesc {
    /// Host renderer
    pub renderer: Arc<Mutex<dyn Renderer>>,
    /// Scene rendered every frame
    pub scene: Arc<dyn Scene>,
    /// Camera jittered every frame
    pub camera: Arc<Mutex<Camera>>,
    /// MRT layout of the capture; must contain `Channel::Velocity`
    pub mrt: Option<Mrt>,
    /// Format of every color attachment
    ///
    /// Must be a float format: the velocity channel stores signed values.
    pub format: TextureFormat,
    /// Pass settings
    pub config: TraaConfig,
}

/// What `render_frame` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The sample was blended with history
    Resolved,
    /// History and output were reseeded from the sample
    Restarted,
}

/// GPU-side resources, released together by `dispose`
struct PassResources {
    buffers: FrameBuffers,
    shader: ShaderKey,
    material: FullscreenMaterial,
}

// ============================================================================
// TraaPass
// ============================================================================

/// Temporal reprojection anti-aliasing pass
pub struct TraaPass {
    renderer: Arc<Mutex<dyn Renderer>>,
    scene: Arc<dyn Scene>,
    camera: Arc<Mutex<Camera>>,
    mrt: Mrt,
    indexes: ChannelIndexMap,
    config: TraaConfig,
    jitter: JitterSequence,
    uniforms: ResolveUniforms,
    resources: Option<PassResources>,
    needs_reseed: bool,
}

fn lock<'a, T: ?Sized>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| engine_err!(SOURCE, "{} lock poisoned", what))
}

/// Physical size of a `width` x `height` logical area, at least 1x1
fn physical_size(renderer: &dyn Renderer, width: u32, height: u32) -> (u32, u32) {
    let ratio = renderer.pixel_ratio();
    let scale = |v: u32| ((v as f32 * ratio).floor() as u32).max(1);
    (scale(width), scale(height))
}

fn disposed() -> Error {
    engine_error!(SOURCE, "TRAA pass used after dispose");
    Error::InvalidResource("TRAA pass has been disposed".to_string())
}

impl TraaPass {
    /// Build the pass and allocate its buffers at the renderer's size
    ///
    /// # Errors
    ///
    /// - `Error::MissingMrtConfig` if `desc.mrt` is None
    /// - `Error::MissingVelocityChannel` if the MRT has no velocity channel
    /// - `Error::InitializationFailed` if `desc.format` is normalized
    /// - any renderer error raised while allocating resources
    pub fn from_desc(desc: TraaPassDesc) -> Result<Self> {
        let mrt = match desc.mrt {
            Some(mrt) => mrt,
            None => {
                engine_error!(SOURCE, "Missing MRT configuration");
                return Err(Error::MissingMrtConfig);
            }
        };
        if !mrt.has(Channel::Velocity) {
            engine_error!(SOURCE, "Missing velocity output in MRT configuration");
            return Err(Error::MissingVelocityChannel);
        }
        if desc.format.is_normalized() {
            engine_error!(SOURCE, "MRT format {:?} clamps to [0, 1] and cannot hold velocity", desc.format);
            return Err(Error::InitializationFailed(format!(
                "{:?} cannot store signed velocity", desc.format)));
        }

        let indexes = mrt.indexes();
        let velocity_index = indexes.get(Channel::Velocity).ok_or(Error::MissingVelocityChannel)?;

        let resources = {
            let mut renderer = lock(&desc.renderer, "Renderer")?;
            let (logical_width, logical_height) = renderer.size();
            let (width, height) = physical_size(&*renderer, logical_width, logical_height);

            let output_desc = RenderTargetDesc {
                width,
                height,
                format: desc.format,
                color_attachments: mrt.channel_count(),
                depth: true,
                min_filter: FilterMode::Linear,
                mag_filter: FilterMode::Linear,
            };
            let buffers = FrameBuffers::create(&mut *renderer, &output_desc)?;

            let shader = match renderer.create_shader(&ShaderDesc {
                name: RESOLVE_MATERIAL_NAME.to_string(),
                source: TRAA_RESOLVE_WGSL.to_string(),
                language: ShaderLanguage::Wgsl,
                entry_point: RESOLVE_FRAGMENT_ENTRY.to_string(),
            }) {
                Ok(shader) => shader,
                Err(err) => {
                    buffers.release(&mut *renderer);
                    return Err(err);
                }
            };

            let material = FullscreenMaterial {
                name: RESOLVE_MATERIAL_NAME.to_string(),
                shader,
                textures: vec![
                    buffers.sample_channel(0),
                    buffers.sample_channel(velocity_index),
                    buffers.sample_depth(),
                    buffers.history_color(),
                ],
                uniforms: Vec::new(),
                program: Arc::new(ResolveProgram),
            };

            PassResources { buffers, shader, material }
        };

        let (width, height) = resources.buffers.size();
        engine_info!(SOURCE, "TRAA pass ready: {}x{}, {} MRT channels, {:?}",
            width, height, mrt.channel_count(), desc.format);

        Ok(Self {
            renderer: desc.renderer,
            scene: desc.scene,
            camera: desc.camera,
            mrt,
            indexes,
            jitter: JitterSequence::new(desc.config.jitter_wrap),
            config: desc.config,
            uniforms: ResolveUniforms::new(width, height),
            resources: Some(resources),
            needs_reseed: true,
        })
    }

    // ===== SIZE =====

    /// Resize the buffers to `width` x `height` logical pixels
    ///
    /// The renderer's pixel ratio is applied. Returns true when the buffer
    /// size changed; the next frame then restarts from the sample.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<bool> {
        let renderer_arc = Arc::clone(&self.renderer);
        let mut renderer = lock(&renderer_arc, "Renderer")?;
        let (width, height) = physical_size(&*renderer, width, height);
        self.resize_buffers(&mut *renderer, width, height)
    }

    fn resize_buffers(&mut self, renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<bool> {
        let resources = self.resources.as_mut().ok_or_else(disposed)?;
        let changed = resources.buffers.resize(renderer, width, height)?;
        if changed {
            self.uniforms.set_size(width, height);
            self.needs_reseed = true;
            engine_info!(SOURCE, "TRAA buffers resized to {}x{}, history restarts", width, height);
        }
        Ok(changed)
    }

    // ===== FRAME =====

    /// Render one anti-aliased frame into the output buffer
    ///
    /// The camera view offset and the renderer state (render target, MRT,
    /// clear color, velocity projection) are restored before returning,
    /// also when an error is returned.
    pub fn render_frame(&mut self) -> Result<FrameOutcome> {
        let renderer_arc = Arc::clone(&self.renderer);
        let camera_arc = Arc::clone(&self.camera);
        let mut renderer = lock(&renderer_arc, "Renderer")?;
        let mut camera = lock(&camera_arc, "Camera")?;
        let mut state = RendererStateScope::new(&mut *renderer);

        let (logical_width, logical_height) = state.size();
        let (width, height) = physical_size(&*state, logical_width, logical_height);
        self.resize_buffers(&mut *state, width, height)?;
        let restart = self.needs_reseed;

        self.uniforms.set_clip_planes(camera.near(), camera.far());

        let resources = self.resources.as_mut().ok_or_else(disposed)?;
        let buffers = resources.buffers;
        resources.material.uniforms = bytemuck::bytes_of(&self.uniforms).to_vec();

        let jitter = self.jitter.offset();
        engine_trace!(SOURCE, "Frame jitter #{} ({}, {})", self.jitter.index(), jitter.x, jitter.y);
        let jittered = JitteredCamera::new(&mut *camera, jitter, width, height);

        // Capture
        state.set_velocity_projection(Some(jittered.unjittered_projection()));
        state.set_mrt(Some(self.mrt));
        state.set_clear_color(self.config.clear_rgba());
        state.set_render_target(Some(buffers.sample()))?;
        state.clear()?;
        state.render(&*self.scene, &jittered)?;
        state.set_render_target(None)?;
        state.set_mrt(None);

        let outcome = if restart {
            state.set_render_target(Some(buffers.history()))?;
            state.clear()?;
            state.set_render_target(Some(buffers.output()))?;
            state.clear()?;
            state.set_render_target(None)?;

            state.copy_texture_to_texture(buffers.sample_channel(0), buffers.history_color())?;
            state.copy_texture_to_texture(buffers.sample_channel(0), buffers.output_channel(0))?;
            engine_debug!(SOURCE, "History reseeded from sample");
            FrameOutcome::Restarted
        } else {
            state.set_render_target(Some(buffers.output()))?;
            state.draw_fullscreen(&resources.material)?;
            state.set_render_target(None)?;

            state.copy_texture_to_texture(buffers.output_channel(0), buffers.history_color())?;
            FrameOutcome::Resolved
        };

        // Downstream passes see the same MRT layout on the output
        for (_, index) in self.indexes.auxiliary() {
            state.copy_texture_to_texture(buffers.sample_channel(index), buffers.output_channel(index))?;
        }
        state.copy_texture_to_texture(buffers.sample_depth(), buffers.output_depth())?;

        self.jitter.advance();
        self.needs_reseed = false;
        Ok(outcome)
    }

    // ===== LIFECYCLE =====

    /// Release the buffers and the resolve shader
    ///
    /// Safe to call more than once. Any later frame fails with
    /// `Error::InvalidResource`.
    pub fn dispose(&mut self) {
        let Some(resources) = self.resources.take() else {
            return;
        };

        let mut renderer = self.renderer.lock().unwrap_or_else(PoisonError::into_inner);
        resources.buffers.release(&mut *renderer);
        renderer.destroy_shader(resources.shader);
        engine_info!(SOURCE, "TRAA pass disposed");
    }

    /// Returns true once `dispose` has run
    pub fn is_disposed(&self) -> bool {
        self.resources.is_none()
    }

    // ===== CONFIGURATION =====

    pub fn config(&self) -> &TraaConfig {
        &self.config
    }

    /// Color and alpha the sample is cleared to before capture
    pub fn set_clear_color(&mut self, color: Vec3, alpha: f32) {
        self.config.clear_color = color;
        self.config.clear_alpha = alpha;
    }

    // ===== ACCESSORS =====

    /// MRT layout of the capture
    pub fn mrt(&self) -> Mrt {
        self.mrt
    }

    /// Channel -> attachment index map of the sample and output buffers
    pub fn channel_indexes(&self) -> &ChannelIndexMap {
        &self.indexes
    }

    /// Jitter cursor
    pub fn jitter(&self) -> &JitterSequence {
        &self.jitter
    }

    /// Index of the jitter used by the next frame
    pub fn jitter_index(&self) -> usize {
        self.jitter.index()
    }

    /// Jitter offset (pixels) used by the next frame
    pub fn jitter_offset(&self) -> Vec2 {
        self.jitter.offset()
    }

    /// Buffer size in physical pixels (None after dispose)
    pub fn size(&self) -> Option<(u32, u32)> {
        self.resources.as_ref().map(|r| r.buffers.size())
    }

    /// Current resolve uniforms
    pub fn uniforms(&self) -> &ResolveUniforms {
        &self.uniforms
    }

    /// Render targets of the pass (None after dispose)
    pub fn buffers(&self) -> Option<&FrameBuffers> {
        self.resources.as_ref().map(|r| &r.buffers)
    }

    /// Resolved color
    pub fn output_texture(&self) -> Option<TextureRef> {
        self.buffers().map(|b| b.output_channel(0))
    }

    /// Output attachment of `channel`, if the MRT writes it
    pub fn output_channel(&self, channel: Channel) -> Option<TextureRef> {
        let index = self.indexes.get(channel)?;
        self.buffers().map(|b| b.output_channel(index))
    }

    /// Depth of the last captured frame
    pub fn depth_texture(&self) -> Option<TextureRef> {
        self.buffers().map(|b| b.output_depth())
    }

    /// Previous resolved color
    pub fn history_texture(&self) -> Option<TextureRef> {
        self.buffers().map(|b| b.history_color())
    }

    /// Raw jittered color of the last frame
    pub fn sample_texture(&self) -> Option<TextureRef> {
        self.buffers().map(|b| b.sample_channel(0))
    }
}

#[cfg(test)]
#[path = "traa_pass_tests.rs"]
mod tests;
