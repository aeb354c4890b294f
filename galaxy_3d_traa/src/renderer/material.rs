/// Full-screen materials: shader source, texture bindings, uniforms and
/// the host-side fragment program used by the CPU backend.

use std::fmt;
use std::sync::Arc;
use glam::{Vec2, Vec4};
use slotmap::new_key_type;
use super::texture::TextureRef;

new_key_type! {
    /// Stable key of a shader module owned by a Renderer.
    pub struct ShaderKey;
}

/// Shader source language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderLanguage {
    Wgsl,
}

/// Descriptor for creating a shader module
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDesc {
    /// Debug name
    pub name: String,
    /// Source code
    pub source: String,
    /// Source language
    pub language: ShaderLanguage,
    /// Fragment entry point
    pub entry_point: String,
}

/// Read access to the textures bound to a material, by binding slot.
pub trait TextureSampler {
    /// Filtered sample at `uv` (filter of the bound texture, clamp to edge)
    fn sample(&self, slot: usize, uv: Vec2) -> Vec4;

    /// Size in texels of the texture bound at `slot`
    fn size(&self, slot: usize) -> (u32, u32);
}

/// Host-side equivalent of a fragment shader.
///
/// GPU backends execute the shader source; the CPU backend calls `shade`
/// once per output pixel.
pub trait FragmentProgram: Send + Sync {
    /// Color written at `uv`
    fn shade(&self, uv: Vec2, uniforms: &[u8], textures: &dyn TextureSampler) -> Vec4;
}

/// A material drawn as a single full-screen triangle into color attachment 0
/// of the bound render target.
#[derive(Clone)]
pub struct FullscreenMaterial {
    /// Debug name
    pub name: String,
    /// Compiled shader module
    pub shader: ShaderKey,
    /// Texture bound at each slot
    pub textures: Vec<TextureRef>,
    /// Raw uniform block
    pub uniforms: Vec<u8>,
    /// Host-side program
    pub program: Arc<dyn FragmentProgram>,
}

impl fmt::Debug for FullscreenMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullscreenMaterial")
            .field("name", &self.name)
            .field("shader", &self.shader)
            .field("textures", &self.textures)
            .field("uniforms", &self.uniforms.len())
            .finish()
    }
}
