/// Texture formats, sampling filters and attachment references

use super::render_target::RenderTargetKey;

/// Texel format of a render target attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R16G16_SFLOAT,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    D32_FLOAT,
}

impl TextureFormat {
    /// Returns true for depth formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D32_FLOAT)
    }

    /// Returns true if stored values are clamped to [0, 1]
    pub fn is_normalized(&self) -> bool {
        matches!(self, TextureFormat::R8G8B8A8_UNORM)
    }

    /// Number of stored components
    pub fn component_count(&self) -> usize {
        match self {
            TextureFormat::D32_FLOAT => 1,
            TextureFormat::R16G16_SFLOAT => 2,
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R16G16B16A16_SFLOAT
            | TextureFormat::R32G32B32A32_SFLOAT => 4,
        }
    }
}

/// Texture filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Exact texel fetch
    Nearest,
    /// Bilinear interpolation
    Linear,
}

/// One image of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// Color attachment by index (MRT channel index)
    Color(u32),
    /// Depth attachment
    Depth,
}

/// Reference to a single attachment of a render target
///
/// This is what shaders bind and what texture copies read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// Owning render target
    pub target: RenderTargetKey,
    /// Attachment within the target
    pub attachment: Attachment,
}

impl TextureRef {
    /// Color attachment `index` of `target`
    pub fn color(target: RenderTargetKey, index: u32) -> Self {
        Self { target, attachment: Attachment::Color(index) }
    }

    /// Depth attachment of `target`
    pub fn depth(target: RenderTargetKey) -> Self {
        Self { target, attachment: Attachment::Depth }
    }
}
