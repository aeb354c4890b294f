/// Render target descriptors and keys

use slotmap::new_key_type;
use super::texture::{FilterMode, TextureFormat};

new_key_type! {
    /// Stable key of a render target owned by a Renderer.
    ///
    /// Resizing a target keeps its key; only destroying it invalidates it.
    pub struct RenderTargetKey;
}

/// Descriptor for creating a render target
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Format of every color attachment
    pub format: TextureFormat,
    /// Number of color attachments (one per MRT channel, at least 1)
    pub color_attachments: u32,
    /// Whether a D32 depth attachment is created
    pub depth: bool,
    /// Minification filter used when the color attachments are sampled
    pub min_filter: FilterMode,
    /// Magnification filter used when the color attachments are sampled
    pub mag_filter: FilterMode,
}

impl RenderTargetDesc {
    /// Single color attachment with depth, bilinear filtering
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            color_attachments: 1,
            depth: true,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
        }
    }

    /// Same shape with a different size
    pub fn with_size(&self, width: u32, height: u32) -> Self {
        Self { width, height, ..self.clone() }
    }

    /// Same shape with different filters
    pub fn with_filters(&self, min_filter: FilterMode, mag_filter: FilterMode) -> Self {
        Self { min_filter, mag_filter, ..self.clone() }
    }
}

/// Read-only properties of a created render target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTargetInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Format of every color attachment
    pub format: TextureFormat,
    /// Number of color attachments
    pub color_attachments: u32,
    /// Whether the target has a depth attachment
    pub depth: bool,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}
