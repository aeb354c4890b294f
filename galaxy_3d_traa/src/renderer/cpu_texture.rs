/// Host-memory texture used by the CPU backend
///
/// Texels are kept as `Vec4` regardless of format. Writes are quantized to
/// what the format can hold: UNORM clamps to [0, 1], two-component formats
/// drop Z/W, depth keeps X only. Sampling is clamp-to-edge.

use glam::{Vec2, Vec4};
use super::texture::{FilterMode, TextureFormat};

/// A single image stored in host memory
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTexture {
    width: u32,
    height: u32,
    format: TextureFormat,
    min_filter: FilterMode,
    mag_filter: FilterMode,
    texels: Vec<Vec4>,
}

impl CpuTexture {
    /// Allocate a cleared texture (colors at 0, depth at 1)
    pub fn new(
        width: u32,
        height: u32,
        format: TextureFormat,
        min_filter: FilterMode,
        mag_filter: FilterMode,
    ) -> Self {
        Self {
            width,
            height,
            format,
            min_filter,
            mag_filter,
            texels: vec![Self::empty_texel(format); (width as usize) * (height as usize)],
        }
    }

    fn empty_texel(format: TextureFormat) -> Vec4 {
        match format {
            TextureFormat::D32_FLOAT => Vec4::new(1.0, 0.0, 0.0, 1.0),
            _ => Vec4::ZERO,
        }
    }

    // ===== GETTERS =====

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }

    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }

    /// Raw texels, row-major, top row first
    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }

    // ===== STORAGE =====

    /// Reallocate at a new size; contents are reset
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.texels = vec![Self::empty_texel(self.format); (width as usize) * (height as usize)];
    }

    /// Set every texel to `value`
    pub fn fill(&mut self, value: Vec4) {
        self.texels.fill(quantize(self.format, value));
    }

    /// Texel at (`x`, `y`); out-of-range coordinates are clamped to the edge
    pub fn load(&self, x: i64, y: i64) -> Vec4 {
        if self.texels.is_empty() {
            return Vec4::ZERO;
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Write the texel at (`x`, `y`); out-of-range writes are ignored
    pub fn store(&mut self, x: u32, y: u32, value: Vec4) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.texels[index] = quantize(self.format, value);
    }

    /// Replace every texel with the texels of `other` (same size and format)
    pub(crate) fn copy_from(&mut self, other: &CpuTexture) {
        self.texels.clone_from(&other.texels);
    }

    /// Replace every texel from a row-major slice
    pub(crate) fn write_all(&mut self, texels: &[Vec4]) {
        let format = self.format;
        for (dst, src) in self.texels.iter_mut().zip(texels) {
            *dst = quantize(format, *src);
        }
    }

    // ===== SAMPLING =====

    /// Filtered sample at normalized `uv` (origin top-left), clamp to edge
    ///
    /// Textures are only ever sampled at 1:1 or magnified here, so the
    /// magnification filter applies.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        match self.mag_filter {
            FilterMode::Nearest => self.sample_nearest(uv),
            FilterMode::Linear => self.sample_linear(uv),
        }
    }

    fn sample_nearest(&self, uv: Vec2) -> Vec4 {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;
        self.load(x, y)
    }

    fn sample_linear(&self, uv: Vec2) -> Vec4 {
        let fx = uv.x * self.width as f32 - 0.5;
        let fy = uv.y * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.load(x0, y0).lerp(self.load(x0 + 1, y0), tx);
        let bottom = self.load(x0, y0 + 1).lerp(self.load(x0 + 1, y0 + 1), tx);
        top.lerp(bottom, ty)
    }
}

/// Reduce `value` to what `format` can hold
fn quantize(format: TextureFormat, value: Vec4) -> Vec4 {
    match format {
        TextureFormat::R8G8B8A8_UNORM => value.clamp(Vec4::ZERO, Vec4::ONE),
        TextureFormat::R16G16_SFLOAT => Vec4::new(value.x, value.y, 0.0, 1.0),
        TextureFormat::D32_FLOAT => Vec4::new(value.x, 0.0, 0.0, 1.0),
        TextureFormat::R16G16B16A16_SFLOAT | TextureFormat::R32G32B32A32_SFLOAT => value,
    }
}

#[cfg(test)]
#[path = "cpu_texture_tests.rs"]
mod tests;
