/// The three render targets a TRAA pass owns.
///
/// - sample: jittered capture, every MRT channel plus depth, nearest filtering
/// - history: previous resolved frame
/// - output: resolved frame, auxiliary channels and depth of the sample
///
/// All three always have the same size. They are allocated once and
/// resized in place, so their keys stay valid until `release`.

use glam::Vec2;
use crate::error::Result;
use crate::{engine_debug, engine_warn};
use crate::renderer::{FilterMode, RenderTargetDesc, RenderTargetKey, Renderer, TextureRef};

const SOURCE: &str = "galaxy3d::traa::FrameBuffers";

/// Keys of the sample / history / output render targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffers {
    sample: RenderTargetKey,
    history: RenderTargetKey,
    output: RenderTargetKey,
    width: u32,
    height: u32,
}

impl FrameBuffers {
    /// Allocate the three targets from the output description
    ///
    /// Sample and history are clones of the output; the sample switches to
    /// nearest filtering for exact texel fetches in the resolve.
    pub fn create(renderer: &mut dyn Renderer, output: &RenderTargetDesc) -> Result<Self> {
        let sample_desc = output.with_filters(FilterMode::Nearest, FilterMode::Nearest);

        let output_key = renderer.create_render_target(output)?;
        let sample_key = match renderer.create_render_target(&sample_desc) {
            Ok(key) => key,
            Err(err) => {
                renderer.destroy_render_target(output_key);
                return Err(err);
            }
        };
        let history_key = match renderer.create_render_target(output) {
            Ok(key) => key,
            Err(err) => {
                renderer.destroy_render_target(output_key);
                renderer.destroy_render_target(sample_key);
                return Err(err);
            }
        };

        engine_debug!(SOURCE, "Allocated {}x{} frame buffers ({} color attachments)",
            output.width, output.height, output.color_attachments);

        Ok(Self {
            sample: sample_key,
            history: history_key,
            output: output_key,
            width: output.width,
            height: output.height,
        })
    }

    /// Resize all three targets; returns true when the size changed
    ///
    /// A changed size discards every buffer's contents, history included.
    /// On error the targets already resized go back to the previous size,
    /// so the three never disagree.
    pub fn resize(&mut self, renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<bool> {
        if (width, height) == (self.width, self.height) {
            return Ok(false);
        }

        let keys = [self.sample, self.history, self.output];
        for (resized, &key) in keys.iter().enumerate() {
            if let Err(err) = renderer.resize_render_target(key, width, height) {
                self.roll_back(renderer, &keys[..resized]);
                return Err(err);
            }
        }

        engine_debug!(SOURCE, "Resized frame buffers {}x{} -> {}x{}",
            self.width, self.height, width, height);

        self.width = width;
        self.height = height;
        Ok(true)
    }

    fn roll_back(&mut self, renderer: &mut dyn Renderer, resized: &[RenderTargetKey]) {
        let (width, height) = (self.width, self.height);
        for &key in resized {
            if let Err(err) = renderer.resize_render_target(key, width, height) {
                engine_warn!(SOURCE, "Failed to restore {}x{} after a failed resize: {}",
                    width, height, err);
                // Sizes are at least 1x1, so the next resize retries all three
                self.width = 0;
                self.height = 0;
            }
        }
    }

    /// Destroy the three targets
    pub fn release(&self, renderer: &mut dyn Renderer) {
        renderer.destroy_render_target(self.sample);
        renderer.destroy_render_target(self.history);
        renderer.destroy_render_target(self.output);
    }

    // ===== ACCESSORS =====

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 1 / size in texels
    pub fn inv_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    pub fn sample(&self) -> RenderTargetKey {
        self.sample
    }

    pub fn history(&self) -> RenderTargetKey {
        self.history
    }

    pub fn output(&self) -> RenderTargetKey {
        self.output
    }

    /// Color attachment `index` of the sample
    pub fn sample_channel(&self, index: u32) -> TextureRef {
        TextureRef::color(self.sample, index)
    }

    pub fn sample_depth(&self) -> TextureRef {
        TextureRef::depth(self.sample)
    }

    pub fn history_color(&self) -> TextureRef {
        TextureRef::color(self.history, 0)
    }

    /// Color attachment `index` of the output
    pub fn output_channel(&self, index: u32) -> TextureRef {
        TextureRef::color(self.output, index)
    }

    pub fn output_depth(&self) -> TextureRef {
        TextureRef::depth(self.output)
    }
}

#[cfg(test)]
#[path = "frame_buffers_tests.rs"]
mod tests;
