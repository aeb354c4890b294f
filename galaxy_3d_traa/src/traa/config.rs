/// TRAA pass configuration

use glam::{Vec3, Vec4};
use super::jitter::JitterWrap;

/// User-facing settings of a `TraaPass`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraaConfig {
    /// Color the sample buffer is cleared to before capture (linear RGB)
    pub clear_color: Vec3,
    /// Alpha the sample buffer is cleared to before capture
    pub clear_alpha: f32,
    /// Jitter cursor wrap policy
    pub jitter_wrap: JitterWrap,
}

impl TraaConfig {
    /// Clear color and alpha packed as RGBA
    pub fn clear_rgba(&self) -> Vec4 {
        self.clear_color.extend(self.clear_alpha)
    }
}

impl Default for TraaConfig {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            clear_alpha: 0.0,
            jitter_wrap: JitterWrap::Full,
        }
    }
}
