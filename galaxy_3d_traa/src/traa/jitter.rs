/// Sub-pixel jitter sequence
///
/// 32 offsets on a [-8, 8) integer grid, following the D3D 32x MSAA
/// standard sample pattern. Scaled by 1/16 they land in [-0.5, 0.5) pixels.

use glam::Vec2;

/// Jitter offsets in 1/16 pixel units
pub const JITTER_VECTORS: [[i8; 2]; 32] = [
    [-4, -7], [-7, -5], [-3, -5], [-5, -4],
    [-1, -4], [-2, -2], [-6, -1], [-4, 0],
    [-7, 1], [-1, 2], [-6, 3], [-3, 3],
    [-7, 6], [-3, 6], [-5, 7], [-1, 7],
    [5, -7], [1, -6], [6, -5], [4, -4],
    [2, -3], [7, -2], [1, -1], [4, -1],
    [2, 1], [6, 2], [0, 4], [4, 4],
    [2, 5], [7, 5], [5, 6], [3, 7],
];

/// Scale from grid units to pixels
pub const JITTER_SCALE: f32 = 1.0 / 16.0;

/// How the cursor wraps at the end of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterWrap {
    /// Visit all 32 entries (cursor modulo 32)
    #[default]
    Full,
    /// Cursor modulo 31: entry 31 is never visited
    SkipLast,
}

impl JitterWrap {
    /// Number of distinct entries visited per cycle
    pub fn period(self) -> usize {
        match self {
            JitterWrap::Full => JITTER_VECTORS.len(),
            JitterWrap::SkipLast => JITTER_VECTORS.len() - 1,
        }
    }
}

/// Cursor into `JITTER_VECTORS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterSequence {
    index: usize,
    wrap: JitterWrap,
}

impl JitterSequence {
    pub fn new(wrap: JitterWrap) -> Self {
        Self { index: 0, wrap }
    }

    /// Current table index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Wrap policy
    pub fn wrap(&self) -> JitterWrap {
        self.wrap
    }

    /// Entries visited per cycle
    pub fn period(&self) -> usize {
        self.wrap.period()
    }

    /// Current offset in pixels, in [-0.5, 0.5)
    pub fn offset(&self) -> Vec2 {
        let [x, y] = JITTER_VECTORS[self.index];
        Vec2::new(x as f32, y as f32) * JITTER_SCALE
    }

    /// Move to the next entry
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.wrap.period();
    }
}

impl Default for JitterSequence {
    fn default() -> Self {
        Self::new(JitterWrap::default())
    }
}

#[cfg(test)]
#[path = "jitter_tests.rs"]
mod tests;
