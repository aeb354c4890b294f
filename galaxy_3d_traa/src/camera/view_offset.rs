/// View offset: render a sub-window of a larger virtual frame.
///
/// Used for multi-monitor setups, tiled rendering and sub-pixel jitter.
/// All values are in pixels of the full frame.

/// A sub-window of a full virtual frame.
///
/// `offset_x` / `offset_y` may be fractional: the TRAA pass adds a
/// jitter in [-0.5, 0.5) pixels on top of the host's offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOffset {
    /// Full width of the virtual frame
    pub full_width: f32,
    /// Full height of the virtual frame
    pub full_height: f32,
    /// Horizontal offset of the sub-window
    pub offset_x: f32,
    /// Vertical offset of the sub-window
    pub offset_y: f32,
    /// Width of the sub-window
    pub width: f32,
    /// Height of the sub-window
    pub height: f32,
    /// Whether the offset participates in the projection
    pub enabled: bool,
}

impl ViewOffset {
    /// Enabled offset covering the whole `width` x `height` frame (no shift)
    pub fn full_frame(width: f32, height: f32) -> Self {
        Self {
            full_width: width,
            full_height: height,
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            height,
            enabled: true,
        }
    }

    /// Same window, shifted by (`dx`, `dy`) pixels
    pub fn shifted(&self, dx: f32, dy: f32) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..*self
        }
    }
}
