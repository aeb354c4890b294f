/// Scoped guards for the state a TRAA frame borrows from the host.
///
/// Both guards restore what they changed when dropped, so an early return
/// through `?` leaves the camera and the renderer as they were.

use std::ops::{Deref, DerefMut};
use glam::{Mat4, Vec2};
use crate::camera::{Camera, ViewOffset};
use crate::engine_warn;
use crate::renderer::{Renderer, RendererState};

// ============================================================================
// JitteredCamera
// ============================================================================

/// A camera whose view offset is shifted by a sub-pixel jitter.
///
/// The jitter is added on top of an enabled host offset (keeping its
/// full size, window size and enabled state), or on top of a full-frame
/// offset of the target size when the host has none. Dropping the guard
/// puts back the exact offset the camera had before, including "none".
pub struct JitteredCamera<'a> {
    camera: &'a mut Camera,
    saved_view: Option<ViewOffset>,
    unjittered_projection: Mat4,
}

impl<'a> JitteredCamera<'a> {
    /// Apply `jitter` (pixels) to `camera` for a `width` x `height` target
    pub fn new(camera: &'a mut Camera, jitter: Vec2, width: u32, height: u32) -> Self {
        camera.update_projection_matrix();
        let unjittered_projection = *camera.projection_matrix();
        let saved_view = camera.view().copied();

        let base = match saved_view {
            Some(view) if view.enabled => view,
            _ => ViewOffset::full_frame(width as f32, height as f32),
        };
        let jittered = base.shifted(jitter.x, jitter.y);
        camera.set_view_offset(
            jittered.full_width,
            jittered.full_height,
            jittered.offset_x,
            jittered.offset_y,
            jittered.width,
            jittered.height,
        );

        Self {
            camera,
            saved_view,
            unjittered_projection,
        }
    }

    /// Projection matrix before the jitter was applied
    pub fn unjittered_projection(&self) -> Mat4 {
        self.unjittered_projection
    }
}

impl Deref for JitteredCamera<'_> {
    type Target = Camera;

    fn deref(&self) -> &Camera {
        &*self.camera
    }
}

impl Drop for JitteredCamera<'_> {
    fn drop(&mut self) {
        self.camera.restore_view(self.saved_view);
    }
}

// ============================================================================
// RendererStateScope
// ============================================================================

/// Captures the renderer state on creation and writes it back on drop.
pub struct RendererStateScope<'a> {
    renderer: &'a mut dyn Renderer,
    saved: RendererState,
}

impl<'a> RendererStateScope<'a> {
    pub fn new(renderer: &'a mut dyn Renderer) -> Self {
        let saved = RendererState::capture(&*renderer);
        Self { renderer, saved }
    }
}

impl<'a> Deref for RendererStateScope<'a> {
    type Target = dyn Renderer + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.renderer
    }
}

impl<'a> DerefMut for RendererStateScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.renderer
    }
}

impl Drop for RendererStateScope<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.saved.restore(&mut *self.renderer) {
            engine_warn!("galaxy3d::traa::RendererStateScope",
                "Failed to restore renderer state: {}", err);
        }
    }
}

#[cfg(test)]
#[path = "scoped_tests.rs"]
mod tests;
