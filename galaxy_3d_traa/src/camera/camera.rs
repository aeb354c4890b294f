/// Camera: projection parameters, view matrix and view offset.
///
/// Unlike a passive matrix container, this camera derives its projection
/// matrix from its parameters and its optional view offset. Every setter
/// that changes one of them refreshes the matrix, so the matrix can never
/// drift from the parameters.
///
/// Clip space is right-handed with depth in [0, 1] (0 = near plane),
/// matching `glam::Mat4::perspective_rh`.

use glam::{Mat4, Vec4};
use super::view_offset::ViewOffset;

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Symmetric perspective frustum
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        /// Width / height
        aspect: f32,
    },
    /// Orthographic box (view-space extents at zoom 1)
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    },
}

/// Camera used by the scene capture.
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
    near: f32,
    far: f32,
    zoom: f32,
    view: Option<ViewOffset>,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    projection_matrix_inverse: Mat4,
}

impl Camera {
    /// Create a perspective camera looking down -Z from the origin.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Perspective { fov_y, aspect }, near, far)
    }

    /// Create an orthographic camera looking down -Z from the origin.
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Orthographic { left, right, top, bottom }, near, far)
    }

    /// Create a camera from projection parameters.
    pub fn new(projection: Projection, near: f32, far: f32) -> Self {
        let mut camera = Self {
            projection,
            near,
            far,
            zoom: 1.0,
            view: None,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            projection_matrix_inverse: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    // ===== GETTERS =====

    /// Projection parameters.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Near plane distance.
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far plane distance.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Zoom factor.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current view offset, if one was ever set.
    ///
    /// A cleared offset is kept with `enabled == false`.
    pub fn view(&self) -> Option<&ViewOffset> {
        self.view.as_ref()
    }

    /// View matrix (world to view space).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix, view offset included.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Inverse of the projection matrix.
    pub fn projection_matrix_inverse(&self) -> &Mat4 {
        &self.projection_matrix_inverse
    }

    // ===== SETTERS =====

    /// Set the projection parameters and refresh the matrix.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.update_projection_matrix();
    }

    /// Set near/far planes and refresh the matrix.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
    }

    /// Set the zoom factor and refresh the matrix.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
        self.update_projection_matrix();
    }

    /// Set the view matrix.
    pub fn set_view_matrix(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Render the sub-window (`x`, `y`, `width`, `height`) of a
    /// `full_width` x `full_height` virtual frame.
    pub fn set_view_offset(
        &mut self,
        full_width: f32,
        full_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.view = Some(ViewOffset {
            full_width,
            full_height,
            offset_x: x,
            offset_y: y,
            width,
            height,
            enabled: true,
        });
        self.update_projection_matrix();
    }

    /// Disable the view offset (the last values are kept, disabled).
    pub fn clear_view_offset(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.enabled = false;
        }
        self.update_projection_matrix();
    }

    /// Put back a previously saved view offset state verbatim.
    pub(crate) fn restore_view(&mut self, view: Option<ViewOffset>) {
        self.view = view;
        self.update_projection_matrix();
    }

    /// Recompute the projection matrix (and its inverse) from the parameters.
    pub fn update_projection_matrix(&mut self) {
        let view = self.view.filter(|v| v.enabled);

        self.projection_matrix = match self.projection {
            Projection::Perspective { fov_y, aspect } => {
                let mut top = self.near * (0.5 * fov_y).tan() / self.zoom;
                let mut height = 2.0 * top;
                let mut width = aspect * height;
                let mut left = -0.5 * width;

                if let Some(view) = view {
                    left += view.offset_x * width / view.full_width;
                    top -= view.offset_y * height / view.full_height;
                    width *= view.width / view.full_width;
                    height *= view.height / view.full_height;
                }

                off_center_perspective(left, left + width, top - height, top, self.near, self.far)
            }
            Projection::Orthographic { left, right, top, bottom } => {
                let dx = (right - left) / (2.0 * self.zoom);
                let dy = (top - bottom) / (2.0 * self.zoom);
                let cx = (right + left) / 2.0;
                let cy = (top + bottom) / 2.0;

                let mut l = cx - dx;
                let mut r = cx + dx;
                let mut t = cy + dy;
                let mut b = cy - dy;

                if let Some(view) = view {
                    let scale_w = (right - left) / view.full_width / self.zoom;
                    let scale_h = (top - bottom) / view.full_height / self.zoom;
                    l += scale_w * view.offset_x;
                    r = l + scale_w * view.width;
                    t -= scale_h * view.offset_y;
                    b = t - scale_h * view.height;
                }

                Mat4::orthographic_rh(l, r, b, t, self.near, self.far)
            }
        };
        self.projection_matrix_inverse = self.projection_matrix.inverse();
    }
}

/// Right-handed off-center perspective frustum, depth mapped to [0, 1].
fn off_center_perspective(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = far / (near - far);
    let d = near * far / (near - far);

    Mat4::from_cols(
        Vec4::new(x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y, 0.0, 0.0),
        Vec4::new(a, b, c, -1.0),
        Vec4::new(0.0, 0.0, d, 0.0),
    )
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
