/// Scene trait and ray query types.

use glam::{Vec3, Vec4};

/// World-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Closest surface hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter of the hit
    pub distance: f32,
    /// World-space position this frame
    pub position: Vec3,
    /// World-space position of the same surface point last frame
    pub previous_position: Vec3,
    /// World-space surface normal
    pub normal: Vec3,
    /// Shaded color (linear RGBA)
    pub color: Vec4,
    /// Emitted radiance (linear RGB)
    pub emissive: Vec3,
}

/// A renderable scene, as seen by a backend.
///
/// Implementations return the closest hit with `distance > 0`.
pub trait Scene: Send + Sync {
    /// Trace a world-space ray
    fn trace(&self, ray: &Ray) -> Option<SurfaceHit>;
}
