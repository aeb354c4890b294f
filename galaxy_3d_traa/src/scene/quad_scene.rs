/// QuadScene: camera-facing rectangles with per-object motion.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. Each quad lies
/// in a plane of constant Z and faces +Z, so a camera looking down -Z sees
/// it head-on. Motion is the world-space displacement since the previous
/// frame and feeds the velocity channel.

use slotmap::{new_key_type, SlotMap};
use glam::{Vec2, Vec3, Vec4};
use super::scene::{Ray, Scene, SurfaceHit};

new_key_type! {
    /// Stable key for a Quad within a QuadScene.
    pub struct QuadKey;
}

/// Axis-aligned rectangle in a Z plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Center of the rectangle
    pub center: Vec3,
    /// Half width / half height
    pub half_extents: Vec2,
    /// Linear RGBA color
    pub color: Vec4,
    /// Emitted radiance
    pub emissive: Vec3,
    /// World-space displacement since the previous frame
    pub motion: Vec3,
}

impl Quad {
    /// Static, non-emissive quad
    pub fn new(center: Vec3, half_extents: Vec2, color: Vec4) -> Self {
        Self {
            center,
            half_extents,
            color,
            emissive: Vec3::ZERO,
            motion: Vec3::ZERO,
        }
    }

    /// Same quad moving by `motion` per frame
    pub fn with_motion(mut self, motion: Vec3) -> Self {
        self.motion = motion;
        self
    }

    /// Same quad with an emissive term
    pub fn with_emissive(mut self, emissive: Vec3) -> Self {
        self.emissive = emissive;
        self
    }

    fn intersect(&self, ray: &Ray) -> Option<f32> {
        if ray.direction.z.abs() <= f32::EPSILON {
            return None;
        }
        let t = (self.center.z - ray.origin.z) / ray.direction.z;
        if t <= 0.0 {
            return None;
        }
        let p = ray.at(t);
        let inside = (p.x - self.center.x).abs() <= self.half_extents.x
            && (p.y - self.center.y).abs() <= self.half_extents.y;
        inside.then_some(t)
    }
}

/// Scene made of quads
#[derive(Debug, Clone, Default)]
pub struct QuadScene {
    quads: SlotMap<QuadKey, Quad>,
}

impl QuadScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self { quads: SlotMap::with_key() }
    }

    /// Add a quad and return its stable key
    pub fn add_quad(&mut self, quad: Quad) -> QuadKey {
        self.quads.insert(quad)
    }

    /// Remove a quad; returns it if the key was valid
    pub fn remove_quad(&mut self, key: QuadKey) -> Option<Quad> {
        self.quads.remove(key)
    }

    /// Get a quad by key
    pub fn quad(&self, key: QuadKey) -> Option<&Quad> {
        self.quads.get(key)
    }

    /// Get a mutable quad by key (to animate it between frames)
    pub fn quad_mut(&mut self, key: QuadKey) -> Option<&mut Quad> {
        self.quads.get_mut(key)
    }

    /// Number of quads
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }
}

impl Scene for QuadScene {
    fn trace(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut closest: Option<(f32, &Quad)> = None;

        for quad in self.quads.values() {
            if let Some(t) = quad.intersect(ray) {
                if closest.map_or(true, |(best, _)| t < best) {
                    closest = Some((t, quad));
                }
            }
        }

        closest.map(|(t, quad)| {
            let position = ray.at(t);
            SurfaceHit {
                distance: t,
                position,
                previous_position: position - quad.motion,
                normal: Vec3::Z,
                color: quad.color,
                emissive: quad.emissive,
            }
        })
    }
}

#[cfg(test)]
#[path = "quad_scene_tests.rs"]
mod tests;
