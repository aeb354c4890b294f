//! Scene module: what the capture step renders.
//!
//! The host engine owns its scene graph. Backends only need a way to ask
//! "what surface does this ray hit first", expressed by the `Scene` trait.
//! `QuadScene` is a small built-in scene of camera-facing rectangles used
//! by the reference backend, tests and demos.

mod scene;
mod quad_scene;

pub use scene::{Ray, Scene, SurfaceHit};
pub use quad_scene::{Quad, QuadKey, QuadScene};
