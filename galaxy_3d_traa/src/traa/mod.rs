//! Temporal reprojection anti-aliasing.
//!
//! `TraaPass` drives the frame; the other modules are its building blocks
//! and are public so backends and tests can use them directly.

pub mod config;
pub mod frame_buffers;
pub mod jitter;
pub mod resolve;
pub mod scoped;
pub mod shader;
pub mod traa_pass;

pub use config::TraaConfig;
pub use frame_buffers::FrameBuffers;
pub use jitter::{JitterSequence, JitterWrap, JITTER_SCALE, JITTER_VECTORS};
pub use resolve::{resolve_pixel, Neighborhood, ResolveProgram};
pub use scoped::{JitteredCamera, RendererStateScope};
pub use shader::{ResolveUniforms, TRAA_RESOLVE_WGSL};
pub use traa_pass::{FrameOutcome, TraaPass, TraaPassDesc};
