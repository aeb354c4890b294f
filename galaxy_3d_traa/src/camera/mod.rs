//! Camera module: projection parameters and view offset.
//!
//! The host engine owns cameras; the TRAA pass borrows one per frame,
//! shifts its view offset by a sub-pixel jitter and restores it before
//! returning. The projection matrix is always derived from the
//! parameters, so restoring the view offset restores the matrix.

mod camera;
mod view_offset;

pub use camera::{Camera, Projection};
pub use view_offset::ViewOffset;
