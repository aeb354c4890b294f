/*!
# Galaxy 3D TRAA

Temporal Reprojection Anti-Aliasing pass for the Galaxy 3D rendering engine.

The pass renders the scene with a sub-pixel jittered camera into a scratch
multi-channel target, then resolves it against the previous frame's output
using velocity-guided reprojection and neighborhood color clamping. The
resolved image becomes next frame's history.

## Architecture

- **TraaPass**: per-frame orchestration (jitter, capture, resolve, restart)
- **FrameBuffers**: sample / history / output render targets owned by the pass
- **JitterSequence**: fixed 32-entry sub-pixel offset table and cursor
- **Renderer**: host engine interface the pass draws through
- **CpuRenderer**: reference backend executing the resolve program on the host
- **Camera**: projection and view offset state mutated while jittering

Backends only have to implement the `Renderer` trait; the resolve step ships
both as WGSL source and as a host-side program.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod camera;
pub mod scene;
pub mod renderer;
pub mod traa;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging facade)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all host rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Temporal anti-aliasing sub-module
    pub mod traa {
        pub use crate::traa::*;
    }
}

// Re-export math library at crate root
pub use glam;
