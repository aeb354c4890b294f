/// Renderer module - host engine interfaces and the CPU reference backend

// Module declarations
pub mod renderer;
pub mod texture;
pub mod render_target;
pub mod mrt;
pub mod material;
pub mod cpu_texture;
pub mod cpu_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use texture::*;
pub use render_target::*;
pub use mrt::*;
pub use material::*;
pub use cpu_texture::CpuTexture;
pub use cpu_renderer::CpuRenderer;
