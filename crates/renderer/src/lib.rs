//! Rendering system using wgpu for the chimney smoke scene.

pub mod pipeline;
pub mod renderer;
pub mod vertex;

pub use pipeline::*;
pub use renderer::*;
pub use vertex::*;
