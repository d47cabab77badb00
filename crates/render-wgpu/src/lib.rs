//! wgpu render backend for the freelook demo.
//!
//! Draws one shared cube mesh with per-vertex colors, instanced once per
//! scene position. Each instance carries its model matrix and an animation
//! scalar that modulates the vertex color in the fragment stage.
//!
//! # Invariants
//! - The backend only reads captured [`freelook_render::Frame`]s.
//! - Frame pacing and input live in the application, not here.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
pub use mesh::{cube_mesh, Vertex};
