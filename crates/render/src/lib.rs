//! Rendering adapter: the matrices a frame hands to a backend.
//!
//! # Invariants
//! - Renderers read a [`Frame`]; they never touch the camera or the scene.
//! - A frame is captured once per tick from the camera, the projection and
//!   the elapsed time.
//!
//! The [`DebugTextRenderer`] renders frames as text so the headless CLI and
//! the tests can exercise the same interface the wgpu backend uses.

mod renderer;

pub use renderer::{DebugTextRenderer, Frame, Projection, Renderer};

pub fn crate_info() -> &'static str {
    "freelook-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
