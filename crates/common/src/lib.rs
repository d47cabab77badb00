//! Shared types for the freelook demo.
//!
//! # Invariants
//! - Nothing in this crate touches a window or a GPU.
//! - Configuration is validated once at startup; downstream crates trust it.

mod config;
mod timing;
mod types;

pub use config::{default_positions, ConfigError, DemoConfig, IntentPolicy};
pub use timing::{FramePacer, FrameStats};
pub use types::Direction;

pub fn crate_info() -> &'static str {
    "freelook-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
