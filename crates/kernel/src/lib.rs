//! Frame kernel: the free-look camera and the per-instance transform composer.
//!
//! # Invariants
//! - No graphics or windowing state; everything here is a pure function of
//!   its own state plus frame inputs (elapsed time, cursor samples, intents).
//! - The camera direction is unit length and pitch stays within [-89, 89]
//!   degrees after every orientation update.

pub mod camera;
pub mod compose;
pub mod scene;

pub use camera::FreeLookCamera;
pub use compose::{compose_instance, InstanceTransform, Variant};
pub use scene::Scene;
