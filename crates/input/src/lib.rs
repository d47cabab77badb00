//! Input mapping: raw key and pointer state turned into camera actions.
//!
//! # Invariants
//! - The camera only ever sees actions and resolved intents, never key codes.
//! - Intent resolution is a pure function of the held set and the policy.

pub mod action;
pub mod intent;

pub use action::Action;
pub use intent::{HeldDirections, FIRST_MATCH_ORDER};

pub fn crate_info() -> &'static str {
    "freelook-input v0.1.0"
}
