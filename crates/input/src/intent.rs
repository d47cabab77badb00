use freelook_common::{Direction, IntentPolicy};
use std::collections::BTreeSet;

/// Priority used by [`IntentPolicy::FirstMatch`]: the first held key in this
/// order is the only one that moves the camera.
pub const FIRST_MATCH_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Backward,
    Direction::Forward,
];

/// Movement keys currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldDirections {
    held: BTreeSet<Direction>,
}

impl HeldDirections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, dir: Direction) {
        if self.held.insert(dir) {
            tracing::trace!(?dir, "movement key pressed");
        }
    }

    pub fn release(&mut self, dir: Direction) {
        if self.held.remove(&dir) {
            tracing::trace!(?dir, "movement key released");
        }
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Intents to apply this frame under `policy`.
    pub fn resolve(&self, policy: IntentPolicy) -> Vec<Direction> {
        match policy {
            IntentPolicy::FirstMatch => FIRST_MATCH_ORDER
                .iter()
                .copied()
                .find(|d| self.held.contains(d))
                .into_iter()
                .collect(),
            IntentPolicy::Combined => FIRST_MATCH_ORDER
                .iter()
                .copied()
                .filter(|d| self.held.contains(d))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_held_resolves_to_nothing() {
        let held = HeldDirections::new();
        assert!(held.resolve(IntentPolicy::FirstMatch).is_empty());
        assert!(held.resolve(IntentPolicy::Combined).is_empty());
    }

    #[test]
    fn first_match_prefers_left_over_forward() {
        let mut held = HeldDirections::new();
        held.press(Direction::Forward);
        held.press(Direction::Left);
        assert_eq!(held.resolve(IntentPolicy::FirstMatch), vec![Direction::Left]);
    }

    #[test]
    fn first_match_order() {
        let mut held = HeldDirections::new();
        held.press(Direction::Forward);
        held.press(Direction::Backward);
        assert_eq!(
            held.resolve(IntentPolicy::FirstMatch),
            vec![Direction::Backward]
        );
        held.press(Direction::Right);
        assert_eq!(held.resolve(IntentPolicy::FirstMatch), vec![Direction::Right]);
    }

    #[test]
    fn combined_returns_every_held_key() {
        let mut held = HeldDirections::new();
        held.press(Direction::Forward);
        held.press(Direction::Right);
        assert_eq!(
            held.resolve(IntentPolicy::Combined),
            vec![Direction::Right, Direction::Forward]
        );
    }

    #[test]
    fn release_and_clear() {
        let mut held = HeldDirections::new();
        held.press(Direction::Forward);
        held.press(Direction::Forward);
        assert_eq!(held.resolve(IntentPolicy::Combined), vec![Direction::Forward]);
        held.release(Direction::Forward);
        assert!(held.is_empty());

        held.press(Direction::Left);
        held.press(Direction::Right);
        held.clear();
        assert!(held.is_empty());
    }
}
