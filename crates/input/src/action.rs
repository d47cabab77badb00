use freelook_common::Direction;

/// A high-level action produced by the windowing layer.
///
/// The frame loop consumes actions, never raw window events, so the same
/// camera logic can be driven by a window or by a headless script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A movement key was pressed.
    Press(Direction),
    /// A movement key was released.
    Release(Direction),
    /// Absolute pointer position in pixels (origin top-left, Y down).
    Look { x: f32, y: f32 },
    /// The pointer left or re-entered the window; the next sample is a new reference.
    ResetLook,
    /// Show or hide the HUD.
    ToggleHud,
    /// Close the window.
    Quit,
}

impl Action {
    /// Map a key name (as used by the CLI and by the desktop key mapping) to an action.
    pub fn from_key_name(name: &str) -> Option<Self> {
        let action = match name {
            "w" | "W" => Action::Press(Direction::Forward),
            "s" | "S" => Action::Press(Direction::Backward),
            "a" | "A" => Action::Press(Direction::Left),
            "d" | "D" => Action::Press(Direction::Right),
            "f1" | "F1" => Action::ToggleHud,
            "escape" | "Escape" => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}
