use freelook_common::Direction;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Pitch is kept strictly inside +/-90 degrees so the view direction never
/// lines up with world up.
pub const PITCH_LIMIT: f32 = 89.0;

/// Degrees of rotation per pixel of pointer motion.
pub const DEFAULT_SENSITIVITY: f32 = 0.1;

/// First-person camera driven by absolute cursor positions and discrete
/// movement intents.
///
/// Yaw and pitch are stored in degrees. The cursor reference starts out
/// empty; the first sample only records a reference so the view does not
/// jump when the pointer first enters the window.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeLookCamera {
    eye: Vec3,
    direction: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    last_cursor: Option<Vec2>,
    pub sensitivity: f32,
}

impl Default for FreeLookCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            yaw: 0.0,
            pitch: 0.0,
            last_cursor: None,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl FreeLookCamera {
    /// Camera at `eye` whose direction is derived from `yaw`/`pitch` (degrees).
    pub fn from_angles(eye: Vec3, yaw: f32, pitch: f32) -> Self {
        let pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            eye,
            direction: direction_from_angles(yaw, pitch),
            yaw,
            pitch,
            ..Self::default()
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// True once a reference cursor sample has been recorded.
    pub fn is_tracking(&self) -> bool {
        self.last_cursor.is_some()
    }

    /// Horizontal axis to the viewer's right.
    pub fn right(&self) -> Vec3 {
        self.direction.cross(self.up).normalize()
    }

    /// Position change that moving in `dir` for `dt` seconds would cause.
    fn step(&self, dir: Direction, dt: f32) -> Vec3 {
        match dir {
            Direction::Forward => self.direction * dt,
            Direction::Backward => -self.direction * dt,
            Direction::Right => self.right() * dt,
            Direction::Left => -self.right() * dt,
        }
    }

    /// Move the eye along one intent. `dt` is the frame delta in seconds.
    pub fn navigate(&mut self, dir: Direction, dt: f32) {
        self.eye += self.step(dir, dt);
    }

    /// Move along several intents at once; the deltas are summed and applied
    /// in a single step.
    pub fn navigate_many(&mut self, dirs: &[Direction], dt: f32) {
        let delta: Vec3 = dirs.iter().map(|&d| self.step(d, dt)).sum();
        self.eye += delta;
    }

    /// Feed an absolute cursor position using the camera's own sensitivity.
    pub fn update_orientation(&mut self, x: f32, y: f32) {
        self.update_orientation_with_sensitivity(x, y, self.sensitivity);
    }

    /// Feed an absolute cursor position (pixels, origin top-left, Y down).
    pub fn update_orientation_with_sensitivity(&mut self, x: f32, y: f32, sensitivity: f32) {
        let cursor = Vec2::new(x, y);
        let Some(last) = self.last_cursor.replace(cursor) else {
            tracing::trace!(x, y, "recorded first cursor sample");
            return;
        };

        // Screen Y grows downward, pitch grows upward.
        let x_offset = (cursor.x - last.x) * sensitivity;
        let y_offset = (last.y - cursor.y) * sensitivity;

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.direction = direction_from_angles(self.yaw, self.pitch);
    }

    /// Forget the cursor reference; the next sample will be recorded but not applied.
    pub fn reset_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Right-handed view matrix built from the eye, direction and up vectors.
    pub fn view_matrix(&self) -> Mat4 {
        let target = self.eye + self.direction;
        let forward = (self.eye - target).normalize();
        let right = self.up.normalize().cross(forward).normalize();
        let true_up = forward.cross(right);

        let rotation = Mat4::from_cols(
            right.extend(0.0),
            true_up.extend(0.0),
            forward.extend(0.0),
            Vec4::W,
        );
        let translation = Mat4::from_translation(-self.eye);

        rotation.transpose() * translation
    }
}

fn direction_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}
