use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How simultaneously held movement keys are turned into intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentPolicy {
    /// Only the first held key (in Left, Right, Backward, Forward order) moves the camera.
    #[default]
    FirstMatch,
    /// Every held key contributes; deltas are summed before being applied.
    Combined,
}

impl std::str::FromStr for IntentPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_match" | "first-match" => Ok(IntentPolicy::FirstMatch),
            "combined" => Ok(IntentPolicy::Combined),
            other => Err(ConfigError::Invalid(format!(
                "unknown intent policy '{other}' (expected first_match or combined)"
            ))),
        }
    }
}

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Demo configuration. Every field has a default, so a config file only
/// needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    /// Degrees of rotation per pixel of pointer motion.
    pub sensitivity: f32,
    /// Multiplier applied to the frame delta before navigating.
    pub move_speed: f32,
    pub intent_policy: IntentPolicy,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Added to every base position before composing instances.
    pub scene_offset: Vec3,
    pub positions: Vec<Vec3>,
    pub clear_color: [f32; 3],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "freelook".into(),
            width: 800,
            height: 600,
            target_fps: 60,
            sensitivity: 0.1,
            move_speed: 1.0,
            intent_policy: IntentPolicy::FirstMatch,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            scene_offset: Vec3::new(0.0, 0.0, -3.0),
            positions: default_positions(),
            clear_color: [0.2, 0.2, 0.2],
        }
    }
}

/// The ten cube base positions shown by the demo.
pub fn default_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 5.0, -15.0),
        Vec3::new(-1.5, -2.2, -2.5),
        Vec3::new(-3.8, -2.0, -12.3),
        Vec3::new(2.4, -0.4, -3.5),
        Vec3::new(-1.7, 3.0, -7.5),
        Vec3::new(1.3, -2.0, -2.5),
        Vec3::new(1.5, 2.0, -2.5),
        Vec3::new(1.5, 0.2, -1.5),
        Vec3::new(-1.3, 1.0, -1.5),
    ]
}

impl DemoConfig {
    /// Load a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json(&data)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sensitivity must be positive, got {}",
                self.sensitivity
            )));
        }
        if !(self.move_speed.is_finite() && self.move_speed >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "move_speed must be non-negative, got {}",
                self.move_speed
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if self.positions.is_empty() {
            return Err(ConfigError::Invalid("at least one instance position is required".into()));
        }
        if !self.positions.iter().all(|p| p.is_finite()) || !self.scene_offset.is_finite() {
            return Err(ConfigError::Invalid("positions must be finite".into()));
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DemoConfig::default();
        config.validate().unwrap();
        assert_eq!(config.positions.len(), 10);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.sensitivity, 0.1);
        assert_eq!(config.intent_policy, IntentPolicy::FirstMatch);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(r#"{ "target_fps": 30, "intent_policy": "combined" }"#)
            .unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.intent_policy, IntentPolicy::Combined);
        assert_eq!(config.width, 800);
        assert_eq!(config.scene_offset, Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn positions_parse_as_arrays() {
        let config = DemoConfig::from_json(r#"{ "positions": [[1.0, 2.0, 3.0]] }"#).unwrap();
        assert_eq!(config.positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn rejects_zero_fps() {
        let err = DemoConfig::from_json(r#"{ "target_fps": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_clip_planes() {
        let config = DemoConfig {
            near: 10.0,
            far: 1.0,
            ..DemoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_positions() {
        let config = DemoConfig {
            positions: Vec::new(),
            ..DemoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = DemoConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "title": "cubes", "sensitivity": 0.25 }}"#).unwrap();

        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "cubes");
        assert_eq!(config.sensitivity, 0.25);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DemoConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_or_default_without_path() {
        let config = DemoConfig::load_or_default(None).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn intent_policy_from_str() {
        assert_eq!("combined".parse::<IntentPolicy>().unwrap(), IntentPolicy::Combined);
        assert_eq!("first-match".parse::<IntentPolicy>().unwrap(), IntentPolicy::FirstMatch);
        assert!("diagonal".parse::<IntentPolicy>().is_err());
    }

    #[test]
    fn aspect_ratio() {
        let config = DemoConfig::default();
        assert!((config.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }
}
