use glam::{Mat4, Vec3};

/// Animation variant of an instance. Which one an instance gets depends only
/// on its index; the split exists for visual variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn for_index(index: usize) -> Self {
        if index % 3 == 0 { Variant::A } else { Variant::B }
    }

    /// Rotation axis (not normalized).
    pub fn axis(self) -> Vec3 {
        match self {
            Variant::A => Vec3::new(1.0, 0.3, 0.5),
            Variant::B => Vec3::new(1.0, 0.3, 0.0),
        }
    }

    /// Rotation angle in radians at `time` seconds.
    pub fn angle(self, time: f32) -> f32 {
        match self {
            Variant::A => (time * 20.0).to_radians(),
            Variant::B => (-time * 20.0).to_radians(),
        }
    }

    /// Scalar in [0, 1] handed to the shading stage.
    pub fn animation(self, time: f32) -> f32 {
        match self {
            Variant::A => time.sin() * 0.5 + 0.5,
            Variant::B => (time * 1.5).sin() * 0.5 + 0.5,
        }
    }
}

/// Model matrix plus the animation scalar for one rendered instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub model: Mat4,
    pub animation: f32,
}

/// Compose the transform of instance `index` at `base` for elapsed `time` seconds.
///
/// The instance is rotated about its own origin and then translated, i.e.
/// `model = T(base) * R(axis, angle)`.
pub fn compose_instance(base: Vec3, index: usize, time: f32) -> InstanceTransform {
    let variant = Variant::for_index(index);
    let translation = Mat4::from_translation(base);
    let rotation = Mat4::from_axis_angle(variant.axis().normalize(), variant.angle(time));

    InstanceTransform {
        model: translation * rotation,
        animation: variant.animation(time),
    }
}
