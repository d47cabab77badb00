use crate::compose::{compose_instance, InstanceTransform};
use freelook_common::DemoConfig;
use glam::Vec3;

/// The fixed list of instance base positions. Read-only for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    positions: Vec<Vec3>,
    offset: Vec3,
}

impl Scene {
    pub fn new(positions: Vec<Vec3>, offset: Vec3) -> Self {
        Self { positions, offset }
    }

    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new(config.positions.clone(), config.scene_offset)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Base position of instance `index` with the scene offset applied.
    pub fn base(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).map(|p| *p + self.offset)
    }

    /// Compose every instance for elapsed `time` seconds, in index order.
    pub fn instances(&self, time: f32) -> Vec<InstanceTransform> {
        let instances: Vec<InstanceTransform> = self
            .positions
            .iter()
            .enumerate()
            .map(|(index, p)| compose_instance(*p + self.offset, index, time))
            .collect();
        tracing::trace!(count = instances.len(), time, "composed instances");
        instances
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::from_config(&DemoConfig::default())
    }
}
