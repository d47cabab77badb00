use freelook_common::DemoConfig;
use freelook_kernel::{FreeLookCamera, InstanceTransform, Scene};
use glam::{Mat4, Vec3};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn from_config(config: &DemoConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect: config.aspect(),
            near: config.near,
            far: config.far,
        }
    }

    /// Update the aspect ratio after a resize. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Right-handed perspective with a [0, 1] depth range.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub view: Mat4,
    pub projection: Mat4,
    pub instances: Vec<InstanceTransform>,
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Elapsed seconds the instances were composed for.
    pub time: f32,
}

impl Frame {
    pub fn capture(
        camera: &FreeLookCamera,
        projection: &Projection,
        scene: &Scene,
        time: f32,
    ) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: projection.matrix(),
            instances: scene.instances(time),
            eye: camera.eye(),
            yaw: camera.yaw(),
            pitch: camera.pitch(),
            time,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Renderer-agnostic interface. A renderer consumes a captured frame and
/// produces some output.
pub trait Renderer {
    type Output;

    fn render(&mut self, frame: &Frame) -> Self::Output;
}

/// Renders frames as human-readable text.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &Frame) -> String {
        self.frames += 1;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} (t={:.3}s) ===\n",
            self.frames, frame.time
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) yaw={:.2} pitch={:.2}\n",
            frame.eye.x, frame.eye.y, frame.eye.z, frame.yaw, frame.pitch
        ));
        out.push_str(&format!("Instances: {}\n", frame.instances.len()));

        for (index, inst) in frame.instances.iter().enumerate() {
            let p = inst.model.w_axis;
            out.push_str(&format!(
                "  [{index}] pos=({:.2}, {:.2}, {:.2}) anim={:.3}\n",
                p.x, p.y, p.z, inst.animation
            ));
        }

        tracing::debug!(frame = self.frames, "rendered debug frame");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn projection_default() {
        let proj = Projection::default();
        assert_eq!(proj.fov_degrees, 45.0);
        assert_eq!(proj.near, 0.1);
        assert_eq!(proj.far, 100.0);
        assert!(!proj.matrix().is_nan());
    }

    #[test]
    fn projection_resize_ignores_zero() {
        let mut proj = Projection::default();
        proj.resize(1920, 1080);
        assert!((proj.aspect - 16.0 / 9.0).abs() < 1e-6);
        proj.resize(0, 1080);
        assert!((proj.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let proj = Projection::default();
        let clip = proj.matrix() * Vec4::new(0.0, 0.0, -proj.near, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-5);
        let clip = proj.matrix() * Vec4::new(0.0, 0.0, -proj.far, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn frame_capture_matches_sources() {
        let camera = FreeLookCamera::default();
        let projection = Projection::default();
        let scene = Scene::default();
        let frame = Frame::capture(&camera, &projection, &scene, 1.5);

        assert_eq!(frame.view, camera.view_matrix());
        assert_eq!(frame.projection, projection.matrix());
        assert_eq!(frame.instances, scene.instances(1.5));
        assert_eq!(frame.eye, camera.eye());
        assert_eq!(frame.view_projection(), frame.projection * frame.view);
    }

    #[test]
    fn first_cube_is_in_view() {
        let frame = Frame::capture(
            &FreeLookCamera::default(),
            &Projection::default(),
            &Scene::default(),
            0.0,
        );
        let center = frame.view_projection() * frame.instances[0].model.w_axis;
        let ndc = center.truncate() / center.w;
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn debug_renderer_lists_instances() {
        let frame = Frame::capture(
            &FreeLookCamera::default(),
            &Projection::default(),
            &Scene::default(),
            0.0,
        );
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&frame);

        assert!(output.contains("Frame 1"));
        assert!(output.contains("Instances: 10"));
        assert!(output.contains("eye=(0.00, 0.00, 3.00)"));
        assert!(output.contains("[9] pos=(-1.30, 1.00, -4.50)"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_counts_frames() {
        let frame = Frame::capture(
            &FreeLookCamera::default(),
            &Projection::default(),
            &Scene::new(Vec::new(), Vec3::ZERO),
            0.0,
        );
        let mut renderer = DebugTextRenderer::new();
        renderer.render(&frame);
        let output = renderer.render(&frame);
        assert!(output.contains("Frame 2"));
        assert!(output.contains("Instances: 0"));
    }
}
