use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Perspective camera. Orientation is yaw/pitch; the projection is cached
/// and rebuilt whenever the aspect ratio changes.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Camera looking down -Z
    pub fn new(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fov_y = fov_degrees.to_radians();
        Self {
            position,
            yaw: std::f32::consts::PI,
            pitch: 0.0,
            fov_y,
            aspect,
            near,
            far,
            projection: Mat4::perspective_rh(fov_y, aspect, near, far),
        }
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(
            Vec3::from_array(config.position),
            config.fov_degrees,
            aspect,
            config.near,
            config.far,
        )
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update the aspect ratio and rebuild the projection.
    /// Non-finite or non-positive ratios are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if !aspect.is_finite() || aspect <= 0.0 {
            return;
        }
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(Vec3::new(0.0, 8.0, 30.0), 55.0, 4.0 / 3.0, 0.1, 100.0)
    }

    #[test]
    fn looks_down_negative_z() {
        let cam = camera();
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((cam.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn set_aspect_rebuilds_projection() {
        let mut cam = camera();
        let before = cam.projection_matrix();

        cam.set_aspect(16.0 / 9.0);

        assert_eq!(cam.aspect(), 16.0 / 9.0);
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn set_aspect_ignores_degenerate_ratio() {
        let mut cam = camera();
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect(), 4.0 / 3.0);
    }

    #[test]
    fn point_in_front_projects_inside_clip_volume() {
        let cam = camera();
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 8.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
