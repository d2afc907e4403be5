//! Perspective camera with reverse-Z projection.

use driftfield_sim::CameraPose;
use glam::{Mat4, Vec3};

use crate::uniforms::CameraUniform;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            fov_y: fov_degrees.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near,
            far,
        }
    }

    /// Move to a simulated camera pose.
    pub fn set_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
    }

    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        self.aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Perspective with near and far swapped so near lands on depth 1.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(camera: &Camera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection_matrix() * p.extend(1.0);
        clip.truncate() / clip.w
    }

    fn rig_camera() -> Camera {
        let mut camera = Camera::new(75.0, 0.1, 1000.0);
        camera.set_pose(&CameraPose {
            position: Vec3::new(0.0, 8.0, 12.0),
            target: Vec3::ZERO,
        });
        camera
    }

    #[test]
    fn test_target_projects_to_centre() {
        let ndc = project(&rig_camera(), Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_reverse_z_orders_depth() {
        let camera = Camera::new(75.0, 0.1, 1000.0);
        let near = project(&camera, Vec3::new(0.0, 0.0, -0.1));
        let far = project(&camera, Vec3::new(0.0, 0.0, -1000.0));
        let mid = project(&camera, Vec3::new(0.0, 0.0, -10.0));
        assert!((near.z - 1.0).abs() < 1e-4);
        assert!(far.z.abs() < 1e-4);
        assert!(mid.z < near.z && mid.z > far.z);
    }

    #[test]
    fn test_aspect_ratio_from_size() {
        let mut camera = Camera::new(75.0, 0.1, 1000.0);
        camera.set_aspect_ratio(1920, 1080);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect_ratio(800, 0);
        assert!(camera.aspect_ratio.is_finite());
    }

    #[test]
    fn test_uniform_carries_position() {
        let camera = rig_camera();
        let uniform = camera.to_uniform();
        assert_eq!(uniform.position, [0.0, 8.0, 12.0, 1.0]);
        let m = Mat4::from_cols_array_2d(&uniform.view_proj);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
    }
}
