//! GPU-side uniform blocks. Every field is packed into `vec4`s so the Rust
//! and WGSL layouts agree without manual padding.

use bytemuck::{Pod, Zeroable};
use driftfield_sim::{FrameLighting, Shading};
use glam::Mat4;

/// `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

/// `@group(0) @binding(1)`: key light, engine glow and time.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    /// xyz towards the key light.
    pub key_direction: [f32; 4],
    /// xyz position, w range. A zero range disables the glow.
    pub glow_position_range: [f32; 4],
    /// rgb colour, a intensity.
    pub glow_color_intensity: [f32; 4],
    /// x shader time in seconds.
    pub time: [f32; 4],
}

impl FrameUniform {
    pub fn new(lighting: &FrameLighting, time: f32) -> Self {
        let key = lighting.key_direction;
        let (glow_position_range, glow_color_intensity) = match lighting.point {
            Some(light) => (
                light.position.extend(light.range).to_array(),
                light.color.extend(light.intensity).to_array(),
            ),
            None => ([0.0; 4], [0.0; 4]),
        };
        Self {
            key_direction: [key.x, key.y, key.z, 0.0],
            glow_position_range,
            glow_color_intensity,
            time: [time, 0.0, 0.0, 0.0],
        }
    }
}

/// `@group(1) @binding(0)`: x ambient, y diffuse, z displacement (asteroid)
/// or metallic (spaceship).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn new(shading: &Shading) -> Self {
        let params = match *shading {
            Shading::Asteroid {
                displacement,
                ambient,
                diffuse,
            } => [ambient, diffuse, displacement, 0.0],
            Shading::Spaceship {
                ambient,
                diffuse,
                metallic,
            } => [ambient, diffuse, metallic, 0.0],
            Shading::Unlit => [1.0, 0.0, 0.0, 0.0],
        };
        Self { params }
    }
}

/// `@group(2) @binding(0)`, one slot per draw behind a dynamic offset.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for normals.
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(transform: Mat4) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            normal: transform.inverse().transpose().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_sim::PointLight;
    use glam::{Vec3, Vec4};

    #[test]
    fn test_sizes_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 64);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
    }

    #[test]
    fn test_frame_without_glow() {
        let lighting = FrameLighting {
            key_direction: Vec3::ONE.normalize(),
            point: None,
        };
        let u = FrameUniform::new(&lighting, 2.5);
        assert_eq!(u.glow_position_range[3], 0.0);
        assert_eq!(u.time[0], 2.5);
    }

    #[test]
    fn test_frame_with_glow() {
        let mut glow = PointLight::engine_glow();
        glow.position = Vec3::new(1.0, 2.0, 3.0);
        let lighting = FrameLighting {
            key_direction: Vec3::Y,
            point: Some(glow),
        };
        let u = FrameUniform::new(&lighting, 0.0);
        assert_eq!(u.glow_position_range, [1.0, 2.0, 3.0, 100.0]);
        assert_eq!(u.glow_color_intensity[3], 2.0);
    }

    #[test]
    fn test_material_params() {
        let asteroid = MaterialUniform::new(&Shading::Asteroid {
            displacement: 0.005,
            ambient: 0.4,
            diffuse: 0.8,
        });
        assert_eq!(asteroid.params, [0.4, 0.8, 0.005, 0.0]);
        let ship = MaterialUniform::new(&Shading::Spaceship {
            ambient: 0.3,
            diffuse: 1.0,
            metallic: 0.8,
        });
        assert_eq!(ship.params[2], 0.8);
    }

    #[test]
    fn test_normal_matrix_survives_scale() {
        let m = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let u = ModelUniform::new(m);
        let normal = Mat4::from_cols_array_2d(&u.normal) * Vec4::new(1.0, 1.0, 0.0, 0.0);
        // Scaling X by 2 halves the X component of the transformed normal.
        assert!((normal.x - 0.5).abs() < 1e-6);
        assert!((normal.y - 1.0).abs() < 1e-6);
    }
}
