//! Parametric primitive meshes.
//!
//! All primitives are centred on the origin, with the cylinder axis along +Y,
//! and wind counter-clockwise when viewed from outside.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// A primitive described by its parameters, buildable into a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Dodecahedron projected onto a sphere, each face subdivided `detail` times.
    Dodecahedron { radius: f32, detail: u32 },
    /// Capped (possibly tapered) cylinder along +Y.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    /// Axis-aligned box.
    Cuboid { width: f32, height: f32, depth: f32 },
    /// Latitude/longitude sphere.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Primitive {
    /// Build the triangle mesh this primitive describes.
    pub fn build(&self) -> Mesh {
        match *self {
            Primitive::Dodecahedron { radius, detail } => dodecahedron(radius, detail),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder(radius_top, radius_bottom, height, radial_segments),
            Primitive::Cuboid {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => uv_sphere(radius, width_segments, height_segments),
        }
    }
}

// ---------------------------------------------------------------------------
// Dodecahedron
// ---------------------------------------------------------------------------

/// Build a dodecahedron of the given radius.
///
/// Each of the 36 base triangles is split into `(detail + 1)²` triangles and
/// every vertex is pushed out onto the sphere. Vertices are not shared between
/// triangles, so per-vertex deformation tears the surface into facets.
pub fn dodecahedron(radius: f32, detail: u32) -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let r = 1.0 / t;

    #[rustfmt::skip]
    let base: [Vec3; 20] = [
        Vec3::new(-1.0, -1.0, -1.0), Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0), Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0), Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0), Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, -r, -t), Vec3::new(0.0, -r, t),
        Vec3::new(0.0, r, -t), Vec3::new(0.0, r, t),
        Vec3::new(-r, -t, 0.0), Vec3::new(-r, t, 0.0),
        Vec3::new(r, -t, 0.0), Vec3::new(r, t, 0.0),
        Vec3::new(-t, 0.0, -r), Vec3::new(t, 0.0, -r),
        Vec3::new(-t, 0.0, r), Vec3::new(t, 0.0, r),
    ];

    #[rustfmt::skip]
    const FACES: [[usize; 3]; 36] = [
        [3, 11, 7], [3, 7, 15], [3, 15, 13],
        [7, 19, 17], [7, 17, 6], [7, 6, 15],
        [17, 4, 8], [17, 8, 10], [17, 10, 6],
        [8, 0, 16], [8, 16, 2], [8, 2, 10],
        [0, 12, 1], [0, 1, 18], [0, 18, 16],
        [6, 10, 2], [6, 2, 13], [6, 13, 15],
        [2, 16, 18], [2, 18, 3], [2, 3, 13],
        [18, 1, 9], [18, 9, 11], [18, 11, 3],
        [4, 14, 12], [4, 12, 0], [4, 0, 8],
        [11, 9, 5], [11, 5, 19], [11, 19, 7],
        [19, 5, 14], [19, 14, 4], [19, 4, 17],
        [1, 12, 14], [1, 14, 5], [1, 5, 9],
    ];

    let mut triangles: Vec<[Vec3; 3]> = Vec::with_capacity(36 * ((detail + 1) as usize).pow(2));
    for [a, b, c] in FACES {
        subdivide_face(base[a], base[b], base[c], detail, &mut triangles);
    }

    let mut mesh = Mesh::default();
    for tri in &mut triangles {
        for v in tri.iter_mut() {
            *v = v.normalize() * radius;
        }
        // Keep every facet facing away from the centre.
        if (tri[1] - tri[0]).cross(tri[2] - tri[0]).dot(tri[0] + tri[1] + tri[2]) < 0.0 {
            tri.swap(1, 2);
        }

        let mut uvs = tri.map(spherical_uv);
        fix_uv_seam(&mut uvs);

        for (p, uv) in tri.iter().zip(uvs) {
            mesh.indices.push(mesh.positions.len() as u32);
            mesh.positions.push(*p);
            mesh.uvs.push(uv);
        }
    }
    mesh.compute_vertex_normals();
    mesh
}

/// Split triangle `abc` into a grid of `(detail + 1)²` smaller triangles.
fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, detail: u32, out: &mut Vec<[Vec3; 3]>) {
    let cols = (detail + 1) as usize;

    // rows[i][j]: i walks from edge ab towards c, j across the row.
    let rows: Vec<Vec<Vec3>> = (0..=cols)
        .map(|i| {
            let t = i as f32 / cols as f32;
            let start = a.lerp(c, t);
            let end = b.lerp(c, t);
            let n = cols - i;
            (0..=n)
                .map(|j| {
                    if n == 0 {
                        start
                    } else {
                        start.lerp(end, j as f32 / n as f32)
                    }
                })
                .collect()
        })
        .collect();

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.push([rows[i][k + 1], rows[i + 1][k], rows[i][k]]);
            } else {
                out.push([rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(p: Vec3) -> [f32; 2] {
    let n = p.normalize_or_zero();
    let u = n.z.atan2(-n.x) / TAU + 0.5;
    let v = n.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
    [u, v]
}

/// A triangle straddling the u = 0/1 seam would otherwise smear the whole
/// texture across itself.
fn fix_uv_seam(uvs: &mut [[f32; 2]; 3]) {
    let max = uvs.iter().map(|uv| uv[0]).fold(f32::MIN, f32::max);
    let min = uvs.iter().map(|uv| uv[0]).fold(f32::MAX, f32::min);
    if max > 0.9 && min < 0.1 {
        for uv in uvs.iter_mut() {
            if uv[0] < 0.2 {
                uv[0] += 1.0;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cylinder
// ---------------------------------------------------------------------------

/// Build a capped cylinder along +Y, centred on the origin.
///
/// `radial_segments` is clamped to at least 3.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Mesh {
    let segments = radial_segments.max(3);
    let half = height * 0.5;
    let slope = if height.abs() > f32::EPSILON {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    let mut mesh = Mesh::default();

    // Torso: two rings (top, bottom), with the seam column duplicated for UVs.
    for (row, (radius, y)) in [(radius_top, half), (radius_bottom, -half)]
        .into_iter()
        .enumerate()
    {
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.positions.push(Vec3::new(radius * sin, y, radius * cos));
            mesh.normals
                .push(Vec3::new(sin, slope, cos).normalize_or_zero());
            mesh.uvs.push([u, 1.0 - row as f32]);
        }
    }
    let stride = segments + 1;
    for x in 0..segments {
        let a = x;
        let b = stride + x;
        let c = stride + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    push_cap(&mut mesh, radius_top, half, segments, true);
    push_cap(&mut mesh, radius_bottom, -half, segments, false);
    mesh
}

fn push_cap(mesh: &mut Mesh, radius: f32, y: f32, segments: u32, top: bool) {
    if radius <= 0.0 {
        return;
    }
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let sign = if top { 1.0 } else { -1.0 };

    let center = mesh.positions.len() as u32;
    mesh.positions.push(Vec3::new(0.0, y, 0.0));
    mesh.normals.push(normal);
    mesh.uvs.push([0.5, 0.5]);

    let ring = mesh.positions.len() as u32;
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.positions.push(Vec3::new(radius * sin, y, radius * cos));
        mesh.normals.push(normal);
        mesh.uvs.push([cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5]);
    }
    for x in 0..segments {
        let p0 = ring + x;
        let p1 = ring + x + 1;
        if top {
            mesh.indices.extend_from_slice(&[p0, p1, center]);
        } else {
            mesh.indices.extend_from_slice(&[p1, p0, center]);
        }
    }
}

// ---------------------------------------------------------------------------
// Box
// ---------------------------------------------------------------------------

/// Build an axis-aligned box with the given full extents.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let half = Vec3::new(width, height, depth) * 0.5;

    // (normal, u, v) with u × v = normal.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = Mesh::default();
    for (normal, u, v) in FACES {
        let center = normal * half;
        let hu = u * (u.abs() * half).element_sum();
        let hv = v * (v.abs() * half).element_sum();
        let base = mesh.positions.len() as u32;

        let corners = [
            (center - hu - hv, [0.0, 1.0]),
            (center + hu - hv, [1.0, 1.0]),
            (center + hu + hv, [1.0, 0.0]),
            (center - hu + hv, [0.0, 0.0]),
        ];
        for (p, uv) in corners {
            mesh.positions.push(p);
            mesh.normals.push(normal);
            mesh.uvs.push(uv);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

// ---------------------------------------------------------------------------
// Sphere
// ---------------------------------------------------------------------------

/// Build a latitude/longitude sphere.
///
/// Segment counts are clamped to at least 3 around and 2 from pole to pole.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut mesh = Mesh::default();
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let (sin_theta, cos_theta) = (v * PI).sin_cos();
            let dir = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            mesh.positions.push(dir * radius);
            mesh.normals.push(dir);
            mesh.uvs.push([u, v]);
        }
    }

    let stride = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle of a convex mesh centred on the origin must face away
    /// from the origin.
    fn assert_outward(mesh: &Mesh, name: &str) {
        for tri in mesh.triangles() {
            let n = mesh.triangle_normal(tri);
            if n.length_squared() < 1e-12 {
                continue;
            }
            let centroid =
                (mesh.positions[tri[0]] + mesh.positions[tri[1]] + mesh.positions[tri[2]]) / 3.0;
            assert!(
                n.dot(centroid) > 0.0,
                "{name}: triangle {tri:?} faces inward"
            );
        }
    }

    fn assert_indices_valid(mesh: &Mesh) {
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
    }

    #[test]
    fn test_dodecahedron_triangle_counts() {
        assert_eq!(dodecahedron(1.0, 0).triangle_count(), 36);
        assert_eq!(dodecahedron(1.0, 1).triangle_count(), 144);
        assert_eq!(dodecahedron(1.0, 2).triangle_count(), 324);
    }

    #[test]
    fn test_dodecahedron_vertices_on_sphere() {
        let mesh = dodecahedron(1.7, 1);
        for p in &mesh.positions {
            assert!((p.length() - 1.7).abs() < 1e-4, "vertex at {}", p.length());
        }
    }

    #[test]
    fn test_dodecahedron_is_non_indexed() {
        let mesh = dodecahedron(1.0, 1);
        assert_eq!(mesh.vertex_count(), mesh.indices.len());
        assert_indices_valid(&mesh);
    }

    #[test]
    fn test_dodecahedron_faces_outward() {
        let mesh = dodecahedron(2.0, 1);
        assert_outward(&mesh, "dodecahedron");
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(n.dot(*p) > 0.0);
        }
    }

    #[test]
    fn test_dodecahedron_uvs_in_range() {
        let mesh = dodecahedron(1.0, 1);
        for uv in &mesh.uvs {
            assert!((0.0..=1.2).contains(&uv[0]), "u = {}", uv[0]);
            assert!((0.0..=1.0).contains(&uv[1]), "v = {}", uv[1]);
        }
    }

    #[test]
    fn test_cylinder_shape() {
        let mesh = cylinder(0.4, 0.6, 5.0, 8);
        assert_indices_valid(&mesh);
        // torso + two caps
        assert_eq!(mesh.triangle_count(), 8 * 2 + 8 + 8);
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((max_y - 2.5).abs() < 1e-6);
        assert!((min_y + 2.5).abs() < 1e-6);
        assert_outward(&mesh, "cylinder");
    }

    #[test]
    fn test_cylinder_radii() {
        let mesh = cylinder(0.25, 0.35, 0.8, 6);
        for p in &mesh.positions {
            let r = Vec3::new(p.x, 0.0, p.z).length();
            assert!(r <= 0.35 + 1e-5);
        }
    }

    #[test]
    fn test_cylinder_min_segments() {
        assert_eq!(cylinder(1.0, 1.0, 1.0, 1).triangle_count(), 3 * 4);
    }

    #[test]
    fn test_cuboid_extents_and_winding() {
        let mesh = cuboid(2.0, 0.2, 1.0);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.triangle_count(), 12);
        for p in &mesh.positions {
            assert!((p.x.abs() - 1.0).abs() < 1e-6);
            assert!((p.y.abs() - 0.1).abs() < 1e-6);
            assert!((p.z.abs() - 0.5).abs() < 1e-6);
        }
        assert_outward(&mesh, "cuboid");
    }

    #[test]
    fn test_sphere_shape() {
        let mesh = uv_sphere(500.0, 32, 32);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        // Pole rows contribute one triangle per segment, the rest two.
        assert_eq!(mesh.triangle_count(), 32 * 2 * 32 - 2 * 32);
        for p in &mesh.positions {
            assert!((p.length() - 500.0).abs() < 1e-2);
        }
        assert_outward(&mesh, "sphere");
    }

    #[test]
    fn test_primitive_build_matches_functions() {
        let desc = Primitive::Cuboid {
            width: 2.0,
            height: 0.2,
            depth: 0.8,
        };
        assert_eq!(desc.build(), cuboid(2.0, 0.2, 0.8));
    }

    #[test]
    fn test_primitive_ron_roundtrip() {
        let desc = Primitive::Cylinder {
            radius_top: 0.4,
            radius_bottom: 0.6,
            height: 3.0,
            radial_segments: 8,
        };
        let text = ron::to_string(&desc).unwrap();
        let back: Primitive = ron::from_str(&text).unwrap();
        assert_eq!(back, desc);
    }
}
